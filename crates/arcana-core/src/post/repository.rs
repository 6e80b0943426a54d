//! PostRepository trait definition.

use arcana_types::error::RepositoryError;
use arcana_types::post::{FeedPost, Post};
use uuid::Uuid;

pub trait PostRepository: Send + Sync {
    fn create(
        &self,
        post: &Post,
    ) -> impl std::future::Future<Output = Result<Post, RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Post>, RepositoryError>> + Send;

    /// Overwrite content, images and `updated_at`. A missing post yields
    /// `RepositoryError::NotFound`.
    fn update(
        &self,
        post: &Post,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// A missing post yields `RepositoryError::NotFound`.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// One page of posts newest first with author names joined in, plus the
    /// total number of posts.
    fn feed(
        &self,
        limit: u32,
        offset: u64,
    ) -> impl std::future::Future<Output = Result<(Vec<FeedPost>, u64), RepositoryError>> + Send;
}
