//! Publishing and reading the feed.
//!
//! Only admins write. Anyone signed in reads, newest first.

use arcana_types::chat::Paging;
use arcana_types::error::{PostError, RepositoryError};
use arcana_types::post::{Post, PostPage};
use arcana_types::user::User;
use tracing::info;
use uuid::Uuid;

use super::repository::PostRepository;

pub const MAX_PAGE_SIZE: u32 = 50;

pub struct PostService<P: PostRepository> {
    repo: P,
}

impl<P: PostRepository> PostService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    pub async fn create(&self, author: &User, content: &str, images: Vec<String>) -> Result<Post, PostError> {
        require_admin(author)?;
        let post = self.repo.create(&Post::new(author.id, content, images)?).await?;
        info!(post_id = %post.id, admin_id = %author.id, images = post.images.len(), "post published");
        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, PostError> {
        self.repo.get(&id).await?.ok_or(PostError::NotFound)
    }

    /// Replace a post's content and image list.
    pub async fn update(
        &self,
        editor: &User,
        id: Uuid,
        content: &str,
        images: Vec<String>,
    ) -> Result<Post, PostError> {
        require_admin(editor)?;
        let mut post = self.get(id).await?;
        post.revise(content, images)?;
        self.repo.update(&post).await.map_err(not_found)?;
        info!(post_id = %id, admin_id = %editor.id, "post updated");
        Ok(post)
    }

    /// Delete a post, returning what was removed.
    pub async fn delete(&self, editor: &User, id: Uuid) -> Result<Post, PostError> {
        require_admin(editor)?;
        let post = self.get(id).await?;
        self.repo.delete(&id).await.map_err(not_found)?;
        info!(post_id = %id, admin_id = %editor.id, "post deleted");
        Ok(post)
    }

    /// One page of the feed, newest first.
    pub async fn feed(&self, page: u32, page_size: u32) -> Result<PostPage, PostError> {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(limit);
        let (posts, total) = self.repo.feed(limit, offset).await?;
        Ok(PostPage {
            posts,
            paging: Paging::new(page, limit, total),
        })
    }
}

fn require_admin(user: &User) -> Result<(), PostError> {
    if user.is_admin() { Ok(()) } else { Err(PostError::Forbidden) }
}

fn not_found(e: RepositoryError) -> PostError {
    match e {
        RepositoryError::NotFound => PostError::NotFound,
        other => other.into(),
    }
}
