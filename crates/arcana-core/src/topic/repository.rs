//! TopicRepository trait definition.

use arcana_types::error::RepositoryError;
use arcana_types::topic::Topic;
use uuid::Uuid;

pub trait TopicRepository: Send + Sync {
    /// Create a topic. A duplicate name yields `RepositoryError::Conflict`.
    fn create(
        &self,
        topic: &Topic,
    ) -> impl std::future::Future<Output = Result<Topic, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Topic>, RepositoryError>> + Send;

    /// All topics ordered by name.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Topic>, RepositoryError>> + Send;
}
