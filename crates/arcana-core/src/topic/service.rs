use arcana_types::error::{RepositoryError, TopicError};
use arcana_types::topic::Topic;
use tracing::info;
use uuid::Uuid;

use super::repository::TopicRepository;

pub struct TopicService<T: TopicRepository> {
    repo: T,
}

impl<T: TopicRepository> TopicService<T> {
    pub fn new(repo: T) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        name: &str,
        code: Option<String>,
        image: Option<String>,
    ) -> Result<Topic, TopicError> {
        let topic = Topic::new(name, code, image)?;
        let topic = self.repo.create(&topic).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => TopicError::NameConflict(topic.name.clone()),
            other => other.into(),
        })?;
        info!(topic_id = %topic.id, name = %topic.name, "topic created");
        Ok(topic)
    }

    /// All topics, ordered by name.
    pub async fn list(&self) -> Result<Vec<Topic>, TopicError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Topic, TopicError> {
        self.repo.get_by_id(&id).await?.ok_or(TopicError::NotFound)
    }
}
