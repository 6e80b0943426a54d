//! SQLite topic repository implementation.

use arcana_core::topic::repository::TopicRepository;
use arcana_types::error::RepositoryError;
use arcana_types::topic::Topic;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

pub struct SqliteTopicRepository {
    pool: DatabasePool,
}

impl SqliteTopicRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct TopicRow {
    id: String,
    name: String,
    code: Option<String>,
    image: Option<String>,
    created_at: String,
}

impl TopicRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            image: row.try_get("image")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_topic(self) -> Result<Topic, RepositoryError> {
        Ok(Topic {
            id: parse_uuid(&self.id, "topic id")?,
            name: self.name,
            code: self.code,
            image: self.image,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl TopicRepository for SqliteTopicRepository {
    async fn create(&self, topic: &Topic) -> Result<Topic, RepositoryError> {
        sqlx::query("INSERT INTO topics (id, name, code, image, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(topic.id.to_string())
            .bind(&topic.name)
            .bind(&topic.code)
            .bind(&topic.image)
            .bind(format_datetime(&topic.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_write_error(e, &topic.name))?;

        Ok(topic.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Topic>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM topics WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let topic_row =
                    TopicRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(topic_row.into_topic()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Topic>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM topics ORDER BY name ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut topics = Vec::with_capacity(rows.len());
        for row in &rows {
            let topic_row =
                TopicRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            topics.push(topic_row.into_topic()?);
        }
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;

    #[tokio::test]
    async fn test_create_get_and_list() {
        let repo = SqliteTopicRepository::new(test_pool().await);
        let love = Topic::new("Love", Some("love".into()), Some("love.png".into())).unwrap();
        let career = Topic::new("Career", None, None).unwrap();
        repo.create(&love).await.unwrap();
        repo.create(&career).await.unwrap();

        let loaded = repo.get_by_id(&love.id).await.unwrap().unwrap();
        assert_eq!(loaded.code.as_deref(), Some("love"));
        assert_eq!(loaded.image.as_deref(), Some("love.png"));

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Career", "Love"]);
    }

    #[tokio::test]
    async fn test_name_is_unique_ignoring_case() {
        let repo = SqliteTopicRepository::new(test_pool().await);
        repo.create(&Topic::new("Love", None, None).unwrap()).await.unwrap();
        let err = repo
            .create(&Topic::new("LOVE", None, None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_missing_topic() {
        let repo = SqliteTopicRepository::new(test_pool().await);
        assert!(repo.get_by_id(&Uuid::now_v7()).await.unwrap().is_none());
    }
}
