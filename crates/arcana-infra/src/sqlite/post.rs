//! SQLite feed post repository implementation.

use arcana_core::post::repository::PostRepository;
use arcana_types::error::RepositoryError;
use arcana_types::post::{FeedPost, Post};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

pub struct SqlitePostRepository {
    pool: DatabasePool,
}

impl SqlitePostRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct PostRow {
    id: String,
    admin_id: String,
    content: String,
    images: String,
    created_at: String,
    updated_at: String,
}

impl PostRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            admin_id: row.try_get("admin_id")?,
            content: row.try_get("content")?,
            images: row.try_get("images")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_post(self) -> Result<Post, RepositoryError> {
        Ok(Post {
            id: parse_uuid(&self.id, "post id")?,
            admin_id: parse_uuid(&self.admin_id, "admin id")?,
            content: self.content,
            images: serde_json::from_str(&self.images)
                .map_err(|e| RepositoryError::Query(format!("invalid images column: {e}")))?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn encode_images(images: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(images).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl PostRepository for SqlitePostRepository {
    async fn create(&self, post: &Post) -> Result<Post, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO posts (id, admin_id, content, images, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(post.id.to_string())
        .bind(post.admin_id.to_string())
        .bind(&post.content)
        .bind(encode_images(&post.images)?)
        .bind(format_datetime(&post.created_at))
        .bind(format_datetime(&post.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(post.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let post_row =
                    PostRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(post_row.into_post()?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, post: &Post) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE posts SET content = ?, images = ?, updated_at = ? WHERE id = ?")
            .bind(&post.content)
            .bind(encode_images(&post.images)?)
            .bind(format_datetime(&post.updated_at))
            .bind(post.id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn feed(&self, limit: u32, offset: u64) -> Result<(Vec<FeedPost>, u64), RepositoryError> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS cnt FROM posts")
            .fetch_one(&self.pool.reader)
            .await
            .and_then(|row| row.try_get("cnt"))
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let rows = sqlx::query(
            r#"SELECT p.*, u.name AS admin_name
               FROM posts p
               JOIN users u ON u.id = p.admin_id
               ORDER BY p.created_at DESC, p.rowid DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(i64::from(limit))
        .bind(offset as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in &rows {
            let get = |e: sqlx::Error| RepositoryError::Query(e.to_string());
            posts.push(FeedPost {
                post: PostRow::from_row(row).map_err(get)?.into_post()?,
                admin_name: row.try_get("admin_name").map_err(get)?,
            });
        }
        Ok((posts, total as u64))
    }
}
