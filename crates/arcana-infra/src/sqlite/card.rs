//! SQLite card deck repository implementation.

use arcana_core::card::repository::CardRepository;
use arcana_types::card::Card;
use arcana_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

pub struct SqliteCardRepository {
    pool: DatabasePool,
}

impl SqliteCardRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct CardRow {
    id: String,
    name: String,
    image: String,
    created_at: String,
}

impl CardRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            image: row.try_get("image")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_card(self) -> Result<Card, RepositoryError> {
        Ok(Card {
            id: parse_uuid(&self.id, "card id")?,
            name: self.name,
            image: self.image,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn rows_to_cards(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Card>, RepositoryError> {
    let mut cards = Vec::with_capacity(rows.len());
    for row in rows {
        let card_row = CardRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        cards.push(card_row.into_card()?);
    }
    Ok(cards)
}

impl CardRepository for SqliteCardRepository {
    async fn create(&self, card: &Card) -> Result<Card, RepositoryError> {
        sqlx::query("INSERT INTO cards (id, name, image, created_at) VALUES (?, ?, ?, ?)")
            .bind(card.id.to_string())
            .bind(&card.name)
            .bind(&card.image)
            .bind(format_datetime(&card.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_write_error(e, &card.name))?;

        Ok(card.clone())
    }

    async fn page(&self, limit: u32, offset: u64) -> Result<(Vec<Card>, u64), RepositoryError> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS cnt FROM cards")
            .fetch_one(&self.pool.reader)
            .await
            .and_then(|row| row.try_get("cnt"))
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let rows = sqlx::query("SELECT * FROM cards ORDER BY name ASC LIMIT ? OFFSET ?")
            .bind(i64::from(limit))
            .bind(offset as i64)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok((rows_to_cards(&rows)?, total as u64))
    }

    async fn all(&self) -> Result<Vec<Card>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM cards")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_cards(&rows)
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Card>, RepositoryError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!("SELECT * FROM cards WHERE name IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for name in names {
            query = query.bind(name.as_str());
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_cards(&rows)
    }
}
