//! SQLite horoscope repository implementation.

use arcana_core::horoscope::repository::HoroscopeRepository;
use arcana_types::error::RepositoryError;
use arcana_types::horoscope::{Horoscope, HoroscopeReading, Language, LuckyColor};
use chrono::{NaiveDate, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_date, parse_datetime, parse_uuid};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteHoroscopeRepository {
    pool: DatabasePool,
}

impl SqliteHoroscopeRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct HoroscopeRow {
    id: String,
    user_id: String,
    date: String,
    zodiac: String,
    icon: String,
    summary: String,
    love: String,
    career: String,
    finance: String,
    health: String,
    lucky_number: i64,
    lucky_color_name: String,
    lucky_color_code: String,
    created_at: String,
}

impl HoroscopeRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            date: row.try_get("date")?,
            zodiac: row.try_get("zodiac")?,
            icon: row.try_get("icon")?,
            summary: row.try_get("summary")?,
            love: row.try_get("love")?,
            career: row.try_get("career")?,
            finance: row.try_get("finance")?,
            health: row.try_get("health")?,
            lucky_number: row.try_get("lucky_number")?,
            lucky_color_name: row.try_get("lucky_color_name")?,
            lucky_color_code: row.try_get("lucky_color_code")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_horoscope(self) -> Result<Horoscope, RepositoryError> {
        let lucky_number = u8::try_from(self.lucky_number).map_err(|_| {
            RepositoryError::Query(format!("invalid lucky_number: {}", self.lucky_number))
        })?;
        Ok(Horoscope {
            id: parse_uuid(&self.id, "horoscope id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            date: parse_date(&self.date)?,
            reading: HoroscopeReading {
                zodiac: self.zodiac,
                icon: self.icon,
                summary: self.summary,
                love: self.love,
                career: self.career,
                finance: self.finance,
                health: self.health,
                lucky_number,
                lucky_color: LuckyColor {
                    name: self.lucky_color_name,
                    code: self.lucky_color_code,
                },
            },
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl HoroscopeRepository for SqliteHoroscopeRepository {
    async fn get(
        &self,
        user_id: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<Horoscope>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM horoscopes WHERE user_id = ? AND date = ?")
            .bind(user_id.to_string())
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let horoscope_row = HoroscopeRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(horoscope_row.into_horoscope()?))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, horoscope: &Horoscope) -> Result<Horoscope, RepositoryError> {
        let reading = &horoscope.reading;
        sqlx::query(
            r#"INSERT INTO horoscopes (id, user_id, date, zodiac, icon, summary, love, career, finance, health, lucky_number, lucky_color_name, lucky_color_code, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(horoscope.id.to_string())
        .bind(horoscope.user_id.to_string())
        .bind(horoscope.date.format(DATE_FORMAT).to_string())
        .bind(&reading.zodiac)
        .bind(&reading.icon)
        .bind(&reading.summary)
        .bind(&reading.love)
        .bind(&reading.career)
        .bind(&reading.finance)
        .bind(&reading.health)
        .bind(i64::from(reading.lucky_number))
        .bind(&reading.lucky_color.name)
        .bind(&reading.lucky_color.code)
        .bind(format_datetime(&horoscope.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, &format!("horoscope for {}", horoscope.date)))?;

        Ok(horoscope.clone())
    }

    async fn get_translation(
        &self,
        horoscope_id: &Uuid,
        language: Language,
    ) -> Result<Option<HoroscopeReading>, RepositoryError> {
        let row = sqlx::query(
            "SELECT reading FROM horoscope_translations WHERE horoscope_id = ? AND language = ?",
        )
        .bind(horoscope_id.to_string())
        .bind(language.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let json: String = row
            .try_get("reading")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let reading = serde_json::from_str(&json)
            .map_err(|e| RepositoryError::Query(format!("invalid translation: {e}")))?;
        Ok(Some(reading))
    }

    async fn put_translation(
        &self,
        horoscope_id: &Uuid,
        language: Language,
        reading: &HoroscopeReading,
    ) -> Result<(), RepositoryError> {
        let json =
            serde_json::to_string(reading).map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT OR REPLACE INTO horoscope_translations (horoscope_id, language, reading, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(horoscope_id.to_string())
        .bind(language.to_string())
        .bind(json)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete_through(&self, date: NaiveDate) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM horoscopes WHERE date <= ?")
            .bind(date.format(DATE_FORMAT).to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
