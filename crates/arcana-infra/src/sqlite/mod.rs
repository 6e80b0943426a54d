//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod card;
pub mod chat;
pub mod horoscope;
pub mod pool;
pub mod post;
pub mod topic;
pub mod user;

use arcana_types::error::RepositoryError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Column helpers shared by the repositories
// ---------------------------------------------------------------------------

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Query(format!("invalid date: {e}")))
}

pub(crate) fn parse_uuid(s: &str, column: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {column}: {e}")))
}

/// Map a UNIQUE violation to `Conflict`, anything else to `Query`.
pub(crate) fn map_write_error(e: sqlx::Error, what: &str) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(what.to_string())
        }
        _ => RepositoryError::Query(e.to_string()),
    }
}
