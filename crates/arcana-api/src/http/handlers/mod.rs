//! HTTP request handlers, one module per resource.

pub mod card;
pub mod chat;
pub mod horoscope;
pub mod post;
pub mod topic;
pub mod user;
pub mod ws;

use uuid::Uuid;

use crate::http::error::AppError;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}
