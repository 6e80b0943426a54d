//! Reading topics (love, career, health, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TopicError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(name: &str, code: Option<String>, image: Option<String>) -> Result<Self, TopicError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TopicError::InvalidName("name cannot be empty".to_string()));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            name: name.to_string(),
            code: code.filter(|c| !c.trim().is_empty()),
            image,
            created_at: Utc::now(),
        })
    }
}
