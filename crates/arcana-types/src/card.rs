//! The tarot deck readings are drawn from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::Paging;
use crate::error::CardError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    /// Unique within the deck; chats refer to cards by this name.
    pub name: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// A new deck card. Without an explicit image the path is derived from
    /// the name, e.g. "The Fool" -> `/card/the-fool.png`.
    pub fn new(name: &str, image: Option<String>) -> Result<Self, CardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CardError::InvalidName("name cannot be empty".to_string()));
        }
        let image = image
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| default_image(name));
        Ok(Self {
            id: Uuid::now_v7(),
            name: name.to_string(),
            image,
            created_at: Utc::now(),
        })
    }
}

fn default_image(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    format!("/card/{slug}.png")
}

/// One page of the deck, ordered by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPage {
    pub cards: Vec<Card>,
    pub paging: Paging,
}
