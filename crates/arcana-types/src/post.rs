//! Admin-authored posts shown in the app's social feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::Paging;
use crate::error::PostError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub content: String,
    /// Image URLs in display order.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(admin_id: Uuid, content: &str, images: Vec<String>) -> Result<Self, PostError> {
        let content = checked_content(content)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            admin_id,
            content,
            images: clean_images(images),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace content and images, bumping `updated_at`.
    pub fn revise(&mut self, content: &str, images: Vec<String>) -> Result<(), PostError> {
        self.content = checked_content(content)?;
        self.images = clean_images(images);
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn checked_content(content: &str) -> Result<String, PostError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(PostError::EmptyContent);
    }
    Ok(content.to_string())
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

/// A feed post with its author's display name joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub admin_name: String,
}

/// One page of the feed, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<FeedPost>,
    pub paging: Paging,
}
