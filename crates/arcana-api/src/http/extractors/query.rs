//! Query parameter extractors for list endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use arcana_types::chat::ChatFilter;

use crate::http::error::AppError;

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChatListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// `true` for open chats, `false` for closed ones.
    pub status: Option<bool>,
    /// Comma-separated topic ids.
    pub topic_ids: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ChatListQuery {
    pub fn filter(&self) -> Result<ChatFilter, AppError> {
        let topic_ids = match self.topic_ids.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<Uuid>()
                        .map_err(|_| AppError::Validation(format!("Invalid topic id: {s}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(ChatFilter {
            status: self.status,
            topic_ids,
            from: self.from,
            to: self.to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_ids_are_split_and_parsed() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let query = ChatListQuery {
            topic_ids: Some(format!("{a}, {b},")),
            status: Some(true),
            ..ChatListQuery::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.topic_ids, vec![a, b]);
        assert_eq!(filter.status, Some(true));
    }

    #[test]
    fn bad_topic_id_is_rejected() {
        let query = ChatListQuery {
            topic_ids: Some("love".into()),
            ..ChatListQuery::default()
        };
        assert!(matches!(query.filter(), Err(AppError::Validation(_))));
    }
}
