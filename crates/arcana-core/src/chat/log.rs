//! The message log of a chat.
//!
//! A thin view over [`ChatRepository`] that owns the log's rules: default
//! seen flags, 1-based paging, and bulk acknowledgement of AI output.

use arcana_types::chat::{Message, MessagePage, Paging, SenderType};
use arcana_types::error::{ChatError, RepositoryError};
use uuid::Uuid;

use super::repository::ChatRepository;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct MessageLog<'a, C: ChatRepository> {
    repo: &'a C,
}

impl<'a, C: ChatRepository> MessageLog<'a, C> {
    pub fn new(repo: &'a C) -> Self {
        Self { repo }
    }

    /// Append one message. `seen` defaults per sender type when `None`.
    pub async fn append(
        &self,
        chat_id: Uuid,
        sender: Option<Uuid>,
        sender_type: SenderType,
        body: &str,
        seen: Option<bool>,
    ) -> Result<Message, RepositoryError> {
        let message = Message::new(
            chat_id,
            sender,
            sender_type,
            body.to_string(),
            seen.unwrap_or_else(|| sender_type.default_seen()),
        );
        self.repo.append_message(&message).await?;
        Ok(message)
    }

    /// One page of the log, newest first, with the chat summary joined in.
    ///
    /// `page` is 1-based; 0 is treated as 1. `page_size` is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    pub async fn page(
        &self,
        chat_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> Result<MessagePage, ChatError> {
        let chat = self
            .repo
            .get_summary(&chat_id)
            .await?
            .ok_or(ChatError::NotFound)?;

        let total = self.repo.count_messages(&chat_id).await?;
        let paging = Paging::new(page.max(1), page_size.clamp(1, MAX_PAGE_SIZE), total);
        let messages = self
            .repo
            .page_messages(&chat_id, paging.limit, paging.offset())
            .await?;

        Ok(MessagePage {
            chat,
            messages,
            paging,
        })
    }

    /// Acknowledge every unseen AI message. Returns how many flipped.
    pub async fn mark_all_seen(&self, chat_id: Uuid) -> Result<u64, RepositoryError> {
        self.repo.mark_ai_messages_seen(&chat_id).await
    }

    /// The whole conversation, oldest first.
    pub async fn history(&self, chat_id: Uuid) -> Result<Vec<Message>, RepositoryError> {
        self.repo.history(&chat_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChatRepository;
    use arcana_types::chat::Chat;

    async fn seeded() -> (MockChatRepository, Uuid) {
        let repo = MockChatRepository::default();
        let chat = Chat::new(Uuid::now_v7(), Uuid::now_v7(), "q".into(), vec![]);
        repo.create_chat(&chat).await.unwrap();
        (repo, chat.id)
    }

    #[tokio::test]
    async fn append_applies_default_seen_flags() {
        let (repo, chat_id) = seeded().await;
        let log = MessageLog::new(&repo);
        let user = log
            .append(chat_id, Some(Uuid::now_v7()), SenderType::User, "hi", None)
            .await
            .unwrap();
        let ai = log.append(chat_id, None, SenderType::Ai, "hello", None).await.unwrap();
        assert!(user.seen);
        assert!(!ai.seen);
        assert!(ai.sender_id.is_none());
    }

    #[tokio::test]
    async fn page_is_newest_first_with_totals() {
        let (repo, chat_id) = seeded().await;
        let log = MessageLog::new(&repo);
        for i in 0..5 {
            log.append(chat_id, None, SenderType::Ai, &format!("m{i}"), None)
                .await
                .unwrap();
        }

        let first = log.page(chat_id, 1, 2).await.unwrap();
        let bodies: Vec<_> = first.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m4", "m3"]);
        assert_eq!(first.paging.total, 5);
        assert_eq!(first.paging.total_pages, 3);

        let last = log.page(chat_id, 3, 2).await.unwrap();
        assert_eq!(last.messages.len(), 1);
        assert_eq!(last.messages[0].body, "m0");
        assert_eq!(last.chat.question, "q");
    }

    #[tokio::test]
    async fn page_of_unknown_chat_is_not_found() {
        let repo = MockChatRepository::default();
        let err = MessageLog::new(&repo).page(Uuid::now_v7(), 1, 10).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound));
    }

    #[tokio::test]
    async fn page_bounds_are_clamped() {
        let (repo, chat_id) = seeded().await;
        let page = MessageLog::new(&repo).page(chat_id, 0, 10_000).await.unwrap();
        assert_eq!(page.paging.page, 1);
        assert_eq!(page.paging.limit, MAX_PAGE_SIZE);
        assert_eq!(page.paging.total_pages, 0);
    }

    #[tokio::test]
    async fn mark_all_seen_only_touches_unseen_ai_messages() {
        let (repo, chat_id) = seeded().await;
        let log = MessageLog::new(&repo);
        log.append(chat_id, None, SenderType::Ai, "a", None).await.unwrap();
        log.append(chat_id, None, SenderType::Ai, "b", None).await.unwrap();
        log.append(chat_id, Some(Uuid::now_v7()), SenderType::User, "c", None)
            .await
            .unwrap();

        assert_eq!(log.mark_all_seen(chat_id).await.unwrap(), 2);
        assert_eq!(log.mark_all_seen(chat_id).await.unwrap(), 0);
        assert!(log.history(chat_id).await.unwrap().iter().all(|m| m.seen));
    }

    #[tokio::test]
    async fn history_is_oldest_first() {
        let (repo, chat_id) = seeded().await;
        let log = MessageLog::new(&repo);
        for body in ["one", "two", "three"] {
            log.append(chat_id, None, SenderType::Ai, body, None).await.unwrap();
        }
        let bodies: Vec<_> = log
            .history(chat_id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }
}
