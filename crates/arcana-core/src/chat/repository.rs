//! ChatRepository trait definition.
//!
//! Chat rows and their message log live behind one port because message
//! rows are owned by (and cascade with) their chat.

use arcana_types::chat::{Chat, ChatFilter, ChatListItem, ChatSummary, Message};
use arcana_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository trait for chat and message persistence.
///
/// Implementations live in arcana-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    fn create_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    fn get_chat(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Persist the mutable fields of a chat: cards, status, follow-up
    /// state, stage and `updated_at`.
    fn update_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a chat and, by cascade, its messages.
    ///
    /// Returns `RepositoryError::NotFound` if no such chat exists.
    fn delete_chat(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Chat summary (with topic name and image) for a message page.
    fn get_summary(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSummary>, RepositoryError>> + Send;

    /// A user's chats matching `filter`, ordered by their latest message
    /// (falling back to creation time), newest first. Returns the page
    /// plus the total number of matching chats.
    fn list_chats(
        &self,
        user_id: &Uuid,
        filter: &ChatFilter,
        limit: u32,
        offset: u64,
    ) -> impl std::future::Future<Output = Result<(Vec<ChatListItem>, u64), RepositoryError>> + Send;

    /// Close every active chat created before `cutoff`. Returns the count.
    fn close_chats_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    fn append_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages newest first. Ties on `created_at` resolve to the most
    /// recently inserted row first.
    fn page_messages(
        &self,
        chat_id: &Uuid,
        limit: u32,
        offset: u64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    fn count_messages(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Every message of a chat, oldest first, in insertion order on ties.
    fn history(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Flip unseen AI messages to seen. Returns how many changed.
    fn mark_ai_messages_seen(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
