//! Per-chat mutual exclusion.
//!
//! Every read-modify-write of a chat happens while holding that chat's
//! lock, so two inbound messages for the same chat are processed one after
//! the other. Different chats never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ChatLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `chat_id`.
    pub async fn acquire(&self, chat_id: Uuid) -> OwnedMutexGuard<()> {
        // The map shard guard must not be held across the await.
        let lock = Arc::clone(&self.inner.entry(chat_id).or_default());
        lock.lock_owned().await
    }

    /// Drop entries nobody is holding or waiting on.
    pub fn prune(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
