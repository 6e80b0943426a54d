//! Real-time delivery ports.
//!
//! The chat service hands every AI message it produces to a
//! [`MessageSink`]. How the message reaches a client is the transport's
//! concern; the registry below maps users to their live connection and is
//! owned by one transport instance rather than shared process-wide.

use dashmap::DashMap;
use uuid::Uuid;

use arcana_types::chat::Message;

/// Identifier of one live client connection.
pub type ConnectionId = Uuid;

/// Destination for messages produced by the chat service.
pub trait MessageSink: Send + Sync {
    /// Push `message` of `chat_id` to `user_id` if they are connected.
    /// Delivery is best-effort and never fails the caller.
    fn deliver(&self, user_id: Uuid, chat_id: Uuid, message: &Message);
}

/// User-to-connection bookkeeping.
pub trait ConnectionRegistry: Send + Sync {
    /// Bind `user_id` to `conn_id`, replacing any previous binding.
    fn register(&self, user_id: Uuid, conn_id: ConnectionId);

    /// Forget `conn_id`. Returns the user it was bound to, if any.
    fn unregister(&self, conn_id: ConnectionId) -> Option<Uuid>;

    fn lookup(&self, user_id: Uuid) -> Option<ConnectionId>;
}

/// Single-process registry. One connection per user; the newest wins.
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    by_user: DashMap<Uuid, ConnectionId>,
    by_conn: DashMap<ConnectionId, Uuid>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected_users(&self) -> usize {
        self.by_user.len()
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn register(&self, user_id: Uuid, conn_id: ConnectionId) {
        if let Some(previous) = self.by_user.insert(user_id, conn_id) {
            if previous != conn_id {
                self.by_conn.remove(&previous);
            }
        }
        // A connection re-registering as another user drops its old binding.
        if let Some(old_user) = self.by_conn.insert(conn_id, user_id) {
            if old_user != user_id {
                self.by_user.remove_if(&old_user, |_, c| *c == conn_id);
            }
        }
        tracing::debug!(%user_id, %conn_id, "connection registered");
    }

    fn unregister(&self, conn_id: ConnectionId) -> Option<Uuid> {
        let (_, user_id) = self.by_conn.remove(&conn_id)?;
        // Only drop the user's binding if it still points at this connection.
        self.by_user.remove_if(&user_id, |_, c| *c == conn_id);
        tracing::debug!(%user_id, %conn_id, "connection unregistered");
        Some(user_id)
    }

    fn lookup(&self, user_id: Uuid) -> Option<ConnectionId> {
        self.by_user.get(&user_id).map(|c| *c)
    }
}
