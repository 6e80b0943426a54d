//! WebSocket-backed [`MessageSink`].
//!
//! Each live socket gets an unbounded outbox; the socket task drains it.
//! The chat service delivers through [`WsTransport::deliver`], which finds
//! the user's connection in the registry and drops the message if there is
//! none. Persisted messages stay readable through the REST message page.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use arcana_core::transport::{ConnectionId, ConnectionRegistry, InMemoryConnectionRegistry, MessageSink};
use arcana_types::chat::{Message, SenderType};

/// Frames pushed from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage { message: Message },
    /// Placeholder until the next AI message for `chat_id` arrives.
    Loading { chat_id: Uuid },
    ErrorMessage { code: String, message: String },
    SeenDone { chat_id: Uuid, updated: u64 },
    Pong,
}

impl ServerEvent {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerEvent::ErrorMessage {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Default)]
pub struct WsTransport {
    registry: Arc<InMemoryConnectionRegistry>,
    outboxes: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an outbox for a new socket. The connection is not bound to a
    /// user until [`WsTransport::bind_user`].
    pub fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let conn_id = Uuid::now_v7();
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes.insert(conn_id, tx);
        (conn_id, rx)
    }

    pub fn bind_user(&self, conn_id: ConnectionId, user_id: Uuid) {
        self.registry.register(user_id, conn_id);
    }

    pub fn disconnect(&self, conn_id: ConnectionId) {
        self.outboxes.remove(&conn_id);
        self.registry.unregister(conn_id);
    }

    /// Queue `event` on one connection. Returns false if it is gone.
    pub fn send_to(&self, conn_id: ConnectionId, event: ServerEvent) -> bool {
        match self.outboxes.get(&conn_id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn connected_users(&self) -> usize {
        self.registry.connected_users()
    }
}

impl MessageSink for WsTransport {
    /// Push `message` to the user's live connection. A user's own message
    /// is followed by a `loading` placeholder that the next AI message
    /// replaces.
    fn deliver(&self, user_id: Uuid, chat_id: Uuid, message: &Message) {
        let Some(conn_id) = self.registry.lookup(user_id) else {
            tracing::debug!(%user_id, %chat_id, "user offline, message not pushed");
            return;
        };
        let event = ServerEvent::NewMessage {
            message: message.clone(),
        };
        if !self.send_to(conn_id, event) {
            tracing::debug!(%user_id, %conn_id, "connection closed before delivery");
            return;
        }
        if message.sender_type == SenderType::User {
            self.send_to(conn_id, ServerEvent::Loading { chat_id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ai_message(chat_id: Uuid) -> Message {
        Message::new(chat_id, None, SenderType::Ai, "Lá bài đầu tiên...".into(), false)
    }

    #[tokio::test]
    async fn deliver_reaches_bound_connection() {
        let transport = WsTransport::new();
        let user = Uuid::now_v7();
        let (conn, mut rx) = transport.connect();
        transport.bind_user(conn, user);

        let chat_id = Uuid::now_v7();
        transport.deliver(user, chat_id, &ai_message(chat_id));

        match rx.recv().await.unwrap() {
            ServerEvent::NewMessage { message } => assert_eq!(message.chat_id, chat_id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn user_message_is_echoed_then_loading() {
        let transport = WsTransport::new();
        let user = Uuid::now_v7();
        let (conn, mut rx) = transport.connect();
        transport.bind_user(conn, user);

        let chat_id = Uuid::now_v7();
        let inbound = Message::new(chat_id, Some(user), SenderType::User, "my answer".into(), true);
        transport.deliver(user, chat_id, &inbound);

        match rx.recv().await.unwrap() {
            ServerEvent::NewMessage { message } => assert_eq!(message.id, inbound.id),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            ServerEvent::Loading { chat_id: loading } => assert_eq!(loading, chat_id),
            other => panic!("unexpected event: {other:?}"),
        }

        transport.deliver(user, chat_id, &ai_message(chat_id));
        assert!(matches!(rx.recv().await.unwrap(), ServerEvent::NewMessage { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn deliver_to_offline_user_is_dropped() {
        let transport = WsTransport::new();
        let (conn, mut rx) = transport.connect();
        transport.bind_user(conn, Uuid::now_v7());

        let chat_id = Uuid::now_v7();
        transport.deliver(Uuid::now_v7(), chat_id, &ai_message(chat_id));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_unbinds_user() {
        let transport = WsTransport::new();
        let user = Uuid::now_v7();
        let (conn, _rx) = transport.connect();
        transport.bind_user(conn, user);
        assert_eq!(transport.connected_users(), 1);

        transport.disconnect(conn);
        assert_eq!(transport.connected_users(), 0);
        assert!(!transport.send_to(conn, ServerEvent::Pong));
    }

    #[test]
    fn events_are_type_tagged() {
        let json = serde_json::to_value(ServerEvent::error("CHAT_CLOSED", "chat is closed")).unwrap();
        assert_eq!(json["type"], "error_message");
        assert_eq!(json["code"], "CHAT_CLOSED");

        let json = serde_json::to_value(ServerEvent::SeenDone {
            chat_id: Uuid::nil(),
            updated: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "seen_done");
        assert_eq!(json["updated"], 2);
    }
}
