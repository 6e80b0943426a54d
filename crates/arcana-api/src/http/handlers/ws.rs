//! WebSocket handler for live reading sessions.
//!
//! The `/ws` endpoint upgrades an authenticated request (token via header or
//! `?token=`). The socket is bound to that user in the [`WsTransport`]
//! registry, so messages produced for any of the user's chats are pushed
//! here as `new_message` frames. A `send_message` is echoed back, followed
//! by a `loading` placeholder until the AI reply arrives.
//!
//! Every outgoing frame goes through the connection's outbox. Command
//! failures produce an `error_message` frame and never close the socket.

use std::future::Future;
use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use arcana_core::card::repository::CardRepository;
use arcana_core::chat::repository::ChatRepository;
use arcana_core::chat::service::ChatService;
use arcana_core::oracle::Oracle;
use arcana_core::topic::repository::TopicRepository;
use arcana_core::transport::{ConnectionId, MessageSink};
use arcana_core::user::repository::UserRepository;
use arcana_types::chat::Message as ChatMessage;
use arcana_types::error::ChatError;
use arcana_types::user::User;

use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;
use crate::transport::{ServerEvent, WsTransport};

/// Incoming command from a WebSocket client.
///
/// Fields are optional so that a missing one can be reported back to the
/// client instead of failing deserialization as a whole.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    RegisterUser {
        user_id: Option<String>,
    },
    SendMessage {
        chat_id: Option<String>,
        message: Option<String>,
    },
    SeenMessages {
        chat_id: Option<String>,
    },
    Ping,
}

/// Rejected command, sent back as `error_message {code, message}`.
#[derive(Debug, PartialEq)]
struct Rejection {
    code: &'static str,
    message: String,
}

impl Rejection {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new("VALIDATION_ERROR", format!("'{field}' is required"))
    }
}

impl From<ChatError> for Rejection {
    fn from(e: ChatError) -> Self {
        let code = match &e {
            ChatError::NotFound => "NOT_FOUND",
            ChatError::Closed => "CHAT_CLOSED",
            ChatError::Forbidden(_) => "FORBIDDEN",
            _ => "CHAT_ERROR",
        };
        Self::new(code, e.to_string())
    }
}

impl From<Rejection> for ServerEvent {
    fn from(r: Rejection) -> Self {
        ServerEvent::error(r.code, r.message)
    }
}

fn parse_command(text: &str) -> Result<WsCommand, Rejection> {
    serde_json::from_str(text)
        .map_err(|e| Rejection::new("INVALID_COMMAND", format!("malformed command: {e}")))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, Rejection> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Rejection::missing(field)),
    }
}

fn required_id(value: &Option<String>, field: &str) -> Result<Uuid, Rejection> {
    let raw = required(value, field)?;
    Uuid::parse_str(raw)
        .map_err(|_| Rejection::new("VALIDATION_ERROR", format!("'{field}' is not a valid id")))
}

/// Upgrade an HTTP request to a WebSocket bound to the calling user.
///
/// Mounted at `/ws` in the router.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, user))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState, user: User) {
    let (conn_id, mut outbox) = state.transport.connect();
    state.transport.bind_user(conn_id, user.id);
    tracing::info!(user_id = %user.id, %conn_id, "socket connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                let _ = ws_sender.send(WsMessage::Close(None)).await;
                break;
            }

            // --- Outbox: events queued for this connection ---
            event = outbox.recv() => {
                let Some(event) = event else { break };
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if ws_sender.send(WsMessage::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to serialize server event"),
                }
            }

            // --- Inbound: commands from the client ---
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Err(rejection) = process_command(&state, conn_id, &user, &text).await {
                            tracing::debug!(%conn_id, code = rejection.code, "command rejected");
                            state.transport.send_to(conn_id, rejection.into());
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(error = %err, "socket receive error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.transport.disconnect(conn_id);
    tracing::info!(user_id = %user.id, %conn_id, "socket closed");
}

async fn process_command(
    state: &AppState,
    conn_id: ConnectionId,
    user: &User,
    text: &str,
) -> Result<(), Rejection> {
    match parse_command(text)? {
        WsCommand::RegisterUser { user_id } => {
            let claimed = required_id(&user_id, "user_id")?;
            if claimed != user.id {
                return Err(Rejection::new(
                    "FORBIDDEN",
                    "socket is authenticated as another user",
                ));
            }
            state.transport.bind_user(conn_id, user.id);
            Ok(())
        }
        WsCommand::SendMessage { chat_id, message } => {
            let chat_id = required_id(&chat_id, "chat_id")?;
            let body = required(&message, "message")?.to_string();

            let chat = state.chat_service.owned_chat(chat_id, user.id).await?;
            if !chat.status {
                return Err(ChatError::Closed.into());
            }

            spawn_send(
                Arc::clone(&state.chat_service),
                state.transport.clone(),
                conn_id,
                chat_id,
                user.id,
                body,
            );
            Ok(())
        }
        WsCommand::SeenMessages { chat_id } => {
            let chat_id = required_id(&chat_id, "chat_id")?;
            let updated = state.chat_service.mark_seen(chat_id, user.id).await?;
            state
                .transport
                .send_to(conn_id, ServerEvent::SeenDone { chat_id, updated });
            Ok(())
        }
        WsCommand::Ping => {
            state.transport.send_to(conn_id, ServerEvent::Pong);
            Ok(())
        }
    }
}

/// Runs one inbound message through the reading state machine.
pub trait InboundProcessor: Send + Sync + 'static {
    fn process(
        &self,
        chat_id: Uuid,
        sender: Uuid,
        text: &str,
    ) -> impl Future<Output = Option<ChatMessage>> + Send;
}

impl<C, T, U, K, O, S> InboundProcessor for ChatService<C, T, U, K, O, S>
where
    C: ChatRepository + 'static,
    T: TopicRepository + 'static,
    U: UserRepository + 'static,
    K: CardRepository + 'static,
    O: Oracle + 'static,
    S: MessageSink + 'static,
{
    async fn process(&self, chat_id: Uuid, sender: Uuid, text: &str) -> Option<ChatMessage> {
        self.process_inbound_message(chat_id, sender, text).await
    }
}

/// Handle `body` in the background. The echo, the `loading` placeholder
/// and the reply reach the client through the transport's sink; a run
/// that produces nothing queues `MESSAGE_NOT_PROCESSED` on this connection.
fn spawn_send<P: InboundProcessor>(
    processor: Arc<P>,
    transport: WsTransport,
    conn_id: ConnectionId,
    chat_id: Uuid,
    sender: Uuid,
    body: String,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if processor.process(chat_id, sender, &body).await.is_none() {
            transport.send_to(
                conn_id,
                ServerEvent::error("MESSAGE_NOT_PROCESSED", "message could not be processed"),
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_types::chat::SenderType;
    use tokio::sync::mpsc;

    #[test]
    fn parses_tagged_commands() {
        assert_eq!(parse_command(r#"{"type":"ping"}"#).unwrap(), WsCommand::Ping);
        assert_eq!(
            parse_command(r#"{"type":"send_message","chat_id":"abc","message":"hi"}"#).unwrap(),
            WsCommand::SendMessage {
                chat_id: Some("abc".into()),
                message: Some("hi".into()),
            }
        );
        assert_eq!(
            parse_command(r#"{"type":"seen_messages"}"#).unwrap(),
            WsCommand::SeenMessages { chat_id: None }
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = parse_command(r#"{"type":"dance"}"#).unwrap_err();
        assert_eq!(err.code, "INVALID_COMMAND");
        assert_eq!(parse_command("not json").unwrap_err().code, "INVALID_COMMAND");
    }

    #[test]
    fn missing_and_blank_fields_are_reported() {
        assert_eq!(required(&None, "message").unwrap_err(), Rejection::missing("message"));
        assert_eq!(
            required(&Some("   ".into()), "message").unwrap_err(),
            Rejection::missing("message")
        );
        assert_eq!(required(&Some(" hi ".into()), "message").unwrap(), "hi");
    }

    #[test]
    fn chat_id_must_be_a_uuid() {
        let err = required_id(&Some("chat-1".into()), "chat_id").unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");

        let id = Uuid::now_v7();
        assert_eq!(required_id(&Some(id.to_string()), "chat_id").unwrap(), id);
    }

    #[test]
    fn chat_errors_map_to_frame_codes() {
        assert_eq!(Rejection::from(ChatError::Closed).code, "CHAT_CLOSED");
        assert_eq!(Rejection::from(ChatError::NotFound).code, "NOT_FOUND");
        assert_eq!(
            Rejection::from(ChatError::Forbidden("nope".into())).code,
            "FORBIDDEN"
        );
    }

    /// Replies with a fixed outcome, pushing a successful reply through
    /// the transport the way the chat service's sink does.
    struct FixedOutcome {
        transport: WsTransport,
        reply: Option<String>,
    }

    impl InboundProcessor for FixedOutcome {
        async fn process(&self, chat_id: Uuid, sender: Uuid, text: &str) -> Option<ChatMessage> {
            let inbound = ChatMessage::new(chat_id, Some(sender), SenderType::User, text.into(), true);
            self.transport.deliver(sender, chat_id, &inbound);
            let body = self.reply.clone()?;
            let reply = ChatMessage::new(chat_id, None, SenderType::Ai, body, false);
            self.transport.deliver(sender, chat_id, &reply);
            Some(reply)
        }
    }

    fn bound_transport() -> (WsTransport, ConnectionId, Uuid, mpsc::UnboundedReceiver<ServerEvent>) {
        let transport = WsTransport::new();
        let user = Uuid::now_v7();
        let (conn, rx) = transport.connect();
        transport.bind_user(conn, user);
        (transport, conn, user, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test]
    async fn unprocessed_message_queues_error_and_keeps_connection() {
        let (transport, conn, user, mut rx) = bound_transport();
        let processor = Arc::new(FixedOutcome {
            transport: transport.clone(),
            reply: None,
        });

        spawn_send(processor, transport.clone(), conn, Uuid::now_v7(), user, "hi".into())
            .await
            .unwrap();

        let events = drain(&mut rx);
        match events.last() {
            Some(ServerEvent::ErrorMessage { code, .. }) => assert_eq!(code, "MESSAGE_NOT_PROCESSED"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(transport.send_to(conn, ServerEvent::Pong));
        assert!(matches!(rx.recv().await, Some(ServerEvent::Pong)));
    }

    #[tokio::test]
    async fn processed_message_streams_echo_loading_and_reply() {
        let (transport, conn, user, mut rx) = bound_transport();
        let chat_id = Uuid::now_v7();
        let processor = Arc::new(FixedOutcome {
            transport: transport.clone(),
            reply: Some("Lá bài thứ nhất...".into()),
        });

        spawn_send(processor, transport, conn, chat_id, user, "my answer".into())
            .await
            .unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ServerEvent::NewMessage { message } if message.body == "my answer"));
        assert!(matches!(&events[1], ServerEvent::Loading { chat_id: id } if *id == chat_id));
        assert!(matches!(&events[2], ServerEvent::NewMessage { message } if message.sender_type == SenderType::Ai));
    }
}
