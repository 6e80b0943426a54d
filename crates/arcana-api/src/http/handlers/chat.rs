//! Chat (tarot reading) HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/chats             - Open a reading
//! - GET    /api/v1/chats             - List the caller's readings
//! - GET    /api/v1/chats/{id}        - Message page of one reading
//! - DELETE /api/v1/chats/{id}        - Delete a reading and its messages
//! - POST   /api/v1/chats/{id}/close  - Close a reading
//! - PUT    /api/v1/chats/{id}/cards  - Attach the drawn cards
//!
//! Replies to typed messages travel over `/ws`, not REST.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use arcana_types::chat::{Chat, ChatListPage, MessagePage, NewChat};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::{ChatListQuery, PageQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignCardsRequest {
    pub cards: Vec<String>,
}

/// POST /api/v1/chats - Charge the reading cost and open a reading.
///
/// The opening pass (greeting plus first clarifying question) runs in the
/// background and arrives over the socket.
pub async fn create_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<NewChat>,
) -> Result<(StatusCode, Json<ApiResponse<Chat>>), AppError> {
    let start = Instant::now();

    let chat = state.chat_service.create_chat(&user, request).await?;
    state.chat_service.spawn_opening(chat.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(chat, start))))
}

/// GET /api/v1/chats - The caller's readings, most recently active first.
pub async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ChatListQuery>,
) -> Result<Json<ApiResponse<ChatListPage>>, AppError> {
    let start = Instant::now();

    let filter = query.filter()?;
    let page = state
        .chat_service
        .list_chats(
            user.id,
            &filter,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(state.config.chat.default_page_size),
        )
        .await?;

    Ok(Json(ApiResponse::success(page, start)))
}

/// GET /api/v1/chats/{id} - One page of a reading's messages, newest first.
pub async fn get_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<MessagePage>>, AppError> {
    let start = Instant::now();
    let chat_id = parse_uuid(&chat_id)?;

    let page = state
        .chat_service
        .page(
            chat_id,
            user.id,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(state.config.chat.default_page_size),
        )
        .await?;

    Ok(Json(ApiResponse::success(page, start)))
}

/// DELETE /api/v1/chats/{id}
pub async fn delete_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let chat_id = parse_uuid(&chat_id)?;

    state.chat_service.delete_chat(chat_id, user.id).await?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true, "id": chat_id }),
        start,
    )))
}

/// POST /api/v1/chats/{id}/close
pub async fn close_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let chat_id = parse_uuid(&chat_id)?;

    let chat = state.chat_service.close_chat(chat_id, user.id).await?;

    Ok(Json(ApiResponse::success(chat, start)))
}

/// PUT /api/v1/chats/{id}/cards
pub async fn assign_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(chat_id): Path<String>,
    Json(request): Json<AssignCardsRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let chat_id = parse_uuid(&chat_id)?;

    let chat = state
        .chat_service
        .assign_cards(chat_id, user.id, request.cards)
        .await?;

    Ok(Json(ApiResponse::success(chat, start)))
}
