//! Topic HTTP handlers.
//!
//! - GET  /api/v1/topics - List topics (any authenticated user)
//! - POST /api/v1/topics - Create a topic (admins only)

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use arcana_types::topic::Topic;

use crate::http::error::AppError;
use crate::http::extractors::auth::{AdminUser, CurrentUser};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTopicRequest {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

pub async fn list_topics(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Topic>>>, AppError> {
    let start = Instant::now();
    let topics = state.topic_service.list().await?;
    Ok(Json(ApiResponse::success(topics, start)))
}

pub async fn create_topic(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Topic>>), AppError> {
    let start = Instant::now();
    let topic = state
        .topic_service
        .create(&request.name, request.code, request.image)
        .await?;
    tracing::info!(admin_id = %admin.id, topic = %topic.name, "topic created via API");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(topic, start))))
}
