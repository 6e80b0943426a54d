//! Feed post HTTP handlers.
//!
//! - GET    /api/v1/posts      - The feed, newest first (any authenticated user)
//! - GET    /api/v1/posts/{id} - One post
//! - POST   /api/v1/posts      - Publish (admins only)
//! - PUT    /api/v1/posts/{id} - Replace content and images (admins only)
//! - DELETE /api/v1/posts/{id} - Delete (admins only)
//!
//! Images are URLs of files already uploaded elsewhere.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use arcana_types::post::{Post, PostPage};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::extractors::auth::{AdminUser, CurrentUser};
use crate::http::extractors::query::PageQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Body of both publish and update. On update `images` is the complete new
/// list; URLs left out are dropped from the post.
#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PostPage>>, AppError> {
    let start = Instant::now();
    let page = state
        .post_service
        .feed(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(ApiResponse::success(page, start)))
}

pub async fn get_post(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Post>>, AppError> {
    let start = Instant::now();
    let post = state.post_service.get(parse_uuid(&post_id)?).await?;
    Ok(Json(ApiResponse::success(post, start)))
}

pub async fn create_post(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), AppError> {
    let start = Instant::now();
    let post = state
        .post_service
        .create(&admin, &request.content, request.images)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(post, start))))
}

pub async fn update_post(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(post_id): Path<String>,
    Json(request): Json<PostRequest>,
) -> Result<Json<ApiResponse<Post>>, AppError> {
    let start = Instant::now();
    let post = state
        .post_service
        .update(&admin, parse_uuid(&post_id)?, &request.content, request.images)
        .await?;
    Ok(Json(ApiResponse::success(post, start)))
}

/// DELETE /api/v1/posts/{id} - Returns the deleted post.
pub async fn delete_post(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(post_id): Path<String>,
) -> Result<Json<ApiResponse<Post>>, AppError> {
    let start = Instant::now();
    let post = state
        .post_service
        .delete(&admin, parse_uuid(&post_id)?)
        .await?;
    Ok(Json(ApiResponse::success(post, start)))
}
