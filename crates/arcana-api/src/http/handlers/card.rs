//! Card deck HTTP handlers.
//!
//! - GET  /api/v1/cards          - One page of the deck (any authenticated user)
//! - GET  /api/v1/cards/shuffled - The whole deck in random order
//! - POST /api/v1/cards          - Add a card (admins only)

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use arcana_types::card::{Card, CardPage};

use crate::http::error::AppError;
use crate::http::extractors::auth::{AdminUser, CurrentUser};
use crate::http::extractors::query::PageQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    /// Derived from the name when omitted.
    #[serde(default)]
    pub image: Option<String>,
}

pub async fn list_cards(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<CardPage>>, AppError> {
    let start = Instant::now();
    let page = state
        .card_service
        .page(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(ApiResponse::success(page, start)))
}

/// GET /api/v1/cards/shuffled - The client draws its three cards from the
/// top of this.
pub async fn shuffled_deck(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Card>>>, AppError> {
    let start = Instant::now();
    let deck = state.card_service.shuffled().await?;
    Ok(Json(ApiResponse::success(deck, start)))
}

pub async fn create_card(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Card>>), AppError> {
    let start = Instant::now();
    let card = state.card_service.create(&request.name, request.image).await?;
    tracing::info!(admin_id = %admin.id, card = %card.name, "card created via API");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(card, start))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_image_is_optional() {
        let request: CreateCardRequest = serde_json::from_str(r#"{"name":"The Hermit"}"#).unwrap();
        assert_eq!(request.name, "The Hermit");
        assert!(request.image.is_none());
    }
}
