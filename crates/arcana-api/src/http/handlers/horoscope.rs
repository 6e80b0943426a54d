//! Daily horoscope HTTP handlers.
//!
//! - GET /api/v1/horoscope?date=YYYY-MM-DD&language=vi|en
//! - GET /api/v1/horoscope/recent?language=vi|en
//!
//! `date` defaults to today in the configured UTC offset; `language`
//! defaults to Vietnamese.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use arcana_types::horoscope::{Language, LocalizedHoroscope};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct HoroscopeQuery {
    pub date: Option<NaiveDate>,
    pub language: Option<String>,
}

fn parse_language(raw: Option<&str>) -> Result<Language, AppError> {
    match raw {
        Some(s) => s.parse().map_err(AppError::Validation),
        None => Ok(Language::default()),
    }
}

pub async fn get_horoscope(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<HoroscopeQuery>,
) -> Result<Json<ApiResponse<LocalizedHoroscope>>, AppError> {
    let start = Instant::now();
    let now = Utc::now();
    let language = parse_language(query.language.as_deref())?;
    let date = query
        .date
        .unwrap_or_else(|| state.horoscope_service.today(now));

    let horoscope = state
        .horoscope_service
        .for_date(&user, date, language, now)
        .await?;

    Ok(Json(ApiResponse::success(horoscope, start)))
}

pub async fn recent_horoscopes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<HoroscopeQuery>,
) -> Result<Json<ApiResponse<Vec<LocalizedHoroscope>>>, AppError> {
    let start = Instant::now();
    let language = parse_language(query.language.as_deref())?;

    let horoscopes = state
        .horoscope_service
        .recent(&user, language, Utc::now())
        .await?;

    Ok(Json(ApiResponse::success(horoscopes, start)))
}
