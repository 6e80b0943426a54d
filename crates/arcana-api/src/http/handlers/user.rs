//! User HTTP handlers.
//!
//! - POST /api/v1/users - Register an app user (no auth)
//! - GET  /api/v1/me    - The authenticated user

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use arcana_types::user::{AuthType, Gender, NewUser, User};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// App-user sign-up. Admins are created from the CLI only.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    #[serde(default = "default_auth_type")]
    pub auth_type: AuthType,
    #[serde(default)]
    pub avatar: Option<String>,
}

fn default_auth_type() -> AuthType {
    AuthType::Phone
}

impl From<RegisterRequest> for NewUser {
    fn from(r: RegisterRequest) -> Self {
        NewUser::App {
            name: r.name,
            phone: r.phone,
            birth_date: r.birth_date,
            gender: r.gender,
            auth_type: r.auth_type,
            avatar: r.avatar,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let start = Instant::now();
    let user = state.user_service.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user, start))))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success(user, Instant::now()))
}
