//! Bearer-token authentication extractors.
//!
//! The token is read from, in order:
//! - `Authorization: Bearer <token>`
//! - `X-API-Key: <token>`
//! - the `token` query parameter (browsers cannot set headers on a
//!   WebSocket upgrade)
//!
//! Tokens are resolved through the user service, which compares SHA-256
//! digests against the `api_tokens` table.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use arcana_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated, active user making the request.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        match state.user_service.authenticate(&token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AppError::Unauthorized(
                "Invalid or revoked token. Provide a valid token via 'Authorization: Bearer <token>'."
                    .to_string(),
            )),
        }
    }
}

/// An authenticated admin.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

fn extract_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    let from_query = parts.uri.query().and_then(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == "token")
            .map(|(_, value)| value.to_string())
    });
    if let Some(token) = from_query.filter(|t| !t.is_empty()) {
        return Ok(token);
    }

    Err(AppError::Unauthorized(
        "Missing token. Provide via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header."
            .to_string(),
    ))
}
