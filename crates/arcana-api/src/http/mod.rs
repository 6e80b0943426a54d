//! HTTP/REST API layer for Arcana.
//!
//! Axum-based REST API at `/api/v1/` with bearer-token authentication,
//! envelope response format, CORS, and the `/ws` real-time channel.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
