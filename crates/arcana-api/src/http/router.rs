//! Axum router configuration with middleware.
//!
//! REST routes live under `/api/v1/`; the real-time channel is `/ws`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chats
        .route(
            "/chats",
            post(handlers::chat::create_chat).get(handlers::chat::list_chats),
        )
        .route(
            "/chats/{id}",
            get(handlers::chat::get_chat).delete(handlers::chat::delete_chat),
        )
        .route("/chats/{id}/close", post(handlers::chat::close_chat))
        .route("/chats/{id}/cards", put(handlers::chat::assign_cards))
        // Topics
        .route(
            "/topics",
            get(handlers::topic::list_topics).post(handlers::topic::create_topic),
        )
        // Card deck
        .route(
            "/cards",
            get(handlers::card::list_cards).post(handlers::card::create_card),
        )
        .route("/cards/shuffled", get(handlers::card::shuffled_deck))
        // Feed
        .route(
            "/posts",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        // Users
        .route("/users", post(handlers::user::register))
        .route("/me", get(handlers::user::me))
        // Horoscope
        .route("/horoscope", get(handlers::horoscope::get_horoscope))
        .route(
            "/horoscope/recent",
            get(handlers::horoscope::recent_horoscopes),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
