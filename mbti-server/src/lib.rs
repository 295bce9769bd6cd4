//! mbti-server library - personality quiz HTTP service
//!
//! Accounts, the question bank, scoring and per-user result history over a
//! JSON API. Result endpoints require a bearer token.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Bearer token signing secret
    pub token_secret: Arc<str>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, token_secret: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            token_secret: token_secret.into(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require bearer token)
    let protected = Router::new()
        .route(
            "/api/auth/profile",
            get(api::get_profile).delete(api::delete_profile),
        )
        .route("/api/personality/score", post(api::score_answers))
        .route(
            "/api/personality/results",
            get(api::list_results).post(api::create_result),
        )
        .route("/api/personality/results/:id", get(api::get_result))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/auth/register", post(api::register))
        .route("/api/auth/login", post(api::login))
        .route("/api/personality/questions", get(api::list_questions))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
