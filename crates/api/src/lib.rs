//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Admin session middleware
//! - Request extractors
//! - Response types

pub mod middleware;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use encore_core::auth::AdminCredentials;
use encore_core::content::ContentService;
use encore_core::storage::StorageFactory;
use encore_shared::JwtService;

/// Largest accepted request body. Media uploads are the big ones.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Admin credential verifier.
    pub admin: Arc<AdminCredentials>,
    /// Content facade over the page documents and media gallery.
    pub content: Arc<ContentService>,
    /// Storage factory; also carries the local store behind the
    /// file-serving route.
    pub storage: Arc<StorageFactory>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
