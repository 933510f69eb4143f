//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use encore_shared::AppError;

pub mod auth;
pub mod config;
pub mod contact;
pub mod content;
pub mod health;
pub mod media;
pub mod storage;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require a stage-admin session token
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(content::protected_routes())
        .merge(media::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(config::routes())
        .merge(content::routes())
        .merge(contact::routes())
        .merge(storage::routes())
        .merge(protected_routes)
}

/// Maps a shared application error to its JSON response.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
