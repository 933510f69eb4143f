//! Page content routes.
//!
//! Public reads return the current documents with background inheritance
//! applied; admin writes replace a document wholesale.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::json;
use tracing::info;

use crate::{AppState, middleware::AuthUser, routes::error_response};
use encore_shared::AppError;

/// Creates the public content routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/content/{page}", get(get_content))
}

/// Creates the content routes behind the session middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/content/{page}", put(update_content))
}

/// GET /content/{page} - current document for a page.
async fn get_content(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    match page.as_str() {
        "home" => Json(state.content.home().await).into_response(),
        "about" => Json(state.content.about().await).into_response(),
        "services" => Json(state.content.services().await).into_response(),
        "gallery" => Json(state.content.gallery().await).into_response(),
        "contact" => Json(state.content.contact().await).into_response(),
        other => error_response(&AppError::NotFound(format!("unknown page: {other}"))),
    }
}

/// PUT /content/{page} - replace a page document wholesale.
async fn update_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let result = match page.as_str() {
        "home" => match serde_json::from_value(payload) {
            Ok(doc) => {
                state.content.update_home(doc).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        "about" => match serde_json::from_value(payload) {
            Ok(doc) => {
                state.content.update_about(doc).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        "services" => match serde_json::from_value(payload) {
            Ok(doc) => {
                state.content.update_services(doc).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        "gallery" => match serde_json::from_value(payload) {
            Ok(doc) => {
                state.content.update_gallery(doc).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        "contact" => match serde_json::from_value(payload) {
            Ok(doc) => {
                state.content.update_contact(doc).await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        other => {
            return error_response(&AppError::NotFound(format!("unknown page: {other}")));
        }
    };

    match result {
        Ok(()) => {
            info!(page = %page, admin = %auth.username(), "Page content updated");
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => error_response(&AppError::Validation(format!(
            "invalid {page} document: {e}"
        ))),
    }
}
