//! Runtime configuration endpoint.
//!
//! Tells clients (and the storage factory) which storage family this
//! deployment uses. Resolved per request from the process environment so a
//! single artifact answers correctly in every deployment.

use axum::{Json, Router, routing::get};

use crate::AppState;
use encore_core::storage::{StorageKind, WireConfig};

/// GET /config - environment-switched storage configuration.
async fn get_config() -> Json<WireConfig> {
    Json(StorageKind::resolve().to_wire())
}

/// Creates the config routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/config", get(get_config))
}
