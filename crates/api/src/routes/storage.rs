//! Storage proxy and file-serving routes.
//!
//! The proxy endpoints perform bucket operations server-side so cloud
//! credentials never reach a client; they exist only in production and
//! answer 403 anywhere else. The file-serving route dereferences the local
//! backend's handle URLs in development.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use encore_core::storage::{FileStorage, S3Store, StorageError, placeholder_url};

/// Creates the storage routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/storage/upload", post(proxy_upload))
        .route("/storage/delete", delete(proxy_delete))
        .route("/storage/getUrl", get(proxy_get_url))
        .route("/storage/list", get(proxy_list))
        .route("/storage/file/{*path}", get(serve_file))
}

/// Maps a storage error to its JSON response.
fn storage_error_response(e: &StorageError) -> Response {
    let code = match e {
        StorageError::InvalidPath(_) | StorageError::EmptyContent { .. } => "validation_error",
        StorageError::WriteFailure { .. } => "write_failure",
        StorageError::Transport(_) => "transport_error",
        StorageError::ConfigurationMissing(_) => "configuration_missing",
        StorageError::EnvironmentMismatch(_) => "environment_mismatch",
        StorageError::NotFound { .. } => "not_found",
    };
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

/// Resolves the bucket store for this request, or the error response that
/// explains why there is none (403 outside production, 500 without a role
/// identity).
fn bucket_store() -> Result<S3Store, Response> {
    S3Store::from_environment().map_err(|e| storage_error_response(&e))
}

/// POST /storage/upload - store an object in the bucket.
async fn proxy_upload(mut multipart: Multipart) -> Response {
    let store = match bucket_store() {
        Ok(s) => s,
        Err(response) => return response,
    };

    let mut path: Option<String> = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => match field.name() {
                Some("path") => match field.text().await {
                    Ok(value) => path = Some(value),
                    Err(e) => {
                        return storage_error_response(&StorageError::transport(e.to_string()));
                    }
                },
                Some("file") => {
                    let mime_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    match field.bytes().await {
                        Ok(content) => file = Some((mime_type, content)),
                        Err(e) => {
                            return storage_error_response(&StorageError::transport(
                                e.to_string(),
                            ));
                        }
                    }
                }
                _ => {}
            },
            Ok(None) => break,
            Err(e) => return storage_error_response(&StorageError::transport(e.to_string())),
        }
    }

    let (Some(path), Some((mime_type, content))) = (path, file) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "multipart fields \"file\" and \"path\" are required"
            })),
        )
            .into_response();
    };

    match store.upload(content, &mime_type, &path).await {
        Ok(url) => {
            info!(path = %path, "Object stored through the proxy");
            Json(json!({ "url": url })).into_response()
        }
        Err(e) => {
            error!(path = %path, error = %e, "Proxy upload failed");
            storage_error_response(&e)
        }
    }
}

/// Request body for object deletion.
#[derive(Debug, Deserialize)]
struct DeleteRequest {
    path: String,
}

/// DELETE /storage/delete - remove an object from the bucket.
async fn proxy_delete(Json(payload): Json<DeleteRequest>) -> Response {
    let store = match bucket_store() {
        Ok(s) => s,
        Err(response) => return response,
    };

    match store.delete(&payload.path).await {
        Ok(_) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!(path = %payload.path, error = %e, "Proxy delete failed");
            storage_error_response(&e)
        }
    }
}

/// Query for URL resolution.
#[derive(Debug, Deserialize)]
struct PathQuery {
    #[serde(default)]
    path: Option<String>,
}

/// GET /storage/getUrl?path= - public URL for an object.
async fn proxy_get_url(Query(query): Query<PathQuery>) -> Response {
    let store = match bucket_store() {
        Ok(s) => s,
        Err(response) => return response,
    };

    let Some(path) = query.path.filter(|p| !p.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "query parameter \"path\" is required"
            })),
        )
            .into_response();
    };

    let url = store.get_url(&path).await;
    Json(json!({ "url": url })).into_response()
}

/// Query for listing.
#[derive(Debug, Deserialize)]
struct PrefixQuery {
    #[serde(default)]
    prefix: String,
}

/// GET /storage/list?prefix= - object paths under a prefix.
async fn proxy_list(Query(query): Query<PrefixQuery>) -> Response {
    let store = match bucket_store() {
        Ok(s) => s,
        Err(response) => return response,
    };

    match store.list(&query.prefix).await {
        Ok(files) => Json(json!({ "files": files })).into_response(),
        Err(e) => {
            error!(prefix = %query.prefix, error = %e, "Proxy list failed");
            storage_error_response(&e)
        }
    }
}

/// GET /storage/file/{*path} - serve a locally stored object.
///
/// Dereferences the handle URLs the local backend hands out. A missing
/// record redirects to the deterministic placeholder instead of 404ing,
/// so stale references degrade the same way `get_url` does.
async fn serve_file(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.storage.local().read(&path).await {
        Ok((record, bytes)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, record.mime_type)],
            bytes,
        )
            .into_response(),
        Err(StorageError::NotFound { .. }) => {
            Redirect::temporary(&placeholder_url(&path)).into_response()
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to serve stored file");
            storage_error_response(&e)
        }
    }
}
