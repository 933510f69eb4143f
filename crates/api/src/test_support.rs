//! Shared helpers for route tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;

use encore_core::auth::{AdminCredentials, hash_password};
use encore_core::content::{ContentRepository, ContentService};
use encore_core::storage::{LocalStorage, StorageFactory};
use encore_shared::{AdminConfig, JwtService, JwtSettings, StorageSettings};

use crate::{AppState, create_router};

/// RFC 6238 appendix B test secret: ASCII "12345678901234567890".
pub const TEST_TOTP_SECRET: &str = "3132333435363738393031323334353637383930";

/// Admin password provisioned into the test state.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Test state plus the temp dir keeping the local store alive.
pub struct TestContext {
    /// Backing directory for the local store.
    pub dir: tempfile::TempDir,
    /// Fully wired application state (mock storage mode).
    pub state: AppState,
}

/// Builds a test state: mock storage mode, seeded content, runtime-hashed
/// admin password, RFC 6238 TOTP secret.
pub fn test_state() -> TestContext {
    let dir = tempfile::tempdir().expect("tempdir");
    let local = Arc::new(LocalStorage::new(dir.path()).expect("local storage"));
    let storage = Arc::new(StorageFactory::new(
        StorageSettings {
            mode: "mock".to_string(),
            local_root: dir.path().display().to_string(),
            config_url: "http://127.0.0.1:1/api/config".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        },
        local,
    ));
    let content = Arc::new(ContentService::new(
        Arc::new(ContentRepository::new()),
        Arc::clone(&storage),
    ));
    let jwt_service = Arc::new(JwtService::new(JwtSettings {
        secret: "test-secret-key-for-testing".to_string(),
        ..JwtSettings::default()
    }));
    let admin = Arc::new(
        AdminCredentials::from_config(&AdminConfig {
            username: "admin".to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hash"),
            totp_secret: TEST_TOTP_SECRET.to_string(),
        })
        .expect("credentials"),
    );

    TestContext {
        dir,
        state: AppState {
            jwt_service,
            admin,
            content,
            storage,
        },
    }
}

/// Full application router for `state`.
pub fn app(state: AppState) -> Router {
    create_router(state)
}

/// Stage-admin bearer token for `state`.
pub fn admin_token(state: &AppState) -> String {
    state
        .jwt_service
        .generate_session_token("admin")
        .expect("token")
}

/// Collects a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Builds a multipart/form-data body from `(name, filename, content_type,
/// value)` parts, returning the content-type header and the body.
pub fn multipart_body(parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "------------------------test-boundary";
    let mut body = Vec::new();
    for (name, filename, content_type, value) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n")
                    .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
            ),
        }
        if let Some(ct) = content_type {
            body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}
