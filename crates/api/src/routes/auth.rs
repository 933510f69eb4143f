//! Admin login routes.
//!
//! Login is a two-stage flow: the password check issues a short-lived
//! pending token, and a valid TOTP code exchanges it for a full session
//! token. Sessions are stateless JWTs; logout is an acknowledged
//! client-side disposal.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

/// Second-factor verification request body.
#[derive(Debug, Deserialize)]
pub struct Verify2faRequest {
    /// Pending token from the login step.
    pub pending_token: String,
    /// Six-digit TOTP code.
    pub code: String,
}

/// Creates the public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify-2fa", post(verify_2fa))
}

/// Creates the auth routes behind the session middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

/// POST /auth/login - first factor: username and password.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if !state.admin.verify_login(&payload.username, &payload.password) {
        info!(username = %payload.username, "Failed login attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_credentials",
                "message": "Invalid username or password"
            })),
        )
            .into_response();
    }

    match state.jwt_service.generate_pending_token(&payload.username) {
        Ok(pending_token) => {
            info!(username = %payload.username, "Password accepted, awaiting second factor");
            (
                StatusCode::OK,
                Json(json!({
                    "pending_token": pending_token,
                    "expires_in": state.jwt_service.pending_token_expires_in()
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to generate pending token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response()
        }
    }
}

/// POST /auth/verify-2fa - second factor: TOTP code.
async fn verify_2fa(
    State(state): State<AppState>,
    Json(payload): Json<Verify2faRequest>,
) -> impl IntoResponse {
    // The pending token proves the password check happened recently.
    let claims = match state.jwt_service.validate_token(&payload.pending_token) {
        Ok(c) if !c.is_admin() => c,
        Ok(_) | Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Invalid or expired pending token"
                })),
            )
                .into_response();
        }
    };

    if !state.admin.verify_code(&payload.code) {
        info!(username = %claims.username(), "Failed second-factor attempt");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_code",
                "message": "Invalid verification code"
            })),
        )
            .into_response();
    }

    match state.jwt_service.generate_session_token(claims.username()) {
        Ok(access_token) => {
            info!(username = %claims.username(), "Admin session established");
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": access_token,
                    "expires_in": state.jwt_service.session_token_expires_in()
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to generate session token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during verification"
                })),
            )
                .into_response()
        }
    }
}

/// POST /auth/logout - acknowledges client-side token disposal.
async fn logout(auth: AuthUser) -> impl IntoResponse {
    info!(username = %auth.username(), "Admin logged out");
    Json(json!({ "success": true }))
}

/// GET /auth/session - claims summary for the current session.
async fn session(auth: AuthUser) -> impl IntoResponse {
    Json(json!({
        "username": auth.username(),
        "stage": "admin",
        "expires_at": auth.claims().exp
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header::AUTHORIZATION};
    use tower::ServiceExt;

    use crate::test_support::{TEST_PASSWORD, TEST_TOTP_SECRET, app, body_json, test_state};
    use encore_core::auth::Totp;

    fn current_code() -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Totp::from_hex(TEST_TOTP_SECRET).unwrap().code_at(now)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let ctx = test_state();
        let response = app(ctx.state)
            .oneshot(json_request(
                "/api/auth/login",
                serde_json::json!({ "username": "admin", "password": "wrong" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_credentials");
    }

    #[tokio::test]
    async fn test_login_issues_pending_token() {
        let ctx = test_state();
        let response = app(ctx.state.clone())
            .oneshot(json_request(
                "/api/auth/login",
                serde_json::json!({ "username": "admin", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["expires_in"], 300);

        let claims = ctx
            .state
            .jwt_service
            .validate_token(body["pending_token"].as_str().unwrap())
            .unwrap();
        assert!(!claims.is_admin());
    }

    #[tokio::test]
    async fn test_full_two_stage_flow() {
        let ctx = test_state();

        let login = app(ctx.state.clone())
            .oneshot(json_request(
                "/api/auth/login",
                serde_json::json!({ "username": "admin", "password": TEST_PASSWORD }),
            ))
            .await
            .unwrap();
        let pending = body_json(login).await["pending_token"]
            .as_str()
            .unwrap()
            .to_string();

        let verify = app(ctx.state.clone())
            .oneshot(json_request(
                "/api/auth/verify-2fa",
                serde_json::json!({ "pending_token": pending, "code": current_code() }),
            ))
            .await
            .unwrap();
        assert_eq!(verify.status(), StatusCode::OK);

        let body = body_json(verify).await;
        let claims = ctx
            .state
            .jwt_service
            .validate_token(body["access_token"].as_str().unwrap())
            .unwrap();
        assert!(claims.is_admin());
    }

    #[tokio::test]
    async fn test_arbitrary_code_rejected() {
        let ctx = test_state();
        let pending = ctx
            .state
            .jwt_service
            .generate_pending_token("admin")
            .unwrap();
        // A made-up six-digit code must not pass; skip the one-in-a-million
        // collision with the real code.
        let code = if current_code() == "123456" {
            "654321"
        } else {
            "123456"
        };

        let response = app(ctx.state)
            .oneshot(json_request(
                "/api/auth/verify-2fa",
                serde_json::json!({ "pending_token": pending, "code": code }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "invalid_code");
    }

    #[tokio::test]
    async fn test_session_token_rejected_as_pending() {
        let ctx = test_state();
        let session_token = ctx
            .state
            .jwt_service
            .generate_session_token("admin")
            .unwrap();

        let response = app(ctx.state)
            .oneshot(json_request(
                "/api/auth/verify-2fa",
                serde_json::json!({ "pending_token": session_token, "code": current_code() }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_pending_token_cannot_reach_admin_routes() {
        let ctx = test_state();
        let pending = ctx
            .state
            .jwt_service
            .generate_pending_token("admin")
            .unwrap();

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/auth/session")
                    .header(AUTHORIZATION, format!("Bearer {pending}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_session_and_logout() {
        let ctx = test_state();
        let token = crate::test_support::admin_token(&ctx.state);

        let session = app(ctx.state.clone())
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/auth/session")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(session.status(), StatusCode::OK);
        let body = body_json(session).await;
        assert_eq!(body["username"], "admin");
        assert_eq!(body["stage"], "admin");

        let logout = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(logout.status(), StatusCode::OK);
        assert_eq!(body_json(logout).await["success"], true);
    }

    #[tokio::test]
    async fn test_missing_token_unauthorized() {
        let ctx = test_state();
        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/auth/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
