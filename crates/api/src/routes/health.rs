//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde_json::json;

use crate::AppState;

/// GET /health - answers as long as the process is serving requests.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "encore",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{app, body_json, test_state};

    #[tokio::test]
    async fn test_health_reports_service_and_version() {
        let ctx = test_state();
        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "encore");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
