//! Contact form endpoint.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde_json::json;

use crate::AppState;
use encore_core::content::ContactSubmission;

/// POST /contact - acknowledge a contact form submission.
async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactSubmission>,
) -> impl IntoResponse {
    state.content.submit_contact_form(&payload);
    Json(json!({ "success": true }))
}

/// Creates the contact routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{app, body_json, test_state};

    #[tokio::test]
    async fn test_submit_acknowledged() {
        let ctx = test_state();
        let payload = serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "service": "dj",
            "message": "Booking inquiry for June"
        });

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
    }

    #[tokio::test]
    async fn test_service_field_is_optional() {
        let ctx = test_state();
        let payload = serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "Hello"
        });

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
