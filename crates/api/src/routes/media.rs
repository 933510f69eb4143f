//! Gallery media and ad-hoc upload routes. Admin only.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    routing::{delete, post},
};
use bytes::Bytes;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser, routes::error_response};
use encore_core::content::{ContentError, MediaFile, MediaType, NewMedia};
use encore_shared::{AppError, Localized};

/// Creates the media routes (all behind the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/media", post(upload_media))
        .route("/media/{id}", delete(delete_media))
        .route("/uploads", post(upload_file))
}

/// Collected multipart fields for a media upload.
#[derive(Default)]
struct MediaForm {
    media_type: Option<String>,
    category: Option<String>,
    year: Option<String>,
    description_en: Option<String>,
    description_es: Option<String>,
    location: Option<String>,
    file: Option<MediaFile>,
}

async fn read_media_form(mut multipart: Multipart) -> Result<MediaForm, AppError> {
    let mut form = MediaForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;
                form.file = Some(MediaFile { mime_type, content });
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read field: {e}")))?;
                match other {
                    "type" => form.media_type = Some(value),
                    "category" => form.category = Some(value),
                    "year" => form.year = Some(value),
                    "description_en" => form.description_en = Some(value),
                    "description_es" => form.description_es = Some(value),
                    "location" => form.location = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

/// POST /media - store a new gallery entry.
async fn upload_media(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Response {
    let form = match read_media_form(multipart).await {
        Ok(f) => f,
        Err(e) => return error_response(&e),
    };

    let Some(media_type) = form.media_type.as_deref().and_then(MediaType::parse) else {
        return error_response(&AppError::Validation(
            "field \"type\" must be \"photo\" or \"video\"".to_string(),
        ));
    };

    let item = state
        .content
        .upload_media(NewMedia {
            media_type,
            category: form.category,
            year: form.year.unwrap_or_default(),
            description: Localized::new(
                form.description_en.unwrap_or_default(),
                form.description_es.unwrap_or_default(),
            ),
            location: form.location.unwrap_or_default(),
            file: form.file,
            url: None,
        })
        .await;

    info!(id = %item.id, admin = %auth.username(), "Gallery media uploaded");
    Json(json!({ "success": true, "media": item })).into_response()
}

/// DELETE /media/{id} - remove a gallery entry and its stored object.
async fn delete_media(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response {
    match state.content.delete_media(&id).await {
        Ok(()) => {
            info!(id = %id, admin = %auth.username(), "Gallery media deleted");
            Json(json!({ "success": true })).into_response()
        }
        Err(ContentError::MediaNotFound(_)) => {
            error_response(&AppError::NotFound(format!("no media item with id {id}")))
        }
    }
}

/// POST /uploads - store an ad-hoc file and return its URL.
async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Response {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some("file") => break f,
            Ok(Some(_)) => {}
            Ok(None) => {
                return error_response(&AppError::Validation(
                    "multipart field \"file\" is required".to_string(),
                ));
            }
            Err(e) => {
                return error_response(&AppError::Validation(format!(
                    "malformed multipart body: {e}"
                )));
            }
        }
    };

    let filename = field.file_name().unwrap_or("file").to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let content: Bytes = match field.bytes().await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "Failed to read upload body");
            return error_response(&AppError::Validation(format!("failed to read file: {e}")));
        }
    };

    let url = state.content.upload_file(&filename, &mime_type, content).await;
    info!(filename = %filename, admin = %auth.username(), "File uploaded");
    Json(json!({ "success": true, "url": url })).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use tower::ServiceExt;

    use crate::test_support::{admin_token, app, body_json, multipart_body, test_state};

    #[tokio::test]
    async fn test_upload_media_requires_token() {
        let ctx = test_state();
        let (content_type, body) = multipart_body(&[("type", None, None, b"photo")]);

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/media")
                    .header("Content-Type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_photo_with_file() {
        let ctx = test_state();
        let token = admin_token(&ctx.state);
        let (content_type, body) = multipart_body(&[
            ("type", None, None, b"photo"),
            ("year", None, None, b"2024"),
            ("description_en", None, None, b"Street show"),
            ("description_es", None, None, "Espectáculo callejero".as_bytes()),
            ("location", None, None, b"Austin, TX"),
            ("file", Some("show.png"), Some("image/png"), b"\x89PNG data"),
        ]);

        let response = app(ctx.state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/media")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header("Content-Type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["media"]["type"], "photo");
        let url = json["media"]["url"].as_str().unwrap();
        assert!(url.contains("images/gallery/performances/"));

        // The new entry is first in the gallery.
        let gallery = ctx.state.content.gallery().await;
        assert_eq!(gallery.media[0].id, json["media"]["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_upload_with_unknown_type_is_400() {
        let ctx = test_state();
        let token = admin_token(&ctx.state);
        let (content_type, body) = multipart_body(&[("type", None, None, b"audio")]);

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/media")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header("Content-Type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_media_and_missing_id() {
        let ctx = test_state();
        let token = admin_token(&ctx.state);

        // Seeded gallery item "1".
        let response = app(ctx.state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/media/1")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let repeat = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/media/1")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(repeat.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_file_returns_url() {
        let ctx = test_state();
        let token = admin_token(&ctx.state);
        let (content_type, body) = multipart_body(&[(
            "file",
            Some("press-kit.pdf"),
            Some("application/pdf"),
            b"%PDF-1.4",
        )]);

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/uploads")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header("Content-Type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        let url = json["url"].as_str().unwrap();
        assert!(url.contains("uploads/"));
        assert!(url.ends_with("_press-kit.pdf"));
    }

    #[tokio::test]
    async fn test_upload_file_without_file_field_is_400() {
        let ctx = test_state();
        let token = admin_token(&ctx.state);
        let (content_type, body) = multipart_body(&[("note", None, None, b"no file here")]);

        let response = app(ctx.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/uploads")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header("Content-Type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
