pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::forms::handlers;
use crate::render::handlers as render;
use crate::state::AppState;

/// Room for multipart boundaries and part headers around the photo itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let photo_body_limit = state
        .config
        .max_photo_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route("/api/v1/cv", get(handlers::handle_get_document))
        .route("/api/v1/cv/progress", get(handlers::handle_get_progress))
        .route(
            "/api/v1/cv/forms/:section/draft",
            get(handlers::handle_get_draft).delete(handlers::handle_reset_draft),
        )
        .route(
            "/api/v1/cv/forms/:section/dates",
            post(handlers::handle_pick_date),
        )
        // Sections
        .route(
            "/api/v1/cv/personal-info",
            get(handlers::handle_get_personal_info).put(handlers::handle_put_personal_info),
        )
        .route(
            "/api/v1/cv/experiences",
            get(handlers::handle_list_experiences).post(handlers::handle_add_experience),
        )
        .route(
            "/api/v1/cv/experiences/:id",
            delete(handlers::handle_delete_experience),
        )
        .route(
            "/api/v1/cv/education",
            get(handlers::handle_list_education).post(handlers::handle_add_education),
        )
        .route(
            "/api/v1/cv/education/:id",
            delete(handlers::handle_delete_education),
        )
        .route(
            "/api/v1/cv/skills",
            get(handlers::handle_list_skills).post(handlers::handle_add_skill),
        )
        .route("/api/v1/cv/skills/:id", delete(handlers::handle_delete_skill))
        .route(
            "/api/v1/cv/photo",
            put(handlers::handle_put_photo)
                .delete(handlers::handle_delete_photo)
                .layer(DefaultBodyLimit::max(photo_body_limit)),
        )
        .route(
            "/api/v1/cv/confirmations/:token",
            post(handlers::handle_confirm).delete(handlers::handle_cancel),
        )
        // Output
        .route("/api/v1/cv/preview", get(render::handle_preview))
        .route("/api/v1/cv/export", post(render::handle_export))
        .route("/api/v1/cv/exports/:id/share", post(render::handle_share))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::collab::pdf::HtmlSnapshotRenderer;
    use crate::collab::share::DirectoryShare;
    use crate::config::Config;
    use crate::state::Clock;

    fn test_app(dir: &Path) -> Router {
        let config = Config {
            export_dir: dir.join("exports"),
            share_dir: Some(dir.join("outbox")),
            ..Config::default()
        };
        let pdf = Arc::new(HtmlSnapshotRenderer::new(config.export_dir.clone()));
        let share = Arc::new(DirectoryShare::new(config.share_dir.clone()));
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        build_router(AppState::new(config, pdf, share).with_clock(Clock::Fixed(today)))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = send(app, request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "cv-api");
    }

    #[tokio::test]
    async fn test_invalid_personal_info_rejected_with_field() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/v1/cv/personal-info",
            Some(json!({ "full_name": "Ana", "email": "ana@email.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "full_name");

        let (_, doc) = call(&app, Method::GET, "/api/v1/cv", None).await;
        assert_eq!(doc["personal_info"]["full_name"], "");
    }

    #[tokio::test]
    async fn test_experience_shows_in_text_preview() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/cv/experiences",
            Some(json!({
                "company": "Acme",
                "position": "Engineer",
                "start_date": "enero 2020",
                "end_date": "Actual"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["end_date"].is_null());

        let request = Request::builder()
            .uri("/api/v1/cv/preview?format=text")
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Engineer — Acme, enero 2020 - Actual"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let (_, skill) = call(
            &app,
            Method::POST,
            "/api/v1/cv/skills",
            Some(json!({ "name": "Rust", "level": "Expert" })),
        )
        .await;
        let id = skill["id"].as_str().unwrap().to_string();

        let (status, pending) =
            call(&app, Method::DELETE, &format!("/api/v1/cv/skills/{id}"), None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let (_, skills) = call(&app, Method::GET, "/api/v1/cv/skills", None).await;
        assert_eq!(skills.as_array().unwrap().len(), 1);

        let confirm = format!("/api/v1/cv/confirmations/{}", pending["token"].as_str().unwrap());
        let (status, outcome) = call(&app, Method::POST, &confirm, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["removed"], true);
        let (_, skills) = call(&app, Method::GET, "/api/v1/cv/skills", None).await;
        assert!(skills.as_array().unwrap().is_empty());

        let (status, _) = call(&app, Method::POST, &confirm, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_then_share() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let (status, export) = call(&app, Method::POST, "/api/v1/cv/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(export["status"], "exported");
        assert_eq!(export["backend"], "html");

        let id = export["file"]["id"].as_str().unwrap();
        let (status, shared) = call(
            &app,
            Method::POST,
            &format!("/api/v1/cv/exports/{id}/share"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shared["status"], "shared");
        assert!(dir.path().join("outbox").join(format!("cv-{id}.html")).exists());
    }

    #[tokio::test]
    async fn test_share_unknown_export_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let uri = format!("/api/v1/cv/exports/{}/share", uuid::Uuid::new_v4());
        let (status, _) = call(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// PUT request carrying a PNG of `size` bytes as the `photo` part.
    fn photo_upload(size: usize) -> Request<Body> {
        let mut png = vec![0u8; size];
        png[..8].copy_from_slice(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

        let mut body = Vec::with_capacity(size + 256);
        body.extend_from_slice(
            b"--XBOUNDARY\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n",
        );
        body.extend_from_slice(&png);
        body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");
        Request::builder()
            .method(Method::PUT)
            .uri("/api/v1/cv/photo")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_photo_upload() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let (status, bytes) = send(&app, photo_upload(12)).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response["status"], "saved");
        assert_eq!(response["mime_type"], "image/png");

        let (_, progress) = call(&app, Method::GET, "/api/v1/cv/progress", None).await;
        assert!(!progress["missing_sections"]
            .as_array()
            .unwrap()
            .contains(&json!("photo")));
    }

    #[tokio::test]
    async fn test_photo_above_default_body_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let (status, bytes) = send(&app, photo_upload(3 * 1024 * 1024)).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(response["status"], "saved");
        assert_eq!(response["bytes"], 3 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_photo_over_configured_limit_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let max = Config::default().max_photo_bytes;

        // Just over the photo limit, still inside the request body limit.
        let (status, bytes) = send(&app, photo_upload(max + 1)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "IMAGE_ERROR");

        // Far over: cut off while the body is read.
        let (status, bytes) = send(&app, photo_upload(max + 1024 * 1024)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "IMAGE_ERROR");

        let (_, doc) = call(&app, Method::GET, "/api/v1/cv", None).await;
        assert!(doc["personal_info"]["profile_image"].is_null());
    }

    #[tokio::test]
    async fn test_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let (status, draft) =
            call(&app, Method::GET, "/api/v1/cv/forms/experience/draft", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["date_bounds"]["start_date"]["max"], "2024-06-15");
        assert_eq!(draft["rejections"][0]["field"], "company");

        let (status, _) = call(&app, Method::GET, "/api/v1/cv/forms/photo/draft", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_picked_dates_fill_the_draft() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let pick = "/api/v1/cv/forms/experience/dates";

        let (status, picked) = call(
            &app,
            Method::POST,
            pick,
            Some(json!({ "field": "start_date", "date": "2020-01-15" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(picked["status"], "picked");
        assert_eq!(picked["value"], "Enero 2020");

        // Before the chosen start month.
        let (status, body) = call(
            &app,
            Method::POST,
            pick,
            Some(json!({ "field": "end_date", "date": "2019-12-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "end_date");

        let (_, cancelled) =
            call(&app, Method::POST, pick, Some(json!({ "field": "end_date" }))).await;
        assert_eq!(cancelled["status"], "cancelled");

        let (_, draft) =
            call(&app, Method::GET, "/api/v1/cv/forms/experience/draft", None).await;
        assert_eq!(draft["input"]["start_date"], "Enero 2020");
        assert_eq!(draft["input"]["end_date"], "");
        assert_eq!(draft["date_bounds"]["end_date"]["min"], "2020-01-01");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/cv/forms/education/dates",
            Some(json!({ "field": "graduation_year", "date": "2025-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, picked) = call(
            &app,
            Method::POST,
            "/api/v1/cv/forms/education/dates",
            Some(json!({ "field": "graduation_year", "date": "2019-06-30" })),
        )
        .await;
        assert_eq!(picked["value"], "2019");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/cv/forms/skills/dates",
            Some(json!({ "field": "name", "date": "2019-06-30" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_draft_discards_input() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        call(
            &app,
            Method::POST,
            "/api/v1/cv/forms/experience/dates",
            Some(json!({ "field": "start_date", "date": "2021-03-01" })),
        )
        .await;

        let (status, _) =
            call(&app, Method::DELETE, "/api/v1/cv/forms/experience/draft", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, draft) =
            call(&app, Method::GET, "/api/v1/cv/forms/experience/draft", None).await;
        assert_eq!(draft["input"]["start_date"], "");
    }
}
