pub mod handlers;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout & preview
        .route("/api/v1/layout/blocks", post(handlers::handle_blocks))
        .route("/api/v1/preview", post(handlers::handle_preview))
        .route("/api/v1/validate", post(handlers::handle_validate))
        // Export
        .route("/api/v1/export/pdf", post(handlers::handle_export_pdf))
        .route("/api/v1/export/docx", post(handlers::handle_export_docx))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn app() -> Router {
        build_router(AppState::new(Config {
            preview_settle: Duration::ZERO,
            ..Config::default()
        }))
    }

    fn jane() -> Value {
        json!({
            "personal": {
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "5551234567",
                "address": "Berlin"
            },
            "skills": ["Go", "Rust", "SQL"],
            "templateId": "freshie"
        })
    }

    async fn post(app: Router, uri: &str, body: Value) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_blocks_split_skills() {
        let response = post(app(), "/api/v1/layout/blocks", json!({ "document": jane() })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["template"], "freshie");
        let blocks = body["blocks"].as_array().unwrap();
        assert_eq!(blocks[0]["kind"], "header");
        assert_eq!(blocks[2]["kind"], "two_column_list");
        assert_eq!(blocks[2]["left"], json!(["Go", "SQL"]));
        assert_eq!(blocks[2]["right"], json!(["Rust"]));
    }

    #[tokio::test]
    async fn test_export_pdf_attachment() {
        let response = post(app(), "/api/v1/export/pdf", json!({ "document": jane() })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        assert!(headers.contains_key("x-render-id"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_docx_custom_name() {
        let response = post(
            app(),
            "/api/v1/export/docx",
            json!({ "document": jane(), "file_name": "jane-doe" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"jane-doe.docx\""
        );
    }

    #[tokio::test]
    async fn test_export_docx_without_email_is_rejected() {
        let mut doc = jane();
        doc["personal"]["email"] = json!("");
        let response = post(app(), "/api/v1/export/docx", json!({ "document": doc })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_empty_document_is_no_data() {
        let response = post(app(), "/api/v1/export/pdf", json!({ "document": {} })).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"]["code"], "NO_DATA");
    }

    #[tokio::test]
    async fn test_preview_session_revisions() {
        let app = app();
        let first = json_body(post(app.clone(), "/api/v1/preview", json!({ "document": jane() })).await).await;
        assert_eq!(first["revision"], 1);
        assert_eq!(first["superseded"], false);
        assert!(first["pages"][0]["markup"].as_str().unwrap().contains("Jane Doe"));

        let session_id = first["session_id"].clone();
        let second = json_body(
            post(
                app,
                "/api/v1/preview",
                json!({ "document": jane(), "session_id": session_id }),
            )
            .await,
        )
        .await;
        assert_eq!(second["session_id"], first["session_id"]);
        assert_eq!(second["revision"], 2);
    }

    #[tokio::test]
    async fn test_validate_reports_issues() {
        let response = post(app(), "/api/v1/validate", json!({ "document": {} })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["valid"], false);
        assert!(!body["issues"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_template_is_rejected() {
        let response = post(
            app(),
            "/api/v1/layout/blocks",
            json!({ "document": jane(), "template": "modern" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
