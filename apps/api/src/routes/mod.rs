pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::extraction::handlers as extraction;
use crate::render::handlers as render;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/extract", post(extraction::handle_extract))
        .route("/api/v1/resumes/render", post(render::handle_render))
        .route("/api/v1/resumes/generate", post(render::handle_generate))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::render::templates::FsTemplateStore;

    fn app(config: Config) -> Router {
        let templates = Arc::new(FsTemplateStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")));
        build_router(AppState { config, templates })
    }

    async fn call(app: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    const RAW: &str = "**Jane Doe**\nEngineer | Remote\nNYC\n+1 555 0100 | jane@x.com\n\n### Experience\n**Engineer**\n**Acme** | 2020 – Present\n- Shipped {{things}}\n";

    #[tokio::test]
    async fn test_health() {
        let response = app(Config::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_extract() {
        let (status, body) = call(
            app(Config::default()),
            "POST",
            "/api/v1/resumes/extract",
            json!({ "raw_text": RAW, "overrides": { "github": "https://github.com/jane" } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["name"], "Jane Doe");
        assert_eq!(body["record"]["email"], "jane@x.com");
        assert_eq!(body["record"]["github"], "https://github.com/jane");
        assert_eq!(body["record"]["experience"][0]["company"], "Acme");
        assert_eq!(body["record"]["projects"], json!([]));
        assert!(body["issues"].is_array());
    }

    #[tokio::test]
    async fn test_extract_rejects_oversized_input() {
        let config = Config {
            max_input_bytes: 8,
            ..Config::default()
        };
        let (status, body) = call(
            app(config),
            "POST",
            "/api/v1/resumes/extract",
            json!({ "raw_text": "far more than eight bytes" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_inline_template() {
        let (status, body) = call(
            app(Config::default()),
            "POST",
            "/api/v1/resumes/render",
            json!({ "record": { "name": "Ada", "tags": ["Rust", "Go"] }, "template": "<h1>{{name}}</h1>{{#each tags}}[{{this}}]{{/each}}" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["html"], "<h1>Ada</h1>[Rust][Go]");
    }

    #[tokio::test]
    async fn test_render_unresolved_syntax_is_422() {
        let (status, body) = call(
            app(Config::default()),
            "POST",
            "/api/v1/resumes/render",
            json!({ "record": { "name": "Ada" }, "template": "{{name}} {{foo}}" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNRESOLVED_TEMPLATE_SYNTAX");
        assert_eq!(body["error"]["details"]["fragments"], json!(["{{foo}}"]));
    }

    #[tokio::test]
    async fn test_render_unknown_template_name() {
        let (status, body) = call(
            app(Config::default()),
            "POST",
            "/api/v1/resumes/render",
            json!({ "record": {}, "template_name": "does-not-exist" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_generate_with_bundled_template() {
        let (status, body) = call(
            app(Config::default()),
            "POST",
            "/api/v1/resumes/generate",
            json!({ "raw_text": RAW }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["name"], "Jane Doe");
        let html = body["html"].as_str().unwrap();
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("Acme"));
        assert!(html.contains("&#123;&#123;things&#125;&#125;"));
        assert!(!html.contains("{{"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = call(app(Config::default()), "GET", "/nope", Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
