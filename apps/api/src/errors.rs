use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::render::engine::RenderError;
use crate::render::templates::TemplateStoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateStoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Render(e) => match e {
                RenderError::UnresolvedTemplateSyntax { fragments } => {
                    details = Some(json!({ "fragments": fragments }));
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "UNRESOLVED_TEMPLATE_SYNTAX",
                        e.to_string(),
                    )
                }
                RenderError::RecursionLimitExceeded { limit, kind } => {
                    details = Some(json!({ "limit": limit, "kind": kind }));
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "RECURSION_LIMIT_EXCEEDED",
                        e.to_string(),
                    )
                }
                RenderError::Context(err) => {
                    tracing::error!("Render context error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                    )
                }
            },
            AppError::Template(e) => match e {
                TemplateStoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
                TemplateStoreError::InvalidName(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
                }
                TemplateStoreError::Io(err) => {
                    tracing::error!("Template storage error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "TEMPLATE_STORAGE_ERROR",
                        "A template storage error occurred".to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
