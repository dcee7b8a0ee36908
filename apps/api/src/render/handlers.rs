use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::assembler::ExtractionReport;
use crate::extraction::handlers::{ensure_input_size, run_extraction};
use crate::models::resume::{PartialRecord, ResumeRecord};
use crate::render::engine::Renderer;
use crate::render::templates::DEFAULT_TEMPLATE;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub record: ResumeRecord,
    /// Inline template text; takes precedence over `template_name`.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub raw_text: String,
    #[serde(default)]
    pub overrides: PartialRecord,
    #[serde(default)]
    pub template_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub report: ExtractionReport,
    pub html: String,
}

async fn resolve_template(state: &AppState, inline: Option<String>, name: Option<String>) -> Result<String, AppError> {
    if let Some(template) = inline {
        return Ok(template);
    }
    let name = name.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
    Ok(state.templates.load(&name).await?)
}

async fn run_render(renderer: Renderer, template: String, record: ResumeRecord) -> Result<String, AppError> {
    let rendered = tokio::task::spawn_blocking(move || renderer.render(&template, &record))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?;
    Ok(rendered?)
}

/// POST /api/v1/resumes/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let template = resolve_template(&state, req.template, req.template_name).await?;
    let renderer = Renderer::new(state.config.render_options());
    let html = run_render(renderer, template, req.record).await?;
    Ok(Json(RenderResponse { html }))
}

/// POST /api/v1/resumes/generate
/// Extracts a record from raw text and renders it in one call.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    ensure_input_size(&req.raw_text, state.config.max_input_bytes)?;
    let template = resolve_template(&state, None, req.template_name).await?;
    let report = run_extraction(req.raw_text, req.overrides).await?;

    let renderer = Renderer::new(state.config.render_options());
    let html = run_render(renderer, template, report.record.clone()).await?;

    tracing::info!(
        issues = report.issues.len(),
        html_bytes = html.len(),
        "generated resume"
    );
    Ok(Json(GenerateResponse { report, html }))
}
