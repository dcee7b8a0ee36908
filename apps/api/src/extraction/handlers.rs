use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::assembler::{extract_resume_with_report, ExtractionReport};
use crate::models::resume::PartialRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub raw_text: String,
    #[serde(default)]
    pub overrides: PartialRecord,
}

/// Rejects input above the configured size before any CPU is spent on it.
pub fn ensure_input_size(raw_text: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw_text.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "raw_text is {} bytes; the limit is {max_bytes}",
            raw_text.len()
        )));
    }
    Ok(())
}

/// Runs extraction on the blocking pool; the heuristics are CPU-bound.
pub async fn run_extraction(raw_text: String, overrides: PartialRecord) -> Result<ExtractionReport, AppError> {
    tokio::task::spawn_blocking(move || extract_resume_with_report(&raw_text, &overrides))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))
}

/// POST /api/v1/resumes/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractionReport>, AppError> {
    ensure_input_size(&req.raw_text, state.config.max_input_bytes)?;
    let report = run_extraction(req.raw_text, req.overrides).await?;
    Ok(Json(report))
}
