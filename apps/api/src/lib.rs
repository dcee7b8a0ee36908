//! Résumé extraction and rendering service.
//!
//! The core is pure: [`extract_resume`] turns markdown-flavoured résumé text
//! into a [`ResumeRecord`], and [`render()`] fills an HTML template from one.
//! The HTTP adapter in [`routes`] wraps both.

pub mod config;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;

pub use extraction::{extract_resume, extract_resume_with_report, ExtractionIssue, ExtractionReport};
pub use models::resume::{PartialRecord, ResumeRecord};
pub use render::{render, RenderError, RenderOptions, Renderer};
