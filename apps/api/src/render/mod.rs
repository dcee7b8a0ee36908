//! Template Renderer: `{{#each}}` / `{{#if}}` / `{{var}}` over a resume record.

pub mod context;
pub mod engine;
pub mod handlers;
pub mod scope;
pub mod templates;

pub use engine::{render, LimitKind, RenderError, RenderOptions, Renderer};
pub use templates::{FsTemplateStore, TemplateStore, TemplateStoreError};
