use std::sync::Arc;

use crate::config::Config;
use crate::render::templates::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Where named templates come from. Default: `FsTemplateStore` over `TEMPLATE_DIR`.
    pub templates: Arc<dyn TemplateStore>,
}
