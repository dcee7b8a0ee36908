//! Template storage collaborator.
//!
//! The renderer itself never touches I/O; handlers fetch the template text
//! through a [`TemplateStore`] first.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Name of the template shipped with the service.
pub const DEFAULT_TEMPLATE: &str = "resume";

#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("invalid template name '{0}': use letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

// ────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Returns the template text stored under `name`.
    async fn load(&self, name: &str) -> Result<String, TemplateStoreError>;
}

// ────────────────────────────────────────────────────────────────
// Filesystem implementation
// ────────────────────────────────────────────────────────────────

/// Serves `<root>/<name>.html`.
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, TemplateStoreError> {
        let stem = name.strip_suffix(".html").unwrap_or(name);
        let valid = !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(TemplateStoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{stem}.html")))
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn load(&self, name: &str) -> Result<String, TemplateStoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateStoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(TemplateStoreError::Io(e)),
        }
    }
}
