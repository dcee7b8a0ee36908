use std::str::FromStr;

use anyhow::{Context, Result};

use crate::render::engine::{RenderOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PASSES};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory the filesystem template store reads `<name>.html` from.
    pub template_dir: String,
    pub render_max_passes: usize,
    pub render_max_depth: usize,
    pub render_escape_html: bool,
    /// Largest `raw_text` accepted by the extraction endpoints.
    pub max_input_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            template_dir: "templates".to_string(),
            render_max_passes: DEFAULT_MAX_PASSES,
            render_max_depth: DEFAULT_MAX_DEPTH,
            render_escape_html: false,
            max_input_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            template_dir: lookup("TEMPLATE_DIR").unwrap_or(defaults.template_dir),
            render_max_passes: parse_or(&lookup, "RENDER_MAX_PASSES", defaults.render_max_passes)
                .context("RENDER_MAX_PASSES must be a non-negative integer")?,
            render_max_depth: parse_or(&lookup, "RENDER_MAX_DEPTH", defaults.render_max_depth)
                .context("RENDER_MAX_DEPTH must be a non-negative integer")?,
            render_escape_html: parse_or(&lookup, "RENDER_ESCAPE_HTML", defaults.render_escape_html)
                .context("RENDER_ESCAPE_HTML must be 'true' or 'false'")?,
            max_input_bytes: parse_or(&lookup, "MAX_INPUT_BYTES", defaults.max_input_bytes)
                .context("MAX_INPUT_BYTES must be a non-negative integer")?,
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_passes: self.render_max_passes,
            max_depth: self.render_max_depth,
            escape_html: self.render_escape_html,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.template_dir, "templates");
        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(config.max_input_bytes, 1_048_576);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("RENDER_MAX_PASSES", "4"),
            ("RENDER_ESCAPE_HTML", "true"),
            ("TEMPLATE_DIR", "/srv/templates"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.render_max_passes, 4);
        assert!(config.render_escape_html);
        assert_eq!(config.template_dir, "/srv/templates");
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("RENDER_MAX_DEPTH", "deep")])).unwrap_err();
        assert!(err.to_string().contains("RENDER_MAX_DEPTH"));
    }
}
