//! Template Renderer.
//!
//! Resolves three constructs against a [`ResumeRecord`]:
//!
//! - `{{#each key}} body {{/each}}` renders `body` once per item,
//! - `{{#if key}} body {{/if}}` keeps `body` when `key` is truthy,
//! - `{{key}}` substitutes a value.
//!
//! Each pass resolves iteration blocks first, then conditionals, and only
//! once neither changes anything are variables substituted. Passes and
//! nesting depth are both capped; exceeding either is an error. Whatever
//! template syntax survives the last pass is reported, never stripped.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::resume::ResumeRecord;
use crate::render::context::render_context;
use crate::render::scope::{is_truthy, Scope};

static EACH_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(?:#each\s+([^}\s]+)|(/each))\s*\}\}").expect("valid regex")
});
static IF_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(?:#if\s+([^}\s]+)|(/if))\s*\}\}").expect("valid regex")
});
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(@?[A-Za-z_][A-Za-z0-9_.\-]*)\s*\}\}").expect("valid regex")
});
static LEFTOVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^}]*\}\}|\{\{|\}\}").expect("valid regex"));

pub const DEFAULT_MAX_PASSES: usize = 10;
pub const DEFAULT_MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Resolution passes allowed per scope before giving up.
    pub max_passes: usize,
    /// How deeply `{{#each}}` blocks may nest.
    pub max_depth: usize,
    /// HTML-escape substituted values.
    pub escape_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            max_depth: DEFAULT_MAX_DEPTH,
            escape_html: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    Passes,
    Depth,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitKind::Passes => f.write_str("resolution passes"),
            LimitKind::Depth => f.write_str("nesting levels"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template contains unresolved syntax: {}", .fragments.join(", "))]
    UnresolvedTemplateSyntax { fragments: Vec<String> },

    #[error("template did not settle within {limit} {kind}")]
    RecursionLimitExceeded { limit: usize, kind: LimitKind },

    #[error("record could not be converted into a render context: {0}")]
    Context(#[from] serde_json::Error),
}

/// Renders `template` against `record` with default options.
pub fn render(template: &str, record: &ResumeRecord) -> Result<String, RenderError> {
    Renderer::default().render(template, record)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, template: &str, record: &ResumeRecord) -> Result<String, RenderError> {
        let context = render_context(record)?;
        self.render_value(template, &context)
    }

    /// Renders against an arbitrary JSON context.
    pub fn render_value(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        let output = self.render_scope(template, &Scope::root(context), 0)?;

        let mut fragments: Vec<String> = Vec::new();
        for m in LEFTOVER_RE.find_iter(&output) {
            if !fragments.iter().any(|f| f == m.as_str()) {
                fragments.push(m.as_str().to_string());
            }
        }
        if !fragments.is_empty() {
            return Err(RenderError::UnresolvedTemplateSyntax { fragments });
        }
        Ok(output)
    }

    fn render_scope(&self, template: &str, scope: &Scope<'_>, depth: usize) -> Result<String, RenderError> {
        if depth > self.options.max_depth {
            return Err(RenderError::RecursionLimitExceeded {
                limit: self.options.max_depth,
                kind: LimitKind::Depth,
            });
        }

        let mut text = template.to_string();
        let mut passes = 0;
        loop {
            let next = match resolve_blocks(&text, &EACH_TOKEN_RE, |key, body| self.expand_each(key, body, scope, depth))? {
                Some(next) => Some(next),
                None => resolve_blocks(&text, &IF_TOKEN_RE, |key, body| Ok(expand_if(key, body, scope)))?,
            };
            let Some(next) = next else {
                if depth == 0 {
                    debug!(passes, "template settled");
                }
                return Ok(self.substitute(&text, scope));
            };
            if passes == self.options.max_passes {
                return Err(RenderError::RecursionLimitExceeded {
                    limit: self.options.max_passes,
                    kind: LimitKind::Passes,
                });
            }
            passes += 1;
            text = next;
        }
    }

    /// Output of one `{{#each}}` block; absent, empty or non-iterable keys
    /// produce nothing.
    fn expand_each(&self, key: &str, body: &str, scope: &Scope<'_>, depth: usize) -> Result<String, RenderError> {
        let Some(value) = scope.lookup(key) else {
            return Ok(String::new());
        };
        let mut out = String::new();
        match value.as_ref() {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let child = scope.child(item, index, None);
                    out.push_str(&self.render_scope(body, &child, depth + 1)?);
                }
            }
            Value::Object(map) => {
                for (index, (name, item)) in map.iter().enumerate() {
                    let child = scope.child(item, index, Some(name));
                    out.push_str(&self.render_scope(body, &child, depth + 1)?);
                }
            }
            _ => {}
        }
        Ok(out)
    }

    fn substitute(&self, text: &str, scope: &Scope<'_>) -> String {
        VARIABLE_RE
            .replace_all(text, |caps: &Captures| match scope.lookup(&caps[1]) {
                Some(value) => self.display(&value),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    fn display(&self, value: &Value) -> String {
        let raw = match value {
            Value::Array(items) => items
                .iter()
                .filter_map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            other => scalar_text(other).unwrap_or_default(),
        };
        let escaped = if self.options.escape_html {
            escape_html(&raw)
        } else {
            raw
        };
        escaped.replace('{', "&#123;").replace('}', "&#125;")
    }
}

fn expand_if(key: &str, body: &str, scope: &Scope<'_>) -> String {
    match scope.lookup(key) {
        Some(value) if is_truthy(&value) => body.to_string(),
        _ => String::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Replaces every outermost balanced block matched by `token_re` with
/// `expand(key, body)`. Nested blocks stay inside `body` untouched.
/// Returns `None` when the text holds no complete block. Unbalanced
/// openers and closers are left in place for the final syntax check.
fn resolve_blocks<F>(text: &str, token_re: &Regex, mut expand: F) -> Result<Option<String>, RenderError>
where
    F: FnMut(&str, &str) -> Result<String, RenderError>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut depth = 0usize;
    let mut open: Option<(usize, usize, &str)> = None;
    let mut changed = false;

    for caps in token_re.captures_iter(text) {
        let Some(token) = caps.get(0) else { continue };
        if let Some(key) = caps.get(1) {
            if depth == 0 {
                open = Some((token.start(), token.end(), key.as_str()));
            }
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some((start, body_start, key)) = open.take() {
                    out.push_str(&text[last..start]);
                    out.push_str(&expand(key, &text[body_start..token.start()])?);
                    last = token.end();
                    changed = true;
                }
            }
        }
    }

    if !changed {
        return Ok(None);
    }
    out.push_str(&text[last..]);
    Ok(Some(out))
}
