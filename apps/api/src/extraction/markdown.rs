//! Markdown Cleaner: the small set of markdown rewrites every extractor shares.
//!
//! Each function is `&str -> String` (or a predicate) and total: malformed
//! input passes through rather than failing.

use std::sync::LazyLock;

use regex::Regex;

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));
static UNDERSCORE_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("valid regex"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").expect("valid regex"));
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").expect("valid regex"));
static ANGLE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>\s]+)>").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+").expect("valid regex")
});

/// Tokens that stand for "no value" in generated markdown.
const PLACEHOLDERS: &[&str] = &["--", "-", "—", "–", "&", "•", "n/a", "N/A"];

/// Removes bold/italic wrapping: `**x**` → `x`, `*x*` → `x`, `__x__` → `x`.
/// Unpaired `**` left behind by broken markup are dropped as well.
pub fn strip_emphasis(text: &str) -> String {
    let out = BOLD_RE.replace_all(text, "$1");
    let out = UNDERSCORE_BOLD_RE.replace_all(&out, "$1");
    let out = ITALIC_RE.replace_all(&out, "$1");
    out.replace("**", "").trim().to_string()
}

/// Resolves `[label](url)` and `<url>` forms to the bare target.
/// Text without link syntax is returned trimmed.
pub fn resolve_link(text: &str) -> String {
    let target = if let Some(caps) = MD_LINK_RE.captures(text) {
        caps[2].to_string()
    } else if let Some(caps) = ANGLE_LINK_RE.captures(text) {
        caps[1].to_string()
    } else {
        strip_emphasis(text)
    };
    let target = target
        .trim_start_matches("mailto:")
        .trim_start_matches("tel:")
        .trim()
        .trim_end_matches(['.', ',', ';']);
    target.to_string()
}

/// Replaces `[label](url)` with its label, leaving prose readable.
pub fn link_labels(text: &str) -> String {
    MD_LINK_RE.replace_all(text, "$1").into_owned()
}

/// True for the literal "no value" tokens (`--`, a bare `&` continuation, …).
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed)
}

/// Full cleanup for a stored field value: emphasis stripped, link syntax
/// reduced to labels, placeholders mapped to `""`.
pub fn clean(text: &str) -> String {
    let cleaned = strip_emphasis(&link_labels(text));
    if is_placeholder(&cleaned) {
        String::new()
    } else {
        cleaned
    }
}

/// Like [`clean`], but `None` when nothing meaningful is left.
pub fn clean_value(text: &str) -> Option<String> {
    let cleaned = clean(text);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Returns the text after a list marker (`-`, `*`, `+`, `•`, `▪`, `1.`),
/// or `None` when the line is not a list item.
pub fn bullet_text(line: &str) -> Option<&str> {
    let line = line.trim_start();
    for marker in ["•", "▪", "◦", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    if let Some(rest) = line.strip_prefix('-') {
        if rest.starts_with('-') {
            return None;
        }
        return Some(rest.trim());
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest.trim());
        }
    }
    None
}

/// Leading spaces before the first visible character; tabs count as four.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// True when the (trimmed) line opens with emphasis markup.
pub fn is_emphasized(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("**") || line.starts_with("__") || (line.starts_with('*') && !line.starts_with("* "))
}

/// The inner text of the first `**bold**` run, if any.
pub fn first_bold(text: &str) -> Option<String> {
    BOLD_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The first e-mail address in `text`, if any.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Strips decorative non-ASCII symbols (📞, 📧, 🔗, …) from the front of a piece.
pub fn strip_decorations(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || (!c.is_ascii() && !c.is_alphanumeric()))
        .trim_end()
}

/// Splits on any of `separators`, ignoring separators nested in parentheses.
/// Empty pieces are dropped.
pub fn split_top_level(text: &str, separators: &[char]) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && separators.contains(&c) => {
                let piece = current.trim();
                if !piece.is_empty() {
                    pieces.push(piece.to_string());
                }
                current.clear();
            }
            c => current.push(c),
        }
    }
    let piece = current.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
    pieces
}

/// Trims whitespace and the separators (`|`, `,`, dashes, `:`) that are left
/// dangling once part of a line has been cut away.
pub fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| matches!(c, '|' | ',' | '–' | '—' | '-' | ':') || c.is_whitespace())
}

/// Splits an entry header into its lead (a leading `**bold**` run, or the
/// text before the first `|`, `–`, `—` or ` - `) and the remainder.
pub fn split_lead(text: &str) -> (String, &str) {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix("**") {
        if let Some(close) = inner.find("**") {
            return (clean(&inner[..close]), &inner[close + 2..]);
        }
    }
    let cut = ['|', '–', '—']
        .iter()
        .filter_map(|&c| text.find(c).map(|i| (i, c.len_utf8())))
        .chain(text.find(" - ").map(|i| (i, 3)))
        .min_by_key(|&(i, _)| i);
    match cut {
        Some((i, len)) => (clean(&text[..i]), &text[i + len..]),
        None => (clean(text), ""),
    }
}

/// Non-empty, trimmed lines of `text`.
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bold_and_italic() {
        assert_eq!(strip_emphasis("**Jane Doe**"), "Jane Doe");
        assert_eq!(strip_emphasis("*Acme Corp*"), "Acme Corp");
        assert_eq!(strip_emphasis("Built **fast** and *safe* code"), "Built fast and safe code");
        assert_eq!(strip_emphasis("__Title__"), "Title");
    }

    #[test]
    fn test_strip_unpaired_bold_markers() {
        assert_eq!(strip_emphasis("**Dangling"), "Dangling");
    }

    #[test]
    fn test_italic_does_not_eat_bullet_star() {
        assert_eq!(strip_emphasis("5 * 3 = 15"), "5 * 3 = 15");
    }

    #[test]
    fn test_resolve_markdown_link() {
        assert_eq!(
            resolve_link("[LinkedIn](https://linkedin.com/in/jane)"),
            "https://linkedin.com/in/jane"
        );
    }

    #[test]
    fn test_resolve_angle_link() {
        assert_eq!(resolve_link("<https://github.com/jane>"), "https://github.com/jane");
    }

    #[test]
    fn test_resolve_plain_and_mailto() {
        assert_eq!(resolve_link("  github.com/jane. "), "github.com/jane");
        assert_eq!(resolve_link("[mail](mailto:jane@x.com)"), "jane@x.com");
    }

    #[test]
    fn test_placeholders_are_no_value() {
        assert!(is_placeholder("--"));
        assert!(is_placeholder(" & "));
        assert!(is_placeholder(""));
        assert!(!is_placeholder("Rust"));
        assert_eq!(clean("**--**"), "");
        assert_eq!(clean_value("&"), None);
        assert_eq!(clean_value("*Go*"), Some("Go".to_string()));
    }

    #[test]
    fn test_bullet_text_markers() {
        assert_eq!(bullet_text("- Shipped it"), Some("Shipped it"));
        assert_eq!(bullet_text("• Shipped it"), Some("Shipped it"));
        assert_eq!(bullet_text("* Shipped it"), Some("Shipped it"));
        assert_eq!(bullet_text("2. Shipped it"), Some("Shipped it"));
        assert_eq!(bullet_text("**Bold line**"), None);
        assert_eq!(bullet_text("---"), None);
        assert_eq!(bullet_text("2024 was a year"), None);
    }

    #[test]
    fn test_split_top_level_respects_parentheses() {
        assert_eq!(
            split_top_level("Python (Django, Flask), Rust; Go", &[',', ';']),
            ["Python (Django, Flask)", "Rust", "Go"]
        );
    }

    #[test]
    fn test_strip_decorations() {
        assert_eq!(strip_decorations("📧 jane@x.com"), "jane@x.com");
        assert_eq!(strip_decorations("👨‍💻 github.com/jane"), "github.com/jane");
        assert_eq!(strip_decorations("Łódź"), "Łódź");
    }

    #[test]
    fn test_split_lead() {
        assert_eq!(split_lead("**BSc CS** – MIT"), ("BSc CS".to_string(), " – MIT"));
        assert_eq!(split_lead("Engineer | Acme"), ("Engineer".to_string(), " Acme"));
        assert_eq!(split_lead("BSc CS - MIT"), ("BSc CS".to_string(), "MIT"));
        assert_eq!(split_lead("Bootcamp"), ("Bootcamp".to_string(), ""));
        assert_eq!(trim_separators(" – MIT | "), "MIT");
    }

    #[test]
    fn test_find_email() {
        assert_eq!(find_email("Email: jane.doe+cv@x.co.uk"), Some("jane.doe+cv@x.co.uk".to_string()));
        assert_eq!(find_email("no address"), None);
    }
}
