//! Personal Info Extractor: name, title, location and contact details.
//!
//! Positional first (line 1 is the name, line 2 the title, line 3 the
//! location), then the pipe/bullet-separated contact line, then one dedicated
//! social-links line, then explicit `Label:` patterns.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::markdown::{
    clean, clean_value, content_lines, find_email, resolve_link, strip_decorations,
};
use crate::extraction::sections::{heading_kind, is_heading_line};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{5,}\d").expect("valid regex"));
static FIELD_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:e-?mail|phone|tel|mobile|cell|linkedin|github|location|address)\s*:\s*")
        .expect("valid regex")
});
static NAME_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("name"));
static TITLE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("title|role|position"));
static EMAIL_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("e-?mail"));
static PHONE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("phone|tel|mobile|cell"));
static LOCATION_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("location|address|based in"));
static LINKEDIN_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("linkedin"));
static GITHUB_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| label_re("github"));

/// `Label: value` at line start, tolerating emoji and emphasis around the label.
fn label_re(labels: &str) -> Regex {
    Regex::new(&format!(r"(?im)^[^\w\n]*(?:{labels})[*_\s]*:[*_\s]*(.+)$")).expect("valid regex")
}

const SOCIAL_HOSTS: &[&str] = &["linkedin.com", "lnkd.in", "github.com"];
const CONTACT_SEPARATORS: &[char] = &['|', '•', '·'];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
}

impl PersonalInfo {
    fn contact_is_empty(&self) -> bool {
        self.email.is_empty()
            && self.phone.is_empty()
            && self.linkedin.is_empty()
            && self.github.is_empty()
    }
}

pub fn extract_personal(document: &str) -> PersonalInfo {
    let lines = content_lines(document);
    let mut info = PersonalInfo::default();

    let positional_name = lines.first().and_then(|line| name_from_line(line));
    match positional_name {
        Some(name) => {
            info.name = name;
            if let Some(line) = lines.get(1) {
                if !looks_like_contact(line) && !is_heading_line(line) {
                    let first = line.split('|').next().unwrap_or(line);
                    info.title = clean(first);
                }
            }
            if let Some(line) = lines.get(2) {
                if !looks_like_contact(line) && !PHONE_RE.is_match(line) && !is_heading_line(line) {
                    info.location = clean(line);
                }
            }
        }
        None => info.name = labelled(&NAME_LABEL_RE, document).unwrap_or_default(),
    }

    let contact_line = lines.iter().position(|line| is_contact_line(line));
    if let Some(idx) = contact_line {
        for piece in lines[idx].split(CONTACT_SEPARATORS) {
            classify_piece(piece, &mut info);
        }
    }

    if info.linkedin.is_empty() || info.github.is_empty() {
        let social_line = lines
            .iter()
            .enumerate()
            .find(|&(i, line)| Some(i) != contact_line && mentions_social(line))
            .map(|(_, line)| *line);
        if let Some(line) = social_line {
            for piece in line.split(CONTACT_SEPARATORS) {
                let (linkedin, github) = social_links(piece);
                if info.linkedin.is_empty() {
                    info.linkedin = linkedin.unwrap_or_default();
                }
                if info.github.is_empty() {
                    info.github = github.unwrap_or_default();
                }
            }
        }
    }

    apply_label_fallbacks(document, &mut info);
    info
}

/// Line 1 as a name, unless it is really a heading, a contact line or a label.
fn name_from_line(line: &str) -> Option<String> {
    if heading_kind(line).is_some() || line.contains('@') || line.contains(':') {
        return None;
    }
    let name = clean(line.trim_start_matches('#'));
    (!name.is_empty() && name.chars().count() <= 80).then_some(name)
}

fn has_social_host(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    SOCIAL_HOSTS.iter().any(|host| lower.contains(host))
}

fn mentions_social(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    has_social_host(text) || lower.contains("linkedin:") || lower.contains("github:")
}

/// Disqualifies a line from being the title or location.
fn looks_like_contact(line: &str) -> bool {
    line.contains('@') || has_social_host(line) || line.trim_start().starts_with('#')
}

/// `@` plus a phone-like run, a `+`, or a social host.
fn is_contact_line(line: &str) -> bool {
    let decorated = line.contains('📞') || line.contains('📧');
    line.contains('@')
        && (line.contains('+') || PHONE_RE.is_match(line) || has_social_host(line) || decorated)
}

fn strip_piece(piece: &str) -> String {
    let piece = strip_decorations(piece);
    FIELD_LABEL_RE.replace(piece, "").trim().to_string()
}

fn classify_piece(piece: &str, info: &mut PersonalInfo) {
    let piece = strip_piece(piece);
    if piece.is_empty() {
        return;
    }
    if piece.contains('@') {
        if let Some(email) = find_email(&piece) {
            if info.email.is_empty() {
                info.email = email;
            }
            return;
        }
    }
    if has_social_host(&piece) {
        let (linkedin, github) = social_links(&piece);
        if info.linkedin.is_empty() {
            info.linkedin = linkedin.unwrap_or_default();
        }
        if info.github.is_empty() {
            info.github = github.unwrap_or_default();
        }
        return;
    }
    if piece.contains('+') || piece.chars().any(|c| c.is_ascii_digit()) {
        if info.phone.is_empty() {
            info.phone = clean(&piece);
        }
        return;
    }
    if info.contact_is_empty() && info.location.is_empty() {
        info.location = clean(&piece);
    }
}

/// LinkedIn and GitHub targets in one piece. A piece naming both is split
/// where the second label begins.
fn social_links(piece: &str) -> (Option<String>, Option<String>) {
    let lower = piece.to_ascii_lowercase();
    let (Some(li), Some(gh)) = (lower.find("linkedin"), lower.find("github")) else {
        return (social_target(piece, "linkedin"), social_target(piece, "github"));
    };
    let second = li.max(gh);
    let split_at = piece[..second]
        .rfind(char::is_whitespace)
        .map(|p| p + 1)
        .unwrap_or(second);
    let (head, tail) = piece.split_at(split_at);
    let (head_li, head_gh) = (social_target(head, "linkedin"), social_target(head, "github"));
    let (tail_li, tail_gh) = (social_target(tail, "linkedin"), social_target(tail, "github"));
    (head_li.or(tail_li), head_gh.or(tail_gh))
}

/// Bare URL for `host_word` (`"linkedin"` / `"github"`) when `piece` is about it.
fn social_target(piece: &str, host_word: &str) -> Option<String> {
    let lower = piece.to_ascii_lowercase();
    let relevant = lower.contains(host_word) || (host_word == "linkedin" && lower.contains("lnkd.in"));
    if !relevant {
        return None;
    }
    let target = resolve_link(&strip_piece(piece));
    let target_lower = target.to_ascii_lowercase();
    let is_url = SOCIAL_HOSTS.iter().any(|host| target_lower.contains(host))
        || target_lower.starts_with("http");
    (is_url && !target.is_empty()).then_some(target)
}

/// First `Label:` match, cut at the next contact separator and cleaned.
fn labelled(re: &Regex, document: &str) -> Option<String> {
    let caps = re.captures(document)?;
    let value = caps[1].split(CONTACT_SEPARATORS).next().unwrap_or("");
    clean_value(value)
}

fn apply_label_fallbacks(document: &str, info: &mut PersonalInfo) {
    if info.title.is_empty() {
        info.title = labelled(&TITLE_LABEL_RE, document).unwrap_or_default();
    }
    if info.email.is_empty() {
        info.email = EMAIL_LABEL_RE
            .captures(document)
            .and_then(|caps| find_email(&caps[1]))
            .or_else(|| find_email(document))
            .unwrap_or_default();
    }
    if info.phone.is_empty() {
        info.phone = labelled(&PHONE_LABEL_RE, document).unwrap_or_default();
    }
    if info.location.is_empty() {
        info.location = labelled(&LOCATION_LABEL_RE, document).unwrap_or_default();
    }
    if info.linkedin.is_empty() {
        info.linkedin = labelled(&LINKEDIN_LABEL_RE, document)
            .map(|v| resolve_link(&v))
            .unwrap_or_default();
    }
    if info.github.is_empty() {
        info.github = labelled(&GITHUB_LABEL_RE, document)
            .map(|v| resolve_link(&v))
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_header() {
        let doc = "**Jane Doe**\nEngineer | Remote\nNYC\n+1 555 0100 | jane@x.com\n";
        let info = extract_personal(doc);
        assert_eq!(info.name, "Jane Doe");
        assert_eq!(info.title, "Engineer");
        assert_eq!(info.location, "NYC");
        assert!(info.phone.contains("+1 555 0100"));
        assert_eq!(info.email, "jane@x.com");
    }

    #[test]
    fn test_emoji_contact_line_with_links() {
        let doc = "\
# John Smith
Backend Developer
Berlin, Germany
📞 +49 170 1234567 | 📧 john@smith.dev | 🔗 [LinkedIn](https://linkedin.com/in/jsmith) | 👨‍💻 [GitHub](https://github.com/jsmith)
";
        let info = extract_personal(doc);
        assert_eq!(info.name, "John Smith");
        assert_eq!(info.title, "Backend Developer");
        assert_eq!(info.location, "Berlin, Germany");
        assert_eq!(info.phone, "+49 170 1234567");
        assert_eq!(info.email, "john@smith.dev");
        assert_eq!(info.linkedin, "https://linkedin.com/in/jsmith");
        assert_eq!(info.github, "https://github.com/jsmith");
    }

    #[test]
    fn test_title_rejected_when_contact() {
        let doc = "Jane Doe\njane@x.com | +1 555 0100\n";
        let info = extract_personal(doc);
        assert_eq!(info.title, "");
        assert_eq!(info.location, "");
        assert_eq!(info.email, "jane@x.com");
    }

    #[test]
    fn test_dedicated_social_line_is_split() {
        let doc = "\
Jane Doe
Engineer
Oslo
jane@x.com | +47 123 45 678
LinkedIn: <https://linkedin.com/in/jane> • GitHub: <https://github.com/jane>
";
        let info = extract_personal(doc);
        assert_eq!(info.linkedin, "https://linkedin.com/in/jane");
        assert_eq!(info.github, "https://github.com/jane");
    }

    #[test]
    fn test_combined_social_piece() {
        let (li, gh) =
            social_links("LinkedIn: https://linkedin.com/in/jane GitHub: https://github.com/jane");
        assert_eq!(li.as_deref(), Some("https://linkedin.com/in/jane"));
        assert_eq!(gh.as_deref(), Some("https://github.com/jane"));
    }

    #[test]
    fn test_label_fallbacks() {
        let doc = "\
## Summary
Name: Ada Lovelace
**Email:** ada@engines.org
Phone: +44 20 7946 0000
Location: London
";
        let info = extract_personal(doc);
        assert_eq!(info.name, "Ada Lovelace");
        assert_eq!(info.email, "ada@engines.org");
        assert_eq!(info.phone, "+44 20 7946 0000");
        assert_eq!(info.location, "London");
        assert_eq!(info.title, "");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_personal(""), PersonalInfo::default());
    }

    #[test]
    fn test_missing_contact_line_leaves_contacts_empty() {
        let info = extract_personal("Jane Doe\nEngineer\nNYC\n");
        assert_eq!(info.email, "");
        assert_eq!(info.phone, "");
        assert_eq!(info.linkedin, "");
        assert_eq!(info.github, "");
    }
}
