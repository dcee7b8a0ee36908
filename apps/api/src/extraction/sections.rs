//! Section Segmenter: locates named sections in loosely formatted résumé text.
//!
//! Every [`SectionKind`] owns a prioritized list of [`HeadingRule`]s. Rules are
//! tried in order; the first rule matching any line wins and the section body
//! runs from just after that heading to the next heading or end of document.
//! There is no scoring: list order is the tie-break.

use std::fmt;

use serde::Serialize;

use crate::extraction::markdown::{bullet_text, strip_decorations, strip_emphasis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Languages,
    Interests,
    Achievements,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Certifications,
        SectionKind::Projects,
        SectionKind::Languages,
        SectionKind::Interests,
        SectionKind::Achievements,
    ];

    /// Heading titles (lowercase), most specific first.
    pub fn titles(self) -> &'static [&'static str] {
        match self {
            SectionKind::Summary => &[
                "professional summary",
                "summary",
                "professional profile",
                "profile",
                "about me",
                "about",
                "objective",
            ],
            SectionKind::Experience => &[
                "professional experience",
                "work experience",
                "experience",
                "employment history",
                "employment",
                "career history",
            ],
            SectionKind::Education => &["education", "education & training", "academic background"],
            SectionKind::Skills => &[
                "core technical skills",
                "technical skills",
                "core competencies",
                "core competences",
                "key competencies",
                "skills",
                "competencies",
                "skills & tools",
                "tech stack",
            ],
            SectionKind::Certifications => &[
                "certifications & training",
                "certifications",
                "certificates",
                "licenses & certifications",
                "licenses and certifications",
            ],
            SectionKind::Projects => &[
                "selected projects",
                "relevant projects",
                "key projects",
                "personal projects",
                "projects",
            ],
            SectionKind::Languages => &["languages", "spoken languages", "language skills"],
            SectionKind::Interests => &[
                "interests",
                "hobbies & interests",
                "hobbies and interests",
                "hobbies",
            ],
            SectionKind::Achievements => &[
                "key achievements",
                "achievements",
                "accomplishments",
                "honors & awards",
                "awards & honors",
                "awards",
            ],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Certifications => "certifications",
            SectionKind::Projects => "projects",
            SectionKind::Languages => "languages",
            SectionKind::Interests => "interests",
            SectionKind::Achievements => "achievements",
        }
    }

    /// The prioritized heading rules for this kind: level-3 then level-2
    /// markdown headings per title, then any heading level, then bold
    /// headings, `Title:` labels and finally a bare title line.
    pub fn rules(self) -> Vec<HeadingRule> {
        let titles = self.titles();
        let mut rules = Vec::with_capacity(titles.len() * 6);
        for &title in titles {
            rules.push(HeadingRule::Markdown { level: 3, title });
            rules.push(HeadingRule::Markdown { level: 2, title });
        }
        rules.extend(titles.iter().map(|&title| HeadingRule::AnyMarkdown { title }));
        rules.extend(titles.iter().map(|&title| HeadingRule::Emphasized { title }));
        rules.extend(titles.iter().map(|&title| HeadingRule::Label { title }));
        rules.extend(titles.iter().map(|&title| HeadingRule::Bare { title }));
        rules
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One way a section heading may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingRule {
    /// `## Title` at exactly this level.
    Markdown { level: usize, title: &'static str },
    /// A `#` heading of any level.
    AnyMarkdown { title: &'static str },
    /// `**Title**` or `**Title:**` alone on a line.
    Emphasized { title: &'static str },
    /// `Title:` at line start; content may continue on the same line.
    Label { title: &'static str },
    /// The title alone on a line, e.g. `EXPERIENCE`.
    Bare { title: &'static str },
}

/// Where a heading matched: the body starts `content_offset` bytes into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeadingMatch {
    content_offset: usize,
    level: Option<usize>,
}

impl HeadingRule {
    fn match_line(&self, line: &str) -> Option<HeadingMatch> {
        match *self {
            HeadingRule::Markdown { level, title } => {
                let (found, text) = markdown_heading(line)?;
                (found == level && normalize_heading(text) == title).then_some(HeadingMatch {
                    content_offset: line.len(),
                    level: Some(found),
                })
            }
            HeadingRule::AnyMarkdown { title } => {
                let (found, text) = markdown_heading(line)?;
                (normalize_heading(text) == title).then_some(HeadingMatch {
                    content_offset: line.len(),
                    level: Some(found),
                })
            }
            HeadingRule::Emphasized { title } => {
                let trimmed = line.trim();
                let wrapped = (trimmed.starts_with("**") && trimmed.ends_with("**"))
                    || (trimmed.starts_with("__") && trimmed.ends_with("__"));
                (wrapped && trimmed.len() > 4 && normalize_heading(trimmed) == title).then_some(
                    HeadingMatch {
                        content_offset: line.len(),
                        level: None,
                    },
                )
            }
            HeadingRule::Label { title } => {
                label_content_offset(line, title).map(|content_offset| HeadingMatch {
                    content_offset,
                    level: None,
                })
            }
            HeadingRule::Bare { title } => {
                let trimmed = line.trim();
                let plain = !trimmed.starts_with('#')
                    && !trimmed.contains('*')
                    && bullet_text(trimmed).is_none();
                (plain && normalize_heading(trimmed) == title).then_some(HeadingMatch {
                    content_offset: line.len(),
                    level: None,
                })
            }
        }
    }
}

/// A located section: the heading line as written and the body span after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub heading: &'a str,
    pub body: &'a str,
}

/// Finds `kind` in `text`. `None` means the section is absent, which is not an error.
pub fn segment(text: &str, kind: SectionKind) -> Option<Section<'_>> {
    let lines = indexed_lines(text);
    for rule in kind.rules() {
        for (i, &(offset, line)) in lines.iter().enumerate() {
            let Some(m) = rule.match_line(line) else {
                continue;
            };
            let heading_only = line[m.content_offset..].trim().is_empty();
            if m.level.is_none() && heading_only && inside_markdown_section(&lines[..i]) {
                continue;
            }
            let body_start = offset + m.content_offset;
            let body_end = lines[i + 1..]
                .iter()
                .find(|(_, l)| is_boundary(l, m.level))
                .map(|&(o, _)| o)
                .unwrap_or(text.len());
            return Some(Section {
                kind,
                heading: line.trim(),
                body: &text[body_start..body_end.max(body_start)],
            });
        }
    }
    None
}

/// True when `line` looks like any section heading at all (used to reject
/// positional header lines that are really headings).
pub fn is_heading_line(line: &str) -> bool {
    markdown_heading(line).is_some() || is_known_heading(line)
}

/// The section kind a heading-like line names (`## Skills`, `**EDUCATION**`,
/// `Projects:`), if any.
pub fn heading_kind(line: &str) -> Option<SectionKind> {
    let normalized = normalize_heading(line);
    SectionKind::ALL
        .into_iter()
        .find(|kind| kind.titles().contains(&normalized.as_str()))
}

/// Lines paired with their starting byte offset; line terminators excluded.
fn indexed_lines(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .map(|raw| {
            let start = offset;
            offset += raw.len();
            (start, raw.trim_end_matches(['\n', '\r']))
        })
        .collect()
}

/// `(level, text)` for `#`-style headings.
fn markdown_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

/// Lowercased heading text with markers, decorations and a trailing colon removed.
fn normalize_heading(text: &str) -> String {
    let text = strip_emphasis(text.trim().trim_start_matches('#'));
    let text = strip_decorations(&text);
    let text = text.trim_end_matches(':').trim_end_matches("**").trim_end_matches(':');
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Byte offset just past `Title:` (and any emphasis around it), if `line`
/// opens with that label.
fn label_content_offset(line: &str, title: &str) -> Option<usize> {
    let mut consumed = line.len() - line.trim_start().len();
    let mut rest = &line[consumed..];

    let skip_marker = |rest: &mut &str, consumed: &mut usize| {
        for marker in ["**", "__"] {
            if let Some(r) = rest.strip_prefix(marker) {
                *rest = r;
                *consumed += marker.len();
                break;
            }
        }
    };

    skip_marker(&mut rest, &mut consumed);
    if !rest.is_char_boundary(title.len().min(rest.len()))
        || rest.len() < title.len()
        || !rest[..title.len()].eq_ignore_ascii_case(title)
    {
        return None;
    }
    consumed += title.len();
    rest = &rest[title.len()..];
    skip_marker(&mut rest, &mut consumed);

    let after_ws = rest.trim_start();
    consumed += rest.len() - after_ws.len();
    let after_colon = after_ws.strip_prefix(':')?;
    consumed += 1;
    rest = after_colon;
    skip_marker(&mut rest, &mut consumed);
    Some(consumed)
}

fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3
        && (trimmed.chars().all(|c| c == '-')
            || trimmed.chars().all(|c| c == '*')
            || trimmed.chars().all(|c| c == '_'))
}

/// A heading of any known kind written without `#`: bold, bare, or an empty `Title:` label.
fn is_known_heading(line: &str) -> bool {
    SectionKind::ALL.iter().any(|kind| {
        kind.titles().iter().any(|&title| {
            HeadingRule::Emphasized { title }.match_line(line).is_some()
                || HeadingRule::Bare { title }.match_line(line).is_some()
                || label_content_offset(line, title)
                    .is_some_and(|offset| line[offset..].trim().is_empty())
        })
    })
}

/// True when the nearest `#` heading above is a known section, so bold or
/// bare titles below it are sub-labels of that section.
fn inside_markdown_section(preceding: &[(usize, &str)]) -> bool {
    preceding
        .iter()
        .rev()
        .find_map(|&(_, line)| markdown_heading(line))
        .is_some_and(|(_, text)| heading_kind(text).is_some())
}

/// Section bodies stop at the next heading. A section opened by a `#`
/// heading ends only at a `#` heading no deeper than its own or at a
/// horizontal rule; other sections also end at any known non-`#` heading.
fn is_boundary(line: &str, opened_at: Option<usize>) -> bool {
    if let Some((level, _)) = markdown_heading(line) {
        return opened_at.map_or(true, |open| level <= open);
    }
    is_horizontal_rule(line) || (opened_at.is_none() && is_known_heading(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
**Jane Doe**
Engineer

## Professional Summary
Builds **reliable** systems.

## Experience
**Senior Engineer**
**Acme** | Jan 2020 – Present
- Did things

### Key Projects inside experience
- nested

## Education
**BSc CS** – MIT

Skills: Rust, Go, SQL
";

    #[test]
    fn test_level2_heading_span_stops_at_next_heading() {
        let s = segment(DOC, SectionKind::Summary).unwrap();
        assert_eq!(s.heading, "## Professional Summary");
        assert_eq!(s.body.trim(), "Builds **reliable** systems.");
    }

    #[test]
    fn test_deeper_headings_stay_inside_section() {
        let s = segment(DOC, SectionKind::Experience).unwrap();
        assert!(s.body.contains("Senior Engineer"));
        assert!(s.body.contains("nested"));
        assert!(!s.body.contains("BSc"));
    }

    #[test]
    fn test_label_with_inline_content() {
        let s = segment(DOC, SectionKind::Skills).unwrap();
        assert_eq!(s.body.trim(), "Rust, Go, SQL");
    }

    #[test]
    fn test_label_ends_previous_section_only_when_empty() {
        let s = segment(DOC, SectionKind::Education).unwrap();
        assert!(s.body.contains("BSc CS"));
        // "Skills: Rust…" carries inline content, so it is not a boundary.
        assert!(s.body.contains("Skills: Rust"));
    }

    #[test]
    fn test_bold_sub_labels_do_not_end_markdown_section() {
        let doc = "\
### Experience
**Eng**
**Acme** | 2020 – 2021
- x
**Key Achievements:**
- cut cost
**Languages:**
- Rust
**Dev**
**Beta** | 2018 – 2019
- y

### Education
**BSc** – MIT
";
        let s = segment(doc, SectionKind::Experience).unwrap();
        assert!(s.body.contains("cut cost"));
        assert!(s.body.contains("**Beta** | 2018 – 2019"));
        assert!(!s.body.contains("MIT"));
        assert!(segment(doc, SectionKind::Achievements).is_none());
        assert!(segment(doc, SectionKind::Languages).is_none());
    }

    #[test]
    fn test_bold_headings_still_split_unmarked_documents() {
        let doc = "**Experience**\n**Eng**\n- x\n**Education**\n**BSc** – MIT\n";
        let s = segment(doc, SectionKind::Experience).unwrap();
        assert!(s.body.contains("- x"));
        assert!(!s.body.contains("MIT"));
        assert!(segment(doc, SectionKind::Education).unwrap().body.contains("MIT"));
    }

    #[test]
    fn test_absent_section_is_none() {
        assert!(segment(DOC, SectionKind::Interests).is_none());
        assert!(segment("", SectionKind::Summary).is_none());
    }

    #[test]
    fn test_case_insensitive_and_level3_priority() {
        let doc = "## skills\n- A\n\n### SKILLS\n- B\n";
        let s = segment(doc, SectionKind::Skills).unwrap();
        assert_eq!(s.body.trim(), "- B");
    }

    #[test]
    fn test_title_order_breaks_ties() {
        let doc = "### Skills\n- generic\n\n### Core Technical Skills\n- specific\n";
        let s = segment(doc, SectionKind::Skills).unwrap();
        assert_eq!(s.body.trim(), "- specific");
    }

    #[test]
    fn test_synonym_heading() {
        let doc = "### Key Competencies\n| Technical | Soft |\n|---|---|\n| Rust | Mentoring |\n";
        let s = segment(doc, SectionKind::Skills).unwrap();
        assert!(s.body.contains("Mentoring"));
    }

    #[test]
    fn test_bold_and_bare_headings() {
        let doc = "**EDUCATION**\nMIT\nLANGUAGES\nEnglish\n";
        assert_eq!(segment(doc, SectionKind::Education).unwrap().body.trim(), "MIT");
        assert_eq!(segment(doc, SectionKind::Languages).unwrap().body.trim(), "English");
    }

    #[test]
    fn test_horizontal_rule_is_boundary() {
        let doc = "### Interests\nChess\n---\nFooter\n";
        assert_eq!(segment(doc, SectionKind::Interests).unwrap().body.trim(), "Chess");
    }

    #[test]
    fn test_decorated_heading() {
        let doc = "## 💼 Work Experience:\n- x\n";
        assert!(segment(doc, SectionKind::Experience).is_some());
    }

    #[test]
    fn test_is_heading_line() {
        assert!(is_heading_line("## Anything"));
        assert!(is_heading_line("**Education**"));
        assert!(!is_heading_line("Senior Engineer"));
        assert!(!is_heading_line("Skills: Rust"));
    }

    #[test]
    fn test_heading_kind() {
        assert_eq!(heading_kind("## Key Achievements"), Some(SectionKind::Achievements));
        assert_eq!(heading_kind("**Hobbies:**"), Some(SectionKind::Interests));
        assert_eq!(heading_kind("Jane Doe"), None);
    }
}
