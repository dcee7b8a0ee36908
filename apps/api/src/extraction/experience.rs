//! Experience Parser: splits the Experience section into dated entries.

use std::iter;

use crate::extraction::assembler::ExtractionIssue;
use crate::extraction::dates::{find_range, has_partial_range, remove_range};
use crate::extraction::markdown::{
    bullet_text, clean, clean_value, content_lines, first_bold, is_emphasized, split_lead, strip_emphasis,
    trim_separators,
};
use crate::extraction::sections::SectionKind;
use crate::models::resume::ExperienceEntry;

/// Ways of deciding where entries begin, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntrySplit {
    /// An emphasized line followed within two lines by an emphasized line
    /// that carries a date range (or is followed by one). Once any such
    /// header exists, undated headers that follow a bullet also open entries.
    Lookahead,
    /// Every emphasized line that opens the section or follows a bullet.
    AfterBullets,
    /// One entry starting at the first non-bullet line.
    FirstHeader,
}

impl EntrySplit {
    const ALL: [EntrySplit; 3] = [EntrySplit::Lookahead, EntrySplit::AfterBullets, EntrySplit::FirstHeader];

    fn starts(self, lines: &[&str]) -> Vec<usize> {
        match self {
            EntrySplit::Lookahead => {
                let mut starts = Vec::new();
                let mut i = 0;
                while i < lines.len() {
                    match header_end(lines, i) {
                        Some(j) => {
                            starts.push(i);
                            i = j + 1;
                        }
                        None => i += 1,
                    }
                }
                if !starts.is_empty() {
                    starts.extend((1..lines.len()).filter(|&i| opens_after_bullets(lines, i)));
                    starts.sort_unstable();
                    starts.dedup();
                }
                starts
            }
            EntrySplit::AfterBullets => (0..lines.len())
                .filter(|&i| {
                    (i == 0 && is_header_line(lines[0])) || opens_after_bullets(lines, i)
                })
                .collect(),
            EntrySplit::FirstHeader => lines
                .iter()
                .position(|l| bullet_text(l).is_none())
                .into_iter()
                .collect(),
        }
    }
}

/// Parses the body of an Experience section. Entries keep source order.
pub fn parse_experience(section: &str) -> (Vec<ExperienceEntry>, Vec<ExtractionIssue>) {
    let lines = content_lines(section);
    let mut issues = Vec::new();
    if lines.is_empty() {
        return (Vec::new(), issues);
    }

    let Some(starts) = EntrySplit::ALL
        .iter()
        .map(|rule| rule.starts(&lines))
        .find(|starts| !starts.is_empty())
    else {
        issues.push(ExtractionIssue::MalformedSection {
            section: SectionKind::Experience,
            detail: "no entry header line found".to_string(),
        });
        return (Vec::new(), issues);
    };

    let entries = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            parse_entry(&lines[start..end], &mut issues)
        })
        .collect();
    (entries, issues)
}

fn is_header_line(line: &str) -> bool {
    bullet_text(line).is_none() && (is_emphasized(line) || line.starts_with('#'))
}

/// A header directly after a bullet line. Sub-labels such as
/// `**Key Achievements:**` stay inside the current entry.
fn opens_after_bullets(lines: &[&str], i: usize) -> bool {
    i > 0
        && bullet_text(lines[i - 1]).is_some()
        && is_header_line(lines[i])
        && !clean(lines[i]).ends_with(':')
        && impact_label(lines[i]).is_none()
}

/// Index of the dated line that closes the header opened at `i`, if `i` opens one.
fn header_end(lines: &[&str], i: usize) -> Option<usize> {
    if !is_header_line(lines[i]) || find_range(lines[i]).is_some() {
        return None;
    }
    for j in (i + 1)..=(i + 2) {
        let line = lines.get(j)?;
        if j == i + 2 && bullet_text(lines[i + 1]).is_some() {
            return None;
        }
        let dated = find_range(line).is_some()
            || lines.get(j + 1).is_some_and(|next| find_range(next).is_some());
        if is_header_line(line) && dated {
            return Some(j);
        }
    }
    None
}

fn parse_entry(lines: &[&str], issues: &mut Vec<ExtractionIssue>) -> ExperienceEntry {
    let head = lines[0].trim_start_matches('#').trim();
    let head = match find_range(head) {
        Some(range) => remove_range(head, &range),
        None => head.to_string(),
    };
    let (title, header_rest) = split_lead(&head);

    let company = lines
        .get(1)
        .filter(|l| bullet_text(l).is_none() && impact_label(l).is_none())
        .and_then(|l| company_from(l))
        .or_else(|| company_from(header_rest))
        .unwrap_or_default();

    let candidates: Vec<&str> = lines[1..]
        .iter()
        .take(4)
        .chain(iter::once(&lines[0]))
        .filter(|l| bullet_text(l).is_none())
        .copied()
        .collect();
    let (start_date, end_date) = match candidates.iter().find_map(|l| find_range(l)) {
        Some(range) => (range.start, range.end),
        None => {
            if let Some(fragment) = candidates.iter().find(|l| has_partial_range(l)) {
                issues.push(ExtractionIssue::AmbiguousDateRange {
                    section: SectionKind::Experience,
                    entry: title.clone(),
                    fragment: fragment.to_string(),
                });
            }
            (String::new(), String::new())
        }
    };

    let mut bullets = Vec::new();
    let mut impact = Vec::new();
    let mut in_impact = false;
    for &line in &lines[1..] {
        let item = bullet_text(line);
        if let Some(inline) = impact_label(item.unwrap_or(line)) {
            in_impact = true;
            impact.extend(clean_value(&inline));
            continue;
        }
        let Some(text) = item.and_then(clean_value) else {
            continue;
        };
        if in_impact {
            impact.push(text);
        } else {
            bullets.push(text);
        }
    }

    ExperienceEntry {
        title,
        company,
        start_date,
        end_date,
        bullets,
        impact,
    }
}

/// The company: the first bold run, else the text before `|`, dates removed.
fn company_from(line: &str) -> Option<String> {
    let source = first_bold(line).unwrap_or_else(|| line.to_string());
    let without_dates = match find_range(&source) {
        Some(range) => remove_range(&source, &range),
        None => source,
    };
    let first = without_dates.split('|').next().unwrap_or("");
    clean_value(trim_separators(first))
}

/// `Some(rest)` when the line is a "Key Impact:" label; `rest` is any text after the colon.
fn impact_label(line: &str) -> Option<String> {
    let text = strip_emphasis(line);
    let lower = text.to_ascii_lowercase();
    let label_len = ["key impact", "impact:"]
        .iter()
        .find(|label| lower.starts_with(*label))
        .map(|label| label.len())?;
    let rest = text[label_len..].trim_start_matches(char::is_alphabetic).trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some(rest.trim().to_string())
}
