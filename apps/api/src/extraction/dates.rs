//! Date-range recognition for entry headers (`Jan 2020 – Present`, `2016 - 2020`).
//!
//! Dates are kept as the source wrote them; no calendar normalisation.

use std::sync::LazyLock;

use regex::Regex;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?|spring|summer|autumn|fall|winter|q[1-4])\.?";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b((?:{MONTH}\s+)?(?:\d{{1,2}}/)?\d{{4}})\s*(?:–|—|-|to|until)\s*((?:{MONTH}\s+)?(?:\d{{1,2}}/)?\d{{4}}|present|current|now|today|ongoing)\b"
    ))
    .expect("valid regex")
});

static OPEN_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTH}\s+)?\d{{4}}\s*(?:–|—|-)(?:\s*$|\s*[|*_)\]]|\s+[a-z]+\b)"
    ))
    .expect("valid regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));

/// A start/end pair found in a line, plus the byte span it occupied.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub span: (usize, usize),
}

/// Finds the first complete date range in `line`.
pub fn find_range(line: &str) -> Option<DateRange> {
    let caps = RANGE_RE.captures(line)?;
    let whole = caps.get(0)?;
    let end = caps[2].trim();
    let end = if end.eq_ignore_ascii_case("present")
        || end.eq_ignore_ascii_case("current")
        || end.eq_ignore_ascii_case("now")
        || end.eq_ignore_ascii_case("today")
        || end.eq_ignore_ascii_case("ongoing")
    {
        "Present".to_string()
    } else {
        end.to_string()
    };
    Some(DateRange {
        start: caps[1].trim().to_string(),
        end,
        span: (whole.start(), whole.end()),
    })
}

/// True when `line` starts a date range but never finishes it
/// (`Jan 2020 –`, `2019 - sometime`).
pub fn has_partial_range(line: &str) -> bool {
    find_range(line).is_none() && OPEN_RANGE_RE.is_match(line)
}

/// Removes the date range from `line`, together with emphasis or parentheses
/// wrapped directly around it and separators left dangling.
pub fn remove_range(line: &str, range: &DateRange) -> String {
    remove_span(line, range.span)
}

/// A lone year (`2019`) when the line has no full range.
pub fn find_year(line: &str) -> Option<String> {
    YEAR_RE.find(line).map(|m| m.as_str().to_string())
}

/// `line` with its date range, or failing that its lone year, cut out.
pub fn strip_dates(line: &str) -> String {
    if let Some(range) = find_range(line) {
        return remove_range(line, &range);
    }
    match YEAR_RE.find(line) {
        Some(m) => remove_span(line, (m.start(), m.end())),
        None => line.trim().to_string(),
    }
}

fn remove_span(line: &str, (mut start, mut end): (usize, usize)) -> String {
    let bytes = line.as_bytes();
    while start > 0 && end < bytes.len() {
        let (before, after) = (bytes[start - 1], bytes[end]);
        let wraps = (before == after && matches!(before, b'*' | b'_')) || (before == b'(' && after == b')');
        if !wraps {
            break;
        }
        start -= 1;
        end += 1;
    }
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..start]);
    out.push_str(&line[end..]);
    out.trim_matches(|c: char| matches!(c, '|' | ',' | '–' | '—' | '-') || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_year_to_present() {
        let r = find_range("**Acme Corp** | *Jan 2020 – Present*").unwrap();
        assert_eq!(r.start, "Jan 2020");
        assert_eq!(r.end, "Present");
    }

    #[test]
    fn test_full_month_names_and_hyphen() {
        let r = find_range("March 2018 - December 2019").unwrap();
        assert_eq!(r.start, "March 2018");
        assert_eq!(r.end, "December 2019");
    }

    #[test]
    fn test_years_only() {
        let r = find_range("University of Oslo, 2016 – 2020").unwrap();
        assert_eq!(r.start, "2016");
        assert_eq!(r.end, "2020");
    }

    #[test]
    fn test_present_is_normalised() {
        assert_eq!(find_range("2021 - current").unwrap().end, "Present");
    }

    #[test]
    fn test_no_range_in_plain_text() {
        assert!(find_range("Reduced latency by 40% in 2021").is_none());
    }

    #[test]
    fn test_partial_range_detected() {
        assert!(has_partial_range("Acme | Jan 2020 –"));
        assert!(has_partial_range("Acme | 2019 - sometime"));
        assert!(!has_partial_range("Acme | Jan 2020 – Mar 2021"));
        assert!(!has_partial_range("Acme Corp"));
    }

    #[test]
    fn test_remove_range_drops_empty_parentheses() {
        let line = "Acme (Remote) (2019 – 2021)";
        let r = find_range(line).unwrap();
        assert_eq!(remove_range(line, &r), "Acme (Remote)");
    }

    #[test]
    fn test_remove_range_unwraps_emphasis() {
        let line = "**Acme** | *Jan 2020 – Present*";
        let r = find_range(line).unwrap();
        assert_eq!(remove_range(line, &r), "**Acme**");
    }

    #[test]
    fn test_strip_lone_year() {
        assert_eq!(find_year("Bootcamp (2019)").as_deref(), Some("2019"));
        assert_eq!(strip_dates("Bootcamp (2019)"), "Bootcamp");
        assert_eq!(strip_dates("MIT, 2014 - 2018"), "MIT");
        assert_eq!(strip_dates("No dates here"), "No dates here");
    }

    #[test]
    fn test_remove_range_trims_separators() {
        let line = "Acme Corp | Jan 2020 – Present";
        let r = find_range(line).unwrap();
        assert_eq!(remove_range(line, &r), "Acme Corp");
    }
}
