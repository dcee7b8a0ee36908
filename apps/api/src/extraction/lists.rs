//! Plain list sections: languages, interests, achievements.

use crate::extraction::markdown::{bullet_text, clean_value, content_lines, split_top_level};
use crate::extraction::table::{has_table, parse_tables};

/// How a list line breaks into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// Short terms; comma, semicolon and bullet-dot separated lists are split.
    Terms,
    /// One item per line (achievements carry commas of their own).
    Sentences,
}

pub fn parse_list(section: &str, style: ListStyle) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut push = |item: String| {
        if !items.iter().any(|existing| existing.eq_ignore_ascii_case(&item)) {
            items.push(item);
        }
    };

    if has_table(section) {
        for table in parse_tables(section) {
            for row in &table.rows {
                let mut cells = row.iter().filter(|cell| !cell.is_empty());
                let Some(first) = cells.next() else { continue };
                match cells.next() {
                    Some(second) => push(format!("{first} ({second})")),
                    None => push(first.clone()),
                }
            }
        }
        return items;
    }

    for line in content_lines(section) {
        if line.starts_with('#') || line.starts_with("--") || line.starts_with('(') || line.contains('|') {
            continue;
        }
        let body = bullet_text(line).unwrap_or(line);
        match style {
            ListStyle::Terms => split_top_level(body, &[',', ';', '•', '·'])
                .iter()
                .filter_map(|term| clean_value(tidy_term(term)))
                .for_each(&mut push),
            ListStyle::Sentences => {
                if let Some(item) = clean_value(body) {
                    push(item);
                }
            }
        }
    }
    items
}

/// Drops prose glue left over from splitting a sentence into terms:
/// a leading `and`/`or` and a trailing full stop.
fn tidy_term(term: &str) -> &str {
    let term = term.trim().trim_end_matches('.').trim_end();
    ["and ", "or ", "And ", "Or "]
        .iter()
        .find_map(|prefix| term.strip_prefix(prefix))
        .map_or(term, str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_from_bullets_and_inline_lists() {
        let section = "- English (native)\n- German, French; *Polish*\n";
        assert_eq!(
            parse_list(section, ListStyle::Terms),
            ["English (native)", "German", "French", "Polish"]
        );
    }

    #[test]
    fn test_terms_skip_artifacts() {
        let section = "### Spoken\n--\n(optional)\nChess • Climbing • chess\n";
        assert_eq!(parse_list(section, ListStyle::Terms), ["Chess", "Climbing"]);
    }

    #[test]
    fn test_terms_drop_conjunctions_and_full_stops() {
        let section = "Travel, fitness, and family time.\nReading or chess.\n";
        assert_eq!(
            parse_list(section, ListStyle::Terms),
            ["Travel", "fitness", "family time", "Reading or chess"]
        );
    }

    #[test]
    fn test_sentences_keep_commas() {
        let section = "- Won **Hack Oslo**, beating 200 teams\n- Speaker at RustConf\n";
        assert_eq!(
            parse_list(section, ListStyle::Sentences),
            ["Won Hack Oslo, beating 200 teams", "Speaker at RustConf"]
        );
    }

    #[test]
    fn test_table_rows() {
        let section = "| Language | Level |\n|---|---|\n| English | C2 |\n| Norwegian | |\n";
        assert_eq!(parse_list(section, ListStyle::Terms), ["English (C2)", "Norwegian"]);
    }

    #[test]
    fn test_empty_section() {
        assert!(parse_list("", ListStyle::Terms).is_empty());
    }
}
