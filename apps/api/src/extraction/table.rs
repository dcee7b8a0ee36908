//! Pipe-delimited markdown tables: `| A | B |` rows with a `|---|---|` separator.

use crate::extraction::markdown::clean;

/// One table: cleaned header cells plus data rows (cells cleaned, interior
/// empty cells kept so columns stay aligned).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the first header cell containing any of `names` (case-insensitive).
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.header.iter().position(|h| {
            let h = h.to_lowercase();
            names.iter().any(|n| h.contains(n))
        })
    }

    /// Cell `col` of `row`, or `""` when the row is short.
    pub fn cell<'a>(&self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

/// True when `text` contains at least one separator row, i.e. the section
/// is in table shape rather than list shape.
pub fn has_table(text: &str) -> bool {
    text.lines().any(is_separator_row)
}

/// Parses every table in `text`. Tables are runs of consecutive pipe lines;
/// the first line of a run is its header. Runs without a data row are skipped.
pub fn parse_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.contains('|') {
            run.push(line);
        } else if !run.is_empty() {
            tables.extend(build_table(&run));
            run.clear();
        }
    }
    if !run.is_empty() {
        tables.extend(build_table(&run));
    }
    tables
}

fn build_table(lines: &[&str]) -> Option<Table> {
    let mut rows = lines
        .iter()
        .filter(|l| !is_separator_row(l))
        .map(|l| split_row(l));
    let header = rows.next()?;
    let rows: Vec<Vec<String>> = rows.filter(|r| r.iter().any(|c| !c.is_empty())).collect();
    if rows.is_empty() {
        return None;
    }
    Some(Table { header, rows })
}

fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(clean).collect()
}

fn is_separator_row(line: &str) -> bool {
    let line = line.trim();
    line.contains('|')
        && line.contains("---")
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS: &str = "\
| Name | Tools | Impact |
|------|-------|--------|
| **Atlas** | Rust, Tokio | Cut p99 by 40% |
| Beacon | Go |  |
";

    #[test]
    fn test_parse_single_table() {
        let tables = parse_tables(PROJECTS);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.header, ["Name", "Tools", "Impact"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], ["Atlas", "Rust, Tokio", "Cut p99 by 40%"]);
        assert_eq!(t.rows[1], ["Beacon", "Go", ""]);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let t = &parse_tables(PROJECTS)[0];
        assert_eq!(t.column(&["tool", "stack"]), Some(1));
        assert_eq!(t.column(&["year"]), None);
        assert_eq!(t.cell(&t.rows[1], 7), "");
    }

    #[test]
    fn test_multiple_tables_split_on_prose() {
        let text = "| A | B |\n|---|---|\n| 1 | 2 |\n\nSome prose\n| C |\n|---|\n| 3 |\n";
        let tables = parse_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].header, ["C"]);
    }

    #[test]
    fn test_has_table_requires_separator() {
        assert!(has_table(PROJECTS));
        assert!(!has_table("Phone | Email"));
        assert!(has_table("| a |\n| :---: |"));
    }

    #[test]
    fn test_header_only_table_is_skipped() {
        assert!(parse_tables("| A | B |\n|---|---|\n").is_empty());
    }
}
