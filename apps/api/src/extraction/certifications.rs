//! Certifications extractor: `Credential | Provider | Year` tables or bullet lines.

use crate::extraction::markdown::{bullet_text, clean_value, content_lines};
use crate::extraction::table::{has_table, parse_tables, Table};
use crate::models::resume::Certification;

/// Values that are really header labels or fillers and never belong in the output.
const HEADER_PLACEHOLDERS: &[&str] = &[
    "credential",
    "certification",
    "provider",
    "issuer",
    "year",
    "date",
    "•",
];

fn is_header_placeholder(value: &str) -> bool {
    HEADER_PLACEHOLDERS.contains(&value.to_lowercase().as_str())
}

pub fn parse_certifications(section: &str) -> Vec<Certification> {
    if has_table(section) {
        parse_tables(section).iter().flat_map(table_certifications).collect()
    } else {
        content_lines(section)
            .into_iter()
            .filter(|line| {
                !line.starts_with('|')
                    && !line.starts_with("---")
                    && !line.starts_with('&')
                    && !line.starts_with('#')
            })
            .filter_map(|line| clean_value(bullet_text(line).unwrap_or(line)))
            .map(Certification::Text)
            .collect()
    }
}

/// One display string per row: `credential – provider (year)`. Provider and
/// year are only appended when they hold real values.
fn table_certifications(table: &Table) -> Vec<Certification> {
    let credential_col = table
        .column(&["credential", "certif", "name", "title"])
        .unwrap_or(0);
    let provider_col = table
        .column(&["provider", "issuer", "issued", "organization", "authority"])
        .unwrap_or(1);
    let year_col = table.column(&["year", "date"]).unwrap_or(2);

    table
        .rows
        .iter()
        .filter_map(|row| {
            let credential = table.cell(row, credential_col);
            if credential.is_empty() || is_header_placeholder(credential) {
                return None;
            }
            let mut text = credential.to_string();
            let provider = table.cell(row, provider_col);
            if !provider.is_empty() && !is_header_placeholder(provider) && provider_col != credential_col {
                text.push_str(" – ");
                text.push_str(provider);
            }
            let year = table.cell(row, year_col);
            if !year.is_empty() && !is_header_placeholder(year) && year_col != credential_col {
                text.push_str(&format!(" ({year})"));
            }
            Some(Certification::Text(text))
        })
        .collect()
}
