//! Education extractor: table rows or grouped list lines.

use crate::extraction::assembler::ExtractionIssue;
use crate::extraction::dates::{find_range, find_year, has_partial_range, strip_dates};
use crate::extraction::markdown::{
    bullet_text, clean, clean_value, content_lines, is_emphasized, split_lead, strip_emphasis,
    trim_separators,
};
use crate::extraction::sections::SectionKind;
use crate::extraction::table::{has_table, parse_tables, Table};
use crate::models::resume::{date_span, DegreeEntry, EducationEntry, SimpleEducation};

pub fn parse_education(section: &str) -> (Vec<EducationEntry>, Vec<ExtractionIssue>) {
    let mut issues = Vec::new();
    let entries: Vec<EducationEntry> = if has_table(section) {
        parse_tables(section).iter().flat_map(table_entries).collect()
    } else {
        group_lines(&content_lines(section))
            .iter()
            .map(|group| group_entry(group, &mut issues))
            .collect()
    };
    (entries, issues)
}

fn table_entries(table: &Table) -> Vec<EducationEntry> {
    let degree_col = table
        .column(&["degree", "qualification", "program", "course"])
        .unwrap_or(0);
    let date_col = table.column(&["date", "year", "period"]);
    let institution_col = table
        .column(&["institution", "school", "university", "college"])
        .or_else(|| (table.header.len() > 1).then_some(1))
        .filter(|&col| col != degree_col && Some(col) != date_col);

    table
        .rows
        .iter()
        .filter_map(|row| {
            let degree = table.cell(row, degree_col).to_string();
            if degree.is_empty() {
                return None;
            }
            let institution = institution_col
                .map(|col| table.cell(row, col).to_string())
                .unwrap_or_default();
            let dates = date_col.map(|col| table.cell(row, col)).unwrap_or("");
            let (start_date, end_date) = split_dates(dates);
            Some(build_entry(degree, institution, start_date, end_date))
        })
        .collect()
}

/// A line holding nothing but a date range or year, emphasized or not.
fn is_date_only(line: &str) -> bool {
    strip_dates(&strip_emphasis(line)).is_empty()
}

/// Groups list lines into entries. A group opens at a bullet, an emphasized
/// line or a heading; an emphasized opener absorbs up to two follow-up lines
/// (institution, dates), any opener absorbs a bare date line. A date-only
/// line never opens a group, even when it is emphasized.
fn group_lines<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut groups: Vec<Vec<&'a str>> = Vec::new();
    for &line in lines {
        let date_only = bullet_text(line).is_none() && is_date_only(line);
        let opens = !date_only
            && (bullet_text(line).is_some() || is_emphasized(line) || line.starts_with('#'));
        let attach = !opens
            && groups.last().is_some_and(|group| {
                let rich_opener = is_emphasized(group[0]) || group[0].starts_with('#')
                    || bullet_text(group[0]).is_some_and(is_emphasized);
                group.len() < 3 && (rich_opener || date_only)
            });
        match groups.last_mut() {
            Some(group) if attach => group.push(line),
            _ => groups.push(vec![line]),
        }
    }
    groups
}

fn group_entry(group: &[&str], issues: &mut Vec<ExtractionIssue>) -> EducationEntry {
    let header = bullet_text(group[0]).unwrap_or(group[0]).trim_start_matches('#').trim();
    let header_plain = strip_dates(header);
    let (degree, rest) = split_lead(&header_plain);

    let institution = clean_value(trim_separators(rest.split('|').next().unwrap_or("")))
        .or_else(|| {
            group[1..]
                .iter()
                .map(|line| strip_dates(line))
                .find_map(|line| clean_value(trim_separators(&line)))
        })
        .unwrap_or_default();

    let (start_date, end_date) = match group.iter().find_map(|line| find_range(line)) {
        Some(range) => (range.start, range.end),
        None => {
            if let Some(fragment) = group.iter().find(|line| has_partial_range(line)) {
                issues.push(ExtractionIssue::AmbiguousDateRange {
                    section: SectionKind::Education,
                    entry: degree.clone(),
                    fragment: fragment.to_string(),
                });
            }
            let year = group.iter().find_map(|line| find_year(line)).unwrap_or_default();
            (String::new(), year)
        }
    };

    let degree = if degree.is_empty() { clean(&header_plain) } else { degree };
    build_entry(degree, institution, start_date, end_date)
}

/// Detailed when an institution was separable, otherwise the simple shape.
fn build_entry(degree: String, institution: String, start_date: String, end_date: String) -> EducationEntry {
    if institution.is_empty() {
        EducationEntry::Simple(SimpleEducation {
            name: degree,
            dates: date_span(&start_date, &end_date),
        })
    } else {
        EducationEntry::Detailed(DegreeEntry {
            degree,
            institution,
            start_date,
            end_date,
        })
    }
}

/// A dates cell as `(start, end)`; a lone year becomes the end date.
fn split_dates(cell: &str) -> (String, String) {
    match find_range(cell) {
        Some(range) => (range.start, range.end),
        None => (String::new(), find_year(cell).unwrap_or_else(|| clean(cell))),
    }
}
