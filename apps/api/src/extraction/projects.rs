//! Projects extractor. Table rows and `- **Name** – description (Tools)`
//! bullets both produce the same `{name, stack, desc}` entries.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::dates::find_year;
use crate::extraction::markdown::{
    bullet_text, clean, clean_value, indent_width, split_lead, split_top_level, trim_separators,
};
use crate::extraction::table::{has_table, parse_tables, Table};
use crate::models::resume::ProjectEntry;

static POWERED_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)powered by ([^.,;()]+)").expect("valid regex"));
static STACK_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:\*\*|__)?(?:tech stack|stack|tools|tech|technologies|built with)(?:\*\*|__)?\s*:\s*(?:\*\*|__)?\s*(.+)$",
    )
    .expect("valid regex")
});

pub fn parse_projects(section: &str) -> Vec<ProjectEntry> {
    if has_table(section) {
        parse_tables(section).iter().flat_map(table_projects).collect()
    } else {
        list_projects(section)
    }
}

fn table_projects(table: &Table) -> Vec<ProjectEntry> {
    let name_col = table.column(&["name", "project", "title"]).unwrap_or(0);
    let stack_col = table
        .column(&["tool", "stack", "tech"])
        .or_else(|| (table.header.len() > 1).then_some(1))
        .filter(|&col| col != name_col);
    let desc_col = table
        .column(&["impact", "desc", "outcome", "result", "summary"])
        .or_else(|| (table.header.len() > 2).then_some(2))
        .filter(|&col| col != name_col && Some(col) != stack_col);

    table
        .rows
        .iter()
        .filter_map(|row| {
            let name = table.cell(row, name_col);
            if name.is_empty() {
                return None;
            }
            Some(ProjectEntry {
                name: name.to_string(),
                stack: stack_col
                    .map(|col| table.cell(row, col).to_string())
                    .unwrap_or_default(),
                desc: desc_col
                    .and_then(|col| clean_value(table.cell(row, col)))
                    .into_iter()
                    .collect(),
            })
        })
        .collect()
}

fn starts_project(line: &str) -> bool {
    line.starts_with("**") || line.starts_with('#')
}

fn list_projects(section: &str) -> Vec<ProjectEntry> {
    let mut projects: Vec<ProjectEntry> = Vec::new();
    // Indent of the current header when it was itself a bullet.
    let mut header_indent: Option<usize> = None;

    for raw in section.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let indent = indent_width(raw);
        let bullet = bullet_text(line);
        let body = bullet.unwrap_or(line);

        if let Some(current) = projects.last_mut() {
            if let Some(caps) = STACK_LABEL_RE.captures(body) {
                current.stack = join_stack(&caps[1]);
                continue;
            }
            let nested = match (bullet, header_indent) {
                (Some(_), Some(header)) => indent > header,
                (Some(_), None) => !starts_project(body),
                (None, _) => !starts_project(line),
            };
            if nested {
                add_detail(current, body);
                continue;
            }
        } else if bullet.is_none() && !starts_project(line) {
            continue;
        }

        projects.push(header_project(body));
        header_indent = bullet.map(|_| indent);
    }
    projects
}

/// `**Name** – description (Tools)` or `Name – description`.
fn header_project(body: &str) -> ProjectEntry {
    let (name, rest) = split_lead(body.trim_start_matches('#'));
    let mut project = ProjectEntry {
        name,
        ..ProjectEntry::default()
    };
    let mut description = trim_separators(rest).to_string();

    if let Some(inner) = trailing_parenthetical(&description) {
        if find_year(inner).map_or(true, |year| year.len() != inner.trim().len()) {
            project.stack = join_stack(inner);
            let cut = description.len() - inner.len() - 2;
            description = description[..cut].trim_end().to_string();
        }
    }
    add_detail(&mut project, &description);
    project
}

/// A description line: picks up `Powered by X & Y` as the stack, then keeps the text.
fn add_detail(project: &mut ProjectEntry, text: &str) {
    if project.stack.is_empty() {
        if let Some(caps) = POWERED_BY_RE.captures(text) {
            project.stack = join_stack(&caps[1].replace('&', ","));
        }
    }
    project.desc.extend(clean_value(text));
}

/// The contents of a `(...)` group that ends the text, if any.
fn trailing_parenthetical(text: &str) -> Option<&str> {
    let inner = text.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    Some(&inner[open + 1..])
}

fn join_stack(text: &str) -> String {
    split_top_level(text, &[',', ';', '/'])
        .iter()
        .map(|item| clean(item))
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
