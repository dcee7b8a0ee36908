//! Skills extractor: category tables, proficiency tables, `**Category:**`
//! bullets and plain comma lists, feeding both `coreSkills` and the flat `tags`.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::markdown::{bullet_text, clean, clean_value, content_lines, split_top_level};
use crate::extraction::sections::is_heading_line;
use crate::extraction::table::{has_table, parse_tables, Table};
use crate::models::resume::CoreSkills;

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*|__)?([^*_:][^*:]{0,48}?)(?:\*\*|__)?\s*:\s*(?:\*\*|__)?\s*(.+)$")
        .expect("valid regex")
});

/// `**Languages** – English, Polish`: a bold lead names the category.
static LEAD_CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*|__)([^*_]{1,48}?)(?:\*\*|__)\s*(?:–|—| - )\s*(.+)$").expect("valid regex")
});

/// Header labels that describe a proficiency table rather than name a category.
const NON_CATEGORY_HEADERS: &[&str] = &["skills", "skill", "level", "proficiency", "rating", "years"];
const ITEM_SEPARATORS: &[char] = &[',', ';'];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet {
    pub tags: Vec<String>,
    pub core_skills: CoreSkills,
}

impl SkillSet {
    fn add_tags<I: IntoIterator<Item = String>>(&mut self, items: I) {
        for item in items {
            if !self.tags.iter().any(|t| t.eq_ignore_ascii_case(&item)) {
                self.tags.push(item);
            }
        }
    }

    fn add_category(&mut self, category: &str, items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        self.add_tags(items.iter().cloned());
        self.core_skills.extend_category(category, items);
    }
}

pub fn parse_skills(section: &str) -> SkillSet {
    let mut set = SkillSet::default();
    if has_table(section) {
        for table in parse_tables(section) {
            read_table(&table, &mut set);
        }
        read_list(&non_table_text(section), &mut set);
    } else {
        read_list(section, &mut set);
    }
    set.core_skills.prune_empty();
    set
}

/// Splits a cell or list line into individual skill items.
fn split_items(text: &str) -> Vec<String> {
    split_top_level(text, ITEM_SEPARATORS)
        .iter()
        .filter_map(|item| clean_value(item.trim_end_matches('.')))
        .filter(|item| !NON_CATEGORY_HEADERS.contains(&item.to_lowercase().as_str()))
        .collect()
}

fn is_proficiency_table(table: &Table) -> bool {
    table.header.iter().skip(1).any(|h| {
        let h = h.to_lowercase();
        ["level", "proficiency", "rating", "years"].iter().any(|label| h.contains(label))
    })
}

fn read_table(table: &Table, set: &mut SkillSet) {
    if is_proficiency_table(table) {
        let col = table.column(&["skill", "technology", "tool"]).unwrap_or(0);
        for row in &table.rows {
            set.add_tags(split_items(table.cell(row, col)));
        }
        return;
    }

    let first = table.header.first().map(|h| h.to_lowercase()).unwrap_or_default();
    if table.header.len() >= 2 && ["category", "area", "domain"].iter().any(|l| first.contains(l)) {
        for row in &table.rows {
            let category = table.cell(row, 0);
            if category.is_empty() {
                continue;
            }
            let items = row[1..].iter().flat_map(|cell| split_items(cell)).collect();
            set.add_category(category, items);
        }
        return;
    }

    for (col, header) in table.header.iter().enumerate() {
        if header.is_empty() || NON_CATEGORY_HEADERS.contains(&header.to_lowercase().as_str()) {
            continue;
        }
        let items = table
            .rows
            .iter()
            .flat_map(|row| split_items(table.cell(row, col)))
            .collect();
        set.add_category(header, items);
    }
}

fn non_table_text(section: &str) -> String {
    section
        .lines()
        .filter(|line| !line.contains('|'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// List shape. A sub-heading (`### Backend`, `**Backend**`) opens a category
/// that later plain items fall into; `Category: a, b` lines name their own.
fn read_list(text: &str, set: &mut SkillSet) {
    let mut current: Option<String> = None;
    for line in content_lines(text) {
        let body = bullet_text(line).unwrap_or(line);

        if let Some(caps) = LEAD_CATEGORY_RE.captures(body) {
            let category = clean(&caps[1]);
            if !category.is_empty() {
                set.add_category(&category, split_items(&caps[2]));
                continue;
            }
        }

        if bullet_text(line).is_none() && is_subheading(body) {
            current = clean_value(body.trim_start_matches('#').trim_end_matches(':'));
            continue;
        }

        if let Some(caps) = CATEGORY_RE.captures(body) {
            let category = clean(&caps[1]);
            if !category.is_empty() && !body.contains("://") {
                set.add_category(&category, split_items(&caps[2]));
                continue;
            }
        }

        let items = split_items(body);
        match &current {
            Some(category) => set.add_category(category, items),
            None => set.add_tags(items),
        }
    }
}

fn is_subheading(line: &str) -> bool {
    if line.starts_with('#') {
        return true;
    }
    let trimmed = line.trim().trim_end_matches(':');
    (trimmed.starts_with("**") && trimmed.ends_with("**") && trimmed.len() > 4)
        || (is_heading_line(line) && !line.contains(','))
}
