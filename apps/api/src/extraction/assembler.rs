//! Schema Assembler: runs every extractor over the raw text and merges the
//! fragments, plus caller overrides, into one fully-defaulted record.
//!
//! Extraction never fails: problems are collected as [`ExtractionIssue`]s and
//! the affected section degrades to its empty default.

use chrono::{Datelike, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::certifications::parse_certifications;
use crate::extraction::education::parse_education;
use crate::extraction::experience::parse_experience;
use crate::extraction::lists::{parse_list, ListStyle};
use crate::extraction::markdown::{clean, content_lines};
use crate::extraction::personal::extract_personal;
use crate::extraction::projects::parse_projects;
use crate::extraction::sections::{segment, SectionKind};
use crate::extraction::skills::parse_skills;
use crate::models::resume::{PartialRecord, ResumeRecord};

/// A recoverable problem found while extracting. Never aborts extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionIssue {
    #[error("{section} section was found but could not be parsed: {detail}")]
    MalformedSection { section: SectionKind, detail: String },

    #[error("ambiguous date range in {section} entry '{entry}': {fragment}")]
    AmbiguousDateRange {
        section: SectionKind,
        entry: String,
        fragment: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub record: ResumeRecord,
    pub issues: Vec<ExtractionIssue>,
}

/// Extracts a record from `raw`, letting non-empty `overrides` fields win.
pub fn extract_resume(raw: &str, overrides: &PartialRecord) -> ResumeRecord {
    extract_resume_with_report(raw, overrides).record
}

pub fn extract_resume_with_report(raw: &str, overrides: &PartialRecord) -> ExtractionReport {
    extract_resume_at(raw, overrides, Utc::now().year())
}

/// Same as [`extract_resume_with_report`] with an explicit `currentYear`.
pub fn extract_resume_at(raw: &str, overrides: &PartialRecord, current_year: i32) -> ExtractionReport {
    let mut issues = Vec::new();
    let body = |kind: SectionKind| segment(raw, kind).map(|section| section.body);

    let personal = extract_personal(raw);

    let summary = body(SectionKind::Summary)
        .map(|text| {
            content_lines(text)
                .iter()
                .map(|line| clean(line))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let experience = match body(SectionKind::Experience) {
        Some(text) => {
            let (entries, found) = parse_experience(text);
            issues.extend(found);
            entries
        }
        None => Vec::new(),
    };

    let education = match body(SectionKind::Education) {
        Some(text) => {
            let (entries, found) = parse_education(text);
            issues.extend(found);
            check_parsed(SectionKind::Education, text, entries.is_empty(), &mut issues);
            entries
        }
        None => Vec::new(),
    };

    let skills = body(SectionKind::Skills)
        .map(|text| {
            let set = parse_skills(text);
            check_parsed(SectionKind::Skills, text, set.tags.is_empty(), &mut issues);
            set
        })
        .unwrap_or_default();

    let certifications = body(SectionKind::Certifications)
        .map(|text| {
            let certs = parse_certifications(text);
            check_parsed(SectionKind::Certifications, text, certs.is_empty(), &mut issues);
            certs
        })
        .unwrap_or_default();

    let projects = body(SectionKind::Projects)
        .map(|text| {
            let projects = parse_projects(text);
            check_parsed(SectionKind::Projects, text, projects.is_empty(), &mut issues);
            projects
        })
        .unwrap_or_default();

    let list = |kind: SectionKind, style: ListStyle| {
        body(kind)
            .map(|text| parse_list(text, style))
            .unwrap_or_default()
    };

    let mut record = ResumeRecord {
        name: personal.name,
        title: personal.title,
        email: personal.email,
        phone: personal.phone,
        location: personal.location,
        linkedin: personal.linkedin,
        github: personal.github,
        summary,
        experience,
        education,
        tags: skills.tags,
        core_skills: skills.core_skills,
        certifications,
        projects,
        languages: list(SectionKind::Languages, ListStyle::Terms),
        interests: list(SectionKind::Interests, ListStyle::Terms),
        achievements: list(SectionKind::Achievements, ListStyle::Sentences),
        current_year,
    };
    apply_overrides(&mut record, overrides.clone());

    debug!(
        experience = record.experience.len(),
        education = record.education.len(),
        tags = record.tags.len(),
        categories = record.core_skills.len(),
        certifications = record.certifications.len(),
        projects = record.projects.len(),
        "assembled resume record"
    );
    for issue in &issues {
        warn!(%issue, "extraction issue");
    }

    ExtractionReport { record, issues }
}

/// A located section with content that produced nothing is malformed.
fn check_parsed(section: SectionKind, text: &str, produced_nothing: bool, issues: &mut Vec<ExtractionIssue>) {
    if produced_nothing && !content_lines(text).is_empty() {
        issues.push(ExtractionIssue::MalformedSection {
            section,
            detail: "no entries could be read from the section body".to_string(),
        });
    }
}

fn override_text(target: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *target = value;
    }
}

fn override_list<T>(target: &mut Vec<T>, value: Option<Vec<T>>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *target = value;
    }
}

/// Present, non-empty override fields replace extracted values.
fn apply_overrides(record: &mut ResumeRecord, overrides: PartialRecord) {
    override_text(&mut record.name, overrides.name);
    override_text(&mut record.title, overrides.title);
    override_text(&mut record.email, overrides.email);
    override_text(&mut record.phone, overrides.phone);
    override_text(&mut record.location, overrides.location);
    override_text(&mut record.linkedin, overrides.linkedin);
    override_text(&mut record.github, overrides.github);
    override_text(&mut record.summary, overrides.summary);
    override_list(&mut record.experience, overrides.experience);
    override_list(&mut record.education, overrides.education);
    override_list(&mut record.tags, overrides.tags);
    if let Some(core_skills) = overrides.core_skills.filter(|c| !c.is_empty()) {
        record.core_skills = core_skills;
    }
    override_list(&mut record.certifications, overrides.certifications);
    override_list(&mut record.projects, overrides.projects);
    override_list(&mut record.languages, overrides.languages);
    override_list(&mut record.interests, overrides.interests);
    override_list(&mut record.achievements, overrides.achievements);
}
