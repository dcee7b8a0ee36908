//! Canonical Resume Record: the single value handed from extraction to rendering.
//!
//! Every field is always present: strings default to `""`, lists to `[]`.
//! The JSON shape (camelCase keys) is what templates and the persistence
//! collaborator see.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    /// Flat skill list, deduplicated, first occurrence wins.
    pub tags: Vec<String>,
    pub core_skills: CoreSkills,
    pub certifications: Vec<Certification>,
    pub projects: Vec<ProjectEntry>,
    pub languages: Vec<String>,
    pub interests: Vec<String>,
    pub achievements: Vec<String>,
    pub current_year: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
    /// Items from an explicit "Key Impact" sub-list, kept apart from `bullets`.
    pub impact: Vec<String>,
}

/// Education comes in two shapes: a fully split degree record, or a single
/// display line plus its dates when the source gave nothing separable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EducationEntry {
    Detailed(DegreeEntry),
    Simple(SimpleEducation),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleEducation {
    pub name: String,
    #[serde(default)]
    pub dates: String,
}

impl EducationEntry {
    /// The line a reader would see first: the degree, or the combined name.
    pub fn headline(&self) -> &str {
        match self {
            EducationEntry::Detailed(d) => &d.degree,
            EducationEntry::Simple(s) => &s.name,
        }
    }

    /// The dates as one display string (`2016 – 2020`, `2019`, or `""`).
    pub fn dates(&self) -> String {
        match self {
            EducationEntry::Detailed(d) => date_span(&d.start_date, &d.end_date),
            EducationEntry::Simple(s) => s.dates.clone(),
        }
    }
}

/// `start – end`, or whichever side is present.
pub fn date_span(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} – {end}"),
        (true, false) => end.to_string(),
        (false, true) => start.to_string(),
        (true, true) => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Certification {
    Text(String),
    Detailed(CertificationRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationRecord {
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
}

impl Certification {
    /// Single display string: `name – issuer (date)`, omitting empty parts.
    pub fn display(&self) -> String {
        match self {
            Certification::Text(text) => text.clone(),
            Certification::Detailed(c) => {
                let mut out = c.name.clone();
                if !c.issuer.is_empty() {
                    out.push_str(" – ");
                    out.push_str(&c.issuer);
                }
                if !c.date.is_empty() {
                    out.push_str(&format!(" ({})", c.date));
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub stack: String,
    pub desc: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Category name → skills, in the order categories were discovered.
///
/// Serialized as a JSON object whose key order follows discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreSkills(Vec<SkillCategory>);

impl CoreSkills {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.0.iter()
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(category))
            .map(|c| c.skills.as_slice())
    }

    /// Appends skills to a category, creating it on first sight.
    /// Skills already listed under the category (case-insensitively) are skipped.
    pub fn extend_category<I>(&mut self, category: &str, skills: I)
    where
        I: IntoIterator<Item = String>,
    {
        let idx = match self
            .0
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(category))
        {
            Some(idx) => idx,
            None => {
                self.0.push(SkillCategory {
                    name: category.to_string(),
                    skills: Vec::new(),
                });
                self.0.len() - 1
            }
        };
        let entry = &mut self.0[idx];
        for skill in skills {
            if !entry.skills.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
                entry.skills.push(skill);
            }
        }
    }

    /// Drops categories that ended up with no skills.
    pub fn prune_empty(&mut self) {
        self.0.retain(|c| !c.skills.is_empty());
    }
}

impl Serialize for CoreSkills {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.name, &category.skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CoreSkills {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoreSkillsVisitor;

        impl<'de> Visitor<'de> for CoreSkillsVisitor {
            type Value = CoreSkills;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to skill lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CoreSkills, A::Error> {
                let mut skills = CoreSkills::default();
                while let Some((name, items)) = access.next_entry::<String, Vec<String>>()? {
                    skills.extend_category(&name, items);
                }
                Ok(skills)
            }
        }

        deserializer.deserialize_map(CoreSkillsVisitor)
    }
}

/// Caller-supplied values that take precedence over text-derived ones.
///
/// Any field that is present and non-empty replaces the extracted value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialRecord {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub tags: Option<Vec<String>>,
    pub core_skills: Option<CoreSkills>,
    pub certifications: Option<Vec<Certification>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub languages: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
}
