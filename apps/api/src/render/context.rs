//! The JSON a template sees. It is the serialized record, except that every
//! education entry carries the same keys (`degree`, `institution`,
//! `startDate`, `endDate`, `name`, `dates`) and certifications are display
//! strings. Templates therefore never depend on which variant an entry is.

use serde_json::{json, Value};

use crate::models::resume::{EducationEntry, ResumeRecord};

pub fn render_context(record: &ResumeRecord) -> Result<Value, serde_json::Error> {
    let mut context = serde_json::to_value(record)?;
    if let Some(map) = context.as_object_mut() {
        map.insert(
            "education".to_string(),
            record.education.iter().map(education_view).collect(),
        );
        map.insert(
            "certifications".to_string(),
            record
                .certifications
                .iter()
                .map(|cert| Value::String(cert.display()))
                .collect(),
        );
    }
    Ok(context)
}

fn education_view(entry: &EducationEntry) -> Value {
    match entry {
        EducationEntry::Detailed(d) => json!({
            "degree": d.degree,
            "institution": d.institution,
            "startDate": d.start_date,
            "endDate": d.end_date,
            "name": d.degree,
            "dates": entry.dates(),
        }),
        EducationEntry::Simple(s) => json!({
            "degree": s.name,
            "institution": "",
            "startDate": "",
            "endDate": "",
            "name": s.name,
            "dates": s.dates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Certification, CertificationRecord, DegreeEntry, SimpleEducation};
    use crate::render::engine::render;

    const BUNDLED: &str = include_str!("../../templates/resume.html");

    fn record() -> ResumeRecord {
        ResumeRecord {
            name: "Ada".to_string(),
            education: vec![
                EducationEntry::Detailed(DegreeEntry {
                    degree: "BSc CS".to_string(),
                    institution: "MIT".to_string(),
                    start_date: "2014".to_string(),
                    end_date: "2018".to_string(),
                }),
                EducationEntry::Simple(SimpleEducation {
                    name: "Rust Bootcamp".to_string(),
                    dates: String::new(),
                }),
            ],
            certifications: vec![
                Certification::Text("Terraform Associate".to_string()),
                Certification::Detailed(CertificationRecord {
                    name: "CKA".to_string(),
                    issuer: String::new(),
                    date: "2023".to_string(),
                }),
            ],
            current_year: 2026,
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn test_education_entries_share_one_shape() {
        let context = render_context(&record()).unwrap();
        let education = context["education"].as_array().unwrap();
        assert_eq!(education[0]["name"], "BSc CS");
        assert_eq!(education[0]["dates"], "2014 – 2018");
        assert_eq!(education[1]["degree"], "Rust Bootcamp");
        assert_eq!(education[1]["institution"], "");
    }

    #[test]
    fn test_certifications_become_display_strings() {
        let context = render_context(&record()).unwrap();
        assert_eq!(context["certifications"], json!(["Terraform Associate", "CKA (2023)"]));
    }

    #[test]
    fn test_bundled_template_shows_every_entry() {
        let html = render(BUNDLED, &record()).unwrap();
        assert!(html.contains("<strong>BSc CS</strong>"));
        assert!(html.contains("MIT"));
        assert!(html.contains("<strong>Rust Bootcamp</strong>"));
        assert!(html.contains("<li>Terraform Associate</li>"));
        assert!(html.contains("<li>CKA (2023)</li>"));
        assert!(!html.contains("<li></li>"));
    }

    #[test]
    fn test_bundled_template_renders_empty_record() {
        let html = render(BUNDLED, &ResumeRecord::default()).unwrap();
        assert!(html.contains("<h1></h1>"));
        assert!(!html.contains("Education"));
    }
}
