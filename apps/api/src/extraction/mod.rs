//! Section/Field Extraction Engine.
//!
//! Raw markdown-flavoured résumé text goes through the Section Segmenter,
//! one Field Extractor per section kind, and the Schema Assembler, which
//! always returns a complete (possibly sparse) record.

pub mod assembler;
pub mod certifications;
pub mod dates;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod lists;
pub mod markdown;
pub mod personal;
pub mod projects;
pub mod sections;
pub mod skills;
pub mod table;

pub use assembler::{
    extract_resume, extract_resume_at, extract_resume_with_report, ExtractionIssue,
    ExtractionReport,
};
