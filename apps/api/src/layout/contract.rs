//! Layout Contract — the ordering and pairing rules every renderer shares.
//!
//! # Contract rules
//! - Sections render in a fixed order: Summary, Skills, Work Experience, Projects, Education.
//! - Work Experience exists only under the experienced template.
//! - A section with no content renders nothing at all, not even its title.
//! - Skills are distributed into two columns by index parity: even indices
//!   left, odd indices right, relative order kept inside each column.
//!
//! The preview block builder, the PDF cursor layout and the DOCX tree builder
//! all walk `present_sections` and use the text helpers below, so the three
//! outputs cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::models::{ResumeDocument, TemplateId};

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
}

/// Canonical section order.
pub const SECTION_ORDER: [SectionKind; 5] = [
    SectionKind::Summary,
    SectionKind::Skills,
    SectionKind::Experience,
    SectionKind::Projects,
    SectionKind::Education,
];

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Work Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Education => "Education",
        }
    }

    /// Whether the template renders this section at all.
    pub fn allowed_in(self, template: TemplateId) -> bool {
        match self {
            SectionKind::Experience => template.shows_experience(),
            _ => true,
        }
    }

    /// Whether the document has anything to show for this section.
    pub fn has_content(self, doc: &ResumeDocument) -> bool {
        match self {
            SectionKind::Summary => doc.summary().is_some(),
            SectionKind::Skills => !doc.skills.is_empty(),
            SectionKind::Experience => !doc.experience.is_empty(),
            SectionKind::Projects => !doc.projects.is_empty(),
            SectionKind::Education => !doc.education.is_empty(),
        }
    }
}

/// Sections to render for `doc` under `template`, in contract order.
pub fn present_sections(doc: &ResumeDocument, template: TemplateId) -> Vec<SectionKind> {
    SECTION_ORDER
        .into_iter()
        .filter(|section| section.allowed_in(template) && section.has_content(doc))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Skill pairing
// ────────────────────────────────────────────────────────────────────────────

/// Splits skills into `(left, right)` columns by index parity.
///
/// Left receives `ceil(n/2)` items, right `floor(n/2)`.
pub fn split_skill_columns(skills: &[String]) -> (Vec<String>, Vec<String>) {
    let left = skills.iter().step_by(2).cloned().collect();
    let right = skills.iter().skip(1).step_by(2).cloned().collect();
    (left, right)
}

/// Skills paired row by row: `(skills[2i], skills[2i + 1])`, the right cell
/// absent on the last row of an odd-length list.
pub fn skill_rows(skills: &[String]) -> Vec<(&str, Option<&str>)> {
    skills
        .chunks(2)
        .map(|pair| (pair[0].as_str(), pair.get(1).map(String::as_str)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Text composition
// ────────────────────────────────────────────────────────────────────────────

/// Prefix drawn in front of every list item.
pub const BULLET: &str = "• ";

pub fn bulleted(text: &str) -> String {
    format!("{BULLET}{text}")
}

/// `"start - end"`, tolerating either side being blank.
pub fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => start.to_string(),
        ("", end) => end.to_string(),
        (start, end) => format!("{start} - {end}"),
    }
}

/// Job title optionally followed by `" - location"`.
pub fn job_line(job_title: &str, location: Option<&str>) -> String {
    let title = job_title.trim();
    match location.map(str::trim).filter(|loc| !loc.is_empty()) {
        Some(loc) if title.is_empty() => loc.to_string(),
        Some(loc) => format!("{title} - {loc}"),
        None => title.to_string(),
    }
}

/// Returns `value` trimmed, or `placeholder` when it is blank.
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder
    } else {
        trimmed
    }
}

/// Neutral stand-ins shown in the live preview for fields not yet filled in.
pub mod placeholders {
    pub const NAME: &str = "Your Name";
    pub const EMAIL: &str = "your.email@example.com";
    pub const PHONE: &str = "000-000-0000";
    pub const ADDRESS: &str = "Your Address";
    pub const COMPANY: &str = "Company Name";
    pub const JOB_TITLE: &str = "Job Title";
    pub const START_DATE: &str = "Start Date";
    pub const END_DATE: &str = "End Date";
    pub const PROJECT: &str = "Project Name";
    pub const INSTITUTION: &str = "Your Institution";
    pub const GRADUATION: &str = "Graduation Date";
    pub const COURSE: &str = "Course Name";
    pub const LOCATION: &str = "Location";
    /// Project name used by the exporters when the entry has none.
    pub const UNTITLED_PROJECT: &str = "Untitled Project";
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
