//! Editor-side validation of a resume before export.
//!
//! Collects every issue rather than stopping at the first, so the editor can
//! flag all offending fields at once. Field paths use the JSON (camelCase)
//! names, e.g. `experience[0].startDate`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::models::{ResumeDocument, TemplateId};

pub const MAX_SKILL_LEN: usize = 30;
pub const MAX_SUMMARY_LEN: usize = 300;
pub const MAX_ADDRESS_LEN: usize = 30;
pub const MAX_EDUCATION_ENTRIES: usize = 2;
const PHONE_DIGITS: usize = 10;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?linkedin\.com/in/[a-zA-Z0-9_-]+/?$")
        .expect("valid linkedin pattern")
});

static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{4}$").expect("valid date pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Records a "required" issue when `value` is blank; returns whether it was filled.
    fn required(&mut self, field: &str, value: &str) -> bool {
        let filled = !value.trim().is_empty();
        if !filled {
            self.push(field, "is required");
        }
        filled
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(field, format!("must be at most {max} characters"));
        }
    }

    fn month_year(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !is_month_year(value) {
            self.push(field, "must be a valid date in MM/YYYY format");
        }
    }

    fn tasks(&mut self, prefix: &str, tasks: &[String]) {
        for (i, task) in tasks.iter().enumerate() {
            if task.trim().is_empty() {
                self.push(format!("{prefix}.tasks[{i}]"), "must not be empty");
            }
        }
    }
}

/// `MM/YYYY` with a real month.
pub fn is_month_year(value: &str) -> bool {
    MONTH_YEAR_RE.is_match(value)
        && NaiveDate::parse_from_str(&format!("01/{value}"), "%d/%m/%Y").is_ok()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    value.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}

pub fn is_valid_linkedin(value: &str) -> bool {
    LINKEDIN_RE.is_match(value)
}

/// Checks `doc` against the editor rules for `template`.
pub fn validate_document(doc: &ResumeDocument, template: TemplateId) -> ValidationReport {
    let mut issues = Issues::default();
    let personal = &doc.personal;

    issues.required("personal.name", &personal.name);
    if issues.required("personal.email", &personal.email) && !is_valid_email(personal.email.trim())
    {
        issues.push("personal.email", "must be a valid email address");
    }
    if issues.required("personal.phone", &personal.phone) && !is_valid_phone(&personal.phone) {
        issues.push("personal.phone", "must contain exactly 10 digits");
    }
    issues.required("personal.address", &personal.address);
    issues.max_len("personal.address", &personal.address, MAX_ADDRESS_LEN);
    issues.max_len("personal.summary", &personal.summary, MAX_SUMMARY_LEN);
    if let Some(url) = personal.linkedin_url() {
        if !is_valid_linkedin(url) {
            issues.push("personal.linkedin", "must be a LinkedIn profile URL");
        }
    }

    for (i, skill) in doc.skills.iter().enumerate() {
        let field = format!("skills[{i}]");
        if skill.trim().is_empty() {
            issues.push(field.clone(), "must not be empty");
        }
        issues.max_len(&field, skill, MAX_SKILL_LEN);
    }

    if template.shows_experience() {
        for (i, exp) in doc.experience.iter().enumerate() {
            let prefix = format!("experience[{i}]");
            issues.required(&format!("{prefix}.jobTitle"), &exp.job_title);
            issues.required(&format!("{prefix}.company"), &exp.company);
            for (name, value) in [("startDate", &exp.start_date), ("endDate", &exp.end_date)] {
                let field = format!("{prefix}.{name}");
                if issues.required(&field, value) {
                    issues.month_year(&field, value);
                }
            }
            issues.tasks(&prefix, &exp.tasks);
        }
    }

    for (i, project) in doc.projects.iter().enumerate() {
        let prefix = format!("projects[{i}]");
        issues.required(&format!("{prefix}.name"), &project.name);
        issues.tasks(&prefix, &project.tasks);
    }

    if doc.education.len() > MAX_EDUCATION_ENTRIES {
        issues.push(
            "education",
            format!("at most {MAX_EDUCATION_ENTRIES} entries are allowed"),
        );
    }
    for (i, edu) in doc.education.iter().enumerate() {
        let prefix = format!("education[{i}]");
        issues.required(&format!("{prefix}.institution"), &edu.institution);
        issues.required(&format!("{prefix}.course"), &edu.course);
        let field = format!("{prefix}.graduationDate");
        if issues.required(&field, &edu.graduation_date) {
            issues.month_year(&field, &edu.graduation_date);
        }
    }

    ValidationReport {
        valid: issues.0.is_empty(),
        issues: issues.0,
    }
}
