use serde::{Deserialize, Serialize};

/// Visual template a resume is rendered with.
///
/// Selects the layout strategy for every renderer. `Freshie` omits the work
/// experience section entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Compact, centered layout for candidates without work history.
    #[default]
    Freshie,
    /// Left-aligned professional layout with a work experience section.
    Experienced,
}

impl TemplateId {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Freshie => "freshie",
            TemplateId::Experienced => "experienced",
        }
    }

    pub fn shows_experience(self) -> bool {
        matches!(self, TemplateId::Experienced)
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized resume snapshot handed to every renderer.
///
/// Every field defaults when absent from the JSON payload, so a partially
/// filled editor state still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal: Personal,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub template_id: TemplateId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Personal {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    /// "MM/YYYY"
    pub start_date: String,
    /// "MM/YYYY"
    pub end_date: String,
    pub location: Option<String>,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub course: String,
    /// "MM/YYYY"
    pub graduation_date: String,
    pub location: Option<String>,
}

impl Personal {
    /// LinkedIn URL, if one was entered (blank strings count as absent).
    pub fn linkedin_url(&self) -> Option<&str> {
        self.linkedin
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// True when at least one personal field carries text.
    pub fn has_content(&self) -> bool {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.address.as_str(),
            self.summary.as_str(),
        ]
        .iter()
        .any(|field| !field.trim().is_empty())
            || self.linkedin_url().is_some()
    }

    /// Names of the required contact fields (name, email, phone, address) that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

impl ResumeDocument {
    /// True when the document holds nothing at all to render.
    pub fn is_empty(&self) -> bool {
        !self.personal.has_content()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.projects.is_empty()
            && self.education.is_empty()
    }

    /// Summary text, trimmed, or `None` when blank.
    pub fn summary(&self) -> Option<&str> {
        let summary = self.personal.summary.trim();
        (!summary.is_empty()).then_some(summary)
    }
}
