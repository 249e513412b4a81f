//! Block builder — turns a resume into the ordered sequence of atomic blocks
//! the preview paginates.
//!
//! Pure function of its inputs: no I/O, no logging, no ambient state.

use serde::{Deserialize, Serialize};

use crate::layout::contract::{
    date_range, job_line, or_placeholder, placeholders, present_sections, split_skill_columns,
    SectionKind,
};
use crate::models::{ResumeDocument, TemplateId};

/// Contact header, always the first block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: Option<String>,
}

/// Presentation hint for a paragraph block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRole {
    /// Running text such as the summary.
    Body,
    /// Bold entry heading (project name).
    EntryTitle,
    /// Job title and location line under an experience heading.
    JobLine,
}

/// Presentation hint for a key/value row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRole {
    /// Bold heading with a right-aligned date.
    EntryHeader,
    /// Italic detail line with a right-aligned location.
    EntryDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header(HeaderBlock),
    SectionTitle {
        text: String,
    },
    Paragraph {
        text: String,
        role: ParagraphRole,
    },
    ListItem {
        text: String,
    },
    TwoColumnList {
        left: Vec<String>,
        right: Vec<String>,
    },
    KeyValueRow {
        left: String,
        right: String,
        role: RowRole,
    },
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header(_) => "header",
            Block::SectionTitle { .. } => "section_title",
            Block::Paragraph { .. } => "paragraph",
            Block::ListItem { .. } => "list_item",
            Block::TwoColumnList { .. } => "two_column_list",
            Block::KeyValueRow { .. } => "key_value_row",
        }
    }
}

/// Builds the preview block sequence for `doc` under `template`.
pub fn build_blocks(doc: &ResumeDocument, template: TemplateId) -> Vec<Block> {
    let mut blocks = vec![header_block(doc)];

    for section in present_sections(doc, template) {
        blocks.push(Block::SectionTitle {
            text: section.title().to_string(),
        });
        match section {
            SectionKind::Summary => {
                blocks.push(Block::Paragraph {
                    text: doc.summary().unwrap_or_default().to_string(),
                    role: ParagraphRole::Body,
                });
            }
            SectionKind::Skills => {
                let (left, right) = split_skill_columns(&doc.skills);
                blocks.push(Block::TwoColumnList { left, right });
            }
            SectionKind::Experience => {
                for exp in &doc.experience {
                    blocks.push(Block::KeyValueRow {
                        left: or_placeholder(&exp.company, placeholders::COMPANY).to_string(),
                        right: date_range(
                            or_placeholder(&exp.start_date, placeholders::START_DATE),
                            or_placeholder(&exp.end_date, placeholders::END_DATE),
                        ),
                        role: RowRole::EntryHeader,
                    });
                    blocks.push(Block::Paragraph {
                        text: job_line(
                            or_placeholder(&exp.job_title, placeholders::JOB_TITLE),
                            exp.location.as_deref(),
                        ),
                        role: ParagraphRole::JobLine,
                    });
                    blocks.extend(exp.tasks.iter().map(|task| Block::ListItem {
                        text: task.trim().to_string(),
                    }));
                }
            }
            SectionKind::Projects => {
                for project in &doc.projects {
                    blocks.push(Block::Paragraph {
                        text: or_placeholder(&project.name, placeholders::PROJECT).to_string(),
                        role: ParagraphRole::EntryTitle,
                    });
                    blocks.extend(project.tasks.iter().map(|task| Block::ListItem {
                        text: task.trim().to_string(),
                    }));
                }
            }
            SectionKind::Education => {
                for edu in &doc.education {
                    blocks.push(Block::KeyValueRow {
                        left: or_placeholder(&edu.institution, placeholders::INSTITUTION)
                            .to_string(),
                        right: or_placeholder(&edu.graduation_date, placeholders::GRADUATION)
                            .to_string(),
                        role: RowRole::EntryHeader,
                    });
                    blocks.push(Block::KeyValueRow {
                        left: or_placeholder(&edu.course, placeholders::COURSE).to_string(),
                        right: or_placeholder(
                            edu.location.as_deref().unwrap_or_default(),
                            placeholders::LOCATION,
                        )
                        .to_string(),
                        role: RowRole::EntryDetail,
                    });
                }
            }
        }
    }

    blocks
}

fn header_block(doc: &ResumeDocument) -> Block {
    let personal = &doc.personal;
    Block::Header(HeaderBlock {
        name: or_placeholder(&personal.name, placeholders::NAME).to_string(),
        email: or_placeholder(&personal.email, placeholders::EMAIL).to_string(),
        phone: or_placeholder(&personal.phone, placeholders::PHONE).to_string(),
        address: or_placeholder(&personal.address, placeholders::ADDRESS).to_string(),
        linkedin: personal.linkedin_url().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Education, Experience, Personal, Project};

    fn jane() -> ResumeDocument {
        ResumeDocument {
            personal: Personal {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "5551234567".to_string(),
                address: "Berlin".to_string(),
                linkedin: Some("https://linkedin.com/in/janedoe".to_string()),
                summary: "Systems engineer.".to_string(),
            },
            skills: vec!["Go".to_string(), "Rust".to_string(), "SQL".to_string()],
            ..Default::default()
        }
    }

    fn titles(blocks: &[Block]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::SectionTitle { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header_is_always_first() {
        let blocks = build_blocks(&ResumeDocument::default(), TemplateId::Freshie);
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Header(header) => {
                assert_eq!(header.name, "Your Name");
                assert_eq!(header.email, "your.email@example.com");
                assert_eq!(header.linkedin, None);
            }
            other => panic!("expected header, got {other:?}"),
        }
    }

    #[test]
    fn test_skills_two_column_split() {
        let blocks = build_blocks(&jane(), TemplateId::Freshie);
        let columns = blocks
            .iter()
            .find_map(|b| match b {
                Block::TwoColumnList { left, right } => Some((left.clone(), right.clone())),
                _ => None,
            })
            .expect("skills block");
        assert_eq!(columns.0, vec!["Go", "SQL"]);
        assert_eq!(columns.1, vec!["Rust"]);
    }

    #[test]
    fn test_summary_emitted_only_when_non_blank() {
        let mut doc = jane();
        assert_eq!(titles(&build_blocks(&doc, TemplateId::Freshie)), vec!["Summary", "Skills"]);
        doc.personal.summary = "   ".to_string();
        assert_eq!(titles(&build_blocks(&doc, TemplateId::Freshie)), vec!["Skills"]);
    }

    #[test]
    fn test_empty_projects_contribute_no_blocks() {
        let doc = jane();
        let blocks = build_blocks(&doc, TemplateId::Experienced);
        assert!(!titles(&blocks).contains(&"Projects"));
        // header + summary(2) + skills(2)
        assert_eq!(blocks.len(), 5);
    }

    #[test]
    fn test_experience_never_appears_when_empty() {
        let doc = jane();
        for template in [TemplateId::Freshie, TemplateId::Experienced] {
            assert!(!titles(&build_blocks(&doc, template)).contains(&"Work Experience"));
        }
    }

    #[test]
    fn test_experience_only_under_experienced_template() {
        let mut doc = jane();
        doc.experience.push(Experience {
            job_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "01/2020".to_string(),
            end_date: "02/2023".to_string(),
            location: Some("Remote".to_string()),
            tasks: vec!["Built the billing pipeline".to_string(), "Led on-call".to_string()],
        });

        assert!(!titles(&build_blocks(&doc, TemplateId::Freshie)).contains(&"Work Experience"));

        let blocks = build_blocks(&doc, TemplateId::Experienced);
        let start = blocks
            .iter()
            .position(|b| matches!(b, Block::SectionTitle { text } if text == "Work Experience"))
            .expect("experience title");
        assert_eq!(
            blocks[start + 1],
            Block::KeyValueRow {
                left: "Acme".to_string(),
                right: "01/2020 - 02/2023".to_string(),
                role: RowRole::EntryHeader,
            }
        );
        assert_eq!(
            blocks[start + 2],
            Block::Paragraph {
                text: "Engineer - Remote".to_string(),
                role: ParagraphRole::JobLine,
            }
        );
        assert!(matches!(&blocks[start + 3], Block::ListItem { text } if text == "Built the billing pipeline"));
        assert!(matches!(&blocks[start + 4], Block::ListItem { text } if text == "Led on-call"));
    }

    #[test]
    fn test_projects_and_education_shape() {
        let mut doc = jane();
        doc.projects.push(Project {
            name: "cvforge".to_string(),
            tasks: vec!["Wrote the paginator".to_string()],
        });
        doc.education.push(Education {
            institution: "TU Berlin".to_string(),
            course: "Computer Science".to_string(),
            graduation_date: "06/2019".to_string(),
            location: None,
        });

        let blocks = build_blocks(&doc, TemplateId::Freshie);
        let kinds: Vec<&str> = blocks.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "header",
                "section_title",
                "paragraph",
                "section_title",
                "two_column_list",
                "section_title",
                "paragraph",
                "list_item",
                "section_title",
                "key_value_row",
                "key_value_row",
            ]
        );
        assert_eq!(
            blocks[10],
            Block::KeyValueRow {
                left: "Computer Science".to_string(),
                right: "Location".to_string(),
                role: RowRole::EntryDetail,
            }
        );
    }

    #[test]
    fn test_builder_is_pure() {
        let doc = jane();
        assert_eq!(
            build_blocks(&doc, TemplateId::Experienced),
            build_blocks(&doc, TemplateId::Experienced)
        );
    }
}
