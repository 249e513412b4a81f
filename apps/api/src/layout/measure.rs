//! Metric-based block measurement for the preview.
//!
//! Stands in for reading rendered element heights back from a layout engine:
//! every block is laid out against the template's preview box model using the
//! static Helvetica tables, which keeps pagination deterministic and testable.

use crate::layout::blocks::{Block, ParagraphRole, RowRole};
use crate::layout::contract::bulleted;
use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::pagination::{MeasureError, MeasureHeight};
use crate::layout::template::{template_style, PreviewStyle};
use crate::models::TemplateId;

/// Share of a key/value row's width given to the left column.
const ROW_LEFT_SHARE: f32 = 0.65;
/// Gap between the two skill columns.
const COLUMN_GAP_PX: f32 = 16.0;

#[derive(Debug, Clone, Copy)]
pub struct MetricMeasurer {
    style: &'static PreviewStyle,
}

impl MetricMeasurer {
    pub fn new(template: TemplateId) -> Self {
        Self {
            style: &template_style(template).preview,
        }
    }

    fn line_box(&self, font_px: f32) -> f32 {
        font_px * self.style.line_height
    }

    /// Height of `text` wrapped at `width`, never less than one line box.
    fn text_height(&self, text: &str, face: FontFace, font_px: f32, width: f32) -> f32 {
        let lines = get_metrics(face).line_count(text, font_px, width).max(1);
        lines as f32 * self.line_box(font_px)
    }

    fn content_width(&self, viewport_width: f32) -> Result<f32, MeasureError> {
        let width = viewport_width - 2.0 * self.style.padding_px;
        if width > 0.0 {
            Ok(width)
        } else {
            Err(MeasureError {
                kind: "viewport",
                reason: format!("viewport width {viewport_width}px leaves no content area"),
            })
        }
    }
}

impl MeasureHeight for MetricMeasurer {
    fn measure(&self, block: &Block, viewport_width: f32) -> Result<f32, MeasureError> {
        let style = self.style;
        let width = self.content_width(viewport_width)?;

        let height = match block {
            Block::Header(header) => {
                let contact = format!("{} | {} | {}", header.email, header.phone, header.address);
                let mut h = style.padding_px
                    + self.text_height(&header.name, FontFace::Bold, style.name_px, width)
                    + self.text_height(&contact, FontFace::Regular, style.contact_px, width);
                if let Some(linkedin) = &header.linkedin {
                    h += self.text_height(linkedin, FontFace::Regular, style.contact_px, width);
                }
                h + style.header_gap_px
            }
            Block::SectionTitle { text } => {
                self.text_height(&text.to_uppercase(), FontFace::Bold, style.title_px, width)
                    + style.section_gap_px
            }
            Block::Paragraph { text, role } => {
                let face = match role {
                    ParagraphRole::EntryTitle => FontFace::Bold,
                    ParagraphRole::Body | ParagraphRole::JobLine => FontFace::Regular,
                };
                self.text_height(text, face, style.body_px, width) + style.item_gap_px
            }
            Block::ListItem { text } => {
                self.text_height(
                    &bulleted(text),
                    FontFace::Regular,
                    style.body_px,
                    width - style.task_indent_px,
                ) + style.item_gap_px
            }
            Block::TwoColumnList { left, right } => {
                let column_width = (width - COLUMN_GAP_PX) / 2.0;
                let column_height = |items: &[String]| -> f32 {
                    items
                        .iter()
                        .map(|skill| {
                            self.text_height(
                                &bulleted(skill),
                                FontFace::Regular,
                                style.body_px,
                                column_width,
                            ) + style.item_gap_px
                        })
                        .sum()
                };
                column_height(left).max(column_height(right))
            }
            Block::KeyValueRow { left, right, role } => {
                let left_face = match role {
                    RowRole::EntryHeader => FontFace::Bold,
                    RowRole::EntryDetail => FontFace::Italic,
                };
                let left_h =
                    self.text_height(left, left_face, style.body_px, width * ROW_LEFT_SHARE);
                let right_h = self.text_height(
                    right,
                    FontFace::Regular,
                    style.body_px,
                    width * (1.0 - ROW_LEFT_SHARE),
                );
                left_h.max(right_h) + style.item_gap_px
            }
        };

        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::{build_blocks, HeaderBlock};
    use crate::layout::pagination::{paginate, Viewport, A4_WIDTH_PX};
    use crate::models::{Project, ResumeDocument};

    fn measure(block: &Block) -> f32 {
        MetricMeasurer::new(TemplateId::Freshie)
            .measure(block, A4_WIDTH_PX)
            .unwrap()
    }

    #[test]
    fn test_long_paragraph_is_taller_than_short() {
        let short = Block::Paragraph {
            text: "Engineer.".to_string(),
            role: ParagraphRole::Body,
        };
        let long = Block::Paragraph {
            text: "Designs and operates distributed systems. ".repeat(20),
            role: ParagraphRole::Body,
        };
        assert!(measure(&long) > measure(&short) * 3.0);
    }

    #[test]
    fn test_empty_list_item_still_occupies_a_line() {
        let h = measure(&Block::ListItem {
            text: String::new(),
        });
        assert!(h > 0.0);
    }

    #[test]
    fn test_two_column_height_follows_taller_column() {
        let three = Block::TwoColumnList {
            left: vec!["Go".into(), "SQL".into(), "C".into()],
            right: vec!["Rust".into()],
        };
        let one = Block::TwoColumnList {
            left: vec!["Go".into()],
            right: vec!["Rust".into()],
        };
        assert!((measure(&three) - 3.0 * measure(&one)).abs() < 1e-3);
    }

    #[test]
    fn test_header_with_linkedin_is_taller() {
        let mut header = HeaderBlock {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "5551234567".into(),
            address: "Berlin".into(),
            linkedin: None,
        };
        let without = measure(&Block::Header(header.clone()));
        header.linkedin = Some("https://linkedin.com/in/jane".into());
        assert!(measure(&Block::Header(header)) > without);
    }

    #[test]
    fn test_degenerate_viewport_is_an_error() {
        let result = MetricMeasurer::new(TemplateId::Experienced).measure(
            &Block::SectionTitle {
                text: "Skills".into(),
            },
            50.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_many_tasks_spill_onto_second_page() {
        let doc = ResumeDocument {
            projects: vec![Project {
                name: "Pipeline".into(),
                tasks: (0..80)
                    .map(|i| format!("Shipped improvement number {i} to the ingestion pipeline"))
                    .collect(),
            }],
            ..Default::default()
        };
        let blocks = build_blocks(&doc, TemplateId::Freshie);
        let pages = paginate(&blocks, &MetricMeasurer::new(TemplateId::Freshie), Viewport::A4);
        assert!(pages.len() >= 2);
        let total: usize = pages.iter().map(|p| p.blocks.len()).sum();
        assert_eq!(total, blocks.len());
    }
}
