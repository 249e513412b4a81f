//! In-memory WordprocessingML object tree.
//!
//! Covers the subset the resume templates need: one A4 section, paragraphs
//! with tab stops, spacing, indentation and alignment, text runs, external
//! hyperlinks and simple tables. Measurements are OOXML native units: twips
//! for lengths, half-points for font sizes, eighths of a point for borders.

use crate::layout::template::{Alignment, Rgb, RunStyle};

/// A4 in twips.
pub const A4_WIDTH_TWIPS: u32 = 11906;
pub const A4_HEIGHT_TWIPS: u32 = 16838;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionProperties {
    pub page_width: u32,
    pub page_height: u32,
    pub margin: u32,
}

impl SectionProperties {
    pub fn a4(margin: u32) -> Self {
        Self {
            page_width: A4_WIDTH_TWIPS,
            page_height: A4_HEIGHT_TWIPS,
            margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocxDocument {
    pub section: SectionProperties,
    pub body: Vec<BodyNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyNode {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAlignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    pub alignment: TabAlignment,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub content: Vec<Inline>,
    pub alignment: Option<Alignment>,
    pub indent_left: Option<u32>,
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
    pub tab_stops: Vec<TabStop>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: Run) -> Self {
        self.content.push(Inline::Run(run));
        self
    }

    pub fn hyperlink(mut self, target: impl Into<String>, run: Run) -> Self {
        self.content.push(Inline::Hyperlink {
            target: target.into(),
            runs: vec![run],
        });
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn indent(mut self, left: u32) -> Self {
        self.indent_left = Some(left);
        self
    }

    pub fn spacing(mut self, before: Option<u32>, after: Option<u32>) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn tab(mut self, alignment: TabAlignment, position: u32) -> Self {
        self.tab_stops.push(TabStop {
            alignment,
            position,
        });
        self
    }

    /// Concatenated text of every run, tabs included.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|inline| match inline {
                Inline::Run(run) => std::slice::from_ref(run),
                Inline::Hyperlink { runs, .. } => runs.as_slice(),
            })
            .map(|run| run.text.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Run(Run),
    /// External link; the target becomes a relationship of the main part.
    Hyperlink { target: String, runs: Vec<Run> },
}

/// A run of uniformly formatted text. A `'\t'` in `text` becomes a tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Half-points.
    pub size: Option<u32>,
    pub color: Option<Rgb>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A run carrying a template run style.
    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            bold: style.bold,
            italic: style.italic,
            underline: false,
            size: Some(style.size),
            color: (style.color != Rgb::BLACK).then_some(style.color),
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    /// Eighths of a point.
    pub size: u32,
    pub color: Rgb,
}

/// Top, left, bottom and right cell borders; `None` renders as no border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellBorders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    pub borders: CellBorders,
}

impl TableCell {
    pub fn new(paragraph: Paragraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
            borders: CellBorders::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A full-width, borderless, auto-fit table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl DocxDocument {
    /// Every paragraph in document order, table cells included.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        for node in &self.body {
            match node {
                BodyNode::Paragraph(p) => out.push(p),
                BodyNode::Table(t) => {
                    for cell in t.rows.iter().flat_map(|row| &row.cells) {
                        out.extend(&cell.paragraphs);
                    }
                }
            }
        }
        out
    }

    /// External hyperlink targets in document order, one per hyperlink node.
    pub fn hyperlink_targets(&self) -> Vec<&str> {
        self.paragraphs()
            .into_iter()
            .flat_map(|p| &p.content)
            .filter_map(|inline| match inline {
                Inline::Hyperlink { target, .. } => Some(target.as_str()),
                Inline::Run(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_text_includes_hyperlinks() {
        let p = Paragraph::new()
            .hyperlink("mailto:a@b.co", Run::new("a@b.co"))
            .run(Run::new(" | 555"));
        assert_eq!(p.text(), "a@b.co | 555");
    }

    #[test]
    fn test_styled_run_drops_black_color() {
        let style = RunStyle {
            bold: true,
            italic: false,
            size: 24,
            color: Rgb::BLACK,
        };
        let run = Run::styled("Skills", style);
        assert!(run.bold);
        assert_eq!(run.size, Some(24));
        assert_eq!(run.color, None);
    }

    #[test]
    fn test_hyperlink_targets_walk_tables() {
        let doc = DocxDocument {
            section: SectionProperties::a4(720),
            body: vec![
                BodyNode::Paragraph(Paragraph::new().hyperlink("mailto:x@y.z", Run::new("x"))),
                BodyNode::Table(Table {
                    rows: vec![TableRow {
                        cells: vec![TableCell::new(
                            Paragraph::new().hyperlink("https://example.com", Run::new("e")),
                        )],
                    }],
                }),
            ],
        };
        assert_eq!(doc.hyperlink_targets(), vec!["mailto:x@y.z", "https://example.com"]);
    }
}
