//! DOCX renderer.
//!
//! Builds a [`DocxDocument`] tree from the resume following the shared
//! section contract and the template's run styles, then packages it on the
//! blocking pool.

pub mod model;
pub mod package;

use tracing::debug;

use crate::layout::contract::{
    bulleted, date_range, or_placeholder, placeholders, present_sections, skill_rows, SectionKind,
};
use crate::layout::template::{template_style, Alignment, DocxStyle, Rgb};
use crate::models::{ResumeDocument, TemplateId};
use crate::render::{ExportFormat, RenderError};

use model::{
    Border, BodyNode, CellBorders, DocxDocument, Paragraph, Run, SectionProperties, TabAlignment,
    Table, TableCell, TableRow,
};

/// Glyph the freshie section headers are flanked with.
const RULE_GLYPH: &str = "─";
/// Header rule thickness, in eighths of a point.
const HEADER_RULE_SIZE: u32 = 14;
const SECTION_SPACER_BEFORE: u32 = 200;

/// Number of rule glyphs on each side of a centered section title.
pub fn header_rule_len(title: &str) -> usize {
    let len = title.chars().count() as i64;
    ((100 - 2 * len) / 2).max(15) as usize
}

// ────────────────────────────────────────────────────────────────────────────
// Tree construction
// ────────────────────────────────────────────────────────────────────────────

struct TreeBuilder<'a> {
    style: &'a DocxStyle,
    body: Vec<BodyNode>,
}

impl<'a> TreeBuilder<'a> {
    fn push(&mut self, paragraph: Paragraph) {
        self.body.push(BodyNode::Paragraph(paragraph));
    }

    fn link_run(&self, text: &str) -> Run {
        Run::new(text)
            .bold()
            .underline()
            .color(self.style.link_color)
            .size(self.style.text.size)
    }

    fn text_run(&self, text: &str) -> Run {
        Run::styled(text, self.style.text)
    }

    fn header(&mut self, doc: &ResumeDocument) {
        let s = self.style;
        let personal = &doc.personal;
        let email = personal.email.trim();

        self.push(
            Paragraph::new()
                .align(s.alignment)
                .spacing(None, Some(100))
                .run(Run::styled(personal.name.trim().to_uppercase(), s.name)),
        );

        match s.alignment {
            Alignment::Center => {
                let tail = format!(" | {} | {}", personal.phone.trim(), personal.address.trim());
                self.push(
                    Paragraph::new()
                        .align(Alignment::Center)
                        .hyperlink(format!("mailto:{email}"), self.link_run(email))
                        .run(self.text_run(&tail)),
                );
            }
            Alignment::Left => {
                self.push(
                    Paragraph::new()
                        .align(Alignment::Left)
                        .hyperlink(format!("mailto:{email}"), self.link_run(email)),
                );
                for field in [personal.phone.trim(), personal.address.trim()] {
                    self.push(Paragraph::new().align(Alignment::Left).run(self.text_run(field)));
                }
            }
        }

        if let Some(url) = personal.linkedin_url() {
            self.push(
                Paragraph::new()
                    .align(s.alignment)
                    .hyperlink(url, self.link_run(url)),
            );
        }

        self.body.push(BodyNode::Table(Table {
            rows: vec![TableRow {
                cells: vec![TableCell {
                    paragraphs: vec![Paragraph::new()],
                    borders: CellBorders {
                        top: Some(Border {
                            size: HEADER_RULE_SIZE,
                            color: Rgb::BLACK,
                        }),
                        ..Default::default()
                    },
                }],
            }],
        }));
    }

    fn section_title(&mut self, section: SectionKind) {
        let s = self.style;
        let title = section.title().to_uppercase();
        let paragraph = match s.alignment {
            Alignment::Left => Paragraph::new()
                .align(Alignment::Left)
                .spacing(None, Some(100))
                .run(Run::styled(title, s.section).underline()),
            Alignment::Center => {
                let rule = RULE_GLYPH.repeat(header_rule_len(&title));
                Paragraph::new()
                    .align(Alignment::Center)
                    .spacing(None, Some(100))
                    .run(Run::styled(rule.clone(), s.rule))
                    .run(Run::styled(format!("  {title}  "), s.section))
                    .run(Run::styled(rule, s.rule))
            }
        };
        self.push(paragraph);
    }

    /// Paragraph with a right tab stop at the text margin.
    fn tabbed(&self) -> Paragraph {
        Paragraph::new()
            .tab(TabAlignment::Right, self.style.right_tab_twips)
            .indent(self.style.indent_twips)
    }

    fn task(&mut self, task: &str) {
        let s = self.style;
        self.push(
            Paragraph::new()
                .indent(s.indent_twips)
                .spacing(None, Some(100))
                .run(Run::styled(bulleted(task.trim()), s.list)),
        );
    }

    fn summary(&mut self, doc: &ResumeDocument) {
        let s = self.style;
        self.push(
            Paragraph::new()
                .indent(s.indent_twips)
                .spacing(None, Some(150))
                .run(self.text_run(doc.summary().unwrap_or_default())),
        );
    }

    fn skills(&mut self, doc: &ResumeDocument) {
        let s = self.style;
        let cell = |skill: Option<&str>| {
            let paragraph = match skill {
                Some(skill) => Paragraph::new().run(Run::styled(bulleted(skill.trim()), s.list)),
                None => Paragraph::new(),
            };
            TableCell::new(paragraph)
        };
        let rows = skill_rows(&doc.skills)
            .into_iter()
            .map(|(left, right)| TableRow {
                cells: vec![cell(Some(left)), cell(right)],
            })
            .collect();
        self.body.push(BodyNode::Table(Table { rows }));
    }

    fn experience(&mut self, doc: &ResumeDocument) {
        let s = self.style;
        for exp in &doc.experience {
            let dates = date_range(&exp.start_date, &exp.end_date);
            let heading = self
                .tabbed()
                .spacing(None, Some(50))
                .run(Run::styled(exp.company.trim(), s.entry_title))
                .run(Run::styled(format!("\t{dates}"), s.date));
            self.push(heading);

            let mut job = self
                .tabbed()
                .spacing(None, Some(50))
                .run(Run::styled(exp.job_title.trim(), s.job_title));
            if let Some(location) = exp.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                job = job.run(Run::styled(format!("\t{location}"), s.detail));
            }
            self.push(job);

            for task in &exp.tasks {
                self.task(task);
            }
        }
    }

    fn projects(&mut self, doc: &ResumeDocument) {
        let s = self.style;
        for project in &doc.projects {
            let name = or_placeholder(&project.name, placeholders::UNTITLED_PROJECT);
            self.push(
                Paragraph::new()
                    .indent(s.indent_twips)
                    .spacing(None, Some(100))
                    .run(Run::styled(name, s.project_title)),
            );
            for task in &project.tasks {
                self.task(task);
            }
            self.push(Paragraph::new().spacing(None, Some(150)));
        }
    }

    fn education(&mut self, doc: &ResumeDocument) {
        let s = self.style;
        for edu in &doc.education {
            let heading = self
                .tabbed()
                .spacing(None, Some(50))
                .run(Run::styled(edu.institution.trim(), s.institution))
                .run(Run::styled(format!("\t{}", edu.graduation_date.trim()), s.date));
            self.push(heading);

            let location = edu.location.as_deref().unwrap_or_default().trim();
            self.push(
                self.tabbed()
                    .spacing(None, Some(100))
                    .run(Run::styled(edu.course.trim(), s.italics))
                    .run(Run::styled(format!("\t{location}"), s.detail)),
            );
        }
    }
}

/// Builds the DOCX object tree for `doc` under `template`.
pub fn build_document(doc: &ResumeDocument, template: TemplateId) -> DocxDocument {
    let style = &template_style(template).docx;
    let mut builder = TreeBuilder {
        style,
        body: Vec::new(),
    };

    builder.header(doc);

    for (i, section) in present_sections(doc, template).into_iter().enumerate() {
        if i > 0 {
            builder.push(Paragraph::new().spacing(Some(SECTION_SPACER_BEFORE), None));
        }
        builder.section_title(section);
        match section {
            SectionKind::Summary => builder.summary(doc),
            SectionKind::Skills => builder.skills(doc),
            SectionKind::Experience => builder.experience(doc),
            SectionKind::Projects => builder.projects(doc),
            SectionKind::Education => builder.education(doc),
        }
    }

    DocxDocument {
        section: SectionProperties::a4(style.margin_twips),
        body: builder.body,
    }
}

/// Renders `doc` as DOCX bytes under `template`.
///
/// Name, email, phone and address must all be filled in; otherwise this
/// fails with [`RenderError::Validation`] before any tree is built.
pub async fn render_docx(
    doc: &ResumeDocument,
    template: TemplateId,
) -> Result<Vec<u8>, RenderError> {
    let missing = doc.personal.missing_required();
    if !missing.is_empty() {
        return Err(RenderError::Validation(
            missing.into_iter().map(str::to_string).collect(),
        ));
    }

    let tree = build_document(doc, template);
    let bytes = tokio::task::spawn_blocking(move || package::package(&tree)).await??;

    if bytes.is_empty() {
        return Err(RenderError::EmptyOutput(ExportFormat::Docx));
    }
    debug!(template = %template, bytes = bytes.len(), "docx rendered");
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
