//! PDF renderer.
//!
//! Two phases. A cursor layout walks the resume top to bottom in millimetres
//! (origin top-left, `y` is the baseline of the next line) and emits
//! [`DrawOp`]s per page, breaking pages with `ensure_space`. The ops are then
//! encoded with `pdf-writer` using the Type1 Helvetica family.
//!
//! Text is always wrapped before the page-break check so `ensure_space` sees
//! the real multi-line height of what is about to be drawn.

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::layout::contract::{
    bulleted, date_range, job_line, or_placeholder, placeholders, present_sections, skill_rows,
    SectionKind,
};
use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::layout::template::{template_style, Alignment, PdfStyle, Rgb, TemplateStyle};
use crate::models::{ResumeDocument, TemplateId};
use crate::render::RenderError;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
/// Points per millimetre.
const MM_TO_PT: f32 = 72.0 / 25.4;
/// Gap between a centered section title and its flanking rules.
const TITLE_RULE_GAP_MM: f32 = 4.0;
/// Offset of an entry's detail line from the margin.
const DETAIL_INDENT_MM: f32 = 5.0;
const ENTRY_GAP_MM: f32 = 2.0;

const PRODUCER: &str = "cvforge";

// ────────────────────────────────────────────────────────────────────────────
// Drawing commands
// ────────────────────────────────────────────────────────────────────────────

/// One drawing command. Coordinates are millimetres from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline starts at `(x, y)`.
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width_pt: f32,
        color: Rgb,
    },
    /// Invisible clickable region; `(x, y)` is its top-left corner.
    Link {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        uri: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub ops: Vec<DrawOp>,
}

/// Rendered width of `text` in millimetres.
fn text_width_mm(text: &str, face: FontFace, size: f32) -> f32 {
    get_metrics(face).text_width(text, size) / MM_TO_PT
}

fn wrap_mm(text: &str, face: FontFace, size: f32, max_width_mm: f32) -> Vec<String> {
    get_metrics(face).wrap(text, size, max_width_mm * MM_TO_PT)
}

/// Cap height approximation used to size link regions and title rules.
fn cap_height_mm(size: f32) -> f32 {
    size * 0.72 / MM_TO_PT
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor layout
// ────────────────────────────────────────────────────────────────────────────

struct Cursor<'a> {
    style: &'a PdfStyle,
    pages: Vec<PdfPage>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(style: &'a PdfStyle) -> Self {
        Self {
            style,
            pages: vec![PdfPage::default()],
            y: style.margin_mm + style.top_padding_mm,
        }
    }

    fn top(&self) -> f32 {
        self.style.margin_mm + self.style.top_padding_mm
    }

    fn bottom(&self) -> f32 {
        A4_HEIGHT_MM - self.style.margin_mm - self.style.bottom_padding_mm
    }

    fn left(&self) -> f32 {
        self.style.margin_mm
    }

    fn right(&self) -> f32 {
        A4_WIDTH_MM - self.style.margin_mm
    }

    fn content_width(&self) -> f32 {
        self.right() - self.left()
    }

    /// Starts a new page when `needed` millimetres do not fit below the cursor.
    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > self.bottom() {
            self.new_page();
        }
    }

    /// Like `ensure_space`, but only when the block could fit on a fresh page.
    /// Taller blocks start where they are and break line by line.
    fn keep_together(&mut self, needed: f32) {
        if needed <= self.bottom() - self.top() {
            self.ensure_space(needed);
        }
    }

    fn new_page(&mut self) {
        debug!(page = self.pages.len() + 1, "pdf page break");
        self.pages.push(PdfPage::default());
        self.y = self.top();
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, text: &str, face: FontFace, size: f32, color: Rgb) {
        if text.is_empty() {
            return;
        }
        let y = self.y;
        self.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            face,
            size,
            color,
        });
    }

    fn text_right(&mut self, text: &str, face: FontFace, size: f32, color: Rgb) {
        let x = self.right() - text_width_mm(text, face, size);
        self.text(x, text, face, size, color);
    }

    fn text_centered(&mut self, text: &str, face: FontFace, size: f32, color: Rgb) {
        let x = (A4_WIDTH_MM - text_width_mm(text, face, size)) / 2.0;
        self.text(x, text, face, size, color);
    }

    fn line(&mut self, x1: f32, x2: f32, y: f32) {
        let width_pt = self.style.rule_width_pt;
        self.push(DrawOp::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width_pt,
            color: Rgb::BLACK,
        });
    }

    /// Link text in the template's link color with a clickable region over it.
    fn link(&mut self, x: f32, text: &str, size: f32, uri: String) {
        let width = text_width_mm(text, FontFace::Regular, size);
        let height = size / MM_TO_PT;
        let color = self.style.link_color;
        self.text(x, text, FontFace::Regular, size, color);
        let y = self.y - cap_height_mm(size);
        self.push(DrawOp::Link {
            x,
            y,
            width,
            height,
            uri,
        });
    }

    /// Wraps a header field to the content width and draws it line by line,
    /// as a link to `uri` when given. Blank text draws nothing.
    fn header_text(
        &mut self,
        text: &str,
        face: FontFace,
        size: f32,
        advance: f32,
        align: Alignment,
        uri: Option<&str>,
    ) {
        for line in wrap_mm(text, face, size, self.content_width()) {
            self.ensure_space(advance);
            let x = match align {
                Alignment::Left => self.left(),
                Alignment::Center => (A4_WIDTH_MM - text_width_mm(&line, face, size)) / 2.0,
            };
            match uri {
                Some(uri) => self.link(x, &line, size, uri.to_string()),
                None => self.text(x, &line, face, size, Rgb::BLACK),
            }
            self.y += advance;
        }
    }

    /// Draws pre-wrapped lines at `x`, one `advance` apart, breaking pages
    /// between lines when needed.
    fn lines(&mut self, x: f32, lines: &[String], face: FontFace, size: f32, advance: f32) {
        for line in lines {
            self.ensure_space(advance);
            self.text(x, line, face, size, Rgb::BLACK);
            self.y += advance;
        }
    }
}

/// Lays out `doc` into pages of drawing commands.
pub fn layout_pdf(doc: &ResumeDocument, template: TemplateId) -> Vec<PdfPage> {
    let style = template_style(template);
    let mut cursor = Cursor::new(&style.pdf);

    match style.alignment {
        Alignment::Center => centered_header(&mut cursor, doc),
        Alignment::Left => left_header(&mut cursor, doc),
    }

    for section in present_sections(doc, template) {
        section_title(&mut cursor, style, section);
        match section {
            SectionKind::Summary => summary(&mut cursor, doc),
            SectionKind::Skills => skills(&mut cursor, style, doc),
            SectionKind::Experience => experience(&mut cursor, doc),
            SectionKind::Projects => projects(&mut cursor, doc),
            SectionKind::Education => education(&mut cursor, doc),
        }
        cursor.y += cursor.style.section_spacing_mm;
    }

    cursor.pages
}

fn mailto(email: &str) -> String {
    format!("mailto:{email}")
}

fn centered_header(cursor: &mut Cursor, doc: &ResumeDocument) {
    let s = cursor.style;
    let personal = &doc.personal;
    let center = Alignment::Center;

    let name = personal.name.trim().to_uppercase();
    cursor.header_text(&name, FontFace::Bold, s.name_size, 10.0, center, None);

    let email = personal.email.trim();
    let rest: Vec<&str> = [personal.phone.trim(), personal.address.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    let tail = rest.join(" | ");
    let size = s.contact_size;
    let advance = s.contact_advance_mm;

    let joined = format!(" | {tail}");
    let email_w = text_width_mm(email, FontFace::Regular, size);
    let total = email_w + text_width_mm(&joined, FontFace::Regular, size);

    if !email.is_empty() && !tail.is_empty() && total <= cursor.content_width() {
        let x = (A4_WIDTH_MM - total) / 2.0;
        cursor.link(x, email, size, mailto(email));
        cursor.text(x + email_w, &joined, FontFace::Regular, size, Rgb::BLACK);
        cursor.y += advance;
    } else {
        // Email and the rest each wrap on their own lines.
        if !email.is_empty() {
            let uri = mailto(email);
            cursor.header_text(email, FontFace::Regular, size, advance, center, Some(&uri));
        }
        cursor.header_text(&tail, FontFace::Regular, size, advance, center, None);
    }

    if let Some(url) = personal.linkedin_url() {
        cursor.header_text(url, FontFace::Regular, size, advance, center, Some(url));
    }

    let (left, right, y) = (cursor.left() + 1.0, cursor.right() - 1.0, cursor.y);
    cursor.line(left, right, y);
    cursor.y += 8.0;
}

fn left_header(cursor: &mut Cursor, doc: &ResumeDocument) {
    let s = cursor.style;
    let personal = &doc.personal;
    let left = Alignment::Left;
    let advance = s.contact_advance_mm;

    cursor.header_text(personal.name.trim(), FontFace::Bold, s.name_size, 8.0, left, None);

    let email = personal.email.trim();
    if !email.is_empty() {
        let uri = mailto(email);
        cursor.header_text(email, FontFace::Regular, s.contact_size, advance, left, Some(&uri));
    }
    for field in [personal.phone.trim(), personal.address.trim()] {
        cursor.header_text(field, FontFace::Regular, s.contact_size, advance, left, None);
    }
    if let Some(url) = personal.linkedin_url() {
        cursor.header_text(url, FontFace::Regular, s.contact_size, advance, left, Some(url));
    }

    cursor.y += 3.0;
    let (left, right, y) = (cursor.left(), cursor.right(), cursor.y);
    cursor.line(left, right, y);
    cursor.y += 5.0;
}

fn section_title(cursor: &mut Cursor, style: &TemplateStyle, section: SectionKind) {
    let s = cursor.style;
    cursor.ensure_space(s.line_height_mm * s.section_reserve_lines);

    let title = section.title().to_uppercase();
    let size = s.section_title_size;
    let width = text_width_mm(&title, FontFace::Bold, size);

    match style.alignment {
        Alignment::Center => {
            cursor.text_centered(&title, FontFace::Bold, size, Rgb::BLACK);
            let rule_y = cursor.y - cap_height_mm(size) / 2.0;
            let title_left = (A4_WIDTH_MM - width) / 2.0;
            let (left, right) = (cursor.left(), cursor.right());
            cursor.line(left, title_left - TITLE_RULE_GAP_MM, rule_y);
            cursor.line(title_left + width + TITLE_RULE_GAP_MM, right, rule_y);
        }
        Alignment::Left => {
            cursor.y += 4.0;
            let x = cursor.left();
            cursor.text(x, &title, FontFace::Bold, size, Rgb::BLACK);
            let underline_y = cursor.y + 2.0;
            cursor.line(x, x + width, underline_y);
        }
    }
    cursor.y += 10.0;
}

fn summary(cursor: &mut Cursor, doc: &ResumeDocument) {
    let s = cursor.style;
    let x = cursor.left() + s.body_indent_mm;
    let lines = wrap_mm(
        doc.summary().unwrap_or_default(),
        FontFace::Regular,
        s.body_size,
        cursor.content_width() - s.body_indent_mm,
    );
    cursor.keep_together(lines.len() as f32 * s.line_height_mm);
    cursor.lines(x, &lines, FontFace::Regular, s.body_size, s.line_height_mm);
}

fn skills(cursor: &mut Cursor, style: &TemplateStyle, doc: &ResumeDocument) {
    let s = cursor.style;
    let advance = s.skill_row_advance_mm;

    match style.alignment {
        Alignment::Left => {
            let col_width = cursor.content_width() / 2.0;
            for (left, right) in skill_rows(&doc.skills) {
                let left_lines =
                    wrap_mm(&bulleted(left), FontFace::Regular, s.body_size, col_width - 2.0);
                let right_lines = right
                    .map(|skill| {
                        wrap_mm(&bulleted(skill), FontFace::Regular, s.body_size, col_width - 2.0)
                    })
                    .unwrap_or_default();
                let rows = left_lines.len().max(right_lines.len()).max(1);
                cursor.ensure_space(rows as f32 * advance);

                let top = cursor.y;
                let left_x = cursor.left() + s.skill_indent_mm;
                for (i, line) in left_lines.iter().enumerate() {
                    cursor.y = top + i as f32 * advance;
                    cursor.text(left_x, line, FontFace::Regular, s.body_size, Rgb::BLACK);
                }
                let right_x = cursor.left() + col_width;
                for (i, line) in right_lines.iter().enumerate() {
                    cursor.y = top + i as f32 * advance;
                    cursor.text(right_x, line, FontFace::Regular, s.body_size, Rgb::BLACK);
                }
                cursor.y = top + rows as f32 * advance;
            }
        }
        Alignment::Center => {
            let x = cursor.left() + s.skill_indent_mm;
            let width = cursor.content_width() - s.skill_indent_mm;
            for skill in &doc.skills {
                let lines = wrap_mm(&bulleted(skill), FontFace::Regular, s.body_size, width);
                cursor.keep_together(lines.len() as f32 * advance);
                cursor.lines(x, &lines, FontFace::Regular, s.body_size, advance);
            }
        }
    }
}

/// Draws `title` wrapped in bold with `right` aligned to the right margin on
/// its first line, keeping the heading together with `following` millimetres
/// of content.
fn entry_heading(
    cursor: &mut Cursor,
    title: &str,
    title_size: f32,
    right: &str,
    right_size: f32,
    advance: f32,
    following: f32,
) {
    let s = cursor.style;
    let right_w = text_width_mm(right, FontFace::Regular, right_size);
    let room = (cursor.content_width() - right_w - DETAIL_INDENT_MM).max(cursor.content_width() / 3.0);
    let lines = wrap_mm(title, FontFace::Bold, title_size, room);
    let lines = if lines.is_empty() { vec![String::new()] } else { lines };

    cursor.keep_together(lines.len() as f32 * advance + following);
    cursor.text_right(right, FontFace::Regular, right_size, s.muted_color);
    let x = cursor.left();
    cursor.lines(x, &lines, FontFace::Bold, title_size, advance);
}

fn task_lines(cursor: &Cursor, task: &str, size: f32) -> Vec<String> {
    let s = cursor.style;
    wrap_mm(
        &bulleted(task.trim()),
        FontFace::Regular,
        size,
        cursor.content_width() - s.task_indent_mm,
    )
}

fn experience(cursor: &mut Cursor, doc: &ResumeDocument) {
    let s = cursor.style;
    for exp in &doc.experience {
        let dates = date_range(&exp.start_date, &exp.end_date);
        let job = job_line(&exp.job_title, exp.location.as_deref());
        let job_lines = wrap_mm(
            &job,
            FontFace::Regular,
            s.body_size,
            cursor.content_width() - DETAIL_INDENT_MM,
        );
        let first_task = exp
            .tasks
            .first()
            .map(|_| s.experience_task_advance_mm)
            .unwrap_or(0.0);

        entry_heading(
            cursor,
            exp.company.trim(),
            s.entry_title_size,
            &dates,
            s.body_size,
            s.entry_title_advance_mm,
            job_lines.len() as f32 * s.job_line_advance_mm + first_task,
        );

        let x = cursor.left() + DETAIL_INDENT_MM;
        for line in &job_lines {
            cursor.ensure_space(s.job_line_advance_mm);
            cursor.text(x, line, FontFace::Regular, s.body_size, s.muted_color);
            cursor.y += s.job_line_advance_mm;
        }

        let x = cursor.left() + s.task_indent_mm;
        for task in &exp.tasks {
            let lines = task_lines(cursor, task, s.body_size);
            cursor.keep_together(lines.len() as f32 * s.experience_task_advance_mm);
            cursor.lines(x, &lines, FontFace::Regular, s.body_size, s.experience_task_advance_mm);
        }
        cursor.y += ENTRY_GAP_MM;
    }
}

fn projects(cursor: &mut Cursor, doc: &ResumeDocument) {
    let s = cursor.style;
    for project in &doc.projects {
        let name = or_placeholder(&project.name, placeholders::UNTITLED_PROJECT);
        let name_lines = wrap_mm(name, FontFace::Bold, s.entry_title_size, cursor.content_width());
        let first_task = project
            .tasks
            .first()
            .map(|_| s.project_task_advance_mm)
            .unwrap_or(0.0);
        cursor.keep_together(name_lines.len() as f32 * s.entry_title_advance_mm + first_task);
        let x = cursor.left();
        cursor.lines(x, &name_lines, FontFace::Bold, s.entry_title_size, s.entry_title_advance_mm);

        let x = cursor.left() + s.task_indent_mm;
        for task in &project.tasks {
            let lines = task_lines(cursor, task, s.body_size);
            cursor.keep_together(lines.len() as f32 * s.project_task_advance_mm);
            cursor.lines(x, &lines, FontFace::Regular, s.body_size, s.project_task_advance_mm);
            cursor.y += s.project_task_gap_mm;
        }
        cursor.y += ENTRY_GAP_MM;
    }
}

fn education(cursor: &mut Cursor, doc: &ResumeDocument) {
    let s = cursor.style;
    for edu in &doc.education {
        let advance = s.education_advance_mm;
        entry_heading(
            cursor,
            edu.institution.trim(),
            s.education_title_size,
            edu.graduation_date.trim(),
            s.education_detail_size,
            advance,
            advance,
        );

        let location = edu.location.as_deref().unwrap_or_default().trim();
        let location_w = text_width_mm(location, FontFace::Regular, s.education_detail_size);
        let lines = wrap_mm(
            edu.course.trim(),
            FontFace::Italic,
            s.education_detail_size,
            (cursor.content_width() - location_w - DETAIL_INDENT_MM).max(cursor.content_width() / 3.0),
        );
        cursor.keep_together(lines.len().max(1) as f32 * advance);
        cursor.text_right(location, FontFace::Regular, s.education_detail_size, s.muted_color);
        let x = cursor.left();
        if lines.is_empty() {
            cursor.y += advance;
        }
        cursor.lines(x, &lines, FontFace::Italic, s.education_detail_size, advance);
        cursor.y += ENTRY_GAP_MM;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Encoding
// ────────────────────────────────────────────────────────────────────────────

/// Encodes text for a WinAnsiEncoding font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// PDF user-space y for a top-origin millimetre coordinate.
fn pdf_y(y_mm: f32) -> f32 {
    (A4_HEIGHT_MM - y_mm) * MM_TO_PT
}

fn encode_page_content(page: &PdfPage) -> Vec<u8> {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                face,
                size,
                color,
            } => {
                let (r, g, b) = color.unit();
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(face.resource_name()), *size);
                content.next_line(x * MM_TO_PT, pdf_y(*y));
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width_pt,
                color,
            } => {
                let (r, g, b) = color.unit();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width_pt);
                content.move_to(x1 * MM_TO_PT, pdf_y(*y1));
                content.line_to(x2 * MM_TO_PT, pdf_y(*y2));
                content.stroke();
            }
            DrawOp::Link { .. } => {}
        }
    }
    content.finish()
}

/// Writes the page's link regions as inline URI annotations.
fn write_link_annotations(writer: &mut pdf_writer::writers::Page, page: &PdfPage) {
    let mut links = page
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Link {
                x,
                y,
                width,
                height,
                uri,
            } => Some((*x, *y, *width, *height, uri)),
            _ => None,
        })
        .peekable();
    if links.peek().is_none() {
        return;
    }

    let mut annotations = writer.annotations();
    for (x, y, width, height, uri) in links {
        let mut annotation = annotations.push();
        annotation.subtype(AnnotationType::Link).rect(Rect::new(
            x * MM_TO_PT,
            pdf_y(y + height),
            (x + width) * MM_TO_PT,
            pdf_y(y),
        ));
        annotation.border_style().width(0.0);
        annotation
            .action()
            .action_type(ActionType::Uri)
            .uri(Str(uri.as_bytes()));
    }
}

/// Serializes laid-out pages into a PDF file.
pub fn encode_pdf(pages: &[PdfPage], title: &str) -> Vec<u8> {
    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let tree_id = alloc();
    let info_id = alloc();
    let font_ids: Vec<(FontFace, Ref)> = FontFace::ALL.iter().map(|face| (*face, alloc())).collect();

    // (page, content stream) per page.
    let page_refs: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc(), alloc())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_refs.iter().map(|(page, _)| *page))
        .count(page_refs.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    for (face, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let media_box = Rect::new(0.0, 0.0, A4_WIDTH_MM * MM_TO_PT, A4_HEIGHT_MM * MM_TO_PT);

    for (page, (page_id, content_id)) in pages.iter().zip(&page_refs) {
        {
            let mut writer = pdf.page(*page_id);
            writer
                .media_box(media_box)
                .parent(tree_id)
                .contents(*content_id);
            write_link_annotations(&mut writer, page);
            let mut resources = writer.resources();
            let mut fonts = resources.fonts();
            for (face, id) in &font_ids {
                fonts.pair(Name(face.resource_name()), *id);
            }
        }

        pdf.stream(*content_id, &encode_page_content(page));
    }

    pdf.finish()
}

/// Renders `doc` as PDF bytes under `template`.
///
/// Fails with [`RenderError::MissingData`] when the document carries no
/// personal information at all.
pub fn render_pdf(doc: &ResumeDocument, template: TemplateId) -> Result<Vec<u8>, RenderError> {
    if !doc.personal.has_content() {
        return Err(RenderError::MissingData);
    }

    let pages = layout_pdf(doc, template);
    let title = match doc.personal.name.trim() {
        "" => "Resume".to_string(),
        name => format!("{name} Resume"),
    };
    let bytes = encode_pdf(&pages, &title);
    debug!(
        template = %template,
        pages = pages.len(),
        bytes = bytes.len(),
        "pdf rendered"
    );
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
