//! Declarative style tables keyed by template.
//!
//! Every renderer reads its fonts, sizes, colors, spacing and margins from
//! here instead of hard-coding them at the call site. PDF values are in
//! millimetres and points, DOCX values in twips and half-points, preview
//! values in CSS pixels.

use crate::models::TemplateId;

/// Horizontal alignment of header and body paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Upper-case hex without the leading `#` (the DOCX attribute format).
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Components scaled to 0.0–1.0 for PDF color operators.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Cursor-layout parameters for the PDF renderer.
#[derive(Debug, Clone)]
pub struct PdfStyle {
    pub margin_mm: f32,
    /// Extra space above the first line of every page.
    pub top_padding_mm: f32,
    pub bottom_padding_mm: f32,
    pub line_height_mm: f32,
    pub section_spacing_mm: f32,
    /// Space reserved before a section starts so titles never sit alone at a page foot.
    pub section_reserve_lines: f32,
    pub name_size: f32,
    pub contact_size: f32,
    pub contact_advance_mm: f32,
    pub section_title_size: f32,
    pub body_size: f32,
    pub entry_title_size: f32,
    pub entry_title_advance_mm: f32,
    pub job_line_advance_mm: f32,
    pub task_indent_mm: f32,
    pub experience_task_advance_mm: f32,
    pub project_task_advance_mm: f32,
    pub project_task_gap_mm: f32,
    pub skill_indent_mm: f32,
    pub skill_row_advance_mm: f32,
    /// Left offset of summary text from the margin.
    pub body_indent_mm: f32,
    pub education_title_size: f32,
    pub education_detail_size: f32,
    pub education_advance_mm: f32,
    pub link_color: Rgb,
    pub muted_color: Rgb,
    pub rule_width_pt: f32,
}

/// Run formatting for a DOCX text run. Sizes are half-points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub size: u32,
    pub color: Rgb,
}

/// Paragraph and run parameters for the DOCX renderer.
#[derive(Debug, Clone)]
pub struct DocxStyle {
    pub name: RunStyle,
    pub section: RunStyle,
    /// Glyphs of the rules flanking a centered section title.
    pub rule: RunStyle,
    pub text: RunStyle,
    pub list: RunStyle,
    /// Company name on an experience heading.
    pub entry_title: RunStyle,
    pub job_title: RunStyle,
    pub project_title: RunStyle,
    pub institution: RunStyle,
    /// Right-tabbed dates on experience and education headings.
    pub date: RunStyle,
    /// Course name on an education detail line.
    pub italics: RunStyle,
    /// Right-tabbed locations.
    pub detail: RunStyle,
    pub alignment: Alignment,
    pub margin_twips: u32,
    pub indent_twips: u32,
    /// Right tab stop used to push dates and locations to the right margin.
    pub right_tab_twips: u32,
    pub link_color: Rgb,
}

/// Box-model parameters used to measure preview blocks.
#[derive(Debug, Clone)]
pub struct PreviewStyle {
    pub padding_px: f32,
    pub name_px: f32,
    pub contact_px: f32,
    pub title_px: f32,
    pub body_px: f32,
    /// Line box height as a multiple of the font size.
    pub line_height: f32,
    pub header_gap_px: f32,
    pub section_gap_px: f32,
    pub item_gap_px: f32,
    pub task_indent_px: f32,
}

#[derive(Debug, Clone)]
pub struct TemplateStyle {
    pub id: TemplateId,
    pub alignment: Alignment,
    pub pdf: PdfStyle,
    pub docx: DocxStyle,
    pub preview: PreviewStyle,
}

/// LinkedIn brand blue used for hyperlinks in DOCX output.
pub const BRAND_BLUE: Rgb = Rgb(0x0A, 0x66, 0xC2);

static FRESHIE_TEMPLATE: TemplateStyle = TemplateStyle {
    id: TemplateId::Freshie,
    alignment: Alignment::Center,
    pdf: PdfStyle {
        margin_mm: 10.0,
        top_padding_mm: 15.0,
        bottom_padding_mm: 0.0,
        line_height_mm: 6.0,
        section_spacing_mm: 4.0,
        section_reserve_lines: 6.0,
        name_size: 20.0,
        contact_size: 12.0,
        contact_advance_mm: 6.0,
        section_title_size: 14.0,
        body_size: 12.0,
        entry_title_size: 12.0,
        entry_title_advance_mm: 6.0,
        job_line_advance_mm: 6.0,
        task_indent_mm: 10.0,
        experience_task_advance_mm: 6.0,
        project_task_advance_mm: 6.0,
        project_task_gap_mm: 0.0,
        skill_indent_mm: 10.0,
        skill_row_advance_mm: 7.0,
        body_indent_mm: 5.0,
        education_title_size: 12.0,
        education_detail_size: 12.0,
        education_advance_mm: 6.0,
        link_color: Rgb(10, 102, 194),
        muted_color: Rgb(85, 85, 85),
        rule_width_pt: 1.4,
    },
    docx: DocxStyle {
        name: RunStyle { bold: true, italic: false, size: 36, color: Rgb::BLACK },
        section: RunStyle { bold: true, italic: false, size: 24, color: Rgb::BLACK },
        rule: RunStyle { bold: true, italic: false, size: 14, color: Rgb::BLACK },
        text: RunStyle { bold: false, italic: false, size: 22, color: Rgb::BLACK },
        list: RunStyle { bold: false, italic: false, size: 22, color: Rgb::BLACK },
        entry_title: RunStyle { bold: true, italic: false, size: 26, color: Rgb::BLACK },
        job_title: RunStyle { bold: false, italic: false, size: 22, color: Rgb::BLACK },
        project_title: RunStyle { bold: true, italic: false, size: 24, color: Rgb::BLACK },
        institution: RunStyle { bold: true, italic: false, size: 24, color: Rgb::BLACK },
        date: RunStyle { bold: false, italic: false, size: 20, color: Rgb::BLACK },
        italics: RunStyle { bold: false, italic: true, size: 22, color: Rgb::BLACK },
        detail: RunStyle { bold: false, italic: true, size: 22, color: Rgb::BLACK },
        alignment: Alignment::Center,
        margin_twips: 720,
        indent_twips: 350,
        right_tab_twips: 9350,
        link_color: BRAND_BLUE,
    },
    preview: PreviewStyle {
        padding_px: 40.0,
        name_px: 28.0,
        contact_px: 14.0,
        title_px: 16.0,
        body_px: 14.0,
        line_height: 1.4,
        header_gap_px: 16.0,
        section_gap_px: 14.0,
        item_gap_px: 4.0,
        task_indent_px: 20.0,
    },
};

static EXPERIENCED_TEMPLATE: TemplateStyle = TemplateStyle {
    id: TemplateId::Experienced,
    alignment: Alignment::Left,
    pdf: PdfStyle {
        margin_mm: 20.0,
        top_padding_mm: 20.0,
        bottom_padding_mm: 0.0,
        line_height_mm: 6.0,
        section_spacing_mm: 4.0,
        section_reserve_lines: 6.0,
        name_size: 24.0,
        contact_size: 14.0,
        contact_advance_mm: 5.0,
        section_title_size: 16.0,
        body_size: 14.0,
        entry_title_size: 15.0,
        entry_title_advance_mm: 5.0,
        job_line_advance_mm: 5.0,
        task_indent_mm: 10.0,
        experience_task_advance_mm: 7.0,
        project_task_advance_mm: 6.0,
        project_task_gap_mm: 1.0,
        skill_indent_mm: 0.0,
        skill_row_advance_mm: 7.0,
        body_indent_mm: 0.0,
        education_title_size: 20.0,
        education_detail_size: 14.0,
        education_advance_mm: 8.0,
        link_color: Rgb(26, 115, 232),
        muted_color: Rgb(85, 85, 85),
        rule_width_pt: 1.4,
    },
    docx: DocxStyle {
        name: RunStyle { bold: true, italic: false, size: 36, color: Rgb::BLACK },
        section: RunStyle { bold: true, italic: false, size: 24, color: Rgb::BLACK },
        rule: RunStyle { bold: true, italic: false, size: 14, color: Rgb::BLACK },
        text: RunStyle { bold: false, italic: false, size: 22, color: Rgb::BLACK },
        list: RunStyle { bold: false, italic: false, size: 22, color: Rgb::BLACK },
        entry_title: RunStyle { bold: true, italic: false, size: 26, color: Rgb::BLACK },
        job_title: RunStyle { bold: false, italic: false, size: 26, color: Rgb::BLACK },
        project_title: RunStyle { bold: true, italic: false, size: 24, color: Rgb::BLACK },
        institution: RunStyle { bold: true, italic: false, size: 24, color: Rgb::BLACK },
        date: RunStyle { bold: false, italic: false, size: 20, color: Rgb::BLACK },
        italics: RunStyle { bold: false, italic: true, size: 22, color: Rgb::BLACK },
        detail: RunStyle { bold: false, italic: true, size: 22, color: Rgb::BLACK },
        alignment: Alignment::Left,
        margin_twips: 720,
        indent_twips: 350,
        right_tab_twips: 9350,
        link_color: BRAND_BLUE,
    },
    preview: PreviewStyle {
        padding_px: 48.0,
        name_px: 32.0,
        contact_px: 14.0,
        title_px: 18.0,
        body_px: 14.0,
        line_height: 1.45,
        header_gap_px: 20.0,
        section_gap_px: 16.0,
        item_gap_px: 4.0,
        task_indent_px: 24.0,
    },
};

/// Returns the static style table for a template.
pub fn template_style(id: TemplateId) -> &'static TemplateStyle {
    match id {
        TemplateId::Freshie => &FRESHIE_TEMPLATE,
        TemplateId::Experienced => &EXPERIENCED_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_lookup_matches_id() {
        assert_eq!(template_style(TemplateId::Freshie).id, TemplateId::Freshie);
        assert_eq!(template_style(TemplateId::Experienced).id, TemplateId::Experienced);
    }

    #[test]
    fn test_alignment_per_template() {
        assert_eq!(template_style(TemplateId::Freshie).alignment, Alignment::Center);
        assert_eq!(template_style(TemplateId::Experienced).alignment, Alignment::Left);
        assert_eq!(template_style(TemplateId::Freshie).docx.alignment, Alignment::Center);
    }

    #[test]
    fn test_rgb_hex_and_unit() {
        assert_eq!(BRAND_BLUE.hex(), "0A66C2");
        let (r, g, b) = Rgb(255, 0, 51).unit();
        assert!((r - 1.0).abs() < 1e-6 && g == 0.0 && (b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_experienced_margins_wider_than_freshie() {
        assert!(
            template_style(TemplateId::Experienced).pdf.margin_mm
                > template_style(TemplateId::Freshie).pdf.margin_mm
        );
    }
}
