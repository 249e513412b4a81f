//! OOXML packaging: serializes a [`DocxDocument`] to WordprocessingML parts
//! with `quick-xml` and zips them into a `.docx` container.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::model::{
    Border, BodyNode, DocxDocument, Inline, Paragraph, Run, TabAlignment, Table, TableCell,
};
use crate::layout::template::Alignment;
use crate::render::RenderError;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

/// Relationship id of the styles part; hyperlinks are numbered after it.
const STYLES_REL_ID: &str = "rId1";

type XmlWriter = Writer<Cursor<Vec<u8>>>;
type XmlResult = Result<(), quick_xml::Error>;

// ────────────────────────────────────────────────────────────────────────────
// XML helpers
// ────────────────────────────────────────────────────────────────────────────

fn new_part() -> Result<XmlWriter, quick_xml::Error> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for attr in attrs {
        elem.push_attribute(*attr);
    }
    elem
}

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    w.write_event(Event::Start(element(name, attrs)))
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    w.write_event(Event::Empty(element(name, attrs)))
}

fn end(w: &mut XmlWriter, name: &str) -> XmlResult {
    w.write_event(Event::End(BytesEnd::new(name)))
}

/// Drops characters XML 1.0 does not allow (C0 controls other than tab, line
/// feed and carriage return, plus U+FFFE and U+FFFF).
fn xml_safe(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        !matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
    };
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| allowed(*c)).collect())
    }
}

fn finish_part(w: XmlWriter) -> Vec<u8> {
    w.into_inner().into_inner()
}

// ────────────────────────────────────────────────────────────────────────────
// word/document.xml
// ────────────────────────────────────────────────────────────────────────────

struct DocumentWriter {
    w: XmlWriter,
    /// Next hyperlink relationship number.
    next_rel: usize,
    content_width: u32,
}

impl DocumentWriter {
    fn paragraph(&mut self, p: &Paragraph) -> XmlResult {
        start(&mut self.w, "w:p", &[])?;

        let has_props = !p.tab_stops.is_empty()
            || p.spacing_before.is_some()
            || p.spacing_after.is_some()
            || p.indent_left.is_some()
            || p.alignment.is_some();
        if has_props {
            start(&mut self.w, "w:pPr", &[])?;
            if !p.tab_stops.is_empty() {
                start(&mut self.w, "w:tabs", &[])?;
                for tab in &p.tab_stops {
                    let val = match tab.alignment {
                        TabAlignment::Left => "left",
                        TabAlignment::Right => "right",
                    };
                    empty(
                        &mut self.w,
                        "w:tab",
                        &[("w:val", val), ("w:pos", tab.position.to_string().as_str())],
                    )?;
                }
                end(&mut self.w, "w:tabs")?;
            }
            if p.spacing_before.is_some() || p.spacing_after.is_some() {
                let before = p.spacing_before.map(|v| v.to_string());
                let after = p.spacing_after.map(|v| v.to_string());
                let mut attrs = Vec::new();
                if let Some(before) = &before {
                    attrs.push(("w:before", before.as_str()));
                }
                if let Some(after) = &after {
                    attrs.push(("w:after", after.as_str()));
                }
                empty(&mut self.w, "w:spacing", &attrs)?;
            }
            if let Some(left) = p.indent_left {
                empty(&mut self.w, "w:ind", &[("w:left", left.to_string().as_str())])?;
            }
            if let Some(alignment) = p.alignment {
                let val = match alignment {
                    Alignment::Left => "left",
                    Alignment::Center => "center",
                };
                empty(&mut self.w, "w:jc", &[("w:val", val)])?;
            }
            end(&mut self.w, "w:pPr")?;
        }

        for inline in &p.content {
            match inline {
                Inline::Run(run) => self.run(run)?,
                Inline::Hyperlink { runs, .. } => {
                    let rel_id = format!("rId{}", self.next_rel);
                    self.next_rel += 1;
                    start(
                        &mut self.w,
                        "w:hyperlink",
                        &[("r:id", rel_id.as_str()), ("w:history", "1")],
                    )?;
                    for run in runs {
                        self.run(run)?;
                    }
                    end(&mut self.w, "w:hyperlink")?;
                }
            }
        }

        end(&mut self.w, "w:p")
    }

    fn run(&mut self, run: &Run) -> XmlResult {
        start(&mut self.w, "w:r", &[])?;

        let has_props =
            run.bold || run.italic || run.underline || run.size.is_some() || run.color.is_some();
        if has_props {
            start(&mut self.w, "w:rPr", &[])?;
            if run.bold {
                empty(&mut self.w, "w:b", &[])?;
            }
            if run.italic {
                empty(&mut self.w, "w:i", &[])?;
            }
            if let Some(color) = run.color {
                empty(&mut self.w, "w:color", &[("w:val", color.hex().as_str())])?;
            }
            if let Some(size) = run.size {
                let size = size.to_string();
                empty(&mut self.w, "w:sz", &[("w:val", size.as_str())])?;
                empty(&mut self.w, "w:szCs", &[("w:val", size.as_str())])?;
            }
            if run.underline {
                empty(&mut self.w, "w:u", &[("w:val", "single")])?;
            }
            end(&mut self.w, "w:rPr")?;
        }

        let text = xml_safe(&run.text);
        for (i, segment) in text.split('\t').enumerate() {
            if i > 0 {
                empty(&mut self.w, "w:tab", &[])?;
            }
            if !segment.is_empty() {
                start(&mut self.w, "w:t", &[("xml:space", "preserve")])?;
                self.w.write_event(Event::Text(BytesText::new(segment)))?;
                end(&mut self.w, "w:t")?;
            }
        }

        end(&mut self.w, "w:r")
    }

    fn border(&mut self, side: &str, border: Option<Border>) -> XmlResult {
        match border {
            Some(border) => empty(
                &mut self.w,
                side,
                &[
                    ("w:val", "single"),
                    ("w:sz", border.size.to_string().as_str()),
                    ("w:space", "0"),
                    ("w:color", border.color.hex().as_str()),
                ],
            ),
            None => empty(&mut self.w, side, &[("w:val", "none")]),
        }
    }

    fn table(&mut self, table: &Table) -> XmlResult {
        start(&mut self.w, "w:tbl", &[])?;

        start(&mut self.w, "w:tblPr", &[])?;
        empty(&mut self.w, "w:tblW", &[("w:w", "5000"), ("w:type", "pct")])?;
        start(&mut self.w, "w:tblBorders", &[])?;
        for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
            self.border(side, None)?;
        }
        end(&mut self.w, "w:tblBorders")?;
        empty(&mut self.w, "w:tblLayout", &[("w:type", "autofit")])?;
        end(&mut self.w, "w:tblPr")?;

        let columns = table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(1).max(1);
        let col_width = (self.content_width / columns as u32).to_string();
        start(&mut self.w, "w:tblGrid", &[])?;
        for _ in 0..columns {
            empty(&mut self.w, "w:gridCol", &[("w:w", col_width.as_str())])?;
        }
        end(&mut self.w, "w:tblGrid")?;

        for row in &table.rows {
            start(&mut self.w, "w:tr", &[])?;
            for cell in &row.cells {
                self.cell(cell, col_width.as_str())?;
            }
            end(&mut self.w, "w:tr")?;
        }

        end(&mut self.w, "w:tbl")
    }

    fn cell(&mut self, cell: &TableCell, width: &str) -> XmlResult {
        start(&mut self.w, "w:tc", &[])?;
        start(&mut self.w, "w:tcPr", &[])?;
        empty(&mut self.w, "w:tcW", &[("w:w", width), ("w:type", "dxa")])?;
        start(&mut self.w, "w:tcBorders", &[])?;
        self.border("w:top", cell.borders.top)?;
        self.border("w:left", cell.borders.left)?;
        self.border("w:bottom", cell.borders.bottom)?;
        self.border("w:right", cell.borders.right)?;
        end(&mut self.w, "w:tcBorders")?;
        end(&mut self.w, "w:tcPr")?;

        if cell.paragraphs.is_empty() {
            // A cell must hold at least one paragraph.
            self.paragraph(&Paragraph::new())?;
        }
        for p in &cell.paragraphs {
            self.paragraph(p)?;
        }
        end(&mut self.w, "w:tc")
    }
}

fn document_part(doc: &DocxDocument) -> Result<Vec<u8>, quick_xml::Error> {
    let section = &doc.section;
    let mut dw = DocumentWriter {
        w: new_part()?,
        next_rel: 2,
        content_width: section.page_width.saturating_sub(2 * section.margin),
    };

    start(&mut dw.w, "w:document", &[("xmlns:w", NS_MAIN), ("xmlns:r", NS_REL)])?;
    start(&mut dw.w, "w:body", &[])?;

    for node in &doc.body {
        match node {
            BodyNode::Paragraph(p) => dw.paragraph(p)?,
            BodyNode::Table(t) => dw.table(t)?,
        }
    }

    let margin = section.margin.to_string();
    start(&mut dw.w, "w:sectPr", &[])?;
    empty(
        &mut dw.w,
        "w:pgSz",
        &[
            ("w:w", section.page_width.to_string().as_str()),
            ("w:h", section.page_height.to_string().as_str()),
        ],
    )?;
    empty(
        &mut dw.w,
        "w:pgMar",
        &[
            ("w:top", margin.as_str()),
            ("w:right", margin.as_str()),
            ("w:bottom", margin.as_str()),
            ("w:left", margin.as_str()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    end(&mut dw.w, "w:sectPr")?;

    end(&mut dw.w, "w:body")?;
    end(&mut dw.w, "w:document")?;
    Ok(finish_part(dw.w))
}

// ────────────────────────────────────────────────────────────────────────────
// Package parts
// ────────────────────────────────────────────────────────────────────────────

fn content_types_part() -> Result<Vec<u8>, quick_xml::Error> {
    let mut w = new_part()?;
    start(&mut w, "Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    empty(&mut w, "Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
    empty(&mut w, "Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    empty(
        &mut w,
        "Override",
        &[("PartName", "/word/document.xml"), ("ContentType", CT_DOCUMENT)],
    )?;
    empty(
        &mut w,
        "Override",
        &[("PartName", "/word/styles.xml"), ("ContentType", CT_STYLES)],
    )?;
    end(&mut w, "Types")?;
    Ok(finish_part(w))
}

fn root_rels_part() -> Result<Vec<u8>, quick_xml::Error> {
    let mut w = new_part()?;
    start(&mut w, "Relationships", &[("xmlns", NS_PACKAGE_REL)])?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_OFFICE_DOCUMENT),
            ("Target", "word/document.xml"),
        ],
    )?;
    end(&mut w, "Relationships")?;
    Ok(finish_part(w))
}

fn document_rels_part(doc: &DocxDocument) -> Result<Vec<u8>, quick_xml::Error> {
    let mut w = new_part()?;
    start(&mut w, "Relationships", &[("xmlns", NS_PACKAGE_REL)])?;
    empty(
        &mut w,
        "Relationship",
        &[("Id", STYLES_REL_ID), ("Type", REL_STYLES), ("Target", "styles.xml")],
    )?;
    for (i, target) in doc.hyperlink_targets().into_iter().enumerate() {
        let id = format!("rId{}", i + 2);
        let target = xml_safe(target);
        empty(
            &mut w,
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", REL_HYPERLINK),
                ("Target", target.as_ref()),
                ("TargetMode", "External"),
            ],
        )?;
    }
    end(&mut w, "Relationships")?;
    Ok(finish_part(w))
}

fn styles_part() -> Result<Vec<u8>, quick_xml::Error> {
    let mut w = new_part()?;
    start(&mut w, "w:styles", &[("xmlns:w", NS_MAIN)])?;

    start(&mut w, "w:docDefaults", &[])?;
    start(&mut w, "w:rPrDefault", &[])?;
    start(&mut w, "w:rPr", &[])?;
    empty(
        &mut w,
        "w:rFonts",
        &[("w:ascii", "Calibri"), ("w:hAnsi", "Calibri"), ("w:cs", "Calibri")],
    )?;
    empty(&mut w, "w:sz", &[("w:val", "22")])?;
    empty(&mut w, "w:szCs", &[("w:val", "22")])?;
    end(&mut w, "w:rPr")?;
    end(&mut w, "w:rPrDefault")?;
    start(&mut w, "w:pPrDefault", &[])?;
    start(&mut w, "w:pPr", &[])?;
    empty(&mut w, "w:spacing", &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")])?;
    end(&mut w, "w:pPr")?;
    end(&mut w, "w:pPrDefault")?;
    end(&mut w, "w:docDefaults")?;

    start(
        &mut w,
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    empty(&mut w, "w:name", &[("w:val", "Normal")])?;
    empty(&mut w, "w:qFormat", &[])?;
    end(&mut w, "w:style")?;

    end(&mut w, "w:styles")?;
    Ok(finish_part(w))
}

/// Serializes and zips `doc` into `.docx` bytes. Blocking; run it off the
/// async executor.
pub fn package(doc: &DocxDocument) -> Result<Vec<u8>, RenderError> {
    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", content_types_part()?),
        ("_rels/.rels", root_rels_part()?),
        ("word/document.xml", document_part(doc)?),
        ("word/_rels/document.xml.rels", document_rels_part(doc)?),
        ("word/styles.xml", styles_part()?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in &parts {
        zip.start_file(*name, options)?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::template::Rgb;
    use crate::render::docx::model::{CellBorders, SectionProperties, TableRow};
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    fn sample() -> DocxDocument {
        DocxDocument {
            section: SectionProperties::a4(720),
            body: vec![
                BodyNode::Paragraph(
                    Paragraph::new()
                        .align(Alignment::Center)
                        .run(Run::new("JANE & CO").bold().size(36))
                        .hyperlink(
                            "mailto:jane@example.com",
                            Run::new("jane@example.com").underline().color(Rgb(0x0A, 0x66, 0xC2)),
                        ),
                ),
                BodyNode::Paragraph(
                    Paragraph::new()
                        .tab(TabAlignment::Right, 9350)
                        .run(Run::new("Acme\t01/2020 - 02/2023")),
                ),
                BodyNode::Table(Table {
                    rows: vec![TableRow {
                        cells: vec![TableCell {
                            paragraphs: vec![],
                            borders: CellBorders {
                                top: Some(Border { size: 14, color: Rgb::BLACK }),
                                ..Default::default()
                            },
                        }],
                    }],
                }),
            ],
        }
    }

    #[test]
    fn test_package_contains_all_parts() {
        let bytes = package(&sample()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_document_xml_escapes_text_and_writes_formatting() {
        let bytes = package(&sample()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("JANE &amp; CO"));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:sz w:val="36"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
        assert!(xml.contains(r#"<w:hyperlink r:id="rId2""#));
        assert!(xml.contains(r#"<w:color w:val="0A66C2"/>"#));
        assert!(xml.contains(r#"<w:u w:val="single"/>"#));
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    }

    #[test]
    fn test_tab_characters_become_tab_elements() {
        let bytes = package(&sample()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains(r#"<w:tab w:val="right" w:pos="9350"/>"#));
        assert!(xml.contains(
            r#"<w:t xml:space="preserve">Acme</w:t><w:tab/><w:t xml:space="preserve">01/2020 - 02/2023</w:t>"#
        ));
    }

    #[test]
    fn test_table_cells_get_borders_and_a_paragraph() {
        let bytes = package(&sample()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains(r#"<w:top w:val="single" w:sz="14" w:space="0" w:color="000000"/>"#));
        assert!(xml.contains("<w:tc><w:tcPr>"));
        assert!(xml.contains("</w:tcPr><w:p></w:p></w:tc>"));
    }

    #[test]
    fn test_hyperlinks_are_external_relationships() {
        let bytes = package(&sample()).unwrap();
        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Id="rId1""#));
        assert!(rels.contains(r#"Target="mailto:jane@example.com" TargetMode="External""#));
    }

    #[test]
    fn test_control_characters_are_dropped_from_text_and_targets() {
        let doc = DocxDocument {
            section: SectionProperties::a4(720),
            body: vec![BodyNode::Paragraph(
                Paragraph::new()
                    .run(Run::new("Pasted\u{0B}from\u{1}PDF\tok"))
                    .hyperlink("https://example.com/\u{7}jane", Run::new("profile")),
            )],
        };
        let bytes = package(&doc).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(!xml.bytes().any(|b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')));
        assert!(xml.contains(r#"<w:t xml:space="preserve">PastedfromPDF</w:t><w:tab/>"#));

        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="https://example.com/jane""#));
    }

    #[test]
    fn test_xml_safe_borrows_clean_text() {
        assert!(matches!(xml_safe("plain\ttext\n"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("a\u{0}b\u{FFFF}c"), "abc");
    }
}
