//! Export boundary: runs a renderer, names the artifact and optionally
//! archives it to disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::models::{ResumeDocument, TemplateId};
use crate::render::{render_docx, render_pdf, ExportFormat, RenderError};

pub const DEFAULT_FILE_BASE: &str = "resume";

/// A finished artifact ready for delivery.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Bytes,
}

/// Builds `<base>.<ext>`, stripping path separators and control characters
/// from `base` and falling back to `resume` when nothing usable is left.
pub fn artifact_file_name(base: Option<&str>, format: ExportFormat) -> String {
    let cleaned: String = base
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '"'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').trim();
    let stem = match cleaned {
        "" => DEFAULT_FILE_BASE,
        stem => stem,
    };
    let stem = stem
        .strip_suffix(&format!(".{}", format.extension()))
        .unwrap_or(stem);
    format!("{stem}.{}", format.extension())
}

/// Renders `doc` in `format` under `template`.
pub async fn export(
    doc: &ResumeDocument,
    template: TemplateId,
    format: ExportFormat,
    file_base: Option<&str>,
) -> Result<ExportedFile, RenderError> {
    let bytes = match format {
        ExportFormat::Pdf => render_pdf(doc, template)?,
        ExportFormat::Docx => render_docx(doc, template).await?,
    };
    if bytes.is_empty() {
        return Err(RenderError::EmptyOutput(format));
    }

    Ok(ExportedFile {
        file_name: artifact_file_name(file_base, format),
        format,
        bytes: Bytes::from(bytes),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Sinks
// ────────────────────────────────────────────────────────────────────────────

/// Destination for finished artifacts.
///
/// Carried in `AppState` as `Option<Arc<dyn ArtifactSink>>`.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Stores `file`, returning where it ended up.
    async fn deliver(&self, file: &ExportedFile) -> Result<PathBuf, RenderError>;
}

/// Archives artifacts into a directory.
///
/// Each file is written to a temporary file in the target directory and
/// renamed into place once complete, so an interrupted export never leaves a
/// partial file behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn write_atomically(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, RenderError> {
    use std::io::Write;

    std::fs::create_dir_all(dir)?;
    let target = dir.join(file_name);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| RenderError::Io(e.error))?;
    Ok(target)
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, file: &ExportedFile) -> Result<PathBuf, RenderError> {
        let dir = self.dir.clone();
        let file_name = file.file_name.clone();
        let bytes = file.bytes.clone();

        let path =
            tokio::task::spawn_blocking(move || write_atomically(&dir, &file_name, &bytes))
                .await??;

        info!(path = %path.display(), bytes = file.bytes.len(), "Artifact archived");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Personal;

    fn jane() -> ResumeDocument {
        ResumeDocument {
            personal: Personal {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "5551234567".to_string(),
                address: "Berlin".to_string(),
                linkedin: None,
                summary: String::new(),
            },
            skills: vec!["Go".to_string(), "Rust".to_string(), "SQL".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_file_name_defaults_and_sanitizes() {
        assert_eq!(artifact_file_name(None, ExportFormat::Pdf), "resume.pdf");
        assert_eq!(artifact_file_name(Some("   "), ExportFormat::Docx), "resume.docx");
        assert_eq!(
            artifact_file_name(Some("../../etc/passwd"), ExportFormat::Pdf),
            "etcpasswd.pdf"
        );
        assert_eq!(
            artifact_file_name(Some("jane\n\"cv\""), ExportFormat::Docx),
            "janecv.docx"
        );
        assert_eq!(artifact_file_name(Some("jane.pdf"), ExportFormat::Pdf), "jane.pdf");
    }

    #[tokio::test]
    async fn test_export_without_email_docx_fails_pdf_succeeds() {
        let mut doc = jane();
        doc.personal.email.clear();

        let docx = export(&doc, TemplateId::Freshie, ExportFormat::Docx, None).await;
        assert!(matches!(docx, Err(RenderError::Validation(_))));

        let pdf = export(&doc, TemplateId::Freshie, ExportFormat::Pdf, None)
            .await
            .unwrap();
        assert_eq!(pdf.file_name, "resume.pdf");
        assert!(!pdf.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_jane_exports_both_formats() {
        let doc = jane();
        let pdf = export(&doc, TemplateId::Freshie, ExportFormat::Pdf, None)
            .await
            .unwrap();
        let docx = export(&doc, TemplateId::Freshie, ExportFormat::Docx, None)
            .await
            .unwrap();
        assert_eq!(pdf.file_name, "resume.pdf");
        assert_eq!(docx.file_name, "resume.docx");
        assert!(!docx.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_exports_nothing() {
        let result = export(
            &ResumeDocument::default(),
            TemplateId::Experienced,
            ExportFormat::Pdf,
            None,
        )
        .await;
        assert!(matches!(result, Err(RenderError::MissingData)));
    }

    #[tokio::test]
    async fn test_directory_sink_writes_complete_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("archive"));
        let file = export(&jane(), TemplateId::Freshie, ExportFormat::Pdf, Some("jane"))
            .await
            .unwrap();

        let path = sink.deliver(&file).await.unwrap();
        assert_eq!(path, sink.dir().join("jane.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), file.bytes.to_vec());

        let entries: Vec<_> = std::fs::read_dir(sink.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1, "no temporary files left behind");
    }
}
