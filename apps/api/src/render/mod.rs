// Renderers: PDF drawing commands, the DOCX object tree and the paginated
// HTML preview. All of them read the same `ResumeDocument` snapshot and the
// shared layout contract; none of them touch configuration or global state.

pub mod docx;
pub mod pdf;
pub mod preview;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use docx::render_docx;
pub use pdf::render_pdf;
pub use preview::{PreviewPage, PreviewSession};

/// Downloadable artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Errors produced while turning a resume into an artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no resume data to render")]
    MissingData,

    #[error("missing personal details: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0} renderer produced an empty document")]
    EmptyOutput(ExportFormat),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("packaging failed: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for RenderError {
    fn from(e: tokio::task::JoinError) -> Self {
        RenderError::Task(e.to_string())
    }
}
