//! Axum route handlers for the layout, preview, validation and export API.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::export;
use crate::layout::{build_blocks, Block};
use crate::models::{ResumeDocument, TemplateId};
use crate::render::{ExportFormat, PreviewPage};
use crate::state::AppState;
use crate::validation::{validate_document, ValidationReport};

const RENDER_ID_HEADER: &str = "x-render-id";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body shared by every resume endpoint.
#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub document: ResumeDocument,
    /// Overrides `document.templateId` when present.
    #[serde(default)]
    pub template: Option<TemplateId>,
    /// Artifact base name, without extension.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

impl ResumeRequest {
    pub fn template(&self) -> TemplateId {
        self.template.unwrap_or(self.document.template_id)
    }
}

#[derive(Debug, Serialize)]
pub struct BlocksResponse {
    pub template: TemplateId,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub session_id: Uuid,
    pub revision: u64,
    /// True when a newer edit replaced this refresh; `pages` then holds the
    /// last published preview.
    pub superseded: bool,
    pub pages: Vec<PreviewPage>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout/blocks
///
/// Returns the block sequence the preview paginates.
pub async fn handle_blocks(Json(request): Json<ResumeRequest>) -> Json<BlocksResponse> {
    let template = request.template();
    Json(BlocksResponse {
        template,
        blocks: build_blocks(&request.document, template),
    })
}

/// POST /api/v1/preview
///
/// Debounced re-pagination for an editing session. Pass the returned
/// `session_id` back on every edit so bursts collapse into one refresh.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Json<PreviewResponse> {
    let template = request.template();
    let (session_id, session) = state.preview_session(request.session_id);

    let (published, superseded) = match session
        .refresh(&request.document, template, state.config.preview_settle)
        .await
    {
        Some(published) => (published, false),
        None => (session.current(), true),
    };

    Json(PreviewResponse {
        session_id,
        revision: published.revision,
        superseded,
        pages: published.pages.as_ref().clone(),
    })
}

/// POST /api/v1/validate
pub async fn handle_validate(Json(request): Json<ResumeRequest>) -> Json<ValidationReport> {
    let template = request.template();
    Json(validate_document(&request.document, template))
}

/// POST /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Response, AppError> {
    export_response(&state, request, ExportFormat::Pdf).await
}

/// POST /api/v1/export/docx
pub async fn handle_export_docx(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Response, AppError> {
    export_response(&state, request, ExportFormat::Docx).await
}

async fn export_response(
    state: &AppState,
    request: ResumeRequest,
    format: ExportFormat,
) -> Result<Response, AppError> {
    let render_id = Uuid::new_v4();
    let template = request.template();
    let file_base = request
        .file_name
        .as_deref()
        .unwrap_or(state.config.default_file_name.as_str());

    let file = export(&request.document, template, format, Some(file_base)).await?;

    if let Some(sink) = &state.sink {
        sink.deliver(&file).await?;
    }

    info!(
        render_id = %render_id,
        format = %format,
        template = %template,
        bytes = file.bytes.len(),
        file_name = %file.file_name,
        "Export complete"
    );

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file.file_name
    ))
    .map_err(|e| AppError::Internal(e.into()))?;
    let render_id = HeaderValue::from_str(&render_id.to_string())
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
            (HeaderName::from_static(RENDER_ID_HEADER), render_id),
        ],
        file.bytes,
    )
        .into_response())
}
