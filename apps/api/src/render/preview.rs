//! Live preview: paginated pages with HTML markup per block, refreshed with a
//! settle delay so a burst of edits paginates once.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quick_xml::escape::escape;
use serde::Serialize;
use tracing::debug;

use crate::layout::blocks::{build_blocks, Block, HeaderBlock, ParagraphRole, RowRole};
use crate::layout::contract::bulleted;
use crate::layout::pagination::{paginate, MeasureHeight, Viewport};
use crate::layout::template::{template_style, Alignment};
use crate::layout::MetricMeasurer;
use crate::models::{ResumeDocument, TemplateId};

pub const NO_DATA_MESSAGE: &str = "No resume data available. Please fill in the form.";

/// One A4 page of the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPage {
    pub index: usize,
    pub blocks: Vec<Block>,
    /// HTML for the page container and its blocks.
    pub markup: String,
    pub height_px: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Markup
// ────────────────────────────────────────────────────────────────────────────

fn header_markup(header: &HeaderBlock, alignment: Alignment) -> String {
    let align = match alignment {
        Alignment::Center => "align-center",
        Alignment::Left => "align-left",
    };
    let email = escape(header.email.as_str());
    let mut html = format!(
        "<header class=\"resume-header {align}\"><h1 class=\"resume-name\">{}</h1>\
         <p class=\"resume-contact\"><a href=\"mailto:{email}\">{email}</a> | {} | {}</p>",
        escape(header.name.as_str()),
        escape(header.phone.as_str()),
        escape(header.address.as_str()),
    );
    if let Some(url) = &header.linkedin {
        let url = escape(url.as_str());
        html.push_str(&format!("<p class=\"resume-linkedin\"><a href=\"{url}\">{url}</a></p>"));
    }
    html.push_str("</header>");
    html
}

fn column_markup(items: &[String]) -> String {
    let items: String = items
        .iter()
        .map(|skill| format!("<li class=\"skill-item\">{}</li>", escape(skill.as_str())))
        .collect();
    format!("<ul class=\"skills-column\">{items}</ul>")
}

/// HTML for a single block.
pub fn block_markup(block: &Block, alignment: Alignment) -> String {
    match block {
        Block::Header(header) => header_markup(header, alignment),
        Block::SectionTitle { text } => {
            format!("<h2 class=\"section-title\">{}</h2>", escape(text.as_str()))
        }
        Block::Paragraph { text, role } => {
            let text = escape(text.as_str());
            match role {
                ParagraphRole::Body => format!("<p class=\"section-body\">{text}</p>"),
                ParagraphRole::EntryTitle => format!("<h3 class=\"entry-title\">{text}</h3>"),
                ParagraphRole::JobLine => format!("<p class=\"job-line\">{text}</p>"),
            }
        }
        Block::ListItem { text } => format!(
            "<div class=\"task-item\">{}</div>",
            escape(bulleted(text).as_str())
        ),
        Block::TwoColumnList { left, right } => format!(
            "<div class=\"skills-columns\">{}{}</div>",
            column_markup(left),
            column_markup(right)
        ),
        Block::KeyValueRow { left, right, role } => {
            let class = match role {
                RowRole::EntryHeader => "entry-header",
                RowRole::EntryDetail => "entry-detail",
            };
            format!(
                "<div class=\"entry-row {class}\"><span class=\"entry-key\">{}</span>\
                 <span class=\"entry-value\">{}</span></div>",
                escape(left.as_str()),
                escape(right.as_str())
            )
        }
    }
}

fn page_markup(blocks: &[Block], template: TemplateId) -> String {
    let alignment = template_style(template).alignment;
    let body: String = blocks.iter().map(|b| block_markup(b, alignment)).collect();
    format!("<div class=\"resume-page template-{template}\">{body}</div>")
}

fn placeholder_page(template: TemplateId) -> PreviewPage {
    PreviewPage {
        index: 0,
        blocks: Vec::new(),
        markup: format!(
            "<div class=\"resume-page template-{template}\"><p class=\"resume-empty\">{NO_DATA_MESSAGE}</p></div>"
        ),
        height_px: 0.0,
    }
}

/// Builds, paginates and marks up the preview for `doc`.
///
/// A document with nothing to show yields a single placeholder page.
pub fn build_preview<M>(doc: &ResumeDocument, template: TemplateId, measure: &M) -> Vec<PreviewPage>
where
    M: MeasureHeight + ?Sized,
{
    if doc.is_empty() {
        return vec![placeholder_page(template)];
    }

    let blocks = build_blocks(doc, template);
    paginate(&blocks, measure, Viewport::A4)
        .into_iter()
        .enumerate()
        .map(|(index, page)| PreviewPage {
            index,
            markup: page_markup(&page.blocks, template),
            blocks: page.blocks,
            height_px: page.height_px,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SessionState {
    /// Revision of the most recent refresh request.
    latest: u64,
    /// Revision the published pages were built from.
    published: u64,
    pages: Arc<Vec<PreviewPage>>,
}

/// Published preview of one editing session.
///
/// Every `refresh` takes a new revision; only the newest revision that
/// survives its settle delay swaps in its pages.
#[derive(Debug, Clone, Default)]
pub struct PreviewSession {
    state: Arc<Mutex<SessionState>>,
}

/// Pages published by a refresh, with the revision they belong to.
#[derive(Debug, Clone)]
pub struct Published {
    pub revision: u64,
    pub pages: Arc<Vec<PreviewPage>>,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Revision of the last refresh request.
    pub fn latest_revision(&self) -> u64 {
        self.state().latest
    }

    /// Currently published pages and their revision.
    pub fn current(&self) -> Published {
        let state = self.state();
        Published {
            revision: state.published,
            pages: Arc::clone(&state.pages),
        }
    }

    /// Waits `settle`, then re-paginates `doc` and publishes the result.
    ///
    /// Returns `None` when a newer refresh arrived during the wait; that
    /// refresh publishes instead.
    pub async fn refresh(
        &self,
        doc: &ResumeDocument,
        template: TemplateId,
        settle: Duration,
    ) -> Option<Published> {
        let revision = {
            let mut state = self.state();
            state.latest += 1;
            state.latest
        };

        tokio::time::sleep(settle).await;
        if self.latest_revision() != revision {
            debug!(revision, "preview refresh superseded");
            return None;
        }

        let pages = Arc::new(build_preview(doc, template, &MetricMeasurer::new(template)));

        let mut state = self.state();
        if state.latest != revision {
            debug!(revision, "preview refresh superseded");
            return None;
        }
        state.pages = Arc::clone(&pages);
        state.published = revision;
        debug!(revision, pages = pages.len(), "preview published");
        Some(Published { revision, pages })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::pagination::MeasureError;
    use crate::models::{Personal, Project};

    const SETTLE: Duration = Duration::from_millis(100);

    fn named(name: &str) -> ResumeDocument {
        ResumeDocument {
            personal: Personal {
                name: name.to_string(),
                email: "jane@example.com".to_string(),
                ..Default::default()
            },
            skills: vec!["Go".to_string(), "Rust".to_string(), "SQL".to_string()],
            ..Default::default()
        }
    }

    fn fixed(_: &Block, _: f32) -> Result<f32, MeasureError> {
        Ok(400.0)
    }

    #[test]
    fn test_empty_document_shows_placeholder() {
        let pages = build_preview(&ResumeDocument::default(), TemplateId::Freshie, &fixed);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].blocks.is_empty());
        assert!(pages[0].markup.contains(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_pages_are_indexed_and_marked_up() {
        let mut doc = named("Jane Doe");
        doc.projects.push(Project {
            name: "cvforge".to_string(),
            tasks: vec!["Wrote the paginator".to_string()],
        });
        // header, skills(2), projects(3) at 400px each: 2 + 2 + 2 blocks.
        let pages = build_preview(&doc, TemplateId::Freshie, &fixed);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(pages[0].markup.starts_with("<div class=\"resume-page template-freshie\">"));
        assert!(pages[0].markup.contains("resume-header align-center"));
        assert!(pages[1].markup.contains("<div class=\"skills-columns\">"));
        assert!(pages[2].markup.contains("<div class=\"task-item\">• Wrote the paginator</div>"));
    }

    #[test]
    fn test_markup_escapes_text() {
        let html = block_markup(
            &Block::ListItem {
                text: "<script>alert(1)</script> & co".to_string(),
            },
            Alignment::Left,
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; co"));
    }

    #[test]
    fn test_skill_columns_markup_split() {
        let html = block_markup(
            &Block::TwoColumnList {
                left: vec!["Go".into(), "SQL".into()],
                right: vec!["Rust".into()],
            },
            Alignment::Center,
        );
        assert_eq!(
            html,
            "<div class=\"skills-columns\"><ul class=\"skills-column\"><li class=\"skill-item\">Go</li>\
             <li class=\"skill-item\">SQL</li></ul><ul class=\"skills-column\">\
             <li class=\"skill-item\">Rust</li></ul></div>"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_publishes_after_settle() {
        let session = PreviewSession::new();
        let published = session
            .refresh(&named("Jane Doe"), TemplateId::Freshie, SETTLE)
            .await
            .expect("sole refresh publishes");
        assert_eq!(published.revision, 1);
        assert!(published.pages[0].markup.contains("Jane Doe"));
        assert_eq!(session.current().revision, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_refresh_never_publishes() {
        let session = PreviewSession::new();
        let first_doc = named("First Draft");
        let second_doc = named("Second Draft");

        let (first, second) = tokio::join!(
            session.refresh(&first_doc, TemplateId::Freshie, SETTLE),
            async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                session.refresh(&second_doc, TemplateId::Experienced, SETTLE).await
            }
        );

        assert!(first.is_none());
        let second = second.expect("latest refresh publishes");
        assert_eq!(second.revision, 2);

        let current = session.current();
        assert_eq!(current.revision, 2);
        let markup: String = current.pages.iter().map(|p| p.markup.as_str()).collect();
        assert!(markup.contains("Second Draft"));
        assert!(!markup.contains("First Draft"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_refreshes_both_publish() {
        let session = PreviewSession::new();
        assert!(session
            .refresh(&named("A"), TemplateId::Freshie, SETTLE)
            .await
            .is_some());
        assert!(session
            .refresh(&named("B"), TemplateId::Freshie, SETTLE)
            .await
            .is_some());
        assert_eq!(session.latest_revision(), 2);
    }
}
