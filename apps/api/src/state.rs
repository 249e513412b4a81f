use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::export::{ArtifactSink, DirectorySink};
use crate::render::PreviewSession;

/// A live preview session and when it was last used.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session: PreviewSession,
    pub touched: Instant,
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Live preview sessions keyed by session id.
    pub previews: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    /// Archive for finished exports. `None` unless EXPORT_DIR is set.
    pub sink: Option<Arc<dyn ArtifactSink>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sink = config
            .export_dir
            .clone()
            .map(|dir| Arc::new(DirectorySink::new(dir)) as Arc<dyn ArtifactSink>);
        Self {
            config,
            previews: Arc::new(Mutex::new(HashMap::new())),
            sink,
        }
    }

    /// Session for `id`, created on first use. A missing id opens a new session.
    ///
    /// Sessions idle for longer than `config.preview_session_ttl` are dropped
    /// first, so an expired id starts over with a fresh session.
    pub fn preview_session(&self, id: Option<Uuid>) -> (Uuid, PreviewSession) {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let now = Instant::now();
        let ttl = self.config.preview_session_ttl;

        let mut previews = self.previews.lock().unwrap_or_else(PoisonError::into_inner);
        let before = previews.len();
        previews.retain(|_, entry| now.duration_since(entry.touched) < ttl);
        if previews.len() < before {
            debug!(evicted = before - previews.len(), "idle preview sessions dropped");
        }

        let entry = previews.entry(id).or_insert_with(|| SessionEntry {
            session: PreviewSession::new(),
            touched: now,
        });
        entry.touched = now;
        (id, entry.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn state_with_ttl(ttl: Duration) -> AppState {
        AppState::new(Config {
            preview_session_ttl: ttl,
            ..Config::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_session_reused_by_id() {
        let state = AppState::new(Config::default());
        let (id, first) = state.preview_session(None);
        let (same_id, second) = state.preview_session(Some(id));
        assert_eq!(id, same_id);
        assert_eq!(first.latest_revision(), second.latest_revision());
        assert_eq!(state.previews.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_dropped() {
        let state = state_with_ttl(Duration::from_secs(60));
        for _ in 0..1000 {
            state.preview_session(None);
        }
        assert_eq!(state.previews.lock().unwrap().len(), 1000);

        tokio::time::advance(Duration::from_secs(61)).await;
        let (fresh, _) = state.preview_session(None);

        let previews = state.previews.lock().unwrap();
        assert_eq!(previews.len(), 1);
        assert!(previews.contains_key(&fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_session_survives_sweeps() {
        let state = state_with_ttl(Duration::from_secs(60));
        let (active, _) = state.preview_session(None);
        let (idle, _) = state.preview_session(None);

        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(40)).await;
            state.preview_session(Some(active));
        }

        let previews = state.previews.lock().unwrap();
        assert!(previews.contains_key(&active));
        assert!(!previews.contains_key(&idle));
    }

    #[test]
    fn test_sink_only_with_export_dir() {
        assert!(AppState::new(Config::default()).sink.is_none());
        let config = Config {
            export_dir: Some(std::env::temp_dir()),
            ..Config::default()
        };
        assert!(AppState::new(config).sink.is_some());
    }
}
