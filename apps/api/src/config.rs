use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::export::DEFAULT_FILE_BASE;

/// Application configuration loaded from environment variables.
/// Every variable is optional; start-up fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// When set, every successful export is also archived here.
    pub export_dir: Option<PathBuf>,
    /// Delay a preview refresh waits before paginating.
    pub preview_settle: Duration,
    /// Preview sessions idle longer than this are dropped.
    pub preview_session_ttl: Duration,
    pub default_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            export_dir: None,
            preview_settle: Duration::from_millis(100),
            preview_session_ttl: Duration::from_secs(30 * 60),
            default_file_name: DEFAULT_FILE_BASE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            export_dir: optional_env("EXPORT_DIR").map(PathBuf::from),
            preview_settle: match optional_env("PREVIEW_SETTLE_MS") {
                Some(ms) => Duration::from_millis(
                    ms.parse::<u64>()
                        .context("PREVIEW_SETTLE_MS must be a whole number of milliseconds")?,
                ),
                None => defaults.preview_settle,
            },
            preview_session_ttl: match optional_env("PREVIEW_SESSION_TTL_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.parse::<u64>()
                        .context("PREVIEW_SESSION_TTL_SECS must be a whole number of seconds")?,
                ),
                None => defaults.preview_session_ttl,
            },
            default_file_name: optional_env("DEFAULT_FILE_NAME")
                .unwrap_or(defaults.default_file_name),
        })
    }
}

/// Value of `key`, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
