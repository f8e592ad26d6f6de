use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use content_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::model::Disclaimer;
use crate::notification::DEFAULT_DISPLAY_DURATION;
use crate::session::StudioSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub timeout: Duration,
    pub notification_duration: Duration,
    pub download_dir: PathBuf,
    pub api_key: Option<String>,
    pub disclaimer: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            backend_url: non_empty("STUDIO_BACKEND_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: match non_empty("STUDIO_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(
                    v.trim()
                        .parse()
                        .context("STUDIO_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                None => DEFAULT_TIMEOUT,
            },
            notification_duration: match non_empty("STUDIO_NOTIFICATION_MS") {
                Some(v) => Duration::from_millis(
                    v.trim()
                        .parse()
                        .context("STUDIO_NOTIFICATION_MS must be a whole number of milliseconds")?,
                ),
                None => DEFAULT_DISPLAY_DURATION,
            },
            download_dir: non_empty("STUDIO_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            api_key: non_empty("STUDIO_API_KEY"),
            disclaimer: lookup("STUDIO_DISCLAIMER"),
        })
    }

    /// Session settings derived from this configuration.
    pub fn settings(&self) -> StudioSettings {
        StudioSettings {
            download_dir: self.download_dir.clone(),
            notification_duration: self.notification_duration,
            disclaimer: self
                .disclaimer
                .as_deref()
                .map(Disclaimer::new)
                .unwrap_or_default(),
        }
    }
}
