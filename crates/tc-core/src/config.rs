//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for the server, the YouTube integration, and the timeline.
//! Every section defaults sensibly so a completely empty `{}` file is valid.
//!
//! Credentials and connection settings live here and are passed by
//! construction into the components that perform I/O; nothing reads
//! process-wide state after startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub youtube: YouTubeConfig,
    pub timeline: TimelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            youtube: YouTubeConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.youtube.client_id.is_empty() || self.youtube.client_secret.is_empty() {
            warnings.push(
                "youtube.client_id / client_secret are not set; \
                 subscription sync and feed refresh will fail"
                    .into(),
            );
        }

        if self.timeline.start_time <= 0 {
            warnings.push("timeline.start_time is not a positive epoch timestamp".into());
        }

        if self.timeline.window_before > 50 || self.timeline.window_after > 50 {
            warnings.push("timeline window sizes above 50 are probably a mistake".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
    /// Optional directory with a built web UI to serve.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db_path: PathBuf::from("tubecast.db"),
            static_dir: None,
        }
    }
}

/// YouTube Data API / OAuth settings.
///
/// `api_base_url` and `token_url` exist so tests can point the client at a
/// local double; production deployments never need to change them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub api_base_url: String,
    pub token_url: String,
    /// How many recent uploads to pull per channel on refresh.
    pub uploads_per_channel: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:8080/api/oauth2callback".into(),
            api_base_url: "https://www.googleapis.com/youtube/v3".into(),
            token_url: "https://oauth2.googleapis.com/token".into(),
            uploads_per_channel: 5,
        }
    }
}

/// Timeline / broadcast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Fixed reference instant (epoch seconds) at which catalog index 0
    /// begins airing.
    pub start_time: i64,
    /// Number of preceding videos returned alongside the current one.
    pub window_before: usize,
    /// Number of following videos returned alongside the current one.
    pub window_after: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            // Same fixed broadcast start the reference deployment uses.
            start_time: 1_767_906_120,
            window_before: 5,
            window_after: 5,
        }
    }
}
