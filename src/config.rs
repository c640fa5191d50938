//! Configuration types for creator-dl

use crate::error::{Error, Result};
use crate::types::{Platform, Quality};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Dashboard backend connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the dashboard backend (default: "http://localhost:3002")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: none)
    ///
    /// Media transfers are not timed out by default; a hung transfer blocks the queue
    /// until the backend gives up.
    #[serde(default, with = "optional_duration_ms")]
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
        }
    }
}

/// Pacing between queue items
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay between two consecutive items (default: 1500 ms)
    ///
    /// Keeps outbound requests under the upstream platforms' rate limits.
    #[serde(default = "default_inter_item_delay", with = "duration_ms")]
    pub inter_item_delay: Duration,

    /// Delay after the last item before the run is marked finished (default: 500 ms)
    #[serde(default = "default_settle_delay", with = "duration_ms")]
    pub settle_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_item_delay: default_inter_item_delay(),
            settle_delay: default_settle_delay(),
        }
    }
}

impl PacingConfig {
    /// No delays at all, for tests and offline batch jobs
    pub fn immediate() -> Self {
        Self {
            inter_item_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }
}

/// Spreadsheet export settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported sheets are written to (default: "./exports")
    #[serde(default = "default_export_dir")]
    pub output_dir: PathBuf,

    /// Identifying slug embedded in export filenames (creator username)
    ///
    /// Falls back to the platform label when unset.
    #[serde(default)]
    pub slug: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_export_dir(),
            slug: None,
        }
    }
}

/// Comment collection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommentsConfig {
    /// Collect comments for every item of a download run (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Maximum comments fetched per video (default: 500)
    #[serde(default = "default_comment_limit")]
    pub limit: u32,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: default_comment_limit(),
        }
    }
}

/// Media download settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory media files are saved to (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Default quality for extractor-backed downloads (default: best)
    #[serde(default)]
    pub quality: Quality,

    /// Platform the cached videos come from (default: instagram)
    #[serde(default)]
    pub platform: Platform,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            quality: Quality::default(),
            platform: Platform::default(),
        }
    }
}

/// Main configuration for BatchDownloader
///
/// Every section has defaults, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Queue pacing
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Spreadsheet export
    #[serde(default)]
    pub export: ExportConfig,

    /// Comment collection
    #[serde(default)]
    pub comments: CommentsConfig,

    /// Media download
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", self.api.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;

        if self.comments.limit == 0 {
            return Err(Error::Config {
                message: "comment limit must be at least 1".to_string(),
                key: Some("comments.limit".to_string()),
            });
        }

        Ok(())
    }

    /// Slug embedded in export filenames
    pub fn export_slug(&self) -> &str {
        self.export
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.download.platform.label())
    }
}

fn default_base_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_inter_item_delay() -> Duration {
    Duration::from_millis(1500)
}

fn default_settle_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_comment_limit() -> u32 {
    500
}

// Duration serialization helper (milliseconds)
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// Optional Duration serialization helper (milliseconds)
mod optional_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
