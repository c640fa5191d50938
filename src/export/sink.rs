//! Artifact sinks: the "save file" side effect behind downloads and exports.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// What is being saved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A downloaded media file
    Media,
    /// An exported spreadsheet
    Sheet,
}

/// Destination for saved artifacts (downloaded media and exported sheets)
#[async_trait::async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Save `bytes` under `filename`
    async fn save(&self, kind: ArtifactKind, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// Production [`ArtifactSink`] that writes into two directories on disk
#[derive(Clone, Debug)]
pub struct DirectorySink {
    media_dir: PathBuf,
    sheet_dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing media into `media_dir` and sheets into `sheet_dir`
    pub fn new(media_dir: impl Into<PathBuf>, sheet_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
            sheet_dir: sheet_dir.into(),
        }
    }

    /// Build a sink from the configured download and export directories
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(&config.download.download_dir, &config.export.output_dir)
    }

    /// Final path an artifact would be written to
    pub fn target_path(&self, kind: ArtifactKind, filename: &str) -> Result<PathBuf> {
        // Server-supplied names must not escape the target directory
        let name = Path::new(filename)
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Other(format!("invalid artifact filename '{}'", filename)))?;

        let dir = match kind {
            ArtifactKind::Media => &self.media_dir,
            ArtifactKind::Sheet => &self.sheet_dir,
        };
        Ok(dir.join(name))
    }
}

#[async_trait::async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, kind: ArtifactKind, filename: &str, bytes: &[u8]) -> Result<()> {
        let path = self.target_path(kind, filename)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory '{}': {}", parent.display(), e),
                ))
            })?;
        }

        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact saved");
        Ok(())
    }
}
