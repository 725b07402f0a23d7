//! Feed snapshot persistence
//!
//! The last downloaded feed is kept on disk verbatim so that hourly checks and
//! chat commands can run without touching the network.

use crate::error::{IndexadaError, Result};
use crate::feed::{FeedParser, PriceTable};
use crate::logging::{StructuredLogger, get_logger};
use std::path::{Path, PathBuf};

/// File-backed store for the most recent feed text
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    logger: StructuredLogger,
}

impl SnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            logger: get_logger("persistence"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the snapshot with `text`.
    ///
    /// Written to a sibling temp file first and renamed into place, so a
    /// concurrent reader sees either the old or the new snapshot.
    pub async fn save(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, text).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        self.logger.debug(&format!(
            "Saved feed snapshot ({} bytes) to {}",
            text.len(),
            self.path.display()
        ));
        Ok(())
    }

    /// Read the snapshot text
    pub async fn load(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IndexadaError::io(format!(
                "feed snapshot not found at {}",
                self.path.display()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and parse the snapshot
    pub async fn load_table(&self, parser: &FeedParser) -> Result<PriceTable> {
        let text = self.load().await?;
        parser.parse(&text)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
