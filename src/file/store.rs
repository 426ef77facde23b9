//! Flat file store rooted at the shared directory.
//!
//! Every path built from client input goes through [`FileStore::resolve`],
//! which sanitizes the name first. The store keeps no metadata of its own;
//! the directory entry is the only record of a file.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use super::sanitize::sanitize;
use crate::{Result, ShareError};

/// Metadata about one entry of the shared directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Entry name (a basename; the directory is flat).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified_time: DateTime<Utc>,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// File store bound to a single root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store for the given root. Does not touch the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory and its parents if absent. Idempotent.
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// List the direct children of the root.
    ///
    /// Entries whose metadata cannot be read are skipped. Order follows the
    /// filesystem enumeration and is not sorted.
    pub async fn list(&self) -> Result<Vec<FileInfo>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    debug!(entry = ?entry.file_name(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let modified_time = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| DateTime::<Utc>::from(std::time::UNIX_EPOCH));

            files.push(FileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified_time,
                is_dir: metadata.is_dir(),
            });
        }

        Ok(files)
    }

    /// Join the root with a sanitized client filename.
    ///
    /// The result always lies directly inside the root.
    pub fn resolve(&self, raw_name: &str) -> Result<PathBuf> {
        let name = sanitize(raw_name)?;
        Ok(self.root.join(name))
    }

    /// Check whether a path exists.
    ///
    /// Only a definite "not found" counts as absent; other metadata errors
    /// are reported as present so callers surface them when opening.
    pub async fn exists(path: &Path) -> bool {
        match fs::metadata(path).await {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }

    /// Delete a file.
    ///
    /// # Errors
    ///
    /// [`ShareError::NotFound`] if the file was already absent, and
    /// [`ShareError::Io`] for any other failure.
    pub async fn delete(path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ShareError::NotFound(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".to_string()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
