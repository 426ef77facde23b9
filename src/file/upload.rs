//! Bounded streaming upload writer.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::sanitize::sanitize;
use super::store::FileStore;
use crate::{Result, ShareError};

/// Removes a partially written file unless disarmed.
///
/// Runs on every exit path that does not reach [`PartialFile::commit`],
/// including the upload future being dropped when a client disconnects.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn commit(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed partial upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove partial upload"
            ),
        }
    }
}

/// Stream a file body into the store, enforcing `max_bytes`.
///
/// The name is sanitized before anything touches disk. Chunks are written as
/// they arrive, so memory use is bounded by the chunk size rather than the
/// payload. An existing file with the same name is overwritten.
///
/// Returns the stored (sanitized) name.
///
/// # Errors
///
/// - [`ShareError::InvalidPath`] if the name fails sanitization.
/// - [`ShareError::TooLarge`] once more than `max_bytes` bytes arrive.
/// - [`ShareError::Stream`] if the body stream yields an error.
/// - [`ShareError::Io`] if the destination cannot be created or written.
///
/// On every error after the destination was created, the destination is
/// removed before this function returns.
pub async fn upload<S, E>(
    store: &FileStore,
    raw_name: &str,
    body: S,
    max_bytes: u64,
) -> Result<String>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Display,
{
    let mut body = std::pin::pin!(body);
    let name = sanitize(raw_name)?.to_string();
    let path = store.resolve(&name)?;

    // Declared before `file` so the handle is closed before the guard runs.
    // The open is synchronous: an await here could be cancelled while the
    // blocking pool still creates the file, after the guard already ran.
    let guard = PartialFile::new(path);
    let mut file = File::from_std(std::fs::File::create(guard.path())?);

    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ShareError::Stream(e.to_string()))?;

        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(ShareError::TooLarge { max_bytes });
        }

        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    drop(file);
    guard.commit();

    debug!(file = %name, bytes = written, "Upload stored");
    Ok(name)
}
