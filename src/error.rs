//! Error types for LocalShare.

use thiserror::Error;

/// Common error type for LocalShare.
#[derive(Error, Debug)]
pub enum ShareError {
    /// A client-supplied filename failed sanitization.
    #[error("invalid file path")]
    InvalidPath,

    /// The requested file does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// An upload exceeded the configured size limit.
    #[error("file size exceeds maximum of {}", format_limit(.max_bytes))]
    TooLarge {
        /// Configured limit in bytes.
        max_bytes: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload body stream failed before it was fully read.
    #[error("upload stream error: {0}")]
    Stream(String),

    /// A session update could not be stored.
    #[error("failed to save session: {0}")]
    SessionPersist(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<crate::auth::SessionError> for ShareError {
    fn from(e: crate::auth::SessionError) -> Self {
        ShareError::SessionPersist(e.to_string())
    }
}

/// Render a byte limit in whole megabytes when it is an exact multiple.
fn format_limit(max_bytes: &u64) -> String {
    const MB: u64 = 1024 * 1024;
    if *max_bytes >= MB && max_bytes % MB == 0 {
        format!("{} MB", max_bytes / MB)
    } else {
        format!("{max_bytes} bytes")
    }
}

/// Result type alias for LocalShare operations.
pub type Result<T> = std::result::Result<T, ShareError>;
