//! Response DTOs for Web API.

use serde::Serialize;

use crate::file::FileInfo;

/// Public server configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub pin_protected: bool,
    pub admin_required: bool,
    /// Upload limit in bytes.
    pub max_file_size: u64,
}

/// Generic success response.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    /// Success with a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Directory listing.
#[derive(Debug, Serialize)]
pub struct FilesListResponse {
    pub files: Vec<FileInfo>,
}

/// Upload result.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Stored file name.
    pub filename: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
