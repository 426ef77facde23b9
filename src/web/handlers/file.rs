//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, Request, State},
    http::{header, HeaderValue},
    response::Response,
    Json,
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::AppState;
use crate::file::{self, FileStore};
use crate::web::dto::{FilesListResponse, SuccessResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::ShareError;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

/// Generate a safe Content-Disposition header value for file downloads.
///
/// The quoted `filename` parameter is an ASCII-only fallback with control
/// characters removed and quotes, backslashes and non-ASCII characters
/// replaced. Names that needed replacing also get an RFC 5987 `filename*`
/// parameter carrying the exact UTF-8 name.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = filename
        .chars()
        .any(|c| !c.is_ascii() || c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

/// GET /api/files - List the shared directory.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilesListResponse>, ApiError> {
    let files = state.store.list().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list files");
        ApiError::internal("Failed to list files")
    })?;

    Ok(Json(FilesListResponse { files }))
}

/// GET /api/files/download/:filename - Stream a file to the client.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = state.store.resolve(&filename)?;

    let is_file = FileStore::exists(&path).await
        && tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
    if !is_file {
        return Err(ShareError::NotFound(filename).into());
    }

    let disposition = HeaderValue::from_str(&content_disposition_header(&filename))
        .map_err(|e| {
            tracing::error!(file = %filename, error = %e, "Failed to build Content-Disposition");
            ApiError::internal("Failed to build response")
        })?;

    let mut response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, disposition);
        tracing::info!(file = %filename, "File downloaded");
    }

    Ok(response)
}

/// POST /api/files/upload - Store a file from a multipart body.
///
/// The first `file` field is streamed to disk under its client filename and
/// the rest of the body is ignored.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected non-multipart upload");
        ApiError::bad_request("No file provided")
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status().is_server_error() {
            tracing::error!(error = %e, "Upload stream failed");
            ApiError::internal("Failed to save file")
        } else {
            tracing::warn!(error = %e, "Failed to read multipart field");
            ApiError::bad_request("Invalid multipart data")
        }
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(raw_name) = field.file_name().map(str::to_string) else {
            return Err(ApiError::bad_request("No file provided"));
        };

        let stored = file::upload(&state.store, &raw_name, field, state.max_file_size)
            .await
            .map_err(|e| {
                match &e {
                    ShareError::InvalidPath | ShareError::TooLarge { .. } => {
                        tracing::warn!(file = %raw_name, error = %e, "Upload rejected")
                    }
                    _ => tracing::error!(file = %raw_name, error = %e, "Upload failed"),
                }
                ApiError::from(e)
            })?;

        tracing::info!(file = %stored, "File uploaded");
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            filename: stored,
        }));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// DELETE /api/files/:filename - Remove a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    remove(&state, &filename).await
}

/// DELETE /api/files/upload - Remove a file literally named `upload`.
///
/// That path is taken by the upload route, so deletes of it land here.
pub async fn delete_file_named_upload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    remove(&state, "upload").await
}

async fn remove(state: &AppState, filename: &str) -> Result<Json<SuccessResponse>, ApiError> {
    let path = state.store.resolve(filename)?;

    FileStore::delete(&path).await.map_err(|e| {
        if !matches!(e, ShareError::NotFound(_)) {
            tracing::error!(file = %filename, error = %e, "Failed to delete file");
        }
        ApiError::from(e)
    })?;

    tracing::info!(file = %filename, "File deleted");
    Ok(Json(SuccessResponse::with_message("File deleted successfully")))
}
