//! Document upload endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use docqa_core::AppError;
use docqa_knowledge::ingest::extract_text_blocking;
use docqa_knowledge::is_allowed_upload;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub chunks: usize,
    /// False when the chunks are searchable but writing the store failed
    pub persisted: bool,
}

/// POST /api/upload - store, extract and index one file from field `file`
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    if filename.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }
    if !is_allowed_upload(&filename) {
        return Err(ApiError::bad_request("Invalid file type"));
    }

    let safe_name = sanitize_filename(&filename);
    if safe_name.is_empty() || !is_allowed_upload(&safe_name) {
        return Err(ApiError::bad_request("Invalid file name"));
    }

    tracing::info!("Processing upload: {} ({} bytes)", safe_name, data.len());

    let upload_dir = state.upload_dir();
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(AppError::from)?;
    let path = upload_dir.join(&safe_name);
    tokio::fs::write(&path, &data).await.map_err(AppError::from)?;

    let text = extract_text_blocking(&path).await?;
    if text.trim().is_empty() {
        return Err(ApiError::bad_request(
            "No text could be extracted from the file",
        ));
    }

    let chunks = state
        .store()
        .add_document(&text, state.document_options())
        .await?;
    tracing::info!("Indexed {} as {} chunks", safe_name, chunks);

    // The chunks are already live, so a failed save must not report the
    // upload as failed: a retry would index the document twice.
    let (message, persisted) = match state.store().save(state.store_path()).await {
        Ok(()) => ("File processed successfully".to_string(), true),
        Err(e) => {
            tracing::warn!("Indexed {} but failed to save the store: {}", safe_name, e);
            (
                format!("File indexed but the store could not be saved: {}", e),
                false,
            )
        }
    };

    Ok(Json(UploadResponse {
        message,
        chunks,
        persisted,
    }))
}

/// Reduce a client-supplied name to a bare file name of ASCII letters,
/// digits, `.`, `-` and `_`. Whitespace becomes `_`; leading dots are dropped.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let base = Path::new(base)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}
