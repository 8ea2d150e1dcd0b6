//! File ingestion into the vector store.

use crate::parser::{self, ContentType};
use crate::store::VectorStore;
use crate::types::{DocumentOptions, IngestStats};
use crate::vector_index::VectorIndex;
use docqa_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extract text from `path` on the blocking pool.
pub async fn extract_text_blocking(path: &Path) -> AppResult<String> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || parser::extract_text(&owned))
        .await
        .map_err(|e| AppError::Knowledge(format!("Extraction task failed: {}", e)))?
}

/// Extract and add a single file. Returns the number of chunks added.
///
/// A file whose text cannot be extracted (unsupported content, nothing
/// readable) adds zero chunks. Chunking, embedding and store errors are
/// returned.
pub async fn ingest_file<I: VectorIndex>(
    store: &VectorStore<I>,
    path: &Path,
    options: DocumentOptions,
) -> AppResult<usize> {
    tracing::debug!("Processing file: {:?}", path);

    let text = match extract_text_blocking(path).await {
        Ok(text) => text,
        Err(AppError::InvalidInput(msg)) => {
            tracing::warn!("Skipping {:?}: {}", path, msg);
            return Ok(0);
        }
        Err(e) => return Err(e),
    };
    if text.trim().is_empty() {
        tracing::warn!("No text could be extracted from {:?}", path);
        return Ok(0);
    }

    let added = store.add_document(&text, options).await?;
    tracing::debug!("Processed {:?}: {} chunks", path, added);
    Ok(added)
}

/// Ingest files and directories, walking directories recursively.
///
/// Files that cannot be extracted are skipped and reported. Bad chunking
/// options, embedding and store errors abort the run.
pub async fn ingest_paths<I: VectorIndex>(
    store: &VectorStore<I>,
    paths: &[PathBuf],
    options: DocumentOptions,
) -> AppResult<IngestStats> {
    options.validate()?;
    let mut stats = IngestStats::default();

    for file in collect_files(paths)? {
        let added = ingest_file(store, &file, options).await?;
        if added == 0 {
            stats.files_skipped += 1;
            stats.skipped.push(file);
        } else {
            stats.files_indexed += 1;
            stats.chunks_added += added;
        }
    }

    tracing::info!(
        "Ingestion completed: {} files indexed, {} skipped, {} chunks",
        stats.files_indexed,
        stats.files_skipped,
        stats.chunks_added
    );

    Ok(stats)
}

/// Expand `paths` into a sorted list of files. Hidden entries under a walked
/// directory are ignored.
fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| ContentType::from_path(e.path()) != ContentType::Unknown)
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            return Err(AppError::InvalidInput(format!(
                "Path does not exist: {:?}",
                path
            )));
        }
    }

    Ok(files)
}
