//! Text chunking with configurable size and overlap.

use docqa_core::{AppError, AppResult};

/// Default chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Check chunking parameters without chunking anything.
pub fn validate_chunking(chunk_size: usize, overlap: usize) -> AppResult<()> {
    if chunk_size == 0 {
        return Err(AppError::InvalidInput(
            "chunk_size must be greater than zero".to_string(),
        ));
    }
    if overlap >= chunk_size {
        return Err(AppError::InvalidInput(format!(
            "overlap ({}) must be smaller than chunk_size ({})",
            overlap, chunk_size
        )));
    }
    Ok(())
}

/// Chunk text into overlapping fixed-size windows.
///
/// Windows start at `0, step, 2*step, ...` where `step = chunk_size - overlap`
/// and continue while the start offset is inside the text. Offsets count
/// chars, not bytes. Windows that are blank after trimming are dropped, but
/// retained windows are returned untrimmed.
///
/// # Errors
/// `InvalidInput` when `chunk_size == 0` or `overlap >= chunk_size`.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<String>> {
    validate_chunking(chunk_size, overlap)?;

    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let window: String = chars[start..end].iter().collect();

        if !window.trim().is_empty() {
            chunks.push(window);
        }

        start += step;
    }

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        chunk_size,
        overlap
    );

    Ok(chunks)
}
