//! Source file parsing and text extraction.
//!
//! Extraction is the one catch-and-continue boundary: a supported file whose
//! text cannot be read yields an empty string, which ingestion treats as a
//! no-op.

use docqa_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Extensions accepted for upload.
const UPLOAD_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "wav", "mp3", "m4a", "webm", "txt", "md", "markdown", "html",
    "htm",
];

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Pdf,
    Image,
    Audio,
    Markdown,
    Html,
    PlainText,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("png") | Some("jpg") | Some("jpeg") => Self::Image,
            Some("wav") | Some("mp3") | Some("m4a") | Some("webm") => Self::Audio,
            Some("md") | Some("markdown") => Self::Markdown,
            Some("html") | Some("htm") => Self::Html,
            Some("txt") => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::PlainText => "text",
            Self::Unknown => "unknown",
        }
    }
}

/// Whether `filename` has an extension accepted for upload.
pub fn is_allowed_upload(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| UPLOAD_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extract plain text from a file.
///
/// # Errors
/// `InvalidInput` for images, audio and binary files of unknown type.
pub fn extract_text(path: &Path) -> AppResult<String> {
    let content_type = ContentType::from_path(path);
    tracing::debug!("Extracting {} text from {:?}", content_type.as_str(), path);

    match content_type {
        ContentType::Pdf => Ok(extract_pdf(path)),
        ContentType::Image => Err(AppError::InvalidInput(format!(
            "Image text extraction is not available: {:?}",
            path
        ))),
        ContentType::Audio => Err(AppError::InvalidInput(format!(
            "Audio transcription extraction is not available: {:?}",
            path
        ))),
        ContentType::Markdown => Ok(read_lossy(path).map(|t| clean_markdown(&t)).unwrap_or_default()),
        ContentType::Html => Ok(read_lossy(path).map(|t| clean_html(&t)).unwrap_or_default()),
        ContentType::PlainText => Ok(read_lossy(path).unwrap_or_default()),
        ContentType::Unknown => {
            let raw = fs::read(path)?;
            if is_likely_text(&raw) {
                Ok(String::from_utf8_lossy(&raw).into_owned())
            } else {
                tracing::warn!("Skipping likely binary file: {:?}", path);
                Err(AppError::InvalidInput(format!(
                    "Binary file not supported: {:?}",
                    path
                )))
            }
        }
    }
}

fn read_lossy(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}", path, e);
            None
        }
    }
}

fn extract_pdf(path: &Path) -> String {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Failed to read PDF {:?}: {}", path, e);
            return String::new();
        }
    };

    // pdf-extract panics on some malformed fonts
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&data));
    match result {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => {
            tracing::warn!("Failed to extract text from PDF {:?}: {}", path, e);
            String::new()
        }
        Err(_) => {
            tracing::error!("PDF extraction panicked for {:?}", path);
            String::new()
        }
    }
}

/// Clean markdown by removing excess formatting.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim_start_matches('#').trim();

        // Horizontal rules and code fences
        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

/// Clean HTML by stripping tags, scripts and styles.
fn clean_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    for (i, ch) in text.char_indices() {
        if ch == '<' {
            in_tag = true;
            let rest = &text[i..];
            let starts = |tag: &str| {
                rest.get(..tag.len())
                    .map(|s| s.eq_ignore_ascii_case(tag))
                    .unwrap_or(false)
            };

            if starts("<script") {
                in_script = true;
            } else if starts("</script") {
                in_script = false;
            } else if starts("<style") {
                in_style = true;
            } else if starts("</style") {
                in_style = false;
            }
        } else if ch == '>' {
            in_tag = false;
            result.push(' ');
        } else if !in_tag && !in_script && !in_style {
            result.push(ch);
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check if bytes are likely text (not binary).
fn is_likely_text(data: &[u8]) -> bool {
    !data.contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_type_detection() {
        assert_eq!(ContentType::from_path(Path::new("file.md")), ContentType::Markdown);
        assert_eq!(ContentType::from_path(Path::new("scan.PDF")), ContentType::Pdf);
        assert_eq!(ContentType::from_path(Path::new("photo.jpeg")), ContentType::Image);
        assert_eq!(ContentType::from_path(Path::new("memo.m4a")), ContentType::Audio);
        assert_eq!(ContentType::from_path(Path::new("file.txt")), ContentType::PlainText);
        assert_eq!(ContentType::from_path(Path::new("Makefile")), ContentType::Unknown);
    }

    #[test]
    fn test_is_allowed_upload() {
        assert!(is_allowed_upload("report.pdf"));
        assert!(is_allowed_upload("voice.WEBM"));
        assert!(is_allowed_upload("notes.md"));
        assert!(!is_allowed_upload("script.exe"));
        assert!(!is_allowed_upload("no_extension"));
    }

    #[test]
    fn test_clean_markdown() {
        let input = "# Header\n\nSome text\n\n```rust\ncode\n```\n\nMore text";
        let output = clean_markdown(input);
        assert!(output.contains("Header"));
        assert!(output.contains("Some text"));
        assert!(output.contains("More text"));
        assert!(!output.contains("```"));
    }

    #[test]
    fn test_clean_html() {
        let input = "<html><body><p>Hello <b>world</b></p></body></html>";
        assert_eq!(clean_html(input), "Hello world");
    }

    #[test]
    fn test_clean_html_drops_scripts_with_multibyte_text() {
        let input = "<p>Café</p><SCRIPT>var x = 1;</SCRIPT><p>naïve</p>";
        assert_eq!(clean_html(input), "Café naïve");
    }

    #[test]
    fn test_extract_plain_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "plain words").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "plain words");
    }

    #[test]
    fn test_extract_image_not_available() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scan.png");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        assert!(matches!(extract_text(&path), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_unreadable_pdf_yields_empty_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        fs::write(&path, b"not really a pdf").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "");
    }

    #[test]
    fn test_missing_text_file_yields_empty_text() {
        let temp = TempDir::new().unwrap();
        assert_eq!(extract_text(&temp.path().join("gone.md")).unwrap(), "");
    }

    #[test]
    fn test_binary_unknown_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.bin");
        fs::write(&path, [0u8, 1, 2, 3]).unwrap();

        assert!(matches!(extract_text(&path), Err(AppError::InvalidInput(_))));
    }
}
