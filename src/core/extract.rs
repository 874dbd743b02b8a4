//! Text extraction seam
//!
//! The scan backend only needs "lines of text for this path, or a
//! failure". Everything document-format-specific sits behind
//! [`TextExtractor`], so a PDF/OCR extractor can be dropped in without
//! touching the coordinator. Extraction failures are per-file and
//! recoverable; the coordinator logs them and treats the file as having
//! no text.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Per-file extraction failures. Never fatal to a scan.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    /// Binary, encrypted or otherwise non-textual content.
    #[error("file content is not readable text")]
    Unreadable,

    #[error("file exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Produces searchable text lines from a candidate file.
///
/// `Send + Sync` are required - one extractor instance is shared across
/// all scan workers and called concurrently on different files.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Extractor for plain-text documents: strict UTF-8, size-capped.
///
/// Anything that does not decode as UTF-8 (binary blobs, encrypted
/// documents) is an [`ExtractError::Unreadable`] rather than lossy
/// garbage, so it cannot produce false matches.
#[derive(Debug, Clone)]
pub struct Utf8Extractor {
    max_file_size: u64,
}

impl Utf8Extractor {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }
}

impl Default for Utf8Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl TextExtractor for Utf8Extractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let metadata = fs::metadata(path)?;
        if metadata.len() > self.max_file_size {
            return Err(ExtractError::TooLarge {
                limit: self.max_file_size,
            });
        }

        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| ExtractError::Unreadable)?;
        Ok(text.lines().map(str::to_string).collect())
    }
}
