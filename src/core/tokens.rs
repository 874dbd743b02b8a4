//! Token set - normalized search tokens loaded from a CSV column

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Header of the CSV column that holds the search tokens.
pub const TOKEN_COLUMN: &str = "Invoice #";

/// Fatal configuration errors raised while loading the token set.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("column {column:?} not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("failed to read token file {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// The deduplicated, normalized search tokens.
///
/// Tokens are trimmed, lowercased and ASCII-only; anything containing a
/// code point >= 128 is dropped during loading (policy filter, not an
/// error). The set is immutable after construction and iterates in sorted
/// order, so reports and copies derived from it are deterministic.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    /// Load tokens from the given CSV file.
    ///
    /// The file must have a header row containing `column`; each row's
    /// value under that column is one raw token. A missing column or an
    /// unreadable file is fatal.
    pub fn from_csv(path: &Path, column: &str) -> Result<Self, TokenError> {
        let csv_err = |source| TokenError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let headers = reader.headers().map_err(csv_err)?;
        let index = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| TokenError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })?;

        let mut set = BTreeSet::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            if let Some(raw) = record.get(index) {
                insert_normalized(&mut set, raw);
            }
        }

        Ok(Self {
            tokens: set.into_iter().collect(),
        })
    }

    /// Build a token set directly from raw strings, with the same
    /// normalization as CSV loading.
    pub fn from_tokens<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for token in raw {
            insert_normalized(&mut set, token.as_ref());
        }
        Self {
            tokens: set.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.binary_search_by(|t| t.as_str().cmp(token)).is_ok()
    }

    /// Tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Sorted token slice, indexable by matcher results.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

/// Normalize one raw token and insert it if it survives the filters.
fn insert_normalized(set: &mut BTreeSet<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    if !trimmed.is_ascii() {
        debug!("dropping non-ASCII token {:?}", trimmed);
        return;
    }
    set.insert(trimmed.to_lowercase());
}
