use std::path::PathBuf;

use thiserror::Error;

/// The backing file does not have the canonical shape
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("CSV header does not match expected format (found {found:?})")]
    Header { found: Vec<String> },
    #[error("invalid record length on line {line}: expected 4 fields, got {got}")]
    FieldCount { line: u64, got: usize },
    #[error("invalid amount on line {line}: {value:?}")]
    Amount { line: u64, value: String },
    #[error("malformed CSV: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

/// Error type for the transaction store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Fatal at load time; the store refuses to serve
    #[error("backing file is malformed: {0}")]
    Format(#[from] FormatError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file could not be rewritten; the in-memory table may be ahead of disk
    #[error("failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}
