use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TilesError {
    #[error("population source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("population CSV header error: {0}")]
    Header(String),

    /// A single bad record.  Recoverable: the filter counts and skips it.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TilesError {
    /// `true` for per-row faults that must not abort a scan.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TilesError::MalformedRecord(_))
    }
}

pub type TilesResult<T> = Result<T, TilesError>;
