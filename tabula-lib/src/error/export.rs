//! Export pipeline error types

use super::ErrorKind;

/// Errors raised while serializing rows to CSV.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The selection matched none of the loaded rows.
    #[error("no rows match the current selection")]
    NoMatch,

    /// The CSV writer failed.
    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The exported file could not be written to disk.
    #[error("could not save {filename}: {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoMatch => ErrorKind::Structural,
            Self::Csv(_) | Self::Io { .. } => ErrorKind::Storage,
        }
    }
}
