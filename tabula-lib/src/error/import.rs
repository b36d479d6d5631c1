//! Import pipeline error types

use super::ErrorKind;
use super::StoreError;

/// Errors that abort a CSV import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The file produced zero data records.
    #[error("the file contains no data rows")]
    NoData,

    /// Every parsed row was dropped, vetoed or rejected.
    #[error("none of the {parsed} rows in the file could be imported")]
    NoValidRows {
        /// Number of data records parsed from the file.
        parsed: usize,
    },

    /// The file could not be read as delimited text.
    #[error("could not read file: {0}")]
    Parse(#[from] csv::Error),

    /// An insert chunk failed. Chunks before it remain committed.
    #[error("import failed on batch {chunk} ({committed} rows already saved): {source}")]
    Storage {
        /// Zero-based index of the failed chunk.
        chunk: usize,
        /// Rows committed by earlier chunks.
        committed: usize,
        #[source]
        source: StoreError,
    },
}

impl ImportError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoData | Self::NoValidRows { .. } | Self::Parse(_) => ErrorKind::Structural,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Returns the store error if this is a storage failure.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}
