//! Row store error types

/// Errors returned by a [`RowStore`](crate::store::RowStore) implementation.
///
/// Pipelines never interpret these; they are surfaced to the caller verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected the call.
    #[error("{message}")]
    Backend {
        /// Error message from the backend.
        message: String,
        /// Backend error code, if available.
        code: Option<String>,
    },

    /// More rows were submitted in one insert than the backend accepts.
    #[error("insert of {len} rows exceeds the per-call limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// A row passed to `insert` carried an id that already exists.
    #[error("row {0} already exists")]
    Conflict(uuid::Uuid),

    /// The filter or patch could not be applied.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    /// Creates a backend error with a message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a backend error with a message and error code.
    pub fn backend_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Returns the backend error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
