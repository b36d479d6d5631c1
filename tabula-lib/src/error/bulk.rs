//! Bulk edit and bulk delete error types

use super::ErrorKind;
use super::FieldValidationError;
use super::StoreError;
use super::join_field_errors;

/// Errors raised by bulk mutations on the selected rows.
#[derive(Debug, thiserror::Error)]
pub enum BulkEditError {
    /// No rows are selected.
    #[error("select at least one row first")]
    NoSelection,

    /// Every field in the bulk edit form was left blank.
    #[error("fill in at least one field to update")]
    NoFieldsFilled,

    /// One or more filled fields could not be sanitized.
    #[error("invalid values: {}", join_field_errors(.0))]
    Validation(Vec<FieldValidationError>),

    /// The row store rejected the update.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl BulkEditError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoSelection | Self::NoFieldsFilled => ErrorKind::Structural,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}
