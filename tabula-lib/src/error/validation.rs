//! Per-field validation failures

use thiserror::Error;

/// A field that failed a declared schema rule or a caller-supplied check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}{}", code_suffix(.code))]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
    /// Machine-readable reason such as `required`, `choice` or `kind`.
    pub code: Option<String>,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::new(field, message)
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

/// Joins field errors into the single line shown in a notification.
pub(crate) fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
