//! Schema construction errors

use thiserror::Error;

/// Raised when a field list cannot form a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate field key '{0}'")]
    DuplicateKey(String),

    #[error("choice field '{0}' has no choices")]
    EmptyChoices(String),
}
