//! Error types

mod bulk;
mod export;
mod field;
mod import;
mod schema;
mod settings;
mod store;
mod validation;

pub use bulk::*;
pub use export::*;
pub use field::*;
pub use import::*;
pub use schema::*;
pub use settings::*;
pub use store::*;
pub use validation::*;

/// Broad classification of a failure, used by page code to pick the single
/// notification shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A field failed a declared or custom rule.
    Validation,
    /// The operation had nothing to work on (no data, no selection, ...).
    /// Always raised before any storage call.
    Structural,
    /// The row store rejected the call.
    Storage,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation error"),
            Self::Structural => write!(f, "structural error"),
            Self::Storage => write!(f, "storage error"),
        }
    }
}
