//! Page state persistence error types

/// Errors raised while loading or saving per-page state.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The SQLite backend failed.
    #[error("could not access saved page state: {0}")]
    Database(#[from] async_sqlite::Error),

    /// A value could not be encoded.
    #[error("could not encode page state: {0}")]
    Serialization(bincode::Error),

    /// A stored value did not decode as the requested type.
    #[error("saved page state is unreadable: {0}")]
    Deserialization(bincode::Error),
}
