//! Import configuration

use crate::store::MAX_INSERT_BATCH;

/// Configuration for a CSV import.
///
/// # Example
///
/// ```
/// use tabula_lib::import::ImportConfig;
///
/// let config = ImportConfig::default()
///     .with_chunk_size(500)
///     .with_timestamp_keys(["sold_at"]);
/// assert_eq!(config.chunk_size, 500);
/// ```
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Rows per insert call. Never above the row store's own ceiling.
    ///
    /// Default: 1000
    pub chunk_size: usize,

    /// Field delimiter.
    ///
    /// Default: `,`
    pub delimiter: u8,

    /// Extra keys whose cells are parsed as dates, on top of the timestamp
    /// fields of an attached schema.
    pub timestamp_keys: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: MAX_INSERT_BATCH,
            delimiter: b',',
            timestamp_keys: Vec::new(),
        }
    }
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size, clamped to `1..=MAX_INSERT_BATCH`.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.clamp(1, MAX_INSERT_BATCH);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_timestamp_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timestamp_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}
