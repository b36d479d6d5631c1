//! Export configuration

/// Configuration for a CSV export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Name of the produced file.
    ///
    /// Default: `export.csv`
    pub filename: String,

    /// Columns whose header contains this text (any case) are currency rates
    /// and always carry two decimal places.
    ///
    /// Default: `rate`
    pub rate_marker: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: "export.csv".to_string(),
            rate_marker: "rate".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_rate_marker(mut self, marker: impl Into<String>) -> Self {
        self.rate_marker = marker.into();
        self
    }

    pub(crate) fn is_rate_column(&self, header: &str) -> bool {
        !self.rate_marker.is_empty()
            && header.to_lowercase().contains(&self.rate_marker.to_lowercase())
    }
}
