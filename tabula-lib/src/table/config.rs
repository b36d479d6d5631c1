//! Table configuration

/// Configuration for a rendered table instance.
///
/// # Example
///
/// ```
/// use tabula_lib::table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_page_size(25)
///     .with_recency_keys(["created_at", "sold_at"]);
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Page sizes offered to the operator.
    ///
    /// Default: 10, 25, 50, 100
    pub page_size_options: Vec<usize>,

    /// Timestamp keys probed, in priority order, to sort rows newest first.
    ///
    /// Default: `created_at`, then `logged_at`
    pub recency_keys: Vec<String>,

    /// Text of the placeholder row shown when there is nothing to display.
    pub empty_message: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: vec![10, 25, 50, 100],
            recency_keys: vec!["created_at".to_string(), "logged_at".to_string()],
            empty_message: "No records found.".to_string(),
        }
    }
}

impl TableConfig {
    /// Creates a new table config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size. Zero is raised to one.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets the page sizes offered to the operator.
    pub fn with_page_size_options(mut self, options: impl IntoIterator<Item = usize>) -> Self {
        self.page_size_options = options.into_iter().filter(|s| *s > 0).collect();
        self
    }

    /// Sets the timestamp keys probed for recency sorting.
    pub fn with_recency_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recency_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the empty-state message.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }
}
