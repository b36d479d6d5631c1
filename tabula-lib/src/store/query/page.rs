//! Page type for query results.

use crate::model::Row;

/// A page of query results, with the server-side count when requested.
///
/// # Example
///
/// ```ignore
/// let page = store
///     .select(&Collection::new("products"), &Query::new().limit(25).with_count())
///     .await?;
///
/// println!("showing {} of {:?}", page.len(), page.total_count());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Page {
    rows: Vec<Row>,
    /// Total matching row count (if requested with [`Query::with_count`](super::Query::with_count)).
    total_count: Option<usize>,
}

impl Page {
    /// Creates a new page of rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            total_count: None,
        }
    }

    /// Sets the total row count.
    pub fn with_total_count(mut self, count: usize) -> Self {
        self.total_count = Some(count);
        self
    }

    /// Returns a reference to the rows in this page.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the page and returns the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns the total row count, if it was requested.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
