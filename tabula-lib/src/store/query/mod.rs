//! Query types for the row store.
//!
//! - [`Filter`] - Filter conditions (equality, range, pattern, null checks)
//! - [`OrderBy`] - Ordering specification for query results
//! - [`Page`] - A page of query results with an optional total count
//! - [`Query`] - Everything a `select` call needs

mod filter;
mod order;
mod page;

pub use filter::Filter;
pub use order::Direction;
pub use order::OrderBy;
pub use page::Page;

/// A `select` request: filter, ordering, window and count flag.
///
/// # Example
///
/// ```
/// use tabula_lib::store::query::{Filter, OrderBy, Query};
///
/// let query = Query::new()
///     .filter(Filter::ge("quantity", 10i64))
///     .order_by(OrderBy::desc("created_at"))
///     .limit(50)
///     .with_count();
///
/// assert_eq!(query.limit, Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Rows must match this filter.
    pub filter: Option<Filter>,
    /// Result ordering.
    pub order: Option<OrderBy>,
    /// Number of matching rows to skip.
    pub offset: usize,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
    /// Whether to return the total matching count alongside the page.
    pub count: bool,
}

impl Query {
    /// Creates a query matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the ordering.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the number of rows to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of rows to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requests the total matching count.
    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }
}
