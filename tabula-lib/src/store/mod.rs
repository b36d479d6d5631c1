//! Row store gateway
//!
//! The engine never embeds storage logic. Every read and write goes through
//! a [`RowStore`], an injected capability parameterized by collection name.
//! [`MemoryStore`] is the in-process implementation used by tests and demos.

mod memory;
pub mod query;

pub use memory::*;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::Collection;
use crate::model::Patch;
use crate::model::Row;
use crate::model::RowId;
use query::Page;
use query::Query;

/// Largest number of rows a single `insert` call may carry.
pub const MAX_INSERT_BATCH: usize = 1000;

/// Capability for reading and writing rows in named collections.
///
/// Implementations are responsible for:
/// - Assigning an id to every inserted row that does not carry one
/// - Applying one patch to every id of an `update` call
/// - Honoring the filter, ordering and window of a [`Query`]
///
/// # Example
///
/// ```ignore
/// use tabula_lib::model::{Collection, Row};
/// use tabula_lib::store::{MemoryStore, RowStore};
///
/// let store = MemoryStore::new();
/// let products = Collection::new("products");
///
/// store.insert(&products, vec![Row::new().set("name", "Bolt")]).await?;
/// let page = store.select(&products, &Query::new().with_count()).await?;
/// ```
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Returns the rows matching the query.
    async fn select(&self, collection: &Collection, query: &Query) -> Result<Page, StoreError>;

    /// Inserts rows and returns how many were written.
    async fn insert(&self, collection: &Collection, rows: Vec<Row>) -> Result<usize, StoreError>;

    /// Applies the same patch to every listed row and returns how many changed.
    async fn update(
        &self,
        collection: &Collection,
        ids: &[RowId],
        patch: &Patch,
    ) -> Result<usize, StoreError>;

    /// Deletes the listed rows and returns how many were removed.
    async fn delete(&self, collection: &Collection, ids: &[RowId]) -> Result<usize, StoreError>;

    /// The per-call row ceiling of `insert`.
    fn max_insert_batch(&self) -> usize {
        MAX_INSERT_BATCH
    }
}
