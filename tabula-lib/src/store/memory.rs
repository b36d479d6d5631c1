//! In-memory row store using DashMap

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;

use super::MAX_INSERT_BATCH;
use super::RowStore;
use super::query::Page;
use super::query::Query;
use crate::error::StoreError;
use crate::model::Collection;
use crate::model::Patch;
use crate::model::Row;
use crate::model::RowId;

/// A row store backed by a concurrent hash map of collections.
///
/// Rows keep insertion order, which is also the order of unsorted
/// `select` results. Data is lost when the process exits.
///
/// # Example
///
/// ```
/// use tabula_lib::store::MemoryStore;
///
/// let store = MemoryStore::new().with_max_insert_batch(500);
/// assert!(store.is_empty());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    collections: DashMap<Collection, Vec<Row>>,
    max_insert_batch: usize,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            max_insert_batch: MAX_INSERT_BATCH,
        }
    }

    /// Sets the per-call insert ceiling.
    pub fn with_max_insert_batch(mut self, max: usize) -> Self {
        self.max_insert_batch = max.max(1);
        self
    }

    /// Returns the number of rows in a collection.
    pub fn len(&self, collection: &Collection) -> usize {
        self.collections.get(collection).map(|rows| rows.len()).unwrap_or(0)
    }

    /// Returns `true` if no collection holds any row.
    pub fn is_empty(&self) -> bool {
        self.collections.iter().all(|entry| entry.value().is_empty())
    }

    /// Returns a copy of every row in a collection, in insertion order.
    pub fn rows(&self, collection: &Collection) -> Vec<Row> {
        self.collections
            .get(collection)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(&self, collection: &Collection, query: &Query) -> Result<Page, StoreError> {
        let mut matched: Vec<Row> = match self.collections.get(collection) {
            Some(rows) => rows
                .iter()
                .filter(|row| query.filter.as_ref().is_none_or(|f| f.matches(row)))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        if let Some(order) = &query.order {
            matched.sort_by(|a, b| order.compare(a, b));
        }

        let total = matched.len();
        let window: Vec<Row> = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        let page = Page::new(window);
        Ok(if query.count {
            page.with_total_count(total)
        } else {
            page
        })
    }

    async fn insert(&self, collection: &Collection, rows: Vec<Row>) -> Result<usize, StoreError> {
        if rows.len() > self.max_insert_batch {
            return Err(StoreError::BatchTooLarge {
                len: rows.len(),
                max: self.max_insert_batch,
            });
        }

        let mut entry = self.collections.entry(collection.clone()).or_default();
        let mut taken: HashSet<RowId> = entry.iter().filter_map(Row::id).collect();

        let mut prepared = Vec::with_capacity(rows.len());
        for mut row in rows {
            let id = match row.id() {
                Some(id) => id,
                None => {
                    let id = RowId::new_v4();
                    row.set_id(id);
                    id
                }
            };
            if !taken.insert(id) {
                return Err(StoreError::Conflict(id.uuid()));
            }
            prepared.push(row);
        }

        let count = prepared.len();
        entry.extend(prepared);
        Ok(count)
    }

    async fn update(
        &self,
        collection: &Collection,
        ids: &[RowId],
        patch: &Patch,
    ) -> Result<usize, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::InvalidRequest("empty patch".into()));
        }

        let targets: HashSet<&RowId> = ids.iter().collect();
        let Some(mut rows) = self.collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut changed = 0;
        for row in rows.iter_mut() {
            if row.id().is_some_and(|id| targets.contains(&id)) {
                *row = row.patched(patch);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, collection: &Collection, ids: &[RowId]) -> Result<usize, StoreError> {
        let targets: HashSet<&RowId> = ids.iter().collect();
        let Some(mut rows) = self.collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = rows.len();
        rows.retain(|row| !row.id().is_some_and(|id| targets.contains(&id)));
        Ok(before - rows.len())
    }

    fn max_insert_batch(&self) -> usize {
        self.max_insert_batch
    }
}
