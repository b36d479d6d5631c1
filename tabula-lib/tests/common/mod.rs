//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::Once;

use async_trait::async_trait;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TestLogger;
use tabula_lib::error::StoreError;
use tabula_lib::model::Collection;
use tabula_lib::model::Patch;
use tabula_lib::model::Row;
use tabula_lib::model::RowId;
use tabula_lib::store::MemoryStore;
use tabula_lib::store::RowStore;
use tabula_lib::store::query::Page;
use tabula_lib::store::query::Query;

static LOGGER: Once = Once::new();

/// Routes `log` output to the test harness.
pub fn init_logging() {
    LOGGER.call_once(|| {
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
    });
}

/// A store call as seen by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select,
    Insert(usize),
    Update(Vec<RowId>, Patch),
    Delete(Vec<RowId>),
}

/// Wraps a [`MemoryStore`], recording every call. Can be told to fail the
/// n-th insert call.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    fail_insert: Option<usize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the insert call with this zero-based index fail.
    pub fn failing_insert(index: usize) -> Self {
        Self {
            fail_insert: Some(index),
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn insert_sizes(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Insert(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.iter().filter(|c| matches!(c, Call::Insert(_))).count()
    }
}

#[async_trait]
impl RowStore for RecordingStore {
    async fn select(&self, collection: &Collection, query: &Query) -> Result<Page, StoreError> {
        self.record(Call::Select);
        self.inner.select(collection, query).await
    }

    async fn insert(&self, collection: &Collection, rows: Vec<Row>) -> Result<usize, StoreError> {
        let inserts = self.record(Call::Insert(rows.len()));
        if self.fail_insert == Some(inserts - 1) {
            return Err(StoreError::backend_with_code("connection reset", "08006"));
        }
        self.inner.insert(collection, rows).await
    }

    async fn update(
        &self,
        collection: &Collection,
        ids: &[RowId],
        patch: &Patch,
    ) -> Result<usize, StoreError> {
        self.record(Call::Update(ids.to_vec(), patch.clone()));
        self.inner.update(collection, ids, patch).await
    }

    async fn delete(&self, collection: &Collection, ids: &[RowId]) -> Result<usize, StoreError> {
        self.record(Call::Delete(ids.to_vec()));
        self.inner.delete(collection, ids).await
    }
}
