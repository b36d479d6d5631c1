//! Persisted per-page operator state.
//!
//! List pages remember small things between visits, such as the last search
//! term. The state goes through a [`SettingsProvider`] handed to the page,
//! never through process-global storage, and is addressed by an explicit
//! storage key.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SettingsError;

/// Typed access to a [`SettingsBackend`]. Values are encoded with bincode.
///
/// Cloning is cheap; clones share the backend.
///
/// # Example
///
/// ```ignore
/// let settings = SettingsProvider::new(SqliteBackend::open("state.db").await?);
/// settings.set("inventory.page_size", &25usize).await?;
///
/// let size: usize = settings.get_or("inventory.page_size", 10).await?;
/// ```
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A provider that forgets everything when the process exits.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Reads and decodes the value under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        self.backend
            .read(key)
            .await?
            .map(|bytes| bincode::deserialize(&bytes).map_err(SettingsError::Deserialization))
            .transpose()
    }

    /// Like [`get`](Self::get), falling back to `default` for missing keys.
    pub async fn get_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Encodes and stores a value.
    pub async fn set<T: Serialize + Sync + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.write(key, bytes).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.remove(key).await
    }

    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        self.backend.keys_with_prefix(prefix).await
    }

    /// Forgets every key of one page, e.g. `"inventory."`.
    pub async fn remove_prefix(&self, prefix: &str) -> Result<usize, SettingsError> {
        self.backend.remove_prefix(prefix).await
    }
}

impl std::fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_values() {
        let settings = SettingsProvider::in_memory();
        settings.set("inventory.page_size", &25usize).await.unwrap();
        settings.set("inventory.search", "bolt").await.unwrap();

        let size: Option<usize> = settings.get("inventory.page_size").await.unwrap();
        assert_eq!(size, Some(25));
        assert_eq!(
            settings.get::<String>("inventory.search").await.unwrap().as_deref(),
            Some("bolt")
        );
        assert_eq!(settings.get_or("sales.page_size", 10usize).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_remove_prefix_scopes_to_one_page() {
        let settings = SettingsProvider::in_memory();
        settings.set("sales.search", "x").await.unwrap();
        settings.set("sales.page_size", &50usize).await.unwrap();
        settings.set("payroll.search", "y").await.unwrap();

        assert_eq!(settings.remove_prefix("sales.").await.unwrap(), 2);
        assert_eq!(
            settings.keys_with_prefix("").await.unwrap(),
            vec!["payroll.search".to_string()]
        );
    }

    #[tokio::test]
    async fn test_undecodable_value() {
        let backend = MemoryBackend::new();
        backend.write("broken", vec![1]).await.unwrap();
        let settings = SettingsProvider::new(backend);

        let err = settings.get::<String>("broken").await.unwrap_err();
        assert!(matches!(err, SettingsError::Deserialization(_)));
    }
}
