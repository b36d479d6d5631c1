//! Process-local settings backend

use async_trait::async_trait;
use dashmap::DashMap;

use super::SettingsBackend;
use crate::error::SettingsError;

/// Settings that live as long as the process. Used by tests and by pages
/// that should forget their state on restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.values.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        let mut keys: Vec<String> = self
            .values
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<usize, SettingsError> {
        let before = self.values.len();
        self.values.retain(|key, _| !key.starts_with(prefix));
        Ok(before - self.values.len())
    }
}
