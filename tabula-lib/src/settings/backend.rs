//! Raw byte storage behind [`SettingsProvider`](super::SettingsProvider).

use async_trait::async_trait;

use crate::error::SettingsError;

/// Byte storage for per-page operator state.
///
/// Keys are opaque strings chosen by the caller, conventionally
/// `<page>.<item>` such as `inventory.search`.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Reads the value stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// Lists keys starting with `prefix`, sorted.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError>;

    /// Removes every key starting with `prefix` and returns how many went.
    async fn remove_prefix(&self, prefix: &str) -> Result<usize, SettingsError> {
        let keys = self.keys_with_prefix(prefix).await?;
        for key in &keys {
            self.remove(key).await?;
        }
        Ok(keys.len())
    }
}
