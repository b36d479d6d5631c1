//! SQLite settings backend

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::rusqlite;
use async_sqlite::rusqlite::OptionalExtension;
use async_trait::async_trait;
use chrono::SecondsFormat;
use chrono::Utc;
use dashmap::DashMap;
use log::debug;

use super::SettingsBackend;
use crate::error::SettingsError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS page_state (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Settings persisted in a SQLite file.
///
/// Reads go through a cache that also remembers missing keys, so a page
/// mounting repeatedly hits the database once per key. Writes go to the
/// database first and update the cache only on success.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Option<Vec<u8>>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        debug!("Opening settings database at {}", path.as_ref().display());
        let client = ClientBuilder::new().path(path).open().await?;
        Self::init(client).await
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> Result<Self, SettingsError> {
        let client = ClientBuilder::new().open().await?;
        Self::init(client).await
    }

    async fn init(client: Client) -> Result<Self, SettingsError> {
        client.conn(|conn| conn.execute(SCHEMA, [])).await?;
        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        if let Some(cached) = self.cache.get(key) {
            return Ok(cached.value().clone());
        }

        let owned = key.to_string();
        let value = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT value FROM page_state WHERE key = ?1",
                    [&owned],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
            })
            .await?;

        self.cache.insert(key.to_string(), value.clone());
        Ok(value)
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let owned = key.to_string();
        let bytes = value.clone();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO page_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE
                     SET value = excluded.value, updated_at = excluded.updated_at",
                    rusqlite::params![owned, bytes, now],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM page_state WHERE key = ?1", [&owned]))
            .await?;

        self.cache.insert(key.to_string(), None);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        let owned = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM page_state
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key",
                )?;
                let keys = stmt
                    .query_map([&owned], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await?;
        Ok(keys)
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<usize, SettingsError> {
        let owned = prefix.to_string();
        let removed = self
            .client
            .conn(move |conn| {
                conn.execute(
                    "DELETE FROM page_state WHERE substr(key, 1, length(?1)) = ?1",
                    [&owned],
                )
            })
            .await?;

        self.cache.retain(|key, _| !key.starts_with(prefix));
        Ok(removed)
    }
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("cached_keys", &self.cache.len())
            .finish_non_exhaustive()
    }
}
