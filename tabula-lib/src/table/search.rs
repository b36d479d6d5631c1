//! Search box state and client-side row filtering

use log::debug;

use super::Column;
use crate::error::SettingsError;
use crate::model::Row;
use crate::settings::SettingsProvider;

/// Returns `true` if any column's displayed text contains the term,
/// ignoring case. An empty or blank term matches every row.
pub fn row_matches(row: &Row, columns: &[Column], term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    columns
        .iter()
        .any(|column| column.display(row).to_lowercase().contains(&needle))
}

/// The search term of one list page, persisted under an explicit key.
///
/// The stored term is read once when the component mounts and written back
/// whenever it changes.
///
/// # Example
///
/// ```ignore
/// let settings = SettingsProvider::new(SqliteBackend::new(path).await?);
/// let mut search = SearchTerm::mount(settings, "inventory.search").await?;
///
/// table.set_search(search.term());
/// search.set("bolt").await?;
/// table.set_search(search.term());
/// ```
#[derive(Debug, Clone)]
pub struct SearchTerm {
    settings: SettingsProvider,
    storage_key: String,
    term: String,
}

impl SearchTerm {
    /// Loads the saved term for `storage_key`, or starts empty.
    pub async fn mount(
        settings: SettingsProvider,
        storage_key: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        let storage_key = storage_key.into();
        let term: String = settings.get_or(&storage_key, String::new()).await?;
        debug!("Loaded search term for {storage_key}: {term:?}");

        Ok(Self {
            settings,
            storage_key,
            term,
        })
    }

    /// Returns the current term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns the key the term is stored under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Updates the term and saves it. Returns `false` if nothing changed.
    pub async fn set(&mut self, term: impl Into<String>) -> Result<bool, SettingsError> {
        let term = term.into();
        if term == self.term {
            return Ok(false);
        }
        self.settings.set(&self.storage_key, &term).await?;
        self.term = term;
        Ok(true)
    }

    /// Clears the term and removes the saved value.
    pub async fn clear(&mut self) -> Result<(), SettingsError> {
        self.settings.remove(&self.storage_key).await?;
        self.term.clear();
        Ok(())
    }
}
