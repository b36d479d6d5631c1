//! Dynamic row and sparse patch

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::Value;
use crate::error::FieldError;

/// The identifier the row store assigns to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub Uuid);

impl RowId {
    /// Generates a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RowId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dynamic record: field values keyed by field key.
///
/// Rows are produced by the import parser or returned by the row store.
/// Pipelines treat them as values and build new rows instead of editing
/// the ones they were given.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
///
/// let row = Row::new()
///     .set("name", "Widget")
///     .set("quantity", 12i64);
///
/// assert_eq!(row.get_text("name").unwrap(), Some("Widget"));
/// assert_eq!(row.get_int("quantity").unwrap(), Some(12));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    /// The store-assigned identifier. `None` until inserted.
    pub(crate) id: Option<RowId>,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row without an id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty row with the given id.
    pub fn with_id(id: RowId) -> Self {
        Self {
            id: Some(id),
            fields: HashMap::new(),
        }
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    /// Returns the row id, if set.
    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    /// Sets the row id.
    pub fn set_id(&mut self, id: RowId) {
        self.id = Some(id);
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns the stored value, `None` if the field was never set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields whose value is not null.
    pub fn non_null_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.as_str(), v))
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Builder form of [`insert`](Self::insert).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Returns a copy of this row with the patch applied on top.
    pub fn patched(&self, patch: &Patch) -> Row {
        let mut row = self.clone();
        for (key, value) in patch.fields() {
            row.fields.insert(key.clone(), value.clone());
        }
        row
    }

    // =========================================================================
    // Typed getters
    //
    // A missing field or a value of another kind is an error. Only a present
    // null yields Ok(None).
    // =========================================================================

    fn typed<'a, T>(
        &'a self,
        field: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, FieldError> {
        let value = self.fields.get(field).ok_or_else(|| FieldError::missing(field))?;
        if value.is_null() {
            return Ok(None);
        }
        extract(value)
            .map(Some)
            .ok_or_else(|| FieldError::type_mismatch(field, expected, value.type_name()))
    }

    pub fn get_text(&self, field: &str) -> Result<Option<&str>, FieldError> {
        self.typed(field, "text", Value::as_text)
    }

    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        self.typed(field, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        self.typed(field, "int", |v| match v {
            Value::Int(n) => Some(*n),
            _ => None,
        })
    }

    /// Integers widen to decimals.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        self.typed(field, "decimal", Value::as_decimal)
    }

    pub fn get_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.typed(field, "timestamp", |v| match v {
            Value::Timestamp(dt) => Some(*dt),
            _ => None,
        })
    }
}

/// A sparse set of field values applied identically to every targeted row.
///
/// Keys absent from the patch are left untouched by an update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patch {
    fields: BTreeMap<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Adds a field, replacing an earlier value for the same key.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the patched fields in key order.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Returns the patched field keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
