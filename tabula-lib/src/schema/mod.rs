//! Field schema: the declarative description of a record type.
//!
//! A [`FieldSchema`] is built once per page and then only read. The import
//! pipeline, the bulk editor and the validators all consult it to decide how
//! text from the outside world becomes typed row values.
//!
//! # Example
//!
//! ```
//! use tabula_lib::schema::{Field, FieldKind, FieldSchema};
//!
//! let schema = FieldSchema::new([
//!     Field::new("name", "Product Name", FieldKind::Text).required(),
//!     Field::new("quantity", "Qty", FieldKind::Integer).default_value(0i64),
//!     Field::new("unit", "Unit", FieldKind::Choice).choices(["pcs", "box"]),
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.len(), 3);
//! ```

mod field;

pub use field::*;

use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::error::FieldValidationError;
use crate::error::SchemaError;
use crate::model::Row;
use crate::model::Value;

/// An ordered, immutable list of fields with unique keys.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: Vec<Field>,
}

impl FieldSchema {
    /// Builds a schema, rejecting duplicate keys and empty choice sets.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Self, SchemaError> {
        let fields: Vec<Field> = fields.into_iter().collect();
        let mut seen = HashSet::new();

        for field in &fields {
            if !seen.insert(field.key.as_str()) {
                return Err(SchemaError::DuplicateKey(field.key.clone()));
            }
            if field.kind == FieldKind::Choice && field.choices.is_empty() {
                return Err(SchemaError::EmptyChoices(field.key.clone()));
            }
        }

        Ok(Self { fields })
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the keys of all timestamp fields.
    pub fn timestamp_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Timestamp)
            .map(|f| f.key.as_str())
    }

    /// Fills absent or null fields with their declared defaults.
    ///
    /// Explicit values always win over defaults.
    pub fn apply_defaults(&self, row: Row) -> Row {
        let mut row = row;
        for field in &self.fields {
            let Some(default) = &field.default_value else {
                continue;
            };
            let missing = row.get(&field.key).is_none_or(Value::is_null);
            if missing {
                row.insert(field.key.clone(), default.clone());
            }
        }
        row
    }

    /// Checks a row against every declared rule.
    ///
    /// Returns all failures, in field declaration order.
    pub fn validate_row(&self, row: &Row) -> Result<(), Vec<FieldValidationError>> {
        let errors: Vec<FieldValidationError> = self
            .fields
            .iter()
            .filter_map(|field| field.check(row.get(&field.key).unwrap_or(&Value::Null)).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns empty form values for a create form, pre-filled with defaults.
    pub fn blank_form(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|f| {
                let text = f
                    .default_value
                    .as_ref()
                    .map(Value::to_display_string)
                    .unwrap_or_default();
                (f.key.clone(), text)
            })
            .collect()
    }
}
