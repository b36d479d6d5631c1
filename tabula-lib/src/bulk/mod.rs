//! Bulk edit
//!
//! Applies the filled-in fields of one form to every selected row with a
//! single partial update. Blank form fields leave the stored values alone.

use std::collections::BTreeMap;
use std::str::FromStr;

use log::debug;
use log::info;
use rust_decimal::Decimal;

use crate::datetime::parse_timestamp;
use crate::error::BulkEditError;
use crate::error::FieldValidationError;
use crate::model::Collection;
use crate::model::Patch;
use crate::model::RowId;
use crate::model::Value;
use crate::schema::Field;
use crate::schema::FieldKind;
use crate::schema::FieldSchema;
use crate::store::RowStore;
use crate::table::SelectionSet;

/// What a successful bulk edit sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkEditOutcome {
    /// The ids the patch was applied to.
    pub ids: Vec<RowId>,
    /// The sparse patch.
    pub patch: Patch,
    /// Rows the store reported as changed.
    pub updated: usize,
}

/// Builds the sparse patch for a bulk edit form.
///
/// Fields are taken in schema order. Blank values are skipped, the rest are
/// sanitized by field kind and checked against the field's rules. Form keys
/// the schema does not declare are ignored.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use tabula_lib::bulk::build_patch;
/// use tabula_lib::schema::{Field, FieldKind, FieldSchema};
///
/// let schema = FieldSchema::new([
///     Field::new("name", "Name", FieldKind::Text),
///     Field::new("price", "Price", FieldKind::Decimal),
/// ])
/// .unwrap();
///
/// let form = BTreeMap::from([
///     ("name".to_string(), String::new()),
///     ("price".to_string(), "100.10".to_string()),
/// ]);
///
/// let patch = build_patch(&form, &schema).unwrap();
/// assert_eq!(patch.len(), 1);
/// assert_eq!(patch.get("price").unwrap().to_string(), "100.10");
/// ```
pub fn build_patch(
    form: &BTreeMap<String, String>,
    schema: &FieldSchema,
) -> Result<Patch, BulkEditError> {
    for key in form.keys().filter(|key| schema.field(key).is_none()) {
        debug!("Ignoring form value for unknown field '{key}'");
    }

    let mut patch = Patch::new();
    let mut errors = Vec::new();

    for field in schema.fields() {
        let Some(raw) = form.get(&field.key).filter(|raw| !raw.trim().is_empty()) else {
            continue;
        };
        match sanitize(field, raw).and_then(|value| field.check(&value).map(|()| value)) {
            Ok(value) => patch.insert(field.key.clone(), value),
            Err(error) => errors.push(error),
        }
    }

    if !errors.is_empty() {
        return Err(BulkEditError::Validation(errors));
    }
    if patch.is_empty() {
        return Err(BulkEditError::NoFieldsFilled);
    }
    Ok(patch)
}

/// Applies a bulk edit form to every selected row.
///
/// Fails with [`BulkEditError::NoSelection`] or
/// [`BulkEditError::NoFieldsFilled`] before touching the store. Otherwise
/// issues one `update` for all selected ids and, on success, clears the
/// selection.
pub async fn apply(
    store: &dyn RowStore,
    collection: &Collection,
    selection: &mut SelectionSet,
    form: &BTreeMap<String, String>,
    schema: &FieldSchema,
) -> Result<BulkEditOutcome, BulkEditError> {
    if selection.is_empty() {
        return Err(BulkEditError::NoSelection);
    }

    let patch = build_patch(form, schema)?;
    let ids = selection.to_vec();
    debug!(
        "Updating {} rows in {collection} with fields {:?}",
        ids.len(),
        patch.keys().collect::<Vec<_>>()
    );

    let updated = store.update(collection, &ids, &patch).await?;
    info!("Bulk edit changed {updated} rows in {collection}");

    selection.clear();
    Ok(BulkEditOutcome {
        ids,
        patch,
        updated,
    })
}

fn sanitize(field: &Field, raw: &str) -> Result<Value, FieldValidationError> {
    let trimmed = raw.trim();
    match field.kind {
        FieldKind::Text => Ok(Value::Text(raw.to_string())),
        FieldKind::Integer => trimmed.parse::<i64>().map(Value::Int).map_err(|_| {
            FieldValidationError::with_code(&field.key, format!("{} must be a whole number", field.label), "kind")
        }),
        FieldKind::Decimal => Decimal::from_str(trimmed).map(Value::Decimal).map_err(|_| {
            FieldValidationError::with_code(&field.key, format!("{} must be a number", field.label), "kind")
        }),
        FieldKind::Choice => {
            if field.choices.iter().any(|choice| choice == trimmed) {
                Ok(Value::Text(trimmed.to_string()))
            } else {
                Err(FieldValidationError::with_code(
                    &field.key,
                    format!("{} must be one of: {}", field.label, field.choices.join(", ")),
                    "choice",
                ))
            }
        }
        FieldKind::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp).ok_or_else(|| {
            FieldValidationError::with_code(&field.key, format!("{} is not a valid date", field.label), "kind")
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::model::Row;
    use crate::store::MemoryStore;

    fn schema() -> FieldSchema {
        FieldSchema::new([
            Field::new("name", "Name", FieldKind::Text),
            Field::new("quantity", "Qty", FieldKind::Integer)
                .rule(|v| v.as_decimal().is_some_and(|d| d >= Decimal::ZERO), "Qty cannot be negative"),
            Field::new("cost", "Cost", FieldKind::Decimal),
            Field::new("unit", "Unit", FieldKind::Choice).choices(["pcs", "box"]),
            Field::new("restocked_at", "Restocked", FieldKind::Timestamp),
        ])
        .unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_blank_values_left_out() {
        let patch = build_patch(&form(&[("name", "X"), ("quantity", " "), ("cost", "")]), &schema())
            .unwrap();
        assert_eq!(patch, Patch::new().set("name", "X"));
    }

    #[test]
    fn test_sanitized_by_kind() {
        let patch = build_patch(
            &form(&[
                ("quantity", " 12 "),
                ("cost", "100.10"),
                ("unit", "box"),
                ("restocked_at", "03-04-2024"),
                ("colour", "red"),
            ]),
            &schema(),
        )
        .unwrap();

        assert_eq!(patch.get("quantity"), Some(&Value::Int(12)));
        assert_eq!(patch.get("cost").unwrap().to_string(), "100.10");
        assert_eq!(patch.get("unit"), Some(&Value::Text("box".into())));
        assert_eq!(
            patch.get("restocked_at"),
            Some(&Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()))
        );
        assert_eq!(patch.len(), 4);
    }

    #[test]
    fn test_invalid_values() {
        let err = build_patch(
            &form(&[("quantity", "-1"), ("cost", "ten"), ("unit", "crate")]),
            &schema(),
        )
        .unwrap_err();

        let BulkEditError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let codes: Vec<_> = errors.iter().map(|e| e.code.as_deref()).collect();
        assert_eq!(codes, vec![Some("rule"), Some("kind"), Some("choice")]);
    }

    #[test]
    fn test_nothing_filled() {
        let err = build_patch(&form(&[("name", ""), ("colour", "red")]), &schema()).unwrap_err();
        assert!(matches!(err, BulkEditError::NoFieldsFilled));
    }

    #[tokio::test]
    async fn test_apply_updates_selection_and_clears_it() {
        let store = MemoryStore::new();
        let products = Collection::new("products");
        let (a, b, c) = (RowId::new_v4(), RowId::new_v4(), RowId::new_v4());
        store
            .insert(
                &products,
                vec![
                    Row::with_id(a).set("name", "A").set("quantity", 1i64),
                    Row::with_id(b).set("name", "B").set("quantity", 2i64),
                    Row::with_id(c).set("name", "C").set("quantity", 3i64),
                ],
            )
            .await
            .unwrap();

        let mut selection: SelectionSet = [a, c].into_iter().collect();
        let outcome = apply(&store, &products, &mut selection, &form(&[("name", "X")]), &schema())
            .await
            .unwrap();

        assert_eq!(outcome.updated, 2);
        assert!(selection.is_empty());

        let rows = store.rows(&products);
        let names: Vec<_> = rows.iter().map(|r| r.get_text("name").unwrap().unwrap()).collect();
        assert_eq!(names, vec!["X", "B", "X"]);
        assert_eq!(rows[0].get_int("quantity").unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_no_selection_checked_first() {
        let store = MemoryStore::new();
        let mut selection = SelectionSet::new();
        let err = apply(&store, &Collection::new("products"), &mut selection, &form(&[]), &schema())
            .await
            .unwrap_err();
        assert!(matches!(err, BulkEditError::NoSelection));
    }
}
