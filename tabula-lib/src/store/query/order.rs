//! Ordering types for row store queries.

use std::cmp::Ordering;

use crate::model::Row;
use crate::model::Value;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// Specifies the ordering of query results.
///
/// Multiple fields can be chained together for secondary, tertiary, etc. sorting.
///
/// # Example
///
/// ```
/// use tabula_lib::store::query::OrderBy;
///
/// let order = OrderBy::desc("created_at").then_asc("name");
/// assert_eq!(order.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Desc)],
        }
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Compares two rows. Nulls and missing fields sort last in either direction.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for (field, direction) in &self.fields {
            let left = a.get(field).filter(|v| !v.is_null());
            let right = b.get(field).filter(|v| !v.is_null());
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ord = compare_values(l, r);
                    match direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    a.compare(b)
        .unwrap_or_else(|| a.to_display_string().cmp(&b.to_display_string()))
}
