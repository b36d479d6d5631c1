//! Column definitions shared by the renderer and the exporter

use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Type alias for derived-value closures.
type DeriveFn = Arc<dyn Fn(&Row) -> Value + Send + Sync>;

/// Type alias for display formatting closures.
type FormatFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Where a column gets its value from.
#[derive(Clone)]
pub enum Accessor {
    /// The value stored under a field key.
    Field(String),
    /// A pure function of the whole row.
    Derived(DeriveFn),
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(key) => f.debug_tuple("Field").field(key).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// One column of a table: header label, accessor and alignment.
///
/// The same definitions drive rendering and export, so exported text follows
/// what the operator sees. A display formatter, if any, only affects
/// rendering; export writes the accessor value.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{Row, Value};
/// use tabula_lib::table::{Alignment, Column};
///
/// let columns = vec![
///     Column::field("Product", "name"),
///     Column::field("Qty", "quantity").align(Alignment::Right),
///     Column::derived("Stock Value", |row| {
///         let qty = row.get_decimal("quantity").ok().flatten();
///         let cost = row.get_decimal("unit_cost").ok().flatten();
///         match (qty, cost) {
///             (Some(q), Some(c)) => Value::Decimal(q * c),
///             _ => Value::Null,
///         }
///     }),
/// ];
///
/// let row = Row::new().set("name", "Bolt").set("quantity", 4i64);
/// assert_eq!(columns[0].display(&row), "Bolt");
/// assert_eq!(columns[2].display(&row), "");
/// ```
#[derive(Clone)]
pub struct Column {
    /// Header label.
    pub header: String,
    /// Value source.
    pub accessor: Accessor,
    /// Cell alignment.
    pub alignment: Alignment,
    format: Option<FormatFn>,
}

impl Column {
    /// Creates a column reading a field key.
    pub fn field(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: Accessor::Field(key.into()),
            alignment: Alignment::default(),
            format: None,
        }
    }

    /// Creates a column computing its value from the row.
    pub fn derived<F>(header: impl Into<String>, derive: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            accessor: Accessor::Derived(Arc::new(derive)),
            alignment: Alignment::default(),
            format: None,
        }
    }

    /// Sets the alignment.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets a display formatter applied to non-null values when rendering.
    ///
    /// Exports do not use it: an exported cell is the plain value from
    /// [`Column::value`], so `"PHP 19.99"` on screen exports as `19.99` and
    /// re-imports as the same number.
    pub fn format<F>(mut self, format: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    /// Returns the field key for field columns.
    pub fn key(&self) -> Option<&str> {
        match &self.accessor {
            Accessor::Field(key) => Some(key),
            Accessor::Derived(_) => None,
        }
    }

    /// Resolves the column's value for a row. Missing fields resolve to null.
    ///
    /// This is also what [`export`](crate::export::export) writes.
    pub fn value(&self, row: &Row) -> Value {
        match &self.accessor {
            Accessor::Field(key) => row.get(key).cloned().unwrap_or(Value::Null),
            Accessor::Derived(derive) => derive(row),
        }
    }

    /// Returns the text shown in the cell.
    pub fn display(&self, row: &Row) -> String {
        let value = self.value(row);
        match &self.format {
            Some(format) if !value.is_null() => format(&value),
            _ => value.to_display_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("alignment", &self.alignment)
            .field("formatted", &self.format.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_formatter_only_affects_display() {
        let column = Column::field("Price", "price").format(|v| format!("PHP {v}"));
        let row = Row::new().set("price", Decimal::new(1999, 2));

        assert_eq!(column.display(&row), "PHP 19.99");
        assert_eq!(column.value(&row), Value::Decimal(Decimal::new(1999, 2)));
    }

    #[test]
    fn test_formatter_skips_null() {
        let column = Column::field("Price", "price").format(|v| format!("PHP {v}"));
        assert_eq!(column.display(&Row::new()), "");
    }
}
