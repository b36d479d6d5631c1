//! CSV export
//!
//! Serializes rows through the same [`Column`] definitions the table renders
//! with, so a file exported from a list page re-imports through a header map
//! built from the column headers.

mod config;

pub use config::ExportConfig;

use std::borrow::Borrow;
use std::path::Path;
use std::path::PathBuf;

use csv::QuoteStyle;
use csv::Terminator;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::error::ExportError;
use crate::model::Row;
use crate::model::Value;
use crate::table::Column;
use crate::table::SelectionSet;

/// A produced CSV file, held in memory until saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    filename: String,
    contents: String,
}

impl ExportFile {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn into_contents(self) -> String {
        self.contents
    }

    /// Writes the file into `dir` and returns its path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, self.contents.as_bytes()).map_err(|source| ExportError::Io {
            filename: self.filename.clone(),
            source,
        })?;
        debug!("Saved {}", path.display());
        Ok(path)
    }
}

/// Serializes rows to CSV.
///
/// A non-empty selection exports only the selected rows, an empty one
/// exports every row given. The first line holds the column headers. Every
/// cell is quoted, with internal quotes doubled. Null values are written as
/// `""`; numbers in rate columns get exactly two decimal places.
///
/// Fails with [`ExportError::NoMatch`] when no row qualifies.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use tabula_lib::export::{export, ExportConfig};
/// use tabula_lib::model::Row;
/// use tabula_lib::table::{Column, SelectionSet};
///
/// let rows = vec![Row::new().set("name", "Bolt \"M8\"").set("rate", Decimal::new(5, 0))];
/// let columns = vec![Column::field("Name", "name"), Column::field("Daily Rate", "rate")];
///
/// let file = export(&rows, &SelectionSet::new(), &columns, &ExportConfig::default()).unwrap();
/// assert_eq!(file.filename(), "export.csv");
/// assert_eq!(file.contents(), "\"Name\",\"Daily Rate\"\n\"Bolt \"\"M8\"\"\",\"5.00\"\n");
/// ```
pub fn export<R: Borrow<Row>>(
    rows: &[R],
    selection: &SelectionSet,
    columns: &[Column],
    config: &ExportConfig,
) -> Result<ExportFile, ExportError> {
    let chosen: Vec<&Row> = rows
        .iter()
        .map(<R as Borrow<Row>>::borrow)
        .filter(|row| {
            selection.is_empty() || row.id().is_some_and(|id| selection.contains(&id))
        })
        .collect();

    if chosen.is_empty() {
        return Err(ExportError::NoMatch);
    }

    let rate_columns: Vec<bool> = columns
        .iter()
        .map(|column| config.is_rate_column(&column.header))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.header.as_str()))?;
    for row in &chosen {
        writer.write_record(
            columns
                .iter()
                .zip(&rate_columns)
                .map(|(column, is_rate)| export_cell(&column.value(row), *is_rate)),
        )?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io {
        filename: config.filename.clone(),
        source: e.into_error(),
    })?;

    debug!("Exported {} rows to {}", chosen.len(), config.filename);
    Ok(ExportFile {
        filename: config.filename.clone(),
        contents: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

fn export_cell(value: &Value, is_rate: bool) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int(n) if is_rate => two_places(Decimal::from(*n)),
        Value::Decimal(d) if is_rate => two_places(*d),
        other => other.to_display_string(),
    }
}

fn two_places(d: Decimal) -> String {
    let mut d = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    d.to_string()
}
