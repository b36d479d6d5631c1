//! CSV import pipeline
//!
//! Reconciles arbitrary spreadsheet text against a fixed set of field keys
//! and writes the usable rows through a [`RowStore`]:
//!
//! 1. **Parsing**: delimited text into header and string records. Zero
//!    records fails with [`ImportError::NoData`].
//! 2. **Mapping**: file headers matched to keys through a [`HeaderMap`].
//! 3. **Coercion**: nulls, dates and numbers typed by [`coerce_cell`]. Keys
//!    an attached schema declares as text or choice stay text.
//! 4. **Admission**: rows whose leading mapped fields are blank are dropped.
//! 5. **Transform**: an optional hook may enrich a row or veto it.
//! 6. **Validation**: an optional hook, then the attached schema's rules.
//! 7. **Batch insert**: sequential chunks of at most 1,000 rows.
//!
//! Chunks are not transactional. If chunk `n` fails, chunks `0..n` stay in
//! the store and the error reports how many rows they hold.

mod coerce;
mod config;
mod header;
mod parse;

pub use coerce::Coercion;
pub use coerce::coerce_cell;
pub use config::ImportConfig;
pub use header::*;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use log::info;

use crate::error::FieldValidationError;
use crate::error::ImportError;
use crate::error::join_field_errors;
use crate::model::Collection;
use crate::model::Row;
use crate::schema::FieldKind;
use crate::schema::FieldSchema;
use crate::store::RowStore;
use parse::RawTable;

/// Hook run on every admitted row before validation.
///
/// Returning `None` vetoes the row. Plain closures implement this trait.
#[async_trait]
pub trait RowTransform: Send + Sync {
    async fn transform(&self, row: Row) -> Option<Row>;
}

#[async_trait]
impl<F> RowTransform for F
where
    F: Fn(Row) -> Option<Row> + Send + Sync,
{
    async fn transform(&self, row: Row) -> Option<Row> {
        self(row)
    }
}

/// Hook that may reject a transformed row. Plain closures implement this
/// trait.
#[async_trait]
pub trait RowValidator: Send + Sync {
    async fn validate(&self, row: &Row) -> Result<(), Vec<FieldValidationError>>;
}

#[async_trait]
impl<F> RowValidator for F
where
    F: Fn(&Row) -> Result<(), Vec<FieldValidationError>> + Send + Sync,
{
    async fn validate(&self, row: &Row) -> Result<(), Vec<FieldValidationError>> {
        self(row)
    }
}

/// A row that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// Line of the record in the file, the header being line 1.
    pub line: u64,
    pub errors: Vec<FieldValidationError>,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, join_field_errors(&self.errors))
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    parsed: usize,
    inserted: usize,
    dropped: usize,
    rejected: Vec<RowRejection>,
}

impl ImportReport {
    /// Data records read from the file.
    pub fn parsed(&self) -> usize {
        self.parsed
    }

    /// Rows written to the store.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Rows discarded by the admission check or vetoed by the transform.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Rows that failed validation.
    pub fn rejected(&self) -> &[RowRejection] {
        &self.rejected
    }
}

/// A configured import into one collection.
///
/// # Example
///
/// ```ignore
/// let importer = Importer::new("products", HeaderMap::new()
///         .map("Product Name", "name")
///         .map("Qty", "quantity")
///         .map("Date Added", "created_at"))
///     .with_schema(schema)
///     .with_transform(|row: Row| Some(row.set("source", "csv")));
///
/// let report = importer.import_str(&store, &text).await?;
/// println!("{} rows imported", report.inserted());
/// ```
#[derive(Clone)]
pub struct Importer {
    collection: Collection,
    headers: HeaderMap,
    config: ImportConfig,
    schema: Option<FieldSchema>,
    transform: Option<Arc<dyn RowTransform>>,
    validator: Option<Arc<dyn RowValidator>>,
}

impl Importer {
    /// Creates an import into `collection` using `headers` to map columns.
    pub fn new(collection: impl Into<Collection>, headers: HeaderMap) -> Self {
        Self {
            collection: collection.into(),
            headers,
            config: ImportConfig::default(),
            schema: None,
            transform: None,
            validator: None,
        }
    }

    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a schema: its timestamp fields are parsed as dates, its text
    /// and choice fields stay text, its defaults fill admitted rows and its
    /// rules run after the validator.
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_transform(mut self, transform: impl RowTransform + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn with_validator(mut self, validator: impl RowValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Imports CSV text.
    pub async fn import_str(
        &self,
        store: &dyn RowStore,
        text: &str,
    ) -> Result<ImportReport, ImportError> {
        let table = parse::parse(text.as_bytes(), self.config.delimiter)?;
        self.run(store, table).await
    }

    /// Imports CSV from a reader. The input is read fully before any row
    /// reaches the store.
    pub async fn import_reader<R: io::Read + Send>(
        &self,
        store: &dyn RowStore,
        reader: R,
    ) -> Result<ImportReport, ImportError> {
        let table = parse::parse(reader, self.config.delimiter)?;
        self.run(store, table).await
    }

    async fn run(&self, store: &dyn RowStore, table: RawTable) -> Result<ImportReport, ImportError> {
        let parsed = table.records.len();
        info!(
            "Parsed {parsed} records with {} columns for {}",
            table.headers.len(),
            self.collection
        );

        let (mapping, unmatched) = self.headers.resolve(&table.headers);
        debug!(
            "Mapped columns: {:?}",
            mapping.iter().map(|m| m.key.as_str()).collect::<Vec<_>>()
        );
        if !unmatched.is_empty() {
            debug!("Configured headers not in file: {unmatched:?}");
        }

        let coercions = self.coercions();
        let leading: Vec<&str> = mapping.iter().take(2).map(|m| m.key.as_str()).collect();

        let mut report = ImportReport {
            parsed,
            ..Default::default()
        };
        let mut accepted = Vec::with_capacity(parsed);

        for record in table.records {
            let mut row = Row::new();
            for column in &mapping {
                let raw = record.cells.get(column.index).map(String::as_str).unwrap_or("");
                let coercion = coercions.get(column.key.as_str()).copied().unwrap_or_default();
                let value = coerce_cell(&column.key, raw, coercion);
                row.insert(column.key.clone(), value);
            }

            if !admit(&row, &leading) {
                report.dropped += 1;
                continue;
            }

            if let Some(schema) = &self.schema {
                row = schema.apply_defaults(row);
            }

            if let Some(transform) = &self.transform {
                match transform.transform(row).await {
                    Some(transformed) => row = transformed,
                    None => {
                        report.dropped += 1;
                        continue;
                    }
                }
            }

            if let Err(errors) = self.check(&row).await {
                report.rejected.push(RowRejection {
                    line: record.line,
                    errors,
                });
                continue;
            }

            accepted.push(row);
        }

        debug!(
            "{} rows accepted, {} dropped, {} rejected",
            accepted.len(),
            report.dropped,
            report.rejected.len()
        );

        if accepted.is_empty() {
            return Err(ImportError::NoValidRows { parsed });
        }

        report.inserted = self.insert_chunks(store, accepted).await?;
        info!("Imported {} rows into {}", report.inserted, self.collection);
        Ok(report)
    }

    async fn check(&self, row: &Row) -> Result<(), Vec<FieldValidationError>> {
        if let Some(validator) = &self.validator {
            validator.validate(row).await?;
        }
        if let Some(schema) = &self.schema {
            schema.validate_row(row)?;
        }
        Ok(())
    }

    async fn insert_chunks(&self, store: &dyn RowStore, rows: Vec<Row>) -> Result<usize, ImportError> {
        let size = self.config.chunk_size.min(store.max_insert_batch()).max(1);
        let total = rows.len();
        let mut rows = rows.into_iter();
        let mut committed = 0;

        for chunk in 0.. {
            let batch: Vec<Row> = rows.by_ref().take(size).collect();
            if batch.is_empty() {
                break;
            }

            debug!(
                "Inserting batch {chunk} ({} rows, {committed}/{total} committed)",
                batch.len()
            );
            let inserted = store
                .insert(&self.collection, batch)
                .await
                .map_err(|source| ImportError::Storage {
                    chunk,
                    committed,
                    source,
                })?;
            committed += inserted;
        }

        Ok(committed)
    }

    /// Keys typed by something other than inference: fields the schema
    /// declares as text, choice or timestamp, and the configured date keys.
    fn coercions(&self) -> HashMap<&str, Coercion> {
        let mut coercions = HashMap::new();
        if let Some(schema) = &self.schema {
            for field in schema.fields() {
                let coercion = match field.kind {
                    FieldKind::Text | FieldKind::Choice => Coercion::Text,
                    FieldKind::Timestamp => Coercion::Timestamp,
                    FieldKind::Integer | FieldKind::Decimal => continue,
                };
                coercions.insert(field.key.as_str(), coercion);
            }
        }
        for key in &self.config.timestamp_keys {
            coercions.insert(key.as_str(), Coercion::Timestamp);
        }
        coercions
    }
}

impl fmt::Debug for Importer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Importer")
            .field("collection", &self.collection)
            .field("headers", &self.headers)
            .field("config", &self.config)
            .field("schema", &self.schema)
            .field("transform", &self.transform.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// A row is admitted when at least one field was mapped and its first two
/// mapped fields (one, if only one exists) are not all blank.
fn admit(row: &Row, leading: &[&str]) -> bool {
    if leading.is_empty() {
        return false;
    }
    leading
        .iter()
        .any(|key| row.get(key).is_some_and(|v| !v.is_blank()))
}
