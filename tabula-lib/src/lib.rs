//! Generic tabular data engine for back-office list pages.
//!
//! Every list page (inventory, sales, payroll) shares the same machinery:
//!
//! - [`table`]: sorted, paginated, selectable views over loaded rows
//! - [`import`]: CSV files reconciled against field keys and inserted in
//!   bounded batches
//! - [`export`]: CSV files produced from the same column definitions
//! - [`bulk`]: one sparse patch applied to every selected row
//!
//! Storage is an injected capability ([`store::RowStore`]); the engine never
//! talks to a database directly. A [`schema::FieldSchema`] describes how
//! outside text maps to typed fields in both directions.

pub mod bulk;
pub mod datetime;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod schema;
pub mod settings;
pub mod store;
pub mod table;

pub use error::ErrorKind;
pub use model::Collection;
pub use model::Row;
pub use model::RowId;
pub use model::Value;
pub use schema::FieldSchema;
pub use store::RowStore;
