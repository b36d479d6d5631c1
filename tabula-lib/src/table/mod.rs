//! Table renderer
//!
//! Turns loaded rows and column definitions into a sorted, paginated and
//! selectable view. [`render`] is pure. [`Table`] owns the state of one list
//! page (rows, page, selection, search) and is the only part that talks to
//! the row store.

mod column;
mod config;
mod page;
mod search;
mod selection;
mod sort;

pub use column::*;
pub use config::TableConfig;
pub use page::*;
pub use search::*;
pub use selection::SelectionSet;
pub use sort::*;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::HashSet;

use log::debug;
use log::info;

use crate::bulk;
use crate::bulk::BulkEditOutcome;
use crate::error::BulkEditError;
use crate::error::ExportError;
use crate::error::ImportError;
use crate::error::StoreError;
use crate::export;
use crate::export::ExportConfig;
use crate::export::ExportFile;
use crate::import::ImportReport;
use crate::import::Importer;
use crate::model::Collection;
use crate::model::Row;
use crate::model::RowId;
use crate::schema::FieldSchema;
use crate::store::RowStore;
use crate::store::query::Query;

/// A header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub alignment: Alignment,
}

/// A body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub alignment: Alignment,
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Store id of the row, `None` for rows not yet saved.
    pub id: Option<RowId>,
    pub cells: Vec<Cell>,
    /// Whether the row's checkbox is ticked.
    pub selected: bool,
}

/// The table body: visible rows, or a single placeholder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<RenderedRow>),
    /// Placeholder spanning every column including the selection column.
    Empty { message: String, colspan: usize },
}

/// Everything a page needs to draw one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub body: TableBody,
    pub pagination: PaginationDescriptor,
    pub page_size_options: Vec<usize>,
    /// State of the "select all" checkbox: every row across all pages is
    /// selected.
    pub all_selected: bool,
}

impl TableView {
    /// Returns the visible rows, empty for the placeholder body.
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Empty { .. } => &[],
        }
    }

    /// Returns `true` if the placeholder row is shown.
    pub fn is_empty(&self) -> bool {
        matches!(self.body, TableBody::Empty { .. })
    }
}

/// Renders one page of rows.
///
/// Rows are sorted newest first by the configured recency keys, then sliced
/// to the current page. The page state is read, not modified; an
/// out-of-range page renders as the last page.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
/// use tabula_lib::table::{render, Column, PageState, SelectionSet, TableConfig};
///
/// let rows: Vec<Row> = (0..12).map(|i| Row::new().set("n", i as i64)).collect();
/// let columns = vec![Column::field("N", "n")];
///
/// let view = render(
///     &rows,
///     &columns,
///     &PageState::new(5),
///     &SelectionSet::new(),
///     &TableConfig::default(),
/// );
/// assert_eq!(view.rows().len(), 5);
/// assert_eq!(view.pagination.total_pages, 3);
/// ```
pub fn render<R: Borrow<Row>>(
    rows: &[R],
    columns: &[Column],
    page: &PageState,
    selection: &SelectionSet,
    config: &TableConfig,
) -> TableView {
    let mut sorted: Vec<&Row> = rows.iter().map(<R as Borrow<Row>>::borrow).collect();
    sort_by_recency(&mut sorted, &config.recency_keys);

    let pagination = page.descriptor(sorted.len());
    let visible = &sorted[pagination.first_row.saturating_sub(1)..pagination.last_row];

    let body = if visible.is_empty() {
        TableBody::Empty {
            message: config.empty_message.clone(),
            colspan: columns.len() + 1,
        }
    } else {
        TableBody::Rows(
            visible
                .iter()
                .map(|row| RenderedRow {
                    id: row.id(),
                    cells: columns
                        .iter()
                        .map(|column| Cell {
                            text: column.display(row),
                            alignment: column.alignment,
                        })
                        .collect(),
                    selected: row.id().is_some_and(|id| selection.contains(&id)),
                })
                .collect(),
        )
    };

    let ids: Vec<RowId> = sorted.iter().filter_map(|row| row.id()).collect();

    TableView {
        headers: columns
            .iter()
            .map(|column| HeaderCell {
                label: column.header.clone(),
                alignment: column.alignment,
            })
            .collect(),
        body,
        pagination,
        page_size_options: config.page_size_options.clone(),
        all_selected: selection.contains_all(&ids),
    }
}

/// State of one list page.
///
/// Rows are held newest first. The search term narrows what is rendered,
/// selected by "select all" and counted for pagination, but never what is
/// loaded.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    columns: Vec<Column>,
    config: TableConfig,
    page: PageState,
    selection: SelectionSet,
    search: String,
}

impl Table {
    /// Creates an empty table.
    pub fn new(columns: Vec<Column>, config: TableConfig) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            page: PageState::new(config.page_size),
            config,
            selection: SelectionSet::new(),
            search: String::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns every loaded row, newest first.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the column definitions.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the page state.
    pub fn page(&self) -> PageState {
        self.page
    }

    /// Returns the selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Returns the search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the rows that pass the search term, newest first.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|row| row_matches(row, &self.columns, &self.search))
            .collect()
    }

    /// Returns the selected rows among the loaded ones, newest first.
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|row| row.id().is_some_and(|id| self.selection.contains(&id)))
            .collect()
    }

    /// Renders the current page.
    pub fn view(&self) -> TableView {
        render(
            self.filtered_rows().as_slice(),
            &self.columns,
            &self.page,
            &self.selection,
            &self.config,
        )
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replaces the loaded rows.
    ///
    /// Selected ids that disappeared are dropped and the page is clamped
    /// down if the data shrank. A clamp that moves the page clears the
    /// selection.
    pub fn set_rows(&mut self, mut rows: Vec<Row>) {
        sort_by_recency(&mut rows, &self.config.recency_keys);
        let present: HashSet<RowId> = rows.iter().filter_map(Row::id).collect();
        self.selection.retain_only(&present);
        self.rows = rows;

        let before = self.page.current_page();
        self.page.clamp(self.filtered_count());
        self.on_page_change(before);
    }

    /// Loads rows from the store and replaces the current ones.
    pub async fn load(
        &mut self,
        store: &dyn RowStore,
        collection: &Collection,
        query: &Query,
    ) -> Result<usize, StoreError> {
        let page = store.select(collection, query).await?;
        let count = page.len();
        debug!("Loaded {count} rows from {collection}");
        self.set_rows(page.into_rows());
        Ok(count)
    }

    /// Deletes every selected row with one store call.
    ///
    /// On success the rows leave the table and the selection is cleared.
    /// On failure nothing changes locally.
    pub async fn delete_selected(
        &mut self,
        store: &dyn RowStore,
        collection: &Collection,
    ) -> Result<usize, BulkEditError> {
        if self.selection.is_empty() {
            return Err(BulkEditError::NoSelection);
        }

        let ids = self.selection.to_vec();
        let deleted = store.delete(collection, &ids).await?;
        info!("Deleted {deleted} of {} selected rows from {collection}", ids.len());

        let removed: HashSet<RowId> = ids.into_iter().collect();
        self.rows
            .retain(|row| !row.id().is_some_and(|id| removed.contains(&id)));
        self.selection.clear();
        self.page.clamp(self.filtered_count());
        Ok(deleted)
    }

    /// Applies a bulk edit form to every selected row.
    ///
    /// On success the loaded rows receive the same patch and the selection
    /// is cleared.
    pub async fn bulk_edit(
        &mut self,
        store: &dyn RowStore,
        collection: &Collection,
        form: &BTreeMap<String, String>,
        schema: &FieldSchema,
    ) -> Result<BulkEditOutcome, BulkEditError> {
        let outcome = bulk::apply(store, collection, &mut self.selection, form, schema).await?;

        let changed: HashSet<RowId> = outcome.ids.iter().copied().collect();
        for row in self.rows.iter_mut() {
            if row.id().is_some_and(|id| changed.contains(&id)) {
                *row = row.patched(&outcome.patch);
            }
        }
        sort_by_recency(&mut self.rows, &self.config.recency_keys);
        self.page.clamp(self.filtered_count());
        Ok(outcome)
    }

    /// Imports CSV text through `importer` and clears the selection on
    /// success.
    ///
    /// The inserted rows are not loaded into the table; call [`Table::load`]
    /// afterwards to show them. A failed import leaves the selection alone.
    pub async fn import(
        &mut self,
        store: &dyn RowStore,
        importer: &Importer,
        text: &str,
    ) -> Result<ImportReport, ImportError> {
        let report = importer.import_str(store, text).await?;
        self.selection.clear();
        Ok(report)
    }

    /// Exports the selected rows, or every loaded row when nothing is
    /// selected.
    pub fn export(&self, config: &ExportConfig) -> Result<ExportFile, ExportError> {
        export::export(&self.rows, &self.selection, &self.columns, config)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Moves to a page. Leaving the current page clears the selection.
    pub fn go_to_page(&mut self, page: usize) {
        let before = self.page.current_page();
        self.page.go_to(page, self.filtered_count());
        self.on_page_change(before);
    }

    /// Moves one page forward, if there is one.
    pub fn next_page(&mut self) {
        self.go_to_page(self.page.current_page().saturating_add(1));
    }

    /// Moves one page back, if there is one.
    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.current_page().saturating_sub(1).max(1));
    }

    /// Changes the page size, keeping the current page unless it no longer
    /// exists.
    pub fn set_page_size(&mut self, page_size: usize) {
        let before = self.page.current_page();
        self.page.set_page_size(page_size, self.filtered_count());
        self.on_page_change(before);
    }

    /// Sets the search term and clamps the page to the narrowed rows.
    /// A clamp that moves the page clears the selection.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        let before = self.page.current_page();
        self.page.clamp(self.filtered_count());
        self.on_page_change(before);
    }

    fn on_page_change(&mut self, before: usize) {
        if self.page.current_page() != before {
            self.selection.clear();
        }
    }

    fn filtered_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row_matches(row, &self.columns, &self.search))
            .count()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Ticks or unticks one row.
    pub fn toggle_row(&mut self, id: RowId) {
        self.selection.toggle(id);
    }

    /// "Select all": toggles every row that passes the search term, on every
    /// page, not only the visible one.
    pub fn toggle_all(&mut self) {
        let ids: Vec<RowId> = self.filtered_rows().iter().filter_map(|row| row.id()).collect();
        self.selection.toggle_all(&ids);
    }

    /// Unticks everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
