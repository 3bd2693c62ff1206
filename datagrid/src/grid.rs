//! The table instance root.
//!
//! [`DataGrid`] owns the only [`RowStore`] writer and every piece of
//! per-instance state: the column registry, the sort engine, pagination and
//! the interaction dispatcher. Rendering consumers get [`StoreReader`]s.
//! Host-facing notifications are queued and drained with
//! [`DataGrid::drain_events`].
//!
//! # Example
//!
//! ```
//! use datagrid::{ColumnDef, DataGrid, GridConfig, GridEvent, Row, SortDirection};
//!
//! let mut grid = DataGrid::new(
//!     vec![ColumnDef::new("name", "Name"), ColumnDef::new("age", "Age").sortable()],
//!     GridConfig::default(),
//! )?;
//! grid.set_rows(vec![
//!     Row::new().set("name", "Bob").set("age", 30),
//!     Row::new().set("name", "Ann").set("age", 25),
//! ]);
//!
//! assert!(grid.sort_by_column("age").is_handled());
//! assert_eq!(grid.value_at("name", 0), Some("Ann".into()));
//!
//! let events = grid.drain_events();
//! assert!(matches!(
//!     &events[..],
//!     [GridEvent::SortRequested(e)] if e.direction == SortDirection::Asc
//! ));
//! # Ok::<(), datagrid::GridError>(())
//! ```

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::cell::{self, CellFormat, CellView};
use crate::column::{ColumnDef, ColumnRegistry, RendererRegistry, columns_from_json};
use crate::config::GridConfig;
use crate::dispatch::{DataTransfer, Dispatcher, EventResult, Hover};
use crate::error::Result;
use crate::event::GridEvent;
use crate::pagination::{PageWindow, Pagination};
use crate::row::Row;
use crate::search::{SearchTerm, fuzzy_filter};
use crate::sort::{SortEngine, SortState};
use crate::store::{RowStore, StoreRead, StoreReader, TableState, WakeupSender};

/// Unique id of a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(Uuid);

impl TableId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Render key of the cell of `field` at `row_index`, unique across tables.
    pub fn cell_key(&self, field: &str, row_index: usize) -> String {
        format!("{}-{}-{}", self.0, field, row_index)
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the current page, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Index of the row in the store.
    pub index: usize,
    pub collapsed: bool,
    pub striped: bool,
    /// One cell per visible column, in column order.
    pub cells: Vec<CellView>,
}

/// One table instance.
#[derive(Debug)]
pub struct DataGrid {
    id: TableId,
    config: GridConfig,
    format: CellFormat,
    store: RowStore,
    columns: ColumnRegistry,
    sort: SortEngine,
    pagination: Pagination,
    dispatcher: Dispatcher,
    events: Vec<GridEvent>,
}

impl DataGrid {
    /// Create an empty table with validated columns and configuration.
    pub fn new(columns: Vec<ColumnDef>, config: GridConfig) -> Result<Self> {
        config.validate()?;
        let columns = ColumnRegistry::new(columns)?;
        let pagination = Pagination::new(&config.pagination)?;
        let id = TableId::new();

        debug!(
            "Created table {} with {} columns",
            id,
            columns.definitions().len()
        );

        Ok(Self {
            id,
            format: config.cell_format(),
            config,
            store: RowStore::new(),
            columns,
            sort: SortEngine::new(),
            pagination,
            dispatcher: Dispatcher::new(),
            events: Vec::new(),
        })
    }

    /// Create a table from JSON column definitions.
    pub fn from_json(
        columns: Value,
        renderers: &RendererRegistry,
        config: GridConfig,
    ) -> Result<Self> {
        Self::new(columns_from_json(columns, renderers)?, config)
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// A read-only handle for a rendering consumer.
    pub fn reader(&self) -> StoreReader {
        self.store.reader()
    }

    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    /// Visible columns in effective order.
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns.visible()
    }

    pub fn sort_state(&self) -> &SortState {
        self.sort.state()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn hover(&self) -> Option<Hover> {
        self.dispatcher.hover()
    }

    /// Drag state, for the header render.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Value of `field` on the row at `row_index`.
    pub fn value_at(&self, field: &str, row_index: usize) -> Option<Value> {
        self.store.value_at(field, row_index)
    }

    /// Queued events, oldest first.
    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GridEvent) {
        debug!("Table {} emits {}", self.id, event.name());
        self.events.push(event);
    }

    // =========================================================================
    // Host inputs
    // =========================================================================

    /// Replace the rows verbatim.
    ///
    /// If the current page no longer exists, the view returns to page 1 and
    /// a page change is reported.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        let total = rows.len();
        self.store.replace_rows(rows);

        let before = self.pagination.current_page();
        self.pagination.set_total_items(total);
        let after = self.pagination.current_page();
        if before != after {
            self.emit(GridEvent::PageChanged(after));
        }
    }

    /// Replace the rows from a JSON array (anything else counts as empty).
    pub fn set_rows_json(&mut self, rows: Value) {
        self.set_rows(Row::many_from_json(rows));
    }

    /// Replace the column definitions, keeping overrides and order.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) -> Result<()> {
        self.columns.set_definitions(columns)
    }

    /// Install a wakeup sender signalled after every store write.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.store.install_wakeup(sender);
    }

    pub fn uninstall_wakeup(&self) {
        self.store.uninstall_wakeup();
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Activate the header of `field`.
    ///
    /// Sortable columns toggle their direction, reorder the stored rows and
    /// report a sort request. Anything else is ignored.
    pub fn sort_by_column(&mut self, field: &str) -> EventResult {
        let Some(column) = self.columns.column(field) else {
            return EventResult::Ignored;
        };
        let snapshot = self.store.snapshot();
        let Some(outcome) = self.sort.sort_by_column(column, snapshot.rows()) else {
            return EventResult::Ignored;
        };

        self.store.reorder_rows(outcome.rows, &outcome.order);
        self.emit(GridEvent::SortRequested(outcome.event));
        EventResult::Consumed
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// A click on the cell of `field` at `row_index`.
    pub fn row_clicked(&mut self, row_index: usize, field: &str) -> EventResult {
        let Some(column) = self.columns.column(field) else {
            return EventResult::Ignored;
        };
        let snapshot = self.store.snapshot();
        let Some(clicked) = self.dispatcher.row_clicked(&snapshot, column, row_index) else {
            return EventResult::Ignored;
        };

        self.emit(GridEvent::RowClicked(clicked));
        EventResult::Consumed
    }

    /// Pointer over the cell of `field` at `row_index`.
    pub fn hover_cell(&mut self, row_index: usize, field: &str) -> EventResult {
        match self.columns.column(field) {
            Some(column) => self.dispatcher.hover_cell(row_index, column),
            None => EventResult::Ignored,
        }
    }

    pub fn clear_hover(&mut self) -> EventResult {
        self.dispatcher.clear_hover()
    }

    /// Flip the collapse state of the row at `row_index`.
    pub fn toggle_row_collapse(&mut self, row_index: usize, field: &str) -> EventResult {
        let snapshot = self.store.snapshot();
        match self
            .dispatcher
            .toggle_row_collapse(&snapshot, field, row_index)
        {
            Some(active_row) => {
                self.store.set_active_row(active_row);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    /// Collapse or expand every row.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.store.set_table_state(TableState { collapsed });
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Show or hide the column `field` (flip when `explicit` is `None`).
    pub fn toggle_visibility(&mut self, field: &str, explicit: Option<bool>) -> EventResult {
        if self.columns.toggle_visibility(field, explicit).is_none() {
            return EventResult::Ignored;
        }
        self.emit_column_state();
        EventResult::Consumed
    }

    pub fn drag_start(&mut self, field: &str, transfer: &mut DataTransfer) -> EventResult {
        if self.columns.column(field).is_none() {
            return EventResult::Ignored;
        }
        self.dispatcher.drag_start(field, transfer)
    }

    pub fn drag_over(&self) -> EventResult {
        self.dispatcher.drag_over()
    }

    pub fn drag_enter(&mut self, field: &str) -> EventResult {
        self.dispatcher.drag_enter(field)
    }

    pub fn drag_leave(&mut self) -> EventResult {
        self.dispatcher.drag_leave()
    }

    pub fn drag_end(&mut self) -> EventResult {
        self.dispatcher.drag_end()
    }

    /// Drop the transferred column onto the header of `target`.
    pub fn drop_column(&mut self, target: &str, transfer: &DataTransfer) -> EventResult {
        let result = self.dispatcher.drop(target, transfer, &mut self.columns);
        if result.is_handled() {
            self.emit_column_state();
        }
        result
    }

    fn emit_column_state(&mut self) {
        let state = self.columns.column_state();
        self.emit(GridEvent::ColumnStateChanged(state));
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Go to `page`; out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: usize) -> EventResult {
        let current = self.pagination.current_page();
        let moved = self.pagination.go_to(page);
        self.page_moved(current, moved)
    }

    pub fn first_page(&mut self) -> EventResult {
        let current = self.pagination.current_page();
        let moved = self.pagination.first_page();
        self.page_moved(current, moved)
    }

    pub fn previous_page(&mut self) -> EventResult {
        let current = self.pagination.current_page();
        let moved = self.pagination.previous_page();
        self.page_moved(current, moved)
    }

    pub fn next_page(&mut self) -> EventResult {
        let current = self.pagination.current_page();
        let moved = self.pagination.next_page();
        self.page_moved(current, moved)
    }

    pub fn last_page(&mut self) -> EventResult {
        let current = self.pagination.current_page();
        let moved = self.pagination.last_page();
        self.page_moved(current, moved)
    }

    fn page_moved(&mut self, from: usize, to: Option<usize>) -> EventResult {
        match to {
            Some(page) if page != from => {
                self.emit(GridEvent::PageChanged(page));
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Change the page size; the view returns to page 1.
    pub fn set_page_size(&mut self, size: usize) -> EventResult {
        match self.pagination.set_page_size(size) {
            Some(size) => {
                self.emit(GridEvent::PageSizeChanged(size));
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    /// Window of the current page.
    pub fn page_window(&self) -> PageWindow {
        self.pagination.window()
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<Row> {
        let snapshot = self.store.snapshot();
        self.pagination.slice(snapshot.rows()).to_vec()
    }

    /// Cells of the current page, one row per store row in the window.
    pub fn render_page(&self) -> Vec<RenderedRow> {
        let snapshot = self.store.snapshot();
        let columns = self.columns.visible();

        self.pagination
            .window()
            .range()
            .filter(|&index| index < snapshot.len())
            .map(|index| RenderedRow {
                index,
                collapsed: snapshot.row_collapsed(index),
                striped: self.config.striped && index % 2 == 1,
                cells: columns
                    .iter()
                    .map(|column| cell::render_cell(&snapshot, index, column, &self.format))
                    .collect(),
            })
            .collect()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Submit a search term. Blank terms are ignored.
    pub fn search(&mut self, term: &str) -> EventResult {
        let Some(term) = SearchTerm::new(term) else {
            return EventResult::Ignored;
        };
        self.emit(GridEvent::Search(term.into_inner()));
        EventResult::Consumed
    }

    /// Indexes of rows whose visible cell text fuzzy-matches `query`, best
    /// first. An empty query returns every row in order.
    pub fn filter(&self, query: &str) -> Vec<usize> {
        let columns = self.columns.visible();
        let snapshot = self.store.snapshot();
        let haystacks: Vec<Vec<String>> = snapshot
            .rows()
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| cell::default_text(Some(row), column, &self.format))
                    .collect()
            })
            .collect();

        fuzzy_filter(query, &haystacks)
            .into_iter()
            .map(|m| m.index)
            .collect()
    }
}
