//! Immutable store snapshot.

use std::sync::Arc;

use serde_json::Value;

use crate::row::Row;

/// Table-wide UI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableState {
    /// Whether every row is collapsed.
    pub collapsed: bool,
}

/// The last row whose per-row UI state was explicitly changed.
///
/// All fields are `None` when no row is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveRow {
    /// Column field the change originated from.
    pub field: Option<String>,
    /// Collapse state applied to the row.
    pub collapsed: Option<bool>,
    /// Index of the row in the current row order.
    pub row_index: Option<usize>,
}

impl ActiveRow {
    /// No active row.
    pub fn none() -> Self {
        Self::default()
    }

    /// An active row at `row_index`.
    pub fn new(field: impl Into<String>, collapsed: bool, row_index: usize) -> Self {
        Self {
            field: Some(field.into()),
            collapsed: Some(collapsed),
            row_index: Some(row_index),
        }
    }

    /// Returns `true` if this describes a row.
    pub fn is_active(&self) -> bool {
        self.row_index.is_some()
    }
}

/// One internally consistent copy of the store's full state.
///
/// Snapshots are never mutated once published. Writers build a new snapshot
/// and swap it in, so a reader holding an older `Arc<Snapshot>` keeps seeing
/// exactly the triple it was handed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    rows: Arc<Vec<Row>>,
    table_state: TableState,
    active_row: ActiveRow,
}

impl Snapshot {
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
            table_state: self.table_state,
            active_row: self.active_row.clone(),
        }
    }

    /// New rows that are a permutation of the current ones.
    ///
    /// `order[i]` is the prior index of `rows[i]`; the active row follows its
    /// row to the new position.
    pub(crate) fn with_reordered_rows(&self, rows: Vec<Row>, order: &[usize]) -> Self {
        let mut active_row = self.active_row.clone();
        if let Some(prior) = active_row.row_index {
            active_row.row_index = order.iter().position(|&index| index == prior);
        }
        Self {
            rows: Arc::new(rows),
            table_state: self.table_state,
            active_row,
        }
    }

    pub(crate) fn with_active_row(&self, active_row: ActiveRow) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            table_state: self.table_state,
            active_row,
        }
    }

    pub(crate) fn with_table_state(&self, table_state: TableState) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            table_state,
            active_row: self.active_row.clone(),
        }
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Table-wide UI flags.
    pub fn table_state(&self) -> TableState {
        self.table_state
    }

    /// The active row record.
    pub fn active_row(&self) -> &ActiveRow {
        &self.active_row
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, if in bounds.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Value of `field` on the row at `row_index`.
    ///
    /// `None` when the index is out of bounds or the field is absent.
    pub fn value_at(&self, field: &str, row_index: usize) -> Option<&Value> {
        self.rows.get(row_index).and_then(|row| row.get(field))
    }

    /// Whether the row at `row_index` renders collapsed.
    ///
    /// The active row record wins when it targets the row. Otherwise the row
    /// collapses when the whole table is collapsed or when its `isCollapsible`
    /// field is the boolean `true`.
    pub fn row_collapsed(&self, row_index: usize) -> bool {
        if self.active_row.row_index == Some(row_index)
            && let Some(collapsed) = self.active_row.collapsed
        {
            return collapsed;
        }
        if self.table_state.collapsed {
            return true;
        }
        self.rows
            .get(row_index)
            .and_then(|row| row.get_bool("isCollapsible"))
            .unwrap_or(false)
    }
}

/// Restartable sequence of one field's values across every row.
///
/// Bound to the snapshot current when it was created; each call to
/// [`FieldValues::iter`] walks the rows again from the start.
#[derive(Debug, Clone)]
pub struct FieldValues {
    snapshot: Arc<Snapshot>,
    field: String,
}

impl FieldValues {
    pub(crate) fn new(snapshot: Arc<Snapshot>, field: impl Into<String>) -> Self {
        Self {
            snapshot,
            field: field.into(),
        }
    }

    /// The field being read.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Number of values (always the row count).
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Iterate the value of the field for every row, in row order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.snapshot
            .rows()
            .iter()
            .map(move |row| row.get(&self.field))
    }
}

impl<'a> IntoIterator for &'a FieldValues {
    type Item = Option<&'a Value>;
    type IntoIter = Box<dyn Iterator<Item = Option<&'a Value>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
