//! Row and column interaction dispatch.
//!
//! The dispatcher turns low-level UI gestures into host notifications,
//! guarded by the column capability flags. Two flows are independent:
//!
//! - **Row click**: stateless guard-and-forward. A click yields a
//!   [`RowClicked`] only when the column is clickable and the row exists.
//! - **Column drag**: `drag_start` writes the dragged field into the
//!   [`DataTransfer`], `drag_over` always accepts, `drag_enter`/`drag_leave`
//!   move the drop highlight, and `drop` reorders the registry.
//!
//! Malformed or pointless gestures (drop without payload, drop onto self,
//! click on a plain column) are reported as [`EventResult::Ignored`].

mod drag;

use log::{debug, trace};

use crate::column::{ColumnDef, ColumnRegistry};
use crate::event::RowClicked;
use crate::store::{ActiveRow, Snapshot};

pub use drag::{DataTransfer, DragState};

/// Result of handling a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Nothing happened.
    Ignored,
    /// The gesture changed state.
    Consumed,
}

impl EventResult {
    /// Check if the gesture was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

impl From<bool> for EventResult {
    fn from(handled: bool) -> Self {
        if handled { Self::Consumed } else { Self::Ignored }
    }
}

/// Row under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    pub row_index: usize,
    /// The hovered cell's column is clickable.
    pub clickable: bool,
}

/// Interaction state of one table instance.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    hover: Option<Hover>,
    drag: DragState,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Forward a click on the cell of `column` at `row_index`.
    ///
    /// Returns `None` when the column is not clickable or the row does not
    /// exist.
    pub fn row_clicked(
        &self,
        snapshot: &Snapshot,
        column: &ColumnDef,
        row_index: usize,
    ) -> Option<RowClicked> {
        if !column.is_clickable {
            trace!("Click on non-clickable column '{}'", column.field);
            return None;
        }
        let row = snapshot.row(row_index)?;
        debug!("Row {} clicked on '{}'", row_index, column.field);
        Some(RowClicked {
            column: column.clone(),
            index: row_index,
            row: row.clone(),
        })
    }

    /// Current hover, display only.
    pub fn hover(&self) -> Option<Hover> {
        self.hover
    }

    /// Pointer entered the cell of `column` at `row_index`.
    pub fn hover_cell(&mut self, row_index: usize, column: &ColumnDef) -> EventResult {
        let hover = Some(Hover {
            row_index,
            clickable: column.is_clickable,
        });
        if self.hover == hover {
            return EventResult::Ignored;
        }
        self.hover = hover;
        EventResult::Consumed
    }

    /// Pointer left the table body.
    pub fn clear_hover(&mut self) -> EventResult {
        self.hover.take().is_some().into()
    }

    /// Active-row record that flips the collapse state of `row_index`.
    ///
    /// Returns `None` when the row does not exist.
    pub fn toggle_row_collapse(
        &self,
        snapshot: &Snapshot,
        field: &str,
        row_index: usize,
    ) -> Option<ActiveRow> {
        snapshot.row(row_index)?;
        let collapsed = !snapshot.row_collapsed(row_index);
        debug!("Row {} collapsed -> {}", row_index, collapsed);
        Some(ActiveRow::new(field, collapsed, row_index))
    }

    // =========================================================================
    // Column drag
    // =========================================================================

    /// Drag state, for the header render.
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Start dragging the header of `field`.
    pub fn drag_start(&mut self, field: &str, transfer: &mut DataTransfer) -> EventResult {
        if field.is_empty() {
            return EventResult::Ignored;
        }
        transfer.set_field(field);
        self.drag.dragging = Some(field.to_string());
        debug!("Drag start '{}'", field);
        EventResult::Consumed
    }

    /// A drag moves over a header. Always accepted so that drop can fire.
    pub fn drag_over(&self) -> EventResult {
        EventResult::Consumed
    }

    /// A drag enters the header of `field`.
    pub fn drag_enter(&mut self, field: &str) -> EventResult {
        if self.drag.highlighted.as_deref() == Some(field) {
            return EventResult::Ignored;
        }
        self.drag.highlighted = Some(field.to_string());
        EventResult::Consumed
    }

    /// A drag leaves the highlighted header.
    pub fn drag_leave(&mut self) -> EventResult {
        self.drag.highlighted.take().is_some().into()
    }

    /// Drop onto the header of `target`.
    ///
    /// Moves the transferred column to `target`'s position. The highlight
    /// and drag state are cleared whatever the outcome.
    pub fn drop(
        &mut self,
        target: &str,
        transfer: &DataTransfer,
        registry: &mut ColumnRegistry,
    ) -> EventResult {
        self.drag.clear();

        let Some(dragged) = transfer.field() else {
            trace!("Drop on '{}' without payload", target);
            return EventResult::Ignored;
        };
        if dragged == target {
            return EventResult::Ignored;
        }

        debug!("Drop '{}' onto '{}'", dragged, target);
        registry.reorder(dragged, target).into()
    }

    /// The drag ended without a drop.
    pub fn drag_end(&mut self) -> EventResult {
        let was_active = self.drag.is_active() || self.drag.highlighted.is_some();
        self.drag.clear();
        was_active.into()
    }
}
