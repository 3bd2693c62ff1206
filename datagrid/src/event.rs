//! Events raised to the host application.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnDef;
use crate::error::{GridError, Result};
use crate::row::Row;
use crate::sort::SortEvent;

/// A click on a cell of a clickable column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowClicked {
    #[serde(rename = "col")]
    pub column: ColumnDef,
    pub index: usize,
    pub row: Row,
}

impl RowClicked {
    /// Decode and check a row-click payload from JSON.
    pub fn from_json(value: Value) -> Result<Self> {
        let event: Self = serde_json::from_value(value)
            .map_err(|e| GridError::InvalidRowClick(e.to_string()))?;
        event.validate()?;
        Ok(event)
    }

    /// Check that the payload names a clickable column.
    pub fn validate(&self) -> Result<()> {
        if self.column.field.is_empty() {
            return Err(GridError::InvalidRowClick("column field is empty".into()));
        }
        if !self.column.is_clickable {
            return Err(GridError::InvalidRowClick(format!(
                "column '{}' is not clickable",
                self.column.field
            )));
        }
        Ok(())
    }
}

/// Notification for the host.
///
/// The grid queues these while handling interactions; the host drains them
/// with [`DataGrid::drain_events`](crate::DataGrid::drain_events).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum GridEvent {
    RowClicked(RowClicked),
    SortRequested(SortEvent),
    /// Every column in effective order, with effective visibility.
    ColumnStateChanged(Vec<ColumnDef>),
    PageChanged(usize),
    PageSizeChanged(usize),
    Search(String),
}

impl GridEvent {
    /// Short name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RowClicked(_) => "rowClicked",
            Self::SortRequested(_) => "sortRequested",
            Self::ColumnStateChanged(_) => "columnStateChanged",
            Self::PageChanged(_) => "pageChanged",
            Self::PageSizeChanged(_) => "pageSizeChanged",
            Self::Search(_) => "search",
        }
    }
}
