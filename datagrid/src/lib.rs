pub mod cell;
pub mod column;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod grid;
pub mod pagination;
pub mod row;
pub mod search;
pub mod sort;
pub mod store;
pub mod temporal;

pub use column::{ColumnDef, ColumnRegistry};
pub use config::GridConfig;
pub use error::{ConfigError, GridError, Result};
pub use event::{GridEvent, RowClicked};
pub use grid::{DataGrid, TableId};
pub use row::Row;
pub use sort::SortDirection;

pub mod prelude {
    pub use crate::cell::{CellContext, CellFormat, CellView};
    pub use crate::column::{CellRenderer, ColumnDef, ColumnRegistry, CustomCell, RendererRegistry};
    pub use crate::config::GridConfig;
    pub use crate::dispatch::{DataTransfer, EventResult};
    pub use crate::error::{ConfigError, GridError, Result};
    pub use crate::event::{GridEvent, RowClicked};
    pub use crate::grid::{DataGrid, RenderedRow, TableId};
    pub use crate::pagination::{PageWindow, Pagination, PaginationConfig};
    pub use crate::row::Row;
    pub use crate::search::{SearchConfig, SearchTerm};
    pub use crate::sort::{SortDirection, SortEvent};
    pub use crate::store::{ActiveRow, RowStore, Snapshot, StoreRead, StoreReader, TableState};
}
