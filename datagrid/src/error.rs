//! Error types.
//!
//! Only configuration mistakes made by the host become errors. Heterogeneous
//! row data is recovered locally (placeholder text, `None`, sort-last) and
//! benign interaction no-ops are reported as ignored, never as errors.

use thiserror::Error;

/// Configuration error raised by the grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// A column definition failed validation. Registration stops at the first one.
    #[error("invalid column definition #{index} ('{field}'): {message}")]
    InvalidColumn {
        index: usize,
        field: String,
        message: String,
    },

    /// Two column definitions share the same field.
    #[error("duplicate column field '{field}'")]
    DuplicateField { field: String },

    /// A column references a custom renderer that was never registered.
    #[error("column '{field}' references unknown renderer '{renderer}'")]
    UnknownRenderer { field: String, renderer: String },

    /// A sort event does not describe a sortable column.
    #[error("invalid sort event: {0}")]
    InvalidSortEvent(String),

    /// A row-click payload does not describe a row of the table.
    #[error("invalid row click: {0}")]
    InvalidRowClick(String),

    /// The grid configuration is invalid.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A JSON document could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid table-wide configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    #[error("page size option {0} must be greater than zero")]
    InvalidPageSizeOption(usize),

    #[error("current page must be at least 1")]
    ZeroCurrentPage,

    #[error("search placeholder must not be empty")]
    EmptySearchPlaceholder,

    #[error("date format must not be empty")]
    EmptyDateFormat,

    #[error("date format '{0}' is not a valid strftime pattern")]
    InvalidDateFormat(String),

    #[error("ellipsis width must be greater than zero")]
    ZeroEllipsisWidth,
}

/// Result alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
