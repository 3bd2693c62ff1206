//! Table-wide configuration supplied by the host.

use chrono::format::{Item, StrftimeItems};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::cell::{CellFormat, DEFAULT_DATE_FORMAT, DEFAULT_PLACEHOLDER};
use crate::error::{ConfigError, Result};
use crate::pagination::PaginationConfig;
use crate::search::SearchConfig;

/// Configuration of one table instance.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use datagrid::GridConfig;
///
/// let config = GridConfig::from_json_str(r#"{ "striped": true, "pagination": { "pageSize": 25 } }"#)?;
/// assert!(config.striped);
/// assert_eq!(config.pagination.page_size, 25);
/// assert_eq!(config.pagination.current_page, 1);
/// # Ok::<(), datagrid::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Alternate row shading.
    pub striped: bool,

    /// Cell borders.
    pub bordered: bool,

    /// Header height, in render units.
    pub header_size: u16,

    /// Footer height, in render units.
    pub footer_size: u16,

    pub pagination: PaginationConfig,

    pub search: SearchConfig,

    /// Text shown for unavailable values.
    pub placeholder: String,

    /// strftime pattern for date columns.
    pub date_format: String,

    /// Width ellipsis columns are cut to (None = no limit).
    pub ellipsis_width: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            striped: false,
            bordered: false,
            header_size: 0,
            footer_size: 0,
            pagination: PaginationConfig::default(),
            search: SearchConfig::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            ellipsis_width: None,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and validate a configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value, returning the first problem found.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let result = self.check();
        if let Err(e) = &result {
            warn!("Rejected grid configuration: {}", e);
        }
        result
    }

    fn check(&self) -> std::result::Result<(), ConfigError> {
        self.pagination.validate()?;
        self.search.validate()?;

        if self.date_format.is_empty() {
            return Err(ConfigError::EmptyDateFormat);
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        if self.ellipsis_width == Some(0) {
            return Err(ConfigError::ZeroEllipsisWidth);
        }
        Ok(())
    }

    /// Formatting options for default cell text.
    pub fn cell_format(&self) -> CellFormat {
        CellFormat {
            placeholder: self.placeholder.clone(),
            date_format: self.date_format.clone(),
            ellipsis_width: self.ellipsis_width,
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    pub fn striped(mut self, striped: bool) -> Self {
        self.striped = striped;
        self
    }

    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    pub fn header_size(mut self, size: u16) -> Self {
        self.header_size = size;
        self
    }

    pub fn footer_size(mut self, size: u16) -> Self {
        self.footer_size = size;
        self
    }

    /// Set the initial page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.pagination.page_size = size;
        self
    }

    /// Set the initial page.
    pub fn current_page(mut self, page: usize) -> Self {
        self.pagination.current_page = page;
        self
    }

    /// Set the page sizes offered to the user.
    pub fn page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.pagination.page_size_options = options.into();
        self
    }

    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search.placeholder = placeholder.into();
        self
    }

    pub fn search_label(mut self, label: impl Into<String>) -> Self {
        self.search.label = Some(label.into());
        self
    }

    /// Set the text shown for unavailable values.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn ellipsis_width(mut self, width: usize) -> Self {
        self.ellipsis_width = Some(width);
        self
    }
}
