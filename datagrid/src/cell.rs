//! Cell rendering: default value-to-text and the custom cell context.

use std::fmt::Write as _;

use serde_json::Value;
use unicode_width::UnicodeWidthChar;

use crate::column::{CellRenderer, ColumnDef};
use crate::row::Row;
use crate::store::Snapshot;
use crate::temporal::parse_timestamp;

/// Default text for values that are missing, null, or unparseable dates.
pub const DEFAULT_PLACEHOLDER: &str = "Not available";

/// Default strftime pattern for date columns.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

const ELLIPSIS: char = '…';

/// Formatting options for default cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFormat {
    /// Text shown when a value is not available.
    pub placeholder: String,
    /// strftime pattern for date columns.
    pub date_format: String,
    /// Display width ellipsis columns are truncated to (`None` = no limit).
    pub ellipsis_width: Option<usize>,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            ellipsis_width: None,
        }
    }
}

/// Rendered cell, handed to the render layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellView {
    pub text: String,
    pub bold: bool,
    pub state: bool,
    pub clickable: bool,
    /// The text was shortened to fit.
    pub truncated: bool,
}

impl CellView {
    /// A plain text cell.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// What a custom renderer sees when rendering one cell.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    row_index: usize,
    column: &'a ColumnDef,
    snapshot: &'a Snapshot,
}

impl<'a> CellContext<'a> {
    pub fn new(row_index: usize, column: &'a ColumnDef, snapshot: &'a Snapshot) -> Self {
        Self {
            row_index,
            column,
            snapshot,
        }
    }

    /// Index of the rendered row.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Column being rendered.
    pub fn column(&self) -> &'a ColumnDef {
        self.column
    }

    /// The rendered row, if still in bounds.
    pub fn row(&self) -> Option<&'a Row> {
        self.snapshot.row(self.row_index)
    }

    /// Value of `key` on the rendered row.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.snapshot.value_at(key, self.row_index)
    }

    /// Whether the rendered row is collapsed.
    pub fn collapsed(&self) -> bool {
        self.snapshot.row_collapsed(self.row_index)
    }
}

/// Default text of `column` for `row`.
///
/// Missing row, missing field or null yields the placeholder. Date columns
/// format parseable timestamps with `date_format` and fall back to the
/// placeholder. Other values use their natural text form.
pub fn default_text(row: Option<&Row>, column: &ColumnDef, format: &CellFormat) -> String {
    let Some(value) = row.and_then(|r| r.get(&column.field)) else {
        return format.placeholder.clone();
    };
    if value.is_null() {
        return format.placeholder.clone();
    }

    if column.is_date {
        return format_date(value, &format.date_format)
            .unwrap_or_else(|| format.placeholder.clone());
    }

    value_text(value)
}

/// Natural text form of a value: strings unquoted, arrays joined by `", "`.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn format_date(value: &Value, pattern: &str) -> Option<String> {
    let timestamp = parse_timestamp(value)?;
    let mut out = String::new();
    // An invalid pattern surfaces as a fmt error rather than a panic.
    write!(out, "{}", timestamp.format(pattern)).ok()?;
    Some(out)
}

/// Truncate `text` to `width` display columns, ending with `…` when cut.
///
/// Returns the text and whether it was cut.
pub fn truncate(text: &str, width: usize) -> (String, bool) {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return (text.to_string(), false);
    }
    if width == 0 {
        return (String::new(), true);
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    (out, true)
}

/// Render the cell of `column` for the row at `row_index`.
///
/// Custom renderers get a [`CellContext`]; the default renderer produces the
/// default text, truncated for ellipsis columns. The column's display flags
/// are applied on top either way.
pub fn render_cell(
    snapshot: &Snapshot,
    row_index: usize,
    column: &ColumnDef,
    format: &CellFormat,
) -> CellView {
    let mut view = match &column.renderer {
        CellRenderer::Custom(cell) => cell.render(&CellContext::new(row_index, column, snapshot)),
        CellRenderer::Default => {
            let text = default_text(snapshot.row(row_index), column, format);
            match format.ellipsis_width {
                Some(width) if column.is_ellipsis => {
                    let (text, truncated) = truncate(&text, width);
                    CellView {
                        text,
                        truncated,
                        ..Default::default()
                    }
                }
                _ => CellView::text(text),
            }
        }
    };

    view.bold |= column.is_bold;
    view.state |= column.is_state;
    view.clickable |= column.is_clickable;
    view
}
