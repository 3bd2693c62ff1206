//! Column definition and cell renderer types.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::{CellContext, CellView};

/// Capability implemented by host-supplied custom cells.
///
/// A custom cell replaces the default value-to-text rendering for every cell
/// of the column it is attached to. It reads the row it renders through the
/// [`CellContext`], which is bound to one store snapshot.
///
/// # Example
///
/// ```
/// use datagrid::cell::{CellContext, CellView};
/// use datagrid::column::CustomCell;
///
/// #[derive(Debug)]
/// struct Stars;
///
/// impl CustomCell for Stars {
///     fn name(&self) -> &str {
///         "stars"
///     }
///
///     fn render(&self, cx: &CellContext<'_>) -> CellView {
///         let rating = cx.value("rating").and_then(|v| v.as_u64()).unwrap_or(0);
///         CellView::text("★".repeat(rating.min(5) as usize))
///     }
/// }
/// ```
pub trait CustomCell: Send + Sync + fmt::Debug {
    /// Name the renderer is registered under.
    fn name(&self) -> &str;

    /// Render the cell of `cx.column()` for the row at `cx.row_index()`.
    fn render(&self, cx: &CellContext<'_>) -> CellView;
}

/// How the cells of a column are rendered.
#[derive(Clone, Default)]
pub enum CellRenderer {
    /// Built-in value-to-text rendering.
    #[default]
    Default,
    /// Host-supplied renderer.
    Custom(Arc<dyn CustomCell>),
}

impl CellRenderer {
    /// Wrap a custom cell.
    pub fn custom(cell: impl CustomCell + 'static) -> Self {
        Self::Custom(Arc::new(cell))
    }

    /// Returns `true` for a custom renderer.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Registered name of a custom renderer.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Custom(cell) => Some(cell.name()),
        }
    }
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::Custom(cell) => write!(f, "Custom({})", cell.name()),
        }
    }
}

impl PartialEq for CellRenderer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Default, Self::Default) => true,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Named custom renderers that JSON column definitions can reference.
#[derive(Debug, Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn CustomCell>>,
}

impl RendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer under its own name, replacing any previous one.
    pub fn register(mut self, cell: impl CustomCell + 'static) -> Self {
        let cell: Arc<dyn CustomCell> = Arc::new(cell);
        self.renderers.insert(cell.name().to_string(), cell);
        self
    }

    /// Look up a renderer by name.
    pub fn get(&self, name: &str) -> Option<CellRenderer> {
        self.renderers
            .get(name)
            .map(|cell| CellRenderer::Custom(Arc::clone(cell)))
    }
}

/// Host-declared description of how one row field is displayed.
///
/// `field` is the join key against row keys and must be unique within a
/// table. When deserialized, the flags use the camelCase names of the
/// declared column object (`headerName`, `isVisible`, `isSortable`, ...), an
/// omitted flag is `false`, and a custom renderer is referenced by name under
/// `renderer` (see [`RendererRegistry`]).
///
/// # Example
///
/// ```
/// use datagrid::ColumnDef;
///
/// let columns = vec![
///     ColumnDef::new("title", "Title").bold().sortable().clickable(),
///     ColumnDef::new("creationDate", "Created").date().sortable(),
///     ColumnDef::new("notes", "Notes").hidden(),
/// ];
/// assert!(columns[0].is_sortable);
/// assert!(!columns[2].is_visible);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    pub header_name: String,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_date: bool,
    #[serde(default)]
    pub is_state: bool,
    #[serde(default)]
    pub is_ellipsis: bool,
    #[serde(default)]
    pub is_clickable: bool,
    #[serde(default)]
    pub is_sortable: bool,
    /// Name of the custom renderer, as declared.
    #[serde(default, rename = "renderer", skip_serializing_if = "Option::is_none")]
    pub renderer_name: Option<String>,
    #[serde(skip)]
    pub renderer: CellRenderer,
}

impl ColumnDef {
    /// A visible column with every other flag off.
    pub fn new(field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            is_visible: true,
            is_bold: false,
            is_date: false,
            is_state: false,
            is_ellipsis: false,
            is_clickable: false,
            is_sortable: false,
            renderer_name: None,
            renderer: CellRenderer::Default,
        }
    }

    /// Hide the column by default.
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    /// Render the value in bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Treat values as calendar timestamps for display and sorting.
    pub fn date(mut self) -> Self {
        self.is_date = true;
        self
    }

    /// Render the value as a state badge.
    pub fn state(mut self) -> Self {
        self.is_state = true;
        self
    }

    /// Truncate long values with an ellipsis.
    pub fn ellipsis(mut self) -> Self {
        self.is_ellipsis = true;
        self
    }

    /// Emit row-clicked events for clicks in this column.
    pub fn clickable(mut self) -> Self {
        self.is_clickable = true;
        self
    }

    /// Allow sorting by this column.
    pub fn sortable(mut self) -> Self {
        self.is_sortable = true;
        self
    }

    /// Render cells with a custom renderer.
    pub fn renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer_name = renderer.name().map(str::to_string);
        self.renderer = renderer;
        self
    }
}
