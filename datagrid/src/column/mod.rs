//! Column definitions and the column registry.
//!
//! The host declares one [`ColumnDef`] per displayed row field. The
//! [`ColumnRegistry`] validates the list once at registration, then layers two
//! user-driven views on top of it: visibility overrides and an explicit
//! column order.
//!
//! # Example
//!
//! ```
//! use datagrid::{ColumnDef, ColumnRegistry};
//!
//! let mut columns = ColumnRegistry::new(vec![
//!     ColumnDef::new("a", "A"),
//!     ColumnDef::new("b", "B").hidden(),
//! ])?;
//! assert_eq!(columns.visible().len(), 1);
//!
//! columns.toggle_visibility("b", None);
//! let fields: Vec<_> = columns.visible().iter().map(|c| c.field.as_str()).collect();
//! assert_eq!(fields, ["a", "b"]);
//! # Ok::<(), datagrid::GridError>(())
//! ```

mod def;
mod registry;
mod validate;

pub use def::{CellRenderer, ColumnDef, CustomCell, RendererRegistry};
pub use registry::{ColumnRegistry, ordered_columns, visible_columns};
pub use validate::{
    ColumnValidator, FieldError, FieldErrorKind, ValidationResult, columns_from_json,
    validate_columns,
};
