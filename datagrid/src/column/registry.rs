//! Column registry: declared definitions plus user-driven overrides.

use std::collections::HashMap;

use log::debug;

use crate::error::Result;

use super::def::ColumnDef;
use super::validate::validate_columns;

/// Apply an explicit field order to a definition list.
///
/// Fields named in `order` come first, in `order` sequence; every other
/// definition follows in its original relative position. Unknown or repeated
/// entries in `order` are ignored.
pub fn ordered_columns<'a>(definitions: &'a [ColumnDef], order: &[String]) -> Vec<&'a ColumnDef> {
    let mut rank: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    for (pos, field) in order.iter().enumerate() {
        rank.entry(field.as_str()).or_insert(pos);
    }

    let mut columns: Vec<&ColumnDef> = definitions.iter().collect();
    // Stable: unordered columns keep their declared relative order.
    columns.sort_by_key(|col| match rank.get(col.field.as_str()) {
        Some(pos) => (0, *pos),
        None => (1, 0),
    });
    columns
}

/// Ordered columns filtered by effective visibility.
///
/// A column's effective visibility is `overrides[field]` when present and its
/// declared `is_visible` otherwise.
pub fn visible_columns<'a>(
    definitions: &'a [ColumnDef],
    overrides: &HashMap<String, bool>,
    order: &[String],
) -> Vec<&'a ColumnDef> {
    ordered_columns(definitions, order)
        .into_iter()
        .filter(|col| effective_visibility(col, overrides))
        .collect()
}

fn effective_visibility(col: &ColumnDef, overrides: &HashMap<String, bool>) -> bool {
    overrides
        .get(&col.field)
        .copied()
        .unwrap_or(col.is_visible)
}

/// Declared column definitions with the two override layers on top.
///
/// The definitions are read-only; the visibility overrides and the explicit
/// order are owned by the registry and change only through
/// [`ColumnRegistry::toggle_visibility`] and [`ColumnRegistry::reorder`].
/// Both layers are keyed by field, so they survive a re-registration.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    definitions: Vec<ColumnDef>,
    overrides: HashMap<String, bool>,
    order: Vec<String>,
}

impl ColumnRegistry {
    /// Validate and register definitions.
    pub fn new(definitions: Vec<ColumnDef>) -> Result<Self> {
        validate_columns(&definitions)?;
        Ok(Self {
            definitions,
            overrides: HashMap::new(),
            order: Vec::new(),
        })
    }

    /// Replace the declared definitions, keeping both override layers.
    ///
    /// Invalid definitions leave the registry untouched.
    pub fn set_definitions(&mut self, definitions: Vec<ColumnDef>) -> Result<()> {
        validate_columns(&definitions)?;
        self.definitions = definitions;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Declared definitions, in declared order.
    pub fn definitions(&self) -> &[ColumnDef] {
        &self.definitions
    }

    /// Definition for `field`.
    pub fn column(&self, field: &str) -> Option<&ColumnDef> {
        self.definitions.iter().find(|col| col.field == field)
    }

    /// Visibility overrides keyed by field.
    pub fn overrides(&self) -> &HashMap<String, bool> {
        &self.overrides
    }

    /// Explicit field order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Every definition in effective order.
    pub fn ordered(&self) -> Vec<&ColumnDef> {
        ordered_columns(&self.definitions, &self.order)
    }

    /// Visible definitions in effective order.
    pub fn visible(&self) -> Vec<&ColumnDef> {
        visible_columns(&self.definitions, &self.overrides, &self.order)
    }

    /// Effective visibility of `field`, `None` if the field is unknown.
    pub fn is_visible(&self, field: &str) -> Option<bool> {
        self.column(field)
            .map(|col| effective_visibility(col, &self.overrides))
    }

    /// Every definition in effective order, with `is_visible` replaced by
    /// the effective visibility.
    pub fn column_state(&self) -> Vec<ColumnDef> {
        self.ordered()
            .into_iter()
            .map(|col| {
                let mut col = col.clone();
                col.is_visible = effective_visibility(&col, &self.overrides);
                col
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Overrides
    // -------------------------------------------------------------------------

    /// Set the visibility override of `field`.
    ///
    /// With `explicit`, that value is stored; otherwise the current effective
    /// visibility is flipped. Returns the new visibility, or `None` (and does
    /// nothing) for an unknown field.
    pub fn toggle_visibility(&mut self, field: &str, explicit: Option<bool>) -> Option<bool> {
        let current = self.is_visible(field)?;
        let visible = explicit.unwrap_or(!current);
        self.overrides.insert(field.to_string(), visible);
        debug!("Column '{}' visibility -> {}", field, visible);
        Some(visible)
    }

    /// Move `dragged` to the position `target` currently occupies.
    ///
    /// The effective order is materialised, `dragged` is removed, then
    /// reinserted at `target`'s former index, so with `[a, b, c]`,
    /// `reorder("a", "c")` yields `[b, c, a]`. Returns `false` (no change)
    /// when the fields are equal or either one is unknown.
    pub fn reorder(&mut self, dragged: &str, target: &str) -> bool {
        if dragged == target {
            return false;
        }

        let mut fields: Vec<String> = self
            .ordered()
            .into_iter()
            .map(|col| col.field.clone())
            .collect();

        let (Some(from), Some(to)) = (
            fields.iter().position(|f| f == dragged),
            fields.iter().position(|f| f == target),
        ) else {
            return false;
        };

        let moved = fields.remove(from);
        fields.insert(to.min(fields.len()), moved);
        debug!("Column order -> {:?}", fields);
        self.order = fields;
        true
    }

    /// Drop both override layers.
    pub fn reset(&mut self) {
        self.overrides.clear();
        self.order.clear();
    }
}
