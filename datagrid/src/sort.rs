//! Single-column sorting with per-column direction memory.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnDef;
use crate::error::{GridError, Result};
use crate::row::Row;
use crate::temporal::parse_timestamp;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortDirection {
    /// The other direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Lowercase name, as used in events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-applied direction per column field.
///
/// Directions are independent per column and retained across sorts, so
/// activating the same column again toggles instead of resetting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    directions: HashMap<String, SortDirection>,
    active: Option<String>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `field` and return the direction to apply.
    ///
    /// First activation is ascending; later ones flip the stored direction.
    /// Other fields' stored directions are left alone.
    pub fn toggle(&mut self, field: &str) -> SortDirection {
        let direction = match self.directions.get(field) {
            Some(SortDirection::Asc) => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.directions.insert(field.to_string(), direction);
        self.active = Some(field.to_string());
        direction
    }

    /// Last direction applied to `field`.
    pub fn direction(&self, field: &str) -> Option<SortDirection> {
        self.directions.get(field).copied()
    }

    /// The most recently activated field.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active field and its direction.
    pub fn active_sort(&self) -> Option<(&str, SortDirection)> {
        let field = self.active.as_deref()?;
        self.direction(field).map(|dir| (field, dir))
    }
}

/// Sort request raised to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortEvent {
    pub field: String,
    pub direction: SortDirection,
    #[serde(rename = "col")]
    pub column: ColumnDef,
}

impl SortEvent {
    /// Decode and check a sort event from JSON.
    pub fn from_json(value: Value) -> Result<Self> {
        let event: Self = serde_json::from_value(value)
            .map_err(|e| GridError::InvalidSortEvent(e.to_string()))?;
        event.validate()?;
        Ok(event)
    }

    /// Check that the event describes its own column.
    pub fn validate(&self) -> Result<()> {
        if self.field.is_empty() {
            return Err(GridError::InvalidSortEvent("field is empty".into()));
        }
        if self.field != self.column.field {
            return Err(GridError::InvalidSortEvent(format!(
                "field '{}' does not match column '{}'",
                self.field, self.column.field
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Comparator
// =============================================================================

/// Sort key of a value: `None` means "unset", placed after every other value.
enum Key<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Array,
    Object,
    Timestamp(chrono::NaiveDateTime),
}

impl Key<'_> {
    fn rank(&self) -> u8 {
        match self {
            Key::Bool(_) => 0,
            Key::Number(_) | Key::Timestamp(_) => 1,
            Key::Text(_) => 2,
            Key::Array => 3,
            Key::Object => 4,
        }
    }
}

fn sort_key(value: Option<&Value>, temporal: bool) -> Option<Key<'_>> {
    let value = value?;
    if temporal {
        return parse_timestamp(value).map(Key::Timestamp);
    }
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(Key::Bool(*b)),
        Value::Number(n) => n.as_f64().map(Key::Number),
        Value::String(s) => Some(Key::Text(s)),
        Value::Array(_) => Some(Key::Array),
        Value::Object(_) => Some(Key::Object),
    }
}

fn compare_keys(a: &Key<'_>, b: &Key<'_>) -> Ordering {
    match (a, b) {
        (Key::Bool(x), Key::Bool(y)) => x.cmp(y),
        (Key::Number(x), Key::Number(y)) => x.total_cmp(y),
        (Key::Text(x), Key::Text(y)) => x.cmp(y),
        (Key::Timestamp(x), Key::Timestamp(y)) => x.cmp(y),
        // Arrays and objects are not compared deeply.
        (Key::Array, Key::Array) | (Key::Object, Key::Object) => Ordering::Equal,
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Compare two cell values for an ascending sort.
///
/// Temporal comparison parses both values as timestamps. Missing, null and
/// unparseable values compare greater than everything else and equal to each
/// other. Mixed types order bool < number < text < array < object.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, temporal: bool) -> Ordering {
    match (sort_key(a, temporal), sort_key(b, temporal)) {
        (Some(x), Some(y)) => compare_keys(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort order of `rows` by `field`.
///
/// Returns the permutation: position `i` of the result holds the index in
/// `rows` of the row that sorts to position `i`. Ties keep their prior
/// relative order (the slice sort is a stable merge sort). Unset values stay
/// at the end in both directions.
pub fn sort_order(
    rows: &[Row],
    field: &str,
    direction: SortDirection,
    temporal: bool,
) -> Vec<usize> {
    let mut keyed: Vec<(Option<Key<'_>>, usize)> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| (sort_key(row.get(field), temporal), index))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => compare_keys(x, y),
            SortDirection::Desc => compare_keys(y, x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, index)| index).collect()
}

/// Stable sort of `rows` by `field`. See [`sort_order`].
pub fn sort_rows(rows: &[Row], field: &str, direction: SortDirection, temporal: bool) -> Vec<Row> {
    sort_order(rows, field, direction, temporal)
        .into_iter()
        .map(|index| rows[index].clone())
        .collect()
}

// =============================================================================
// Engine
// =============================================================================

/// Outcome of activating a sortable column.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOutcome {
    /// Event for the host.
    pub event: SortEvent,
    /// Rows in the new order.
    pub rows: Vec<Row>,
    /// Prior index of each row in `rows`.
    pub order: Vec<usize>,
}

/// Sort engine of one table instance.
#[derive(Debug, Clone, Default)]
pub struct SortEngine {
    state: SortState,
}

impl SortEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction memory.
    pub fn state(&self) -> &SortState {
        &self.state
    }

    /// Activate `column`: toggle its direction and sort `rows` by it.
    ///
    /// Columns that are not sortable are ignored and return `None`.
    pub fn sort_by_column(&mut self, column: &ColumnDef, rows: &[Row]) -> Option<SortOutcome> {
        if !column.is_sortable {
            return None;
        }

        let direction = self.state.toggle(&column.field);
        debug!("Sorting by '{}' {}", column.field, direction);

        let order = sort_order(rows, &column.field, direction, column.is_date);
        let rows = order.iter().map(|&index| rows[index].clone()).collect();
        Some(SortOutcome {
            event: SortEvent {
                field: column.field.clone(),
                direction,
                column: column.clone(),
            },
            rows,
            order,
        })
    }
}
