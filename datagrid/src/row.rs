//! Open key/value row record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of host-supplied data.
///
/// Rows have no fixed schema: keys are column field names and values are
/// arbitrary JSON values (primitives, nested objects, arrays). A key that is
/// absent from the row is treated as unset.
///
/// # Example
///
/// ```
/// use datagrid::Row;
///
/// let row = Row::new().set("name", "Bob").set("age", 30);
///
/// assert_eq!(row.get_str("name"), Some("Bob"));
/// assert_eq!(row.get_f64("age"), Some(30.0));
/// assert!(row.get("email").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from a JSON value.
    ///
    /// Anything other than a JSON object yields an empty row.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// Builds a row sequence from a JSON value.
    ///
    /// A non-array input is treated as an empty sequence.
    pub fn many_from_json(value: Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_json).collect(),
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the number of fields set on this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    /// Returns the field as a string slice when it holds a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns the field as a number when it holds one.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Returns the field as a boolean when it holds one.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value, returning the row for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Sets a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
