//! Column definition validation.
//!
//! Definitions are checked as a whole before a registry accepts them. The
//! first failure aborts the registration; row data is never validated here.

use std::collections::HashSet;

use log::warn;
use serde_json::Value;

use crate::error::{GridError, Result};

use super::def::{ColumnDef, RendererRegistry};

/// Which check a definition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A validation rule rejected the definition.
    Rule,
    /// An earlier definition already uses the same field.
    Duplicate,
}

/// Information about a single column that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Position of the definition in the declared list.
    pub index: usize,
    /// The definition's field.
    pub field: String,
    /// Which check failed.
    pub kind: FieldErrorKind,
    /// Error message.
    pub message: String,
}

/// Result of validating a list of column definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every definition passed validation.
    #[default]
    Valid,
    /// One or more definitions failed validation.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    /// Check if all definitions passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Get all validation errors.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first validation error (if any).
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Convert into a result that fails with the first error.
    pub fn into_result(self) -> Result<()> {
        match self.first_error() {
            None => Ok(()),
            Some(error) if error.kind == FieldErrorKind::Duplicate => {
                Err(GridError::DuplicateField {
                    field: error.field.clone(),
                })
            }
            Some(error) => Err(GridError::InvalidColumn {
                index: error.index,
                field: error.field.clone(),
                message: error.message.clone(),
            }),
        }
    }
}

/// Type alias for validation rule closures.
type Rule = Box<dyn Fn(&ColumnDef) -> std::result::Result<(), String> + Send + Sync>;

/// Validator for column definition lists.
///
/// Carries the built-in structural rules; more can be added with
/// [`ColumnValidator::rule`].
///
/// # Example
///
/// ```
/// use datagrid::column::{ColumnValidator, ColumnDef};
///
/// let result = ColumnValidator::new()
///     .rule(|col| {
///         if col.header_name.is_empty() {
///             Err("header must not be empty".into())
///         } else {
///             Ok(())
///         }
///     })
///     .validate(&[ColumnDef::new("a", "")]);
///
/// assert!(!result.is_valid());
/// ```
pub struct ColumnValidator {
    rules: Vec<Rule>,
}

impl ColumnValidator {
    /// Create a validator with the structural rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }.rule(|col| {
            if col.field.trim().is_empty() {
                Err("field must not be empty".into())
            } else {
                Ok(())
            }
        })
    }

    /// Add a rule applied to every definition.
    pub fn rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&ColumnDef) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Run every rule on every definition and check field uniqueness.
    pub fn validate(&self, columns: &[ColumnDef]) -> ValidationResult {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (index, col) in columns.iter().enumerate() {
            if let Some(message) = self.rules.iter().find_map(|rule| rule(col).err()) {
                errors.push(FieldError {
                    index,
                    field: col.field.clone(),
                    kind: FieldErrorKind::Rule,
                    message,
                });
                continue;
            }
            if !seen.insert(col.field.as_str()) {
                errors.push(FieldError {
                    index,
                    field: col.field.clone(),
                    kind: FieldErrorKind::Duplicate,
                    message: format!("duplicate field '{}'", col.field),
                });
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

impl Default for ColumnValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a list of definitions with the structural rules.
///
/// Fails with the first invalid definition. A repeated field fails with
/// [`GridError::DuplicateField`].
pub fn validate_columns(columns: &[ColumnDef]) -> Result<()> {
    let result = ColumnValidator::new().validate(columns);
    if let Some(error) = result.first_error() {
        warn!("Rejected column definitions: {:?}", error);
    }
    result.into_result()
}

/// Decode and validate column definitions from a JSON array.
///
/// Each element must be an object with string `field` and `headerName`;
/// flags must be booleans; `renderer`, when present, must name an entry of
/// `renderers`. Decoding stops at the first bad element.
pub fn columns_from_json(value: Value, renderers: &RendererRegistry) -> Result<Vec<ColumnDef>> {
    let Value::Array(items) = value else {
        return Err(GridError::InvalidColumn {
            index: 0,
            field: "?".into(),
            message: "column definitions must be a JSON array".into(),
        });
    };

    let mut columns = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let field = item
            .get("field")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();

        let mut col: ColumnDef =
            serde_json::from_value(item).map_err(|e| GridError::InvalidColumn {
                index,
                field: field.clone(),
                message: e.to_string(),
            })?;

        if let Some(name) = &col.renderer_name {
            col.renderer = renderers
                .get(name)
                .ok_or_else(|| GridError::UnknownRenderer {
                    field: field.clone(),
                    renderer: name.clone(),
                })?;
        }
        columns.push(col);
    }

    validate_columns(&columns)?;
    Ok(columns)
}
