use datagrid::cell::{CellContext, CellView};
use datagrid::column::{
    ColumnValidator, CustomCell, FieldErrorKind, RendererRegistry, columns_from_json,
    visible_columns,
};
use datagrid::{ColumnDef, ColumnRegistry, GridError};
use serde_json::json;
use std::collections::HashMap;

#[derive(Debug)]
struct Badge;

impl CustomCell for Badge {
    fn name(&self) -> &str {
        "badge"
    }

    fn render(&self, cx: &CellContext<'_>) -> CellView {
        CellView::text(format!("[{}]", cx.row_index()))
    }
}

fn fields(columns: &[&ColumnDef]) -> Vec<String> {
    columns.iter().map(|c| c.field.clone()).collect()
}

fn abc() -> ColumnRegistry {
    ColumnRegistry::new(vec![
        ColumnDef::new("a", "A"),
        ColumnDef::new("b", "B"),
        ColumnDef::new("c", "C"),
    ])
    .unwrap()
}

#[test]
fn test_hidden_column_is_filtered() {
    let mut registry = ColumnRegistry::new(vec![
        ColumnDef::new("a", "A"),
        ColumnDef::new("b", "B").hidden(),
    ])
    .unwrap();

    assert_eq!(fields(&registry.visible()), ["a"]);

    assert_eq!(registry.toggle_visibility("b", None), Some(true));
    assert_eq!(fields(&registry.visible()), ["a", "b"]);
}

#[test]
fn test_explicit_visibility_wins() {
    let mut registry = abc();
    assert_eq!(registry.toggle_visibility("a", Some(false)), Some(false));
    assert_eq!(registry.toggle_visibility("a", Some(false)), Some(false));
    assert_eq!(registry.is_visible("a"), Some(false));
    assert_eq!(fields(&registry.visible()), ["b", "c"]);
}

#[test]
fn test_toggle_unknown_field_is_noop() {
    let mut registry = abc();
    assert_eq!(registry.toggle_visibility("zzz", None), None);
    assert!(registry.overrides().is_empty());
}

#[test]
fn test_reorder_moves_to_target_position() {
    let mut registry = abc();
    assert!(registry.reorder("a", "c"));
    assert_eq!(fields(&registry.ordered()), ["b", "c", "a"]);

    assert!(registry.reorder("a", "b"));
    assert_eq!(fields(&registry.ordered()), ["a", "b", "c"]);
}

#[test]
fn test_reorder_noops() {
    let mut registry = abc();
    assert!(!registry.reorder("a", "a"));
    assert!(!registry.reorder("a", "zzz"));
    assert!(!registry.reorder("zzz", "a"));
    assert!(registry.order().is_empty());
}

#[test]
fn test_unordered_columns_keep_relative_order() {
    let defs = vec![
        ColumnDef::new("a", "A"),
        ColumnDef::new("b", "B"),
        ColumnDef::new("c", "C"),
        ColumnDef::new("d", "D"),
    ];
    let order = vec!["c".to_string(), "zzz".to_string(), "a".to_string()];
    let overrides = HashMap::from([("d".to_string(), false)]);

    let visible = visible_columns(&defs, &overrides, &order);
    assert_eq!(fields(&visible), ["c", "a", "b"]);
}

#[test]
fn test_overrides_survive_new_definitions() {
    let mut registry = abc();
    registry.toggle_visibility("b", Some(false));
    registry.reorder("c", "a");

    registry
        .set_definitions(vec![
            ColumnDef::new("a", "A2"),
            ColumnDef::new("b", "B2"),
            ColumnDef::new("c", "C2"),
        ])
        .unwrap();

    assert_eq!(fields(&registry.visible()), ["c", "a"]);
    assert_eq!(registry.column("a").unwrap().header_name, "A2");
}

#[test]
fn test_column_state_reports_effective_visibility() {
    let mut registry = abc();
    registry.toggle_visibility("a", None);
    registry.reorder("c", "a");

    let state = registry.column_state();
    let summary: Vec<(&str, bool)> = state
        .iter()
        .map(|c| (c.field.as_str(), c.is_visible))
        .collect();
    assert_eq!(summary, [("c", true), ("a", false), ("b", true)]);
}

#[test]
fn test_blank_field_fails_registration() {
    let err = ColumnRegistry::new(vec![ColumnDef::new("a", "A"), ColumnDef::new(" ", "B")])
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidColumn { index: 1, .. }));
}

#[test]
fn test_duplicate_field_fails_registration() {
    let err = ColumnRegistry::new(vec![ColumnDef::new("a", "A"), ColumnDef::new("a", "B")])
        .unwrap_err();
    assert!(matches!(err, GridError::DuplicateField { field } if field == "a"));
}

#[test]
fn test_custom_rules_report_every_failure() {
    let result = ColumnValidator::new()
        .rule(|col| {
            if col.header_name.is_empty() {
                Err("header must not be empty".into())
            } else {
                Ok(())
            }
        })
        .validate(&[
            ColumnDef::new("a", ""),
            ColumnDef::new("b", "B"),
            ColumnDef::new("b", "B"),
        ]);

    assert!(!result.is_valid());
    let kinds: Vec<FieldErrorKind> = result.errors().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, [FieldErrorKind::Rule, FieldErrorKind::Duplicate]);
    assert_eq!(result.first_error().map(|e| e.index), Some(0));
}

#[test]
fn test_columns_from_json() {
    let renderers = RendererRegistry::new().register(Badge);
    let columns = columns_from_json(
        json!([
            { "field": "name", "headerName": "Name", "isSortable": true },
            { "field": "tag", "headerName": "Tag", "isVisible": true, "renderer": "badge" },
            { "field": "notes", "headerName": "Notes" },
        ]),
        &renderers,
    )
    .unwrap();

    assert!(columns[0].is_sortable);
    assert!(!columns[0].is_clickable);
    assert_eq!(columns[1].renderer.name(), Some("badge"));
    assert!(!columns[2].renderer.is_custom());
    // Omitted flags decode as false.
    assert!(!columns[2].is_visible);
}

#[test]
fn test_columns_from_json_rejects_bad_shapes() {
    let renderers = RendererRegistry::new();

    let err = columns_from_json(json!({ "field": "a" }), &renderers).unwrap_err();
    assert!(matches!(err, GridError::InvalidColumn { .. }));

    let err = columns_from_json(
        json!([
            { "field": "a", "headerName": "A" },
            { "field": "b" },
        ]),
        &renderers,
    )
    .unwrap_err();
    assert!(matches!(err, GridError::InvalidColumn { index: 1, ref field, .. } if field == "b"));

    let err = columns_from_json(
        json!([{ "field": "a", "headerName": "A", "isBold": "yes" }]),
        &renderers,
    )
    .unwrap_err();
    assert!(matches!(err, GridError::InvalidColumn { index: 0, .. }));
}

#[test]
fn test_unknown_renderer_is_rejected() {
    let err = columns_from_json(
        json!([{ "field": "a", "headerName": "A", "renderer": "stars" }]),
        &RendererRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        GridError::UnknownRenderer { ref renderer, .. } if renderer == "stars"
    ));
}
