use datagrid::column::RendererRegistry;
use datagrid::dispatch::{DataTransfer, EventResult};
use datagrid::store::StoreRead;
use datagrid::{
    ColumnDef, ConfigError, DataGrid, GridConfig, GridError, GridEvent, Row, RowClicked,
    SortDirection,
};
use serde_json::json;

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name").clickable(),
        ColumnDef::new("age", "Age").sortable(),
        ColumnDef::new("city", "City").hidden(),
    ]
}

fn grid() -> DataGrid {
    let mut grid = DataGrid::new(columns(), GridConfig::default()).unwrap();
    grid.set_rows(Row::many_from_json(json!([
        { "name": "Bob", "age": 30, "city": "Oslo" },
        { "name": "Ann", "age": 25, "city": "Lima" },
    ])));
    grid
}

fn names(grid: &DataGrid) -> Vec<String> {
    grid.reader()
        .values_for_field("name")
        .iter()
        .map(|v| v.and_then(|v| v.as_str()).unwrap_or("-").to_string())
        .collect()
}

#[test]
fn test_sort_end_to_end() {
    let mut grid = grid();

    assert_eq!(grid.sort_by_column("age"), EventResult::Consumed);
    assert_eq!(names(&grid), ["Ann", "Bob"]);

    assert_eq!(grid.sort_by_column("age"), EventResult::Consumed);
    assert_eq!(names(&grid), ["Bob", "Ann"]);

    let events = grid.drain_events();
    let directions: Vec<SortDirection> = events
        .iter()
        .map(|e| match e {
            GridEvent::SortRequested(sort) => {
                assert_eq!(sort.field, "age");
                assert_eq!(sort.column.field, "age");
                sort.direction
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(directions, [SortDirection::Asc, SortDirection::Desc]);
    assert!(grid.events().is_empty());
}

#[test]
fn test_sort_on_plain_or_unknown_column_is_ignored() {
    let mut grid = grid();
    assert_eq!(grid.sort_by_column("name"), EventResult::Ignored);
    assert_eq!(grid.sort_by_column("zzz"), EventResult::Ignored);
    assert_eq!(names(&grid), ["Bob", "Ann"]);
    assert!(grid.events().is_empty());
}

#[test]
fn test_set_rows_is_stored_verbatim_after_sort() {
    let mut grid = grid();
    grid.sort_by_column("age");

    grid.set_rows(vec![
        Row::new().set("name", "Zed").set("age", 99),
        Row::new().set("name", "Amy").set("age", 1),
    ]);
    assert_eq!(names(&grid), ["Zed", "Amy"]);
}

#[test]
fn test_row_click_guard() {
    let mut grid = grid();

    assert_eq!(grid.row_clicked(1, "age"), EventResult::Ignored);
    assert_eq!(grid.row_clicked(7, "name"), EventResult::Ignored);
    assert!(grid.events().is_empty());

    assert_eq!(grid.row_clicked(1, "name"), EventResult::Consumed);
    match grid.drain_events().as_slice() {
        [GridEvent::RowClicked(clicked)] => {
            assert_eq!(clicked.index, 1);
            assert_eq!(clicked.row.get_str("name"), Some("Ann"));
            assert_eq!(clicked.column.field, "name");
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn test_click_and_sort_payloads_share_column_key() {
    let mut grid = grid();
    grid.row_clicked(0, "name");
    grid.sort_by_column("age");

    let payloads: Vec<serde_json::Value> = grid
        .drain_events()
        .iter()
        .map(|e| serde_json::to_value(e).unwrap()["payload"].clone())
        .collect();
    assert_eq!(payloads[0]["col"]["field"], "name");
    assert_eq!(payloads[1]["col"]["field"], "age");

    let clicked = RowClicked::from_json(payloads[0].clone()).unwrap();
    assert_eq!(clicked.index, 0);
    assert_eq!(clicked.row.get_str("name"), Some("Bob"));
}

#[test]
fn test_visibility_toggle_reports_column_state() {
    let mut grid = grid();
    let fields = |grid: &DataGrid| -> Vec<String> {
        grid.visible_columns()
            .iter()
            .map(|c| c.field.clone())
            .collect()
    };
    assert_eq!(fields(&grid), ["name", "age"]);

    assert!(grid.toggle_visibility("city", None).is_handled());
    assert_eq!(fields(&grid), ["name", "age", "city"]);
    assert_eq!(grid.toggle_visibility("zzz", None), EventResult::Ignored);

    match grid.drain_events().as_slice() {
        [GridEvent::ColumnStateChanged(state)] => {
            assert_eq!(state.len(), 3);
            assert!(state.iter().all(|c| c.is_visible));
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn test_drag_drop_reports_column_state() {
    let mut grid = grid();
    let mut transfer = DataTransfer::new();

    assert!(grid.drag_start("name", &mut transfer).is_handled());
    assert!(grid.drag_over().is_handled());
    grid.drag_enter("age");
    assert_eq!(grid.drop_column("age", &transfer), EventResult::Consumed);

    match grid.drain_events().as_slice() {
        [GridEvent::ColumnStateChanged(state)] => {
            let order: Vec<(&str, bool)> = state
                .iter()
                .map(|c| (c.field.as_str(), c.is_visible))
                .collect();
            assert_eq!(order, [("age", true), ("name", true), ("city", false)]);
        }
        other => panic!("unexpected events {other:?}"),
    }

    // Unknown header cannot start a drag; drop onto self changes nothing.
    assert_eq!(grid.drag_start("zzz", &mut transfer), EventResult::Ignored);
    assert_eq!(
        grid.drop_column("name", &DataTransfer::with_field("name")),
        EventResult::Ignored
    );
    assert!(grid.events().is_empty());
}

#[test]
fn test_paging_events() {
    let mut grid = DataGrid::new(columns(), GridConfig::default().page_size(10)).unwrap();
    let rows: Vec<Row> = (0..95)
        .map(|i| Row::new().set("name", format!("n{i}")).set("age", i))
        .collect();
    grid.set_rows(rows);

    assert_eq!(grid.pagination().total_pages(), 10);
    assert_eq!(grid.go_to_page(11), EventResult::Ignored);
    assert_eq!(grid.go_to_page(10), EventResult::Consumed);
    assert_eq!(grid.page_window().range(), 90..95);
    assert_eq!(grid.page_rows().len(), 5);
    assert_eq!(grid.next_page(), EventResult::Ignored);
    assert_eq!(grid.previous_page(), EventResult::Consumed);
    assert_eq!(grid.first_page(), EventResult::Consumed);
    assert_eq!(grid.first_page(), EventResult::Ignored);

    assert_eq!(grid.set_page_size(25), EventResult::Consumed);
    assert_eq!(grid.set_page_size(0), EventResult::Ignored);
    assert_eq!(grid.pagination().current_page(), 1);
    assert_eq!(grid.last_page(), EventResult::Consumed);

    assert_eq!(
        grid.drain_events(),
        [
            GridEvent::PageChanged(10),
            GridEvent::PageChanged(9),
            GridEvent::PageChanged(1),
            GridEvent::PageSizeChanged(25),
            GridEvent::PageChanged(4),
        ]
    );
}

#[test]
fn test_fewer_rows_return_to_first_page() {
    let mut grid = DataGrid::new(columns(), GridConfig::default().page_size(1)).unwrap();
    grid.set_rows(vec![Row::new(), Row::new(), Row::new()]);
    grid.last_page();
    grid.drain_events();

    grid.set_rows(vec![Row::new()]);
    assert_eq!(grid.pagination().current_page(), 1);
    assert_eq!(grid.drain_events(), [GridEvent::PageChanged(1)]);
}

#[test]
fn test_out_of_range_configured_page() {
    let config = GridConfig::default().current_page(usize::MAX);
    let mut grid = DataGrid::new(columns(), config).unwrap();
    assert_eq!(grid.pagination().end_item(), 0);
    assert_eq!(grid.next_page(), EventResult::Ignored);
    assert!(grid.render_page().is_empty());

    grid.set_rows(vec![Row::new(), Row::new()]);
    assert_eq!(grid.pagination().current_page(), 1);
    assert_eq!(grid.pagination().end_item(), 2);
    assert_eq!(grid.drain_events(), [GridEvent::PageChanged(1)]);
}

#[test]
fn test_render_page() {
    let config = GridConfig::default().page_size(1).striped(true);
    let mut grid = DataGrid::new(columns(), config).unwrap();
    grid.set_rows(Row::many_from_json(json!([
        { "name": "Bob", "age": 30 },
        { "name": "Ann", "isCollapsible": true },
    ])));
    grid.next_page();

    let page = grid.render_page();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].index, 1);
    assert!(page[0].collapsed);
    assert!(page[0].striped);
    let text: Vec<&str> = page[0].cells.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(text, ["Ann", "Not available"]);
    assert!(page[0].cells[0].clickable);
}

#[test]
fn test_row_collapse_through_grid() {
    let mut grid = grid();
    assert!(grid.toggle_row_collapse(0, "name").is_handled());
    assert!(grid.reader().snapshot().row_collapsed(0));
    assert_eq!(grid.toggle_row_collapse(9, "name"), EventResult::Ignored);

    grid.set_collapsed(true);
    assert!(grid.reader().snapshot().table_state().collapsed);
}

#[test]
fn test_collapsed_row_follows_its_record_through_sort() {
    let mut grid = grid();
    grid.toggle_row_collapse(0, "name");

    grid.sort_by_column("age");
    assert_eq!(names(&grid), ["Ann", "Bob"]);
    let snapshot = grid.reader().snapshot();
    assert!(!snapshot.row_collapsed(0));
    assert!(snapshot.row_collapsed(1));
    assert_eq!(snapshot.active_row().row_index, Some(1));

    grid.sort_by_column("age");
    assert_eq!(names(&grid), ["Bob", "Ann"]);
    let snapshot = grid.reader().snapshot();
    assert!(snapshot.row_collapsed(0));
    assert!(!snapshot.row_collapsed(1));
}

#[test]
fn test_search_and_filter() {
    let mut grid = grid();

    assert_eq!(grid.search("   "), EventResult::Ignored);
    assert_eq!(grid.search("ann"), EventResult::Consumed);
    assert_eq!(grid.drain_events(), [GridEvent::Search("ann".into())]);

    assert_eq!(grid.filter("ann"), [1]);
    assert_eq!(grid.filter(""), [0, 1]);
    // Hidden columns are not searched.
    assert!(grid.filter("oslo").is_empty());
}

#[test]
fn test_invalid_configuration_is_fatal() {
    let err = DataGrid::new(columns(), GridConfig::default().page_size(0)).unwrap_err();
    assert!(matches!(err, GridError::InvalidConfig(ConfigError::ZeroPageSize)));

    let err = DataGrid::new(
        vec![ColumnDef::new("a", "A"), ColumnDef::new("a", "A")],
        GridConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GridError::DuplicateField { .. }));
}

#[test]
fn test_from_json() {
    let grid = DataGrid::from_json(
        json!([
            { "field": "title", "headerName": "Title", "isVisible": true, "isSortable": true },
            { "field": "notes", "headerName": "Notes" },
        ]),
        &RendererRegistry::new(),
        GridConfig::from_json_str(r#"{ "bordered": true, "search": { "placeholder": "Find" } }"#)
            .unwrap(),
    )
    .unwrap();

    assert!(grid.config().bordered);
    assert_eq!(grid.config().search.placeholder, "Find");
    assert_eq!(grid.visible_columns().len(), 1);
}

#[test]
fn test_table_ids_are_unique() {
    let a = grid();
    let b = grid();
    assert_ne!(a.id(), b.id());
    assert!(a.id().cell_key("name", 0).ends_with("-name-0"));
}
