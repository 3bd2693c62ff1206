use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use datagrid::cell::CellFormat;
use datagrid::store::{ActiveRow, RowStore, StoreRead, TableState, wakeup_channel};
use datagrid::{ColumnDef, Row};
use serde_json::{Value, json};

fn people() -> Vec<Row> {
    Row::many_from_json(json!([
        { "name": "Bob", "age": 30 },
        { "name": "Ann" },
    ]))
}

#[test]
fn test_store_starts_empty() {
    let store = RowStore::new();
    let snapshot = store.snapshot();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.table_state(), TableState::default());
    assert!(!snapshot.active_row().is_active());
    assert!(!store.is_dirty());
}

#[test]
fn test_replace_rows_is_idempotent() {
    let store = RowStore::new();
    store.set_table_state(TableState { collapsed: true });
    store.set_active_row(ActiveRow::new("name", true, 1));
    let before = store.snapshot();

    store.replace_rows(people());
    store.replace_rows(people());

    let after = store.snapshot();
    assert_eq!(after.rows(), people().as_slice());
    assert_eq!(after.table_state(), before.table_state());
    assert_eq!(after.active_row(), before.active_row());
}

#[test]
fn test_every_write_publishes_new_snapshot() {
    let store = RowStore::new();
    let first = store.snapshot();

    store.replace_rows(people());
    let second = store.snapshot();
    assert!(!Arc::ptr_eq(&first, &second));

    store.set_active_row(ActiveRow::new("name", false, 0));
    let third = store.snapshot();
    assert!(!Arc::ptr_eq(&second, &third));

    // The older snapshot is untouched.
    assert!(first.is_empty());
    assert!(!second.active_row().is_active());
    assert_eq!(third.rows(), second.rows());
}

#[test]
fn test_set_active_row_keeps_rows_and_table_state() {
    let store = RowStore::new();
    store.replace_rows(people());
    store.set_table_state(TableState { collapsed: true });

    store.set_active_row(ActiveRow::new("age", false, 0));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.table_state().collapsed);
    assert_eq!(snapshot.active_row().row_index, Some(0));
}

#[test]
fn test_reorder_rows_moves_active_row_with_its_record() {
    let store = RowStore::new();
    store.replace_rows(people());
    store.set_active_row(ActiveRow::new("name", true, 0));

    let reversed: Vec<Row> = people().into_iter().rev().collect();
    store.reorder_rows(reversed, &[1, 0]);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.value_at("name", 1), Some(&json!("Bob")));
    assert_eq!(snapshot.active_row().row_index, Some(1));
    assert_eq!(snapshot.active_row().collapsed, Some(true));
}

#[test]
fn test_value_at_never_panics() {
    let store = RowStore::new();
    store.replace_rows(people());

    assert_eq!(store.value_at("name", 0), Some(json!("Bob")));
    assert_eq!(store.value_at("age", 1), None);
    assert_eq!(store.value_at("name", 2), None);
    assert_eq!(store.value_at("name", usize::MAX), None);
}

#[test]
fn test_non_array_json_is_empty() {
    let store = RowStore::new();
    store.replace_rows(people());
    store.replace_rows_json(json!({ "name": "Bob" }));
    assert!(store.is_empty());
}

#[test]
fn test_values_for_field_is_restartable() {
    let store = RowStore::new();
    store.replace_rows(people());

    let values = store.values_for_field("age");
    assert_eq!(values.len(), 2);

    let first: Vec<Option<&Value>> = values.iter().collect();
    let second: Vec<Option<&Value>> = values.iter().collect();
    assert_eq!(first, vec![Some(&json!(30)), None]);
    assert_eq!(first, second);
}

#[test]
fn test_values_for_field_follows_current_snapshot() {
    let store = RowStore::new();
    store.replace_rows(people());
    let old = store.values_for_field("name");

    store.replace_rows(vec![Row::new().set("name", "Cid")]);
    let new = store.values_for_field("name");

    assert_eq!(old.len(), 2);
    assert_eq!(new.iter().collect::<Vec<_>>(), vec![Some(&json!("Cid"))]);
}

#[test]
fn test_reader_sees_writer_updates() {
    let store = RowStore::new();
    let reader = store.reader();

    store.replace_rows(people());

    assert_eq!(reader.len(), 2);
    assert!(Arc::ptr_eq(&reader.snapshot(), &store.snapshot()));
}

#[test]
fn test_subscribers_receive_each_write_once() {
    let store = RowStore::new();
    let reader = store.reader();
    let calls = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&calls);
    let id = reader.subscribe(move |snapshot| {
        assert!(snapshot.len() <= 2);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    store.replace_rows(people());
    store.set_table_state(TableState { collapsed: true });
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert!(reader.unsubscribe(id));
    assert!(!reader.unsubscribe(id));

    store.replace_rows(Vec::new());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dirty_flag() {
    let store = RowStore::new();
    let reader = store.reader();

    store.replace_rows(people());
    assert!(reader.is_dirty());

    reader.clear_dirty();
    assert!(!store.is_dirty());
}

#[test]
fn test_column_text_uses_placeholder() {
    let store = RowStore::new();
    store.replace_rows(people());

    let text = store.column_text(&ColumnDef::new("age", "Age"), &CellFormat::default());
    assert_eq!(text, vec!["30".to_string(), "Not available".to_string()]);
}

#[test]
fn test_row_collapse_sources() {
    let store = RowStore::new();
    store.replace_rows(Row::many_from_json(json!([
        { "name": "a", "isCollapsible": true },
        { "name": "b" },
    ])));

    let snapshot = store.snapshot();
    assert!(snapshot.row_collapsed(0));
    assert!(!snapshot.row_collapsed(1));

    store.set_active_row(ActiveRow::new("name", false, 0));
    assert!(!store.snapshot().row_collapsed(0));

    store.set_table_state(TableState { collapsed: true });
    assert!(store.snapshot().row_collapsed(1));
}

#[tokio::test]
async fn test_writes_wake_the_render_loop() {
    let store = RowStore::new();
    let (tx, mut rx) = wakeup_channel();
    store.install_wakeup(tx);

    store.replace_rows(people());
    store.set_table_state(TableState { collapsed: true });
    store.set_active_row(ActiveRow::none());

    assert_eq!(rx.recv().await, Some(3));
    assert_eq!(rx.pending(), 0);

    store.uninstall_wakeup();
    assert!(!store.has_wakeup());
    store.replace_rows(Vec::new());
    assert_eq!(rx.pending(), 0);
    assert_eq!(rx.recv().await, None);
}

#[test]
fn test_closed_receiver_drops_wakeup_sender() {
    let store = RowStore::new();
    let (tx, rx) = wakeup_channel();
    store.install_wakeup(tx);
    assert!(store.has_wakeup());

    drop(rx);
    store.replace_rows(people());
    assert!(!store.has_wakeup());
}
