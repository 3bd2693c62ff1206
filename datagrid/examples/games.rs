//! Game library demo.
//!
//! Loads a small game collection, drives the grid the way a UI would
//! (sort, page, click, drag a column, search) and prints each rendered page
//! from a render loop woken by the store.
//!
//! Run with `cargo run -p datagrid --example games`. Logs go to `games.log`.

use std::fs::File;

use datagrid::cell::{CellContext, CellView};
use datagrid::column::{CustomCell, RendererRegistry};
use datagrid::dispatch::DataTransfer;
use datagrid::store::{StoreRead, StoreReader, WakeupReceiver, wakeup_channel};
use datagrid::{DataGrid, GridConfig, GridEvent};
use log::{LevelFilter, info};
use serde_json::Value;
use simplelog::{Config, WriteLogger};

const GAMES: &str = include_str!("data/games.json");

// =============================================================================
// Custom cells
// =============================================================================

#[derive(Debug)]
struct Stars;

impl CustomCell for Stars {
    fn name(&self) -> &str {
        "stars"
    }

    fn render(&self, cx: &CellContext<'_>) -> CellView {
        match cx.value("rating").and_then(Value::as_u64) {
            Some(rating) => CellView::text("*".repeat(rating.min(5) as usize)),
            None => CellView::text("unrated"),
        }
    }
}

// =============================================================================
// Render loop
// =============================================================================

async fn render_loop(reader: StoreReader, mut wakeups: WakeupReceiver) {
    let mut renders = 0;
    while let Some(writes) = wakeups.recv().await {
        if !reader.is_dirty() {
            continue;
        }
        reader.clear_dirty();
        renders += 1;
        info!(
            "Render #{} ({} rows, {} writes)",
            renders,
            reader.len(),
            writes
        );
    }
    println!("render loop finished after {renders} renders");
}

fn print_page(grid: &DataGrid) {
    let headers: Vec<&str> = grid
        .visible_columns()
        .iter()
        .map(|c| c.header_name.as_str())
        .collect();
    println!("{}", headers.join(" | "));

    for row in grid.render_page() {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        let marker = if row.collapsed { "+" } else { " " };
        println!("{marker} {}", cells.join(" | "));
    }

    let pagination = grid.pagination();
    println!(
        "items {}-{} of {} (page {}/{})\n",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total_items(),
        pagination.current_page(),
        pagination.total_pages()
    );
}

fn print_events(grid: &mut DataGrid) {
    for event in grid.drain_events() {
        match event {
            GridEvent::RowClicked(click) => println!(
                "-> clicked {:?} in row {}",
                click.row.get_str(&click.column.field),
                click.index
            ),
            GridEvent::SortRequested(sort) => {
                println!("-> sort {} {}", sort.field, sort.direction)
            }
            GridEvent::ColumnStateChanged(columns) => {
                let fields: Vec<&str> = columns
                    .iter()
                    .filter(|c| c.is_visible)
                    .map(|c| c.field.as_str())
                    .collect();
                println!("-> columns {}", fields.join(", "))
            }
            GridEvent::PageChanged(page) => println!("-> page {page}"),
            GridEvent::PageSizeChanged(size) => println!("-> page size {size}"),
            GridEvent::Search(term) => println!("-> search '{term}'"),
        }
    }
}

// =============================================================================
// Main
// =============================================================================

fn build_grid() -> datagrid::Result<DataGrid> {
    let mut document: Value = serde_json::from_str(GAMES)?;
    let renderers = RendererRegistry::new().register(Stars);
    let config = GridConfig::new()
        .striped(true)
        .page_size(5)
        .page_size_options([5, 10, 20])
        .ellipsis_width(14)
        .search_placeholder("Find a game...");

    let mut grid = DataGrid::from_json(document["columns"].take(), &renderers, config)?;
    grid.set_rows_json(document["rows"].take());
    Ok(grid)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize file logging
    if let Ok(log_file) = File::create("games.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let mut grid = match build_grid() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let (tx, rx) = wakeup_channel();
    grid.install_wakeup(tx);
    let renderer = tokio::spawn(render_loop(grid.reader(), rx));

    println!("table {}", grid.id());
    print_page(&grid);

    grid.sort_by_column("releaseDate");
    grid.sort_by_column("releaseDate");
    print_events(&mut grid);
    print_page(&grid);

    grid.next_page();
    grid.row_clicked(0, "title");
    grid.row_clicked(5, "title");
    grid.row_clicked(5, "status");
    print_events(&mut grid);
    print_page(&grid);

    let mut transfer = DataTransfer::new();
    grid.drag_start("status", &mut transfer);
    grid.drag_over();
    grid.drag_enter("title");
    grid.drop_column("title", &transfer);
    grid.toggle_visibility("notes", None);
    grid.set_page_size(10);
    print_events(&mut grid);
    print_page(&grid);

    grid.search("hollow");
    print_events(&mut grid);
    for index in grid.filter("hollow") {
        println!("match: {:?}", grid.value_at("title", index));
    }

    // Removing the sender closes the channel and ends the render loop.
    grid.uninstall_wakeup();
    let _ = renderer.await;
}
