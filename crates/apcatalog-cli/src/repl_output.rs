//! Terminal rendering of the table and comparison views.

use apcatalog_core::{
    display_cell, format_value, ColumnDescriptor, CompareView, PageWindow, Record, SessionState,
    SortDirection, TableView, MAX_SELECTION,
};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use indexmap::IndexMap;
use serde_json::Value;

/// Output format for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parses `table` or `json`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(column: &ColumnDescriptor, state: &SessionState) -> Cell {
    let arrow = match &state.sort {
        Some(sort) if sort.key == column.key => match sort.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    };
    let filtered = state
        .column_filters
        .get(&column.key)
        .is_some_and(|f| f.is_active());
    let mut cell = Cell::new(format!(
        "{}{}{}",
        column.label,
        arrow,
        if filtered { " *" } else { "" }
    ))
    .fg(Color::Cyan);
    if column.pinned {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// Renders the current page as a table.
pub fn render_table(view: &TableView<'_>, state: &SessionState) -> String {
    let mut table = new_table();

    let mut header = Vec::with_capacity(view.columns.len() + 2);
    if view.selection_mode {
        header.push(Cell::new("Sel").fg(Color::Cyan));
    }
    header.push(Cell::new("ID").fg(Color::DarkGrey));
    header.extend(view.columns.iter().map(|c| header_cell(c, state)));
    table.set_header(header);

    for record in &view.rows {
        let mut cells = Vec::with_capacity(view.columns.len() + 2);
        if view.selection_mode {
            let mark = if state.selection.contains(record.id()) {
                "[x]"
            } else {
                "[ ]"
            };
            cells.push(Cell::new(mark));
        }
        cells.push(Cell::new(record.id()).fg(Color::DarkGrey));
        cells.extend(
            view.columns
                .iter()
                .map(|c| Cell::new(display_cell(record.get(&c.key)))),
        );
        table.add_row(cells);
    }

    table.to_string()
}

/// "Showing x to y of z results" line.
pub fn page_summary(window: &PageWindow, store_len: usize, filtered: bool) -> String {
    let mut line = format!(
        "Showing {} to {} of {} results",
        window.start, window.end, window.total
    );
    if filtered {
        line.push_str(&format!(" (filtered from {store_len})"));
    }
    if window.total_pages > 0 {
        line.push_str(&format!(
            " | Page {} of {}",
            window.page, window.total_pages
        ));
    }
    line
}

fn row_object(record: &Record, columns: &[&ColumnDescriptor]) -> IndexMap<String, Value> {
    let mut row = IndexMap::with_capacity(columns.len() + 1);
    row.insert("id".to_string(), Value::String(record.id().to_string()));
    for column in columns {
        row.insert(
            column.key.clone(),
            record.get(&column.key).cloned().unwrap_or(Value::Null),
        );
    }
    row
}

/// JSON document for a table page.
pub fn table_json(view: &TableView<'_>) -> Value {
    let rows: Vec<IndexMap<String, Value>> = view
        .rows
        .iter()
        .map(|r| row_object(r, &view.columns))
        .collect();
    serde_json::json!({
        "page": view.window.page,
        "per_page": view.window.per_page,
        "total_pages": view.window.total_pages,
        "total": view.window.total,
        "rows": rows,
    })
}

/// Prints a table page in `format`.
pub fn print_table_view(
    view: &TableView<'_>,
    state: &SessionState,
    store_len: usize,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&table_json(view)),
        OutputFormat::Table => {
            if view.rows.is_empty() {
                println!("{}", "No results.".dimmed());
            } else {
                println!("{}", render_table(view, state));
            }
            println!(
                "{}",
                page_summary(&view.window, store_len, view.has_active_filters).dimmed()
            );
            if !state.selection.is_empty() {
                println!(
                    "{}",
                    format!(
                        "{} of {MAX_SELECTION} selected for comparison",
                        state.selection.len()
                    )
                    .green()
                );
            }
        }
    }
}

/// Renders the comparison: one row per catalog column, one column per AP.
pub fn render_compare(view: &CompareView<'_>) -> String {
    let mut table = new_table();

    let mut header = vec![Cell::new("Feature").fg(Color::Cyan)];
    header.extend(view.records.iter().map(|r| {
        let title = format!(
            "{}\n{}",
            r.text("model").unwrap_or_default(),
            r.text("vendor").unwrap_or_default()
        );
        Cell::new(title)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold)
    }));
    table.set_header(header);

    for column in &view.columns {
        let mut cells = vec![Cell::new(&column.label).add_attribute(Attribute::Bold)];
        cells.extend(
            view.records
                .iter()
                .map(|r| Cell::new(format_value(r.get(&column.key)))),
        );
        table.add_row(cells);
    }

    table.to_string()
}

/// JSON document for the comparison view.
pub fn compare_json(view: &CompareView<'_>) -> Value {
    let records: Vec<IndexMap<String, Value>> = view
        .records
        .iter()
        .map(|r| row_object(r, &view.columns))
        .collect();
    serde_json::json!(records)
}

/// Prints the comparison view in `format`.
pub fn print_compare_view(view: &CompareView<'_>, format: OutputFormat) {
    if view.is_empty() {
        println!("{}", "No APs selected for comparison".bold());
        println!("Select up to {MAX_SELECTION} APs in the table to compare them.");
        return;
    }
    match format {
        OutputFormat::Json => print_json(&compare_json(view)),
        OutputFormat::Table => {
            println!(
                "{}",
                format!(
                    "Compare Access Points ({}/{MAX_SELECTION})",
                    view.records.len()
                )
                .bold()
            );
            println!("{}", render_compare(view));
        }
    }
}

/// Prints the column list with visibility flags, in display order.
pub fn print_columns(columns: &[&ColumnDescriptor], is_visible: impl Fn(&str) -> bool) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Key").fg(Color::Cyan),
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("Visible").fg(Color::Cyan),
        Cell::new("Pinned").fg(Color::Cyan),
        Cell::new("Filterable").fg(Color::Cyan),
    ]);
    for column in columns {
        let flag = |on: bool| if on { "yes" } else { "-" };
        table.add_row(vec![
            Cell::new(&column.key),
            Cell::new(&column.label),
            Cell::new(flag(is_visible(&column.key))),
            Cell::new(flag(column.pinned)),
            Cell::new(flag(column.filterable)),
        ]);
    }
    println!("{table}");
}

/// Prints filter options, marking those currently selected.
pub fn print_values(options: &[&str], selected: impl Fn(&str) -> bool) {
    if options.is_empty() {
        println!("{}", "No values.".dimmed());
        return;
    }
    for option in options {
        if selected(option) {
            println!("  {} {}", "[x]".green(), option);
        } else {
            println!("  [ ] {option}");
        }
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
    }
}

/// Prints REPL help.
pub fn print_help() {
    println!("\n{}", "AP Catalog Browser Commands".bold().underline());
    println!();
    println!("  {}                   Show this help", ".help".yellow());
    println!("  {}                   Exit the browser", ".quit".yellow());
    println!();
    println!("{}", "Search & Filters:".bold().underline());
    println!();
    println!("  {}          Global search (empty clears)", ".search [text]".yellow());
    println!("  {}  Keep only these values (\"a,b\" quotes, \"\" = empty)", ".filter <col> v1,v2".yellow());
    println!("  {}   Substring filter on a column", ".contains <col> text".yellow());
    println!("  {}        Remove a column filter", ".unfilter <col>".yellow());
    println!("  {}          Clear search and all filters", ".clear-filters".yellow());
    println!("  {}    List filter options", ".values <col> [text]".yellow());
    println!();
    println!("{}", "Sorting & Paging:".bold().underline());
    println!();
    println!("  {}             Sort (again to flip direction)", ".sort <col>".yellow());
    println!("  {}  Navigate pages", ".first .prev .next .last".yellow());
    println!("  {}                Go to page N", ".page <n>".yellow());
    println!("  {}            Rows per page (10, 25, 50, 100)", ".per-page <n>".yellow());
    println!();
    println!("{}", "Comparison:".bold().underline());
    println!();
    println!("  {}            Toggle APs for comparison", ".select <id>...".yellow());
    println!("  {}           Clear selection", ".deselect-all".yellow());
    println!("  {}                Show comparison view", ".compare".yellow());
    println!("  {}             Remove an AP from comparison", ".remove <id>".yellow());
    println!("  {}                  Back to table view", ".table".yellow());
    println!();
    println!("{}", "Columns:".bold().underline());
    println!();
    println!("  {}          List columns", ".columns [text]".yellow());
    println!("  {}    Show or hide a column, or all", ".show|.hide <col>|all".yellow());
    println!("  {}        Move a column", ".move <col> up|down".yellow());
    println!("  {}          Restore default columns", ".reset-columns".yellow());
    println!();
    println!("{}", "Output:".bold().underline());
    println!();
    println!("  {}         Export current view to CSV", ".export [file]".yellow());
    println!("  {}         Toggle timing display", ".timing on|off".yellow());
    println!("  {}     Set output format", ".format table|json".yellow());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use apcatalog_core::{Action, Browser, ColumnCatalog, MemoryStore, RecordStore};

    fn browser() -> Browser {
        let store = RecordStore::from_json_str(
            r#"[
                {"id": "a", "vendor": "Cisco", "model": "CW9176I", "uwb": true},
                {"id": "b", "vendor": "Aruba", "model": "AP-735", "uwb": null}
            ]"#,
        )
        .unwrap();
        Browser::new(
            store,
            ColumnCatalog::access_points(),
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("csv"), None);
    }

    #[test]
    fn test_page_summary() {
        let window = PageWindow::new(1, 25, 2);
        assert_eq!(
            page_summary(&window, 10, true),
            "Showing 1 to 2 of 2 results (filtered from 10) | Page 1 of 1"
        );
        assert_eq!(
            page_summary(&PageWindow::new(1, 25, 0), 0, false),
            "Showing 0 to 0 of 0 results"
        );
    }

    #[test]
    fn test_render_table_shows_sort_arrow_and_selection() {
        // Arrange
        let mut browser = browser();
        browser.dispatch(Action::SortBy("vendor".into())).unwrap();
        browser.dispatch(Action::EnterSelectionMode).unwrap();
        browser.dispatch(Action::ToggleSelection("a".into())).unwrap();

        // Act
        let text = render_table(&browser.table_view(), browser.state());

        // Assert
        assert!(text.contains("Vendor ▲"));
        assert!(text.contains("[x]"));
        assert!(text.contains("[ ]"));
        assert!(text.contains("—"));
    }

    #[test]
    fn test_table_json_keeps_column_order() {
        // Arrange
        let browser = browser();

        // Act
        let json = table_json(&browser.table_view());

        // Assert
        assert_eq!(json["total"], 2);
        let first = json["rows"][0].as_object().unwrap();
        assert_eq!(first["id"], "a");
        assert!(first["gnss"].is_null());
    }

    #[test]
    fn test_render_compare_formats_booleans() {
        // Arrange
        let mut browser = browser();
        browser.dispatch(Action::ToggleSelection("b".into())).unwrap();
        browser.dispatch(Action::ToggleSelection("a".into())).unwrap();

        // Act
        let text = render_compare(&browser.compare_view());

        // Assert
        assert!(text.contains("Feature"));
        assert!(text.contains("Yes"));
        assert!(text.contains("Public Price (EUR)"));
        assert!(text.find("AP-735").unwrap() < text.find("CW9176I").unwrap());
    }

    #[test]
    fn test_print_functions_do_not_panic_on_empty() {
        let browser = browser();
        print_compare_view(&browser.compare_view(), OutputFormat::Table);
        print_values(&[], |_| false);
        print_help();
    }
}
