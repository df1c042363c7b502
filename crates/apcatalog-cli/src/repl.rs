#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
//! Interactive browser (REPL) over the AP Catalog.

use anyhow::{bail, Context, Result};
use apcatalog_core::{
    export_file_name, filter_options, write_csv, Action, Browser, ColumnPreferences,
    ColumnSettingsDraft, ExportKind, ReplSettings, ViewMode,
};
use chrono::Utc;
use colored::Colorize;
use indexmap::IndexSet;
use instant::Instant;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Editor, Helper, Highlighter, Hinter, Validator};
use std::path::PathBuf;

use crate::query::{check_page, parse_assignment, resolve_column, split_values};
use crate::repl_output::{
    print_columns, print_compare_view, print_help, print_table_view, print_values, OutputFormat,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// REPL configuration
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub timing: bool,
    pub format: OutputFormat,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            timing: false,
            format: OutputFormat::Table,
        }
    }
}

impl ReplConfig {
    /// Builds the REPL configuration from the `[repl]` section.
    pub fn from_settings(settings: &ReplSettings) -> Self {
        Self {
            timing: settings.timing,
            format: OutputFormat::parse(&settings.format).unwrap_or(OutputFormat::Table),
        }
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct ReplHelper;

/// Run the interactive browser
pub fn run(mut browser: Browser, settings: &ReplSettings) -> Result<()> {
    println!(
        "\n{}",
        format!("AP Catalog v{VERSION} - Interactive Browser").bold().cyan()
    );
    println!(
        "Dataset: {} access points",
        browser.store().len().to_string().green()
    );
    println!(
        "Type {} for commands, {} to exit, or any text to search\n",
        ".help".yellow(),
        ".quit".yellow()
    );

    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    let history_path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".apcatalog_history");
    let _ = rl.load_history(&history_path);

    let mut config = ReplConfig::from_settings(settings);
    render_current(&browser, &config);

    loop {
        let prompt = match browser.state().view {
            ViewMode::Table => "apcatalog> ".bold().blue().to_string(),
            ViewMode::Compare => "apcatalog[compare]> ".bold().blue().to_string(),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let start = Instant::now();
                let result = if line.starts_with('.') {
                    handle_command(&mut browser, line, &mut config)
                } else {
                    handle_command(&mut browser, &format!(".search {line}"), &mut config)
                };
                match result {
                    CommandResult::Continue => (),
                    CommandResult::Redraw => render_current(&browser, &config),
                    CommandResult::Quit => break,
                    CommandResult::Error(e) => {
                        println!("{} {}\n", "Error:".red().bold(), e);
                    }
                }
                if config.timing {
                    println!(
                        "{}\n",
                        format!("({:.2}ms)", start.elapsed().as_secs_f64() * 1000.0).dimmed()
                    );
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use .quit to exit");
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("{} {:?}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    println!("Goodbye!");
    Ok(())
}

/// Prints whichever view is active, plus any pending notice.
fn render_current(browser: &Browser, config: &ReplConfig) {
    let state = browser.state();
    match state.view {
        ViewMode::Table => print_table_view(
            &browser.table_view(),
            state,
            browser.store().len(),
            config.format,
        ),
        ViewMode::Compare => print_compare_view(&browser.compare_view(), config.format),
    }
    println!();
}

#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    Continue,
    Redraw,
    Quit,
    Error(String),
}

fn handle_command(browser: &mut Browser, line: &str, config: &mut ReplConfig) -> CommandResult {
    let (cmd, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(cmd, rest)| (cmd, rest.trim()));
    match execute(browser, &cmd.to_lowercase(), rest, config) {
        Ok(result) => result,
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn first_arg(rest: &str) -> (&str, &str) {
    rest.split_once(char::is_whitespace)
        .map_or((rest, ""), |(head, tail)| (head, tail.trim()))
}

#[allow(clippy::too_many_lines)]
fn execute(
    browser: &mut Browser,
    cmd: &str,
    rest: &str,
    config: &mut ReplConfig,
) -> Result<CommandResult> {
    let result = match cmd {
        ".quit" | ".exit" | ".q" => CommandResult::Quit,

        ".help" | ".h" => {
            print_help();
            CommandResult::Continue
        }

        ".search" => {
            browser.dispatch(Action::SetGlobalSearch(rest.to_string()))?;
            CommandResult::Redraw
        }

        ".filter" => {
            let (name, values) = first_arg(rest);
            let selected = split_values(values);
            if name.is_empty() || selected.is_empty() {
                bail!("Usage: .filter <column> value1,value2");
            }
            let key = resolve_column(browser.catalog(), name)?;
            browser.dispatch(Action::SetColumnFilter {
                key,
                search: String::new(),
                selected,
            })?;
            CommandResult::Redraw
        }

        ".contains" => {
            let (name, text) = match first_arg(rest) {
                (name, "") if name.contains('=') => parse_assignment(name)?,
                pair => pair,
            };
            if name.is_empty() || text.is_empty() {
                bail!("Usage: .contains <column> <text>");
            }
            let key = resolve_column(browser.catalog(), name)?;
            browser.dispatch(Action::SetColumnFilter {
                key,
                search: text.to_string(),
                selected: std::collections::BTreeSet::new(),
            })?;
            CommandResult::Redraw
        }

        ".unfilter" => {
            if rest.is_empty() {
                bail!("Usage: .unfilter <column>");
            }
            let key = resolve_column(browser.catalog(), rest)?;
            browser.dispatch(Action::ClearColumnFilter(key))?;
            CommandResult::Redraw
        }

        ".clear-filters" => {
            browser.dispatch(Action::ClearAllFilters)?;
            CommandResult::Redraw
        }

        ".sort" => {
            if rest.is_empty() {
                bail!("Usage: .sort <column>");
            }
            let key = resolve_column(browser.catalog(), rest)?;
            browser.dispatch(Action::SortBy(key))?;
            CommandResult::Redraw
        }

        ".page" => {
            let page: usize = rest.parse().context("Usage: .page <n>")?;
            check_page(page, browser.total_pages())?;
            browser.dispatch(Action::GotoPage(page))?;
            CommandResult::Redraw
        }

        ".next" => {
            let window = browser.table_view().window;
            if !window.has_next() {
                bail!("Already on the last page");
            }
            browser.dispatch(Action::NextPage {
                total_pages: window.total_pages,
            })?;
            CommandResult::Redraw
        }

        ".prev" => {
            if !browser.table_view().window.has_prev() {
                bail!("Already on the first page");
            }
            browser.dispatch(Action::PrevPage)?;
            CommandResult::Redraw
        }

        ".first" => {
            browser.dispatch(Action::FirstPage)?;
            CommandResult::Redraw
        }

        ".last" => {
            let total_pages = browser.total_pages();
            browser.dispatch(Action::LastPage { total_pages })?;
            CommandResult::Redraw
        }

        ".per-page" => {
            let size: usize = rest.parse().context("Usage: .per-page <n>")?;
            browser.dispatch(Action::SetPerPage(size))?;
            CommandResult::Redraw
        }

        ".select" => {
            if rest.is_empty() {
                browser.dispatch(Action::EnterSelectionMode)?;
                return Ok(CommandResult::Redraw);
            }
            let ids: IndexSet<&str> = rest.split_whitespace().collect();
            for id in &ids {
                if browser.store().get(id).is_none() {
                    return Err(apcatalog_core::Error::RecordNotFound((*id).to_string()).into());
                }
            }
            browser.dispatch(Action::EnterSelectionMode)?;
            for id in ids {
                browser.dispatch(Action::ToggleSelection(id.to_string()))?;
                if let Some(notice) = browser.state().notice() {
                    println!("{}", notice.yellow());
                }
            }
            CommandResult::Redraw
        }

        ".deselect-all" => {
            browser.dispatch(Action::DeselectAll)?;
            CommandResult::Redraw
        }

        ".compare" => {
            browser.dispatch(Action::ShowCompare)?;
            CommandResult::Redraw
        }

        ".table" => {
            browser.dispatch(Action::ShowTable)?;
            CommandResult::Redraw
        }

        ".remove" => {
            if rest.is_empty() {
                bail!("Usage: .remove <id>");
            }
            browser.dispatch(Action::RemoveFromComparison(rest.to_string()))?;
            CommandResult::Redraw
        }

        ".columns" => {
            let mut draft =
                ColumnSettingsDraft::new(&browser.state().preferences, browser.catalog());
            draft.set_search(rest);
            print_columns(&draft.listed(), |key| draft.is_visible(key));
            CommandResult::Continue
        }

        ".show" | ".hide" => {
            if rest.is_empty() {
                bail!("Usage: {cmd} <column>|all");
            }
            let visible = cmd == ".show";
            if rest.eq_ignore_ascii_case("all") {
                edit_columns(browser, |draft| {
                    if visible {
                        draft.select_all();
                    } else {
                        draft.deselect_all();
                    }
                    Ok(())
                })?;
            } else {
                let key = resolve_column(browser.catalog(), rest)?;
                edit_columns(browser, |draft| draft.set_visible(&key, visible))?;
            }
            CommandResult::Redraw
        }

        ".move" => {
            let (name, direction) = first_arg(rest);
            if name.is_empty() {
                bail!("Usage: .move <column> up|down");
            }
            let key = resolve_column(browser.catalog(), name)?;
            match direction.to_lowercase().as_str() {
                "up" => edit_columns(browser, |draft| draft.move_up(&key).map(|_| ()))?,
                "down" => edit_columns(browser, |draft| draft.move_down(&key).map(|_| ()))?,
                _ => bail!("Usage: .move <column> up|down"),
            }
            CommandResult::Redraw
        }

        ".reset-columns" => {
            let defaults = ColumnPreferences::defaults(browser.catalog());
            browser.dispatch(Action::SaveColumns {
                visible: defaults.visible_columns,
                order: defaults.column_order,
            })?;
            CommandResult::Redraw
        }

        ".values" => {
            let (name, query) = first_arg(rest);
            if name.is_empty() {
                bail!("Usage: .values <column> [text]");
            }
            let key = resolve_column(browser.catalog(), name)?;
            let options = browser.filter_options(&key)?;
            let narrowed = filter_options(&options, query);
            let selected = browser
                .state()
                .column_filters
                .get(&key)
                .map(|f| f.selected_values.clone())
                .unwrap_or_default();
            print_values(&narrowed, |value| selected.contains(value));
            println!();
            CommandResult::Continue
        }

        ".export" => {
            let (path, rows) = export_current(browser, rest)?;
            println!(
                "Exported {} rows to {}\n",
                rows.to_string().green(),
                path.display()
            );
            CommandResult::Continue
        }

        ".timing" => {
            if rest.is_empty() {
                println!("Timing is {}", if config.timing { "ON" } else { "OFF" });
            } else {
                match rest.to_lowercase().as_str() {
                    "on" | "true" | "1" => {
                        config.timing = true;
                        println!("Timing ON");
                    }
                    "off" | "false" | "0" => {
                        config.timing = false;
                        println!("Timing OFF");
                    }
                    _ => bail!("Use: .timing on|off"),
                }
            }
            println!();
            CommandResult::Continue
        }

        ".format" => {
            if rest.is_empty() {
                println!("Format is {:?}", config.format);
            } else {
                match OutputFormat::parse(rest) {
                    Some(format) => {
                        config.format = format;
                        println!("Format: {}", rest.to_lowercase());
                    }
                    None => bail!("Use: .format table|json"),
                }
            }
            println!();
            CommandResult::Continue
        }

        other => bail!("Unknown command '{other}'. Type .help for commands"),
    };
    Ok(result)
}

/// Writes the active view as CSV to `target`, or to a timestamped file when
/// `target` is empty. Returns the path and the number of records written.
fn export_current(browser: &Browser, target: &str) -> Result<(PathBuf, usize)> {
    let (kind, csv, rows) = match browser.state().view {
        ViewMode::Table => (
            ExportKind::Table,
            browser.export_table_csv()?,
            browser.matching_records().len(),
        ),
        ViewMode::Compare => (
            ExportKind::Comparison,
            browser.export_compare_csv()?,
            browser.compare_view().records.len(),
        ),
    };
    let path = if target.is_empty() {
        PathBuf::from(export_file_name(kind, Utc::now()))
    } else {
        PathBuf::from(target)
    };
    write_csv(&path, &csv)?;
    Ok((path, rows))
}

/// Edits column preferences through a settings draft and saves the result.
fn edit_columns<F>(browser: &mut Browser, edit: F) -> Result<()>
where
    F: FnOnce(&mut ColumnSettingsDraft<'_>) -> apcatalog_core::Result<()>,
{
    let (visible, order) = {
        let mut draft = ColumnSettingsDraft::new(&browser.state().preferences, browser.catalog());
        edit(&mut draft)?;
        draft.into_parts()
    };
    browser.dispatch(Action::SaveColumns { visible, order })?;
    Ok(())
}
