#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
//! `AP Catalog` CLI - browse, filter and compare Wi-Fi access points
//!
//! Usage:
//!   `apcatalog browse --data ./machines.json`
//!   `apcatalog query --filter vendor=Cisco --sort weight_kg --desc`
//!   `apcatalog compare ap-1 ap-7 --format json`
//!   `apcatalog export --search outdoor --output outdoor.csv`

mod query;
mod repl;
mod repl_output;

use anyhow::Result;
use apcatalog_core::config::CONFIG_FILE_NAME;
use apcatalog_core::{
    export_file_name, filter_options, to_csv, write_csv, Action, Browser, CatalogConfig, Error,
    ExportKind, LoggingConfig, CAPACITY_NOTICE,
};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indexmap::IndexSet;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::query::QueryArgs;
use crate::repl_output::OutputFormat;

#[derive(Parser)]
#[command(name = "apcatalog")]
#[command(
    author,
    version,
    about = "AP Catalog - browse and compare Wi-Fi access point specifications"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Dataset to load (overrides `data.dataset_path`)
    #[arg(long, global = true, env = "APCATALOG_DATASET")]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum FormatArg {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive browser
    Browse,

    /// Print one page of the filtered, sorted table
    Query {
        #[command(flatten)]
        args: QueryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: FormatArg,
    },

    /// List columns and their visibility
    Columns,

    /// List the distinct values of a filterable column
    Values {
        /// Column key or label
        column: String,

        /// Only show values containing this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Compare up to four access points side by side
    Compare {
        /// Record ids, in comparison order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: FormatArg,
    },

    /// Export every matching row as CSV
    Export {
        #[command(flatten)]
        args: QueryArgs,

        /// Output file (defaults to a timestamped name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Configuration errors exit with 2, everything else with 1.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            match e.downcast_ref::<Error>() {
                Some(err) if !err.is_recoverable() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CatalogConfig::load_from_path(&cli.config).map_err(Error::from)?;
    if let Some(data) = cli.data {
        config.data.dataset_path = data;
    }
    config.validate().map_err(Error::from)?;
    init_tracing(&config.logging);

    tracing::debug!(config = %cli.config.display(), "Configuration loaded");
    let mut browser = Browser::from_config(&config)?;

    match cli.command {
        Commands::Browse => {
            repl::run(browser, &config.repl)?;
        }
        Commands::Query { args, format } => {
            query::apply(&mut browser, &args)?;
            let view = browser.table_view();
            match format {
                FormatArg::Table | FormatArg::Json => repl_output::print_table_view(
                    &view,
                    browser.state(),
                    browser.store().len(),
                    output_format(format),
                ),
                FormatArg::Csv => {
                    println!("{}", to_csv(view.rows.iter().copied(), &view.columns)?);
                }
            }
        }
        Commands::Columns => {
            let columns: Vec<_> = browser.catalog().columns().iter().collect();
            let preferences = &browser.state().preferences;
            repl_output::print_columns(&columns, |key| preferences.is_visible(key));
        }
        Commands::Values { column, search } => {
            let key = query::resolve_column(browser.catalog(), &column)?;
            let options = browser.filter_options(&key)?;
            let narrowed = filter_options(&options, search.as_deref().unwrap_or(""));
            repl_output::print_values(&narrowed, |_| false);
        }
        Commands::Compare { ids, format } => {
            let ids: IndexSet<String> = ids.into_iter().collect();
            for id in &ids {
                if browser.store().get(id).is_none() {
                    return Err(Error::RecordNotFound(id.clone()).into());
                }
            }
            browser.dispatch(Action::EnterSelectionMode)?;
            for id in ids {
                browser.dispatch(Action::ToggleSelection(id))?;
                if browser.state().notice().is_some() {
                    eprintln!("{}", CAPACITY_NOTICE.yellow());
                }
            }
            browser.dispatch(Action::ShowCompare)?;
            match format {
                FormatArg::Table | FormatArg::Json => {
                    repl_output::print_compare_view(&browser.compare_view(), output_format(format));
                }
                FormatArg::Csv => println!("{}", browser.export_compare_csv()?),
            }
        }
        Commands::Export { args, output } => {
            query::apply(&mut browser, &args)?;
            let csv = browser.export_table_csv()?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(export_file_name(ExportKind::Table, Utc::now())));
            write_csv(&path, &csv)?;
            println!(
                "Exported {} rows to {}",
                browser.matching_records().len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn output_format(format: FormatArg) -> OutputFormat {
    match format {
        FormatArg::Json => OutputFormat::Json,
        FormatArg::Table | FormatArg::Csv => OutputFormat::Table,
    }
}

/// Logs go to stderr so piped CSV and JSON stay clean.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "compact" {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
