//! # AP Catalog Core
//!
//! Query pipeline for a read-only catalog of Wi-Fi access points.
//!
//! The catalog is a JSON array of flat records loaded once into memory. Every
//! view is derived from it by a chain of pure functions.
//!
//! ## Features
//!
//! - **Filtering**: global substring search plus per-column text or
//!   selected-values filters
//! - **Sorting**: stable, null-last, numeric or case-insensitive
//! - **Pagination**: 1-indexed, non-clamping slices with page windows
//! - **Column Preferences**: persisted visibility and order with pinned columns
//! - **Comparison**: ordered selection of up to four access points
//! - **CSV Export**: always-quoted rows with timestamped file names
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apcatalog_core::{Action, Browser, ColumnCatalog, MemoryStore, RecordStore};
//!
//! let store = RecordStore::load("data/machines.json")?;
//! let mut browser = Browser::new(store, ColumnCatalog::access_points(), Box::new(MemoryStore::new()));
//!
//! browser.dispatch(Action::SetGlobalSearch("outdoor".into()))?;
//! browser.dispatch(Action::SortBy("weight_kg".into()))?;
//!
//! for record in browser.table_view().rows {
//!     println!("{}", record.id());
//! }
//!
//! let csv = browser.export_table_csv()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]

pub mod browser;
pub mod catalog;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod dataset;
#[cfg(test)]
mod dataset_tests;
pub mod error;
pub mod export;
pub mod filter;
pub mod paginate;
#[cfg(test)]
mod paginate_tests;
pub mod preferences;
pub mod record;
pub mod selection;
pub mod session;
#[cfg(test)]
mod session_tests;
pub mod sort;

pub use browser::{Browser, CompareView, TableView};
pub use catalog::{ColumnCatalog, ColumnDescriptor};
pub use config::{
    CatalogConfig, ConfigError, DataConfig, LoggingConfig, PreferencesConfig, ReplSettings,
    TableConfig,
};
pub use dataset::RecordStore;
pub use error::{Error, Result};
pub use export::{export_file_name, to_csv, write_csv, ExportKind, CSV_MIME};
pub use filter::{filter_options, filter_records, unique_values, ColumnFilter, ColumnFilters};
pub use paginate::{paginate, total_pages, PageWindow, DEFAULT_PER_PAGE, PAGE_SIZES};
pub use preferences::{
    ColumnPreferences, ColumnSettingsDraft, FileStore, MemoryStore, PreferenceStore,
};
pub use record::{display_cell, format_value, Record, EMPTY_CELL};
pub use selection::{Selection, ToggleOutcome, CAPACITY_NOTICE, MAX_SELECTION};
pub use session::{Action, SessionState, ViewMode};
pub use sort::{compare_values, sort_records, SortDirection, SortSpec};
