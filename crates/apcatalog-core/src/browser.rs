//! Browser controller: owns the record store, the session state and the
//! preference store, and derives the table and comparison views.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apcatalog_core::{Action, Browser, CatalogConfig};
//!
//! let mut browser = Browser::from_config(&CatalogConfig::load()?)?;
//! browser.dispatch(Action::SetGlobalSearch("wi-fi 7".into()))?;
//! browser.dispatch(Action::SortBy("public_price_usd".into()))?;
//!
//! let view = browser.table_view();
//! println!("{} matching", view.window.total);
//! ```

use tracing::{debug, info};

use crate::catalog::{ColumnCatalog, ColumnDescriptor};
use crate::config::CatalogConfig;
use crate::dataset::RecordStore;
use crate::error::{Error, Result};
use crate::export::to_csv;
use crate::filter::{filter_records, unique_values};
use crate::paginate::{paginate, total_pages, PageWindow};
use crate::preferences::{ColumnPreferences, FileStore, MemoryStore, PreferenceStore};
use crate::record::Record;
use crate::session::{Action, SessionState};
use crate::sort::apply_sort;

/// The table view derived from the current state.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    /// Effective columns, in display order.
    pub columns: Vec<&'a ColumnDescriptor>,
    /// Records on the current page.
    pub rows: Vec<&'a Record>,
    /// Page position and "Showing x to y of z" numbers.
    pub window: PageWindow,
    /// Whether a search or column filter is active.
    pub has_active_filters: bool,
    /// Whether selection checkboxes are shown.
    pub selection_mode: bool,
}

/// The comparison view: selected records against the full catalog.
#[derive(Debug, Clone)]
pub struct CompareView<'a> {
    /// Every catalog column.
    pub columns: Vec<&'a ColumnDescriptor>,
    /// Selected records, in selection order.
    pub records: Vec<&'a Record>,
}

impl CompareView<'_> {
    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Session controller.
pub struct Browser {
    store: RecordStore,
    catalog: ColumnCatalog,
    state: SessionState,
    preferences: Box<dyn PreferenceStore>,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("records", &self.store.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Browser {
    /// Creates a browser, reading column preferences from `preferences`.
    #[must_use]
    pub fn new(
        store: RecordStore,
        catalog: ColumnCatalog,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let prefs = ColumnPreferences::load(preferences.as_ref(), &catalog);
        Self {
            store,
            catalog,
            state: SessionState::new(prefs),
            preferences,
        }
    }

    /// Builds a browser from configuration.
    ///
    /// A dataset that cannot be loaded leaves the browser empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration does not validate.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;
        let store = RecordStore::load_or_empty(&config.data.dataset_path);
        let preferences: Box<dyn PreferenceStore> = if config.preferences.enabled {
            let path = config.preferences.resolved_file();
            info!(path = %path.display(), "Using preference file");
            Box::new(FileStore::open(path))
        } else {
            Box::new(MemoryStore::new())
        };
        let mut browser = Self::new(store, ColumnCatalog::access_points(), preferences);
        browser.state = browser
            .state
            .with_page_sizes(config.table.page_sizes.clone(), config.table.default_per_page)?;
        Ok(browser)
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The column catalog.
    #[must_use]
    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    /// The current session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies `action`. Column preference changes are persisted.
    ///
    /// # Errors
    ///
    /// Returns the reducer's error, leaving the state unchanged, or a
    /// preference store error after the new preferences took effect.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let persist = matches!(action, Action::SaveColumns { .. });
        self.state = self.state.apply(action, &self.catalog)?;
        if persist {
            self.state.preferences.persist(self.preferences.as_mut())?;
        }
        Ok(())
    }

    /// Records matching the search and filters, in sort order.
    #[must_use]
    pub fn matching_records(&self) -> Vec<&Record> {
        let filtered = filter_records(
            self.store.records(),
            &self.state.global_search,
            &self.state.column_filters,
        );
        let sorted = apply_sort(&filtered, self.state.sort.as_ref());
        debug!(
            total = self.store.len(),
            matching = sorted.len(),
            "Pipeline recomputed"
        );
        sorted
    }

    /// Page count of the current result set.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.matching_records().len(), self.state.per_page)
    }

    /// Effective columns for the table.
    #[must_use]
    pub fn effective_columns(&self) -> Vec<&ColumnDescriptor> {
        self.state.preferences.effective_columns(&self.catalog)
    }

    /// Derives the table view.
    #[must_use]
    pub fn table_view(&self) -> TableView<'_> {
        let matching = self.matching_records();
        let rows = paginate(&matching, self.state.page, self.state.per_page).to_vec();
        TableView {
            columns: self.effective_columns(),
            rows,
            window: PageWindow::new(self.state.page, self.state.per_page, matching.len()),
            has_active_filters: self.state.has_active_filters(),
            selection_mode: self.state.selection_mode,
        }
    }

    /// Derives the comparison view. Ids no longer in the store are skipped.
    #[must_use]
    pub fn compare_view(&self) -> CompareView<'_> {
        CompareView {
            columns: self.catalog.columns().iter().collect(),
            records: self
                .state
                .selection
                .ids()
                .filter_map(|id| self.store.get(id))
                .collect(),
        }
    }

    /// CSV of every matching record with the effective columns.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_table_csv(&self) -> Result<String> {
        to_csv(self.matching_records(), &self.effective_columns())
    }

    /// CSV of the comparison view.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_compare_csv(&self) -> Result<String> {
        let view = self.compare_view();
        to_csv(view.records, &view.columns)
    }

    /// Distinct values of a column across the whole store.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown or not filterable.
    pub fn filter_options(&self, key: &str) -> Result<Vec<String>> {
        let column = self.catalog.require(key)?;
        if !column.filterable {
            return Err(Error::ColumnNotFilterable(key.to_string()));
        }
        Ok(unique_values(self.store.records(), key))
    }
}
