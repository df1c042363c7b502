//! Browsing session state and the pure reducer that evolves it.
//!
//! Every user action is a value of [`Action`]; [`SessionState::apply`] maps
//! `(state, action)` to the next state without touching the record store or
//! any persistent storage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::ColumnCatalog;
use crate::error::{Error, Result};
use crate::filter::{ColumnFilter, ColumnFilters};
use crate::paginate::{DEFAULT_PER_PAGE, PAGE_SIZES};
use crate::preferences::ColumnPreferences;
use crate::selection::{Selection, ToggleOutcome, CAPACITY_NOTICE};
use crate::sort::SortSpec;

/// Which view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Paginated catalog table.
    #[default]
    Table,
    /// Side-by-side comparison of the selection.
    Compare,
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replaces the global search text.
    SetGlobalSearch(String),
    /// Sets one column filter; empty search and selection removes it.
    SetColumnFilter {
        /// Column key.
        key: String,
        /// Free-text search.
        search: String,
        /// Exact values to keep.
        selected: BTreeSet<String>,
    },
    /// Removes one column filter.
    ClearColumnFilter(String),
    /// Clears the global search and every column filter.
    ClearAllFilters,
    /// Sorts by a column, flipping direction if it is already the sort key.
    SortBy(String),
    /// Changes the page size.
    SetPerPage(usize),
    /// Goes to page 1.
    FirstPage,
    /// Goes back one page.
    PrevPage,
    /// Goes forward one page.
    NextPage {
        /// Page count of the current result set.
        total_pages: usize,
    },
    /// Goes to the last page.
    LastPage {
        /// Page count of the current result set.
        total_pages: usize,
    },
    /// Goes to a page (0 is treated as 1).
    GotoPage(usize),
    /// Shows the selection checkboxes.
    EnterSelectionMode,
    /// Adds or removes a record from the selection.
    ToggleSelection(String),
    /// Clears the selection and leaves selection mode.
    DeselectAll,
    /// Drops a record from the comparison.
    RemoveFromComparison(String),
    /// Switches to the comparison view.
    ShowCompare,
    /// Switches to the table view.
    ShowTable,
    /// Replaces the column preferences.
    SaveColumns {
        /// Visible column keys.
        visible: Vec<String>,
        /// Column order.
        order: Vec<String>,
    },
}

/// Complete, serializable state of one browsing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Global search text.
    pub global_search: String,
    /// Per-column filters.
    pub column_filters: ColumnFilters,
    /// Active sort, if any.
    pub sort: Option<SortSpec>,
    /// Current page (1-indexed).
    pub page: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Allowed page sizes.
    pub page_sizes: Vec<usize>,
    /// Records picked for comparison.
    pub selection: Selection,
    /// Whether selection checkboxes are shown.
    pub selection_mode: bool,
    /// Current view.
    pub view: ViewMode,
    /// Column visibility and order.
    pub preferences: ColumnPreferences,
    /// Outcome of the most recent selection toggle.
    pub last_toggle: Option<ToggleOutcome>,
}

impl SessionState {
    /// Creates the initial state with the default page sizes.
    #[must_use]
    pub fn new(preferences: ColumnPreferences) -> Self {
        Self {
            global_search: String::new(),
            column_filters: ColumnFilters::new(),
            sort: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            page_sizes: PAGE_SIZES.to_vec(),
            selection: Selection::new(),
            selection_mode: false,
            view: ViewMode::Table,
            preferences,
            last_toggle: None,
        }
    }

    /// Overrides the page sizes and the starting page size.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPageSize` if `per_page` is not in `page_sizes`.
    pub fn with_page_sizes(mut self, page_sizes: Vec<usize>, per_page: usize) -> Result<Self> {
        if !page_sizes.contains(&per_page) {
            return Err(Error::InvalidPageSize {
                size: per_page,
                allowed: page_sizes,
            });
        }
        self.page_sizes = page_sizes;
        self.per_page = per_page;
        Ok(self)
    }

    /// Returns true if the global search or any column filter is active.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.global_search.is_empty() || self.column_filters.values().any(ColumnFilter::is_active)
    }

    /// The notice to surface after the last toggle, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        matches!(self.last_toggle, Some(ToggleOutcome::Rejected)).then_some(CAPACITY_NOTICE)
    }

    /// Computes the state after `action`.
    ///
    /// The current state is left untouched, so a rejected action can simply
    /// be reported.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown, unsortable or unfilterable columns and
    /// for page sizes outside `page_sizes`.
    pub fn apply(&self, action: Action, catalog: &ColumnCatalog) -> Result<Self> {
        debug!(?action, "Applying session action");
        let mut next = self.clone();
        next.last_toggle = None;
        match action {
            Action::SetGlobalSearch(text) => {
                next.global_search = text;
                next.page = 1;
            }
            Action::SetColumnFilter {
                key,
                search,
                selected,
            } => {
                let column = catalog.require(&key)?;
                if !column.filterable {
                    return Err(Error::ColumnNotFilterable(key));
                }
                if search.is_empty() && selected.is_empty() {
                    next.column_filters.remove(&key);
                } else {
                    next.column_filters.insert(
                        key,
                        ColumnFilter {
                            search_text: search,
                            selected_values: selected,
                        },
                    );
                }
                next.page = 1;
            }
            Action::ClearColumnFilter(key) => {
                next.column_filters.remove(&key);
                next.page = 1;
            }
            Action::ClearAllFilters => {
                next.global_search.clear();
                next.column_filters.clear();
                next.page = 1;
            }
            Action::SortBy(key) => {
                next.sort = Some(SortSpec::toggle(self.sort.as_ref(), &key, catalog)?);
            }
            Action::SetPerPage(size) => {
                if !self.page_sizes.contains(&size) {
                    return Err(Error::InvalidPageSize {
                        size,
                        allowed: self.page_sizes.clone(),
                    });
                }
                next.per_page = size;
                next.page = 1;
            }
            Action::FirstPage => next.page = 1,
            Action::PrevPage => next.page = self.page.saturating_sub(1).max(1),
            Action::NextPage { total_pages } => {
                if self.page < total_pages {
                    next.page = self.page + 1;
                }
            }
            Action::LastPage { total_pages } => next.page = total_pages.max(1),
            Action::GotoPage(page) => next.page = page.max(1),
            Action::EnterSelectionMode => next.selection_mode = true,
            Action::ToggleSelection(id) => {
                next.last_toggle = Some(next.selection.toggle(&id));
            }
            Action::DeselectAll => {
                next.selection.clear();
                next.selection_mode = false;
            }
            Action::RemoveFromComparison(id) => {
                next.selection.remove(&id);
            }
            Action::ShowCompare => next.view = ViewMode::Compare,
            Action::ShowTable => next.view = ViewMode::Table,
            Action::SaveColumns { visible, order } => {
                next.preferences = ColumnPreferences::from_edit(&visible, &order, catalog);
            }
        }
        Ok(next)
    }
}
