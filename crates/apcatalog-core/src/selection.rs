//! Comparison selection: an ordered set of at most four record ids.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Maximum number of records that can be compared side by side.
pub const MAX_SELECTION: usize = 4;

/// Notice shown when a fifth record is picked.
pub const CAPACITY_NOTICE: &str = "Maximum 4 APs can be selected for comparison";

/// Result of toggling one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The id was added.
    Added,
    /// The id was already selected and has been removed.
    Removed,
    /// The selection is full; nothing changed.
    Rejected,
}

/// Ids picked for comparison, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: IndexSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent (and there is room), removes it if present.
    pub fn toggle(&mut self, id: &str) -> ToggleOutcome {
        if self.ids.shift_remove(id) {
            ToggleOutcome::Removed
        } else if self.is_full() {
            ToggleOutcome::Rejected
        } else {
            self.ids.insert(id.to_string());
            ToggleOutcome::Added
        }
    }

    /// Removes `id`; returns false if it was not selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.shift_remove(id)
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns true if `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if no more ids can be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_SELECTION
    }

    /// Selected ids in pick order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
