//! Column preferences: which columns are visible and in what order.
//!
//! Preferences are persisted as two JSON arrays under fixed keys in a string
//! key-value store. Anything unreadable or stale is discarded in favour of the
//! catalog defaults; loading never fails.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::catalog::{ColumnCatalog, ColumnDescriptor};
use crate::error::{Error, Result};

/// Store key holding the visible column keys.
pub const STORAGE_KEY_VISIBLE_COLUMNS: &str = "ap-catalog-visible-columns";

/// Store key holding the column order.
pub const STORAGE_KEY_COLUMN_ORDER: &str = "ap-catalog-column-order";

/// A persistent string key-value store.
pub trait PreferenceStore {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The file is read once on open and rewritten (temp file + rename) on every
/// `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file starts an empty store. A corrupt file is logged and
    /// treated as empty; it is replaced on the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable preference file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read preference file");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
            .map_err(|e| Error::Preferences(format!("{}: {e}", self.path.display())))
    }
}

/// Puts pinned keys first (in catalog order), then the remaining stored keys
/// in their stored relative order. Unknown and duplicate keys are dropped.
#[must_use]
pub fn reconcile(stored_order: &[String], catalog: &ColumnCatalog) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order: Vec<String> = catalog.pinned_keys().map(str::to_string).collect();
    seen.extend(order.iter().cloned());
    for key in stored_order {
        if catalog.contains(key) && seen.insert(key.clone()) {
            order.push(key.clone());
        }
    }
    order
}

/// Accepts a stored visible set only if every key is in the catalog;
/// otherwise every column is visible.
#[must_use]
pub fn validate_visible(stored_visible: &[String], catalog: &ColumnCatalog) -> Vec<String> {
    if stored_visible.iter().all(|key| catalog.contains(key)) {
        stored_visible.to_vec()
    } else {
        catalog.keys().map(str::to_string).collect()
    }
}

/// Accepts a stored order only if it holds catalog keys and exactly as many
/// of them as the catalog has; the accepted order is then reconciled.
/// Otherwise the catalog order is used.
#[must_use]
pub fn validate_order(stored_order: &[String], catalog: &ColumnCatalog) -> Vec<String> {
    let known = stored_order.iter().all(|key| catalog.contains(key));
    if known && stored_order.len() == catalog.len() {
        reconcile(stored_order, catalog)
    } else {
        catalog.keys().map(str::to_string).collect()
    }
}

/// The user's visible set and column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreferences {
    /// Visible column keys (order irrelevant).
    pub visible_columns: Vec<String>,
    /// Column order, pinned keys first.
    pub column_order: Vec<String>,
}

impl ColumnPreferences {
    /// All columns visible, in catalog order.
    #[must_use]
    pub fn defaults(catalog: &ColumnCatalog) -> Self {
        let keys: Vec<String> = catalog.keys().map(str::to_string).collect();
        Self {
            visible_columns: keys.clone(),
            column_order: keys,
        }
    }

    /// Loads preferences from `store`, falling back to defaults per key.
    #[must_use]
    pub fn load(store: &dyn PreferenceStore, catalog: &ColumnCatalog) -> Self {
        let defaults = Self::defaults(catalog);
        let visible_columns = read_keys(store, STORAGE_KEY_VISIBLE_COLUMNS)
            .map_or(defaults.visible_columns, |keys| validate_visible(&keys, catalog));
        let column_order = read_keys(store, STORAGE_KEY_COLUMN_ORDER)
            .map_or(defaults.column_order, |keys| validate_order(&keys, catalog));
        Self {
            visible_columns,
            column_order,
        }
    }

    /// Builds preferences from a user edit: unknown keys are dropped and the
    /// order is reconciled.
    #[must_use]
    pub fn from_edit(visible: &[String], order: &[String], catalog: &ColumnCatalog) -> Self {
        let mut seen = HashSet::new();
        let visible_columns = visible
            .iter()
            .filter(|key| catalog.contains(key) && seen.insert(key.as_str()))
            .cloned()
            .collect();
        Self {
            visible_columns,
            column_order: reconcile(order, catalog),
        }
    }

    /// Writes both keys to `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects a write.
    pub fn persist(&self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(
            STORAGE_KEY_VISIBLE_COLUMNS,
            &serde_json::to_string(&self.visible_columns)?,
        )?;
        store.set(
            STORAGE_KEY_COLUMN_ORDER,
            &serde_json::to_string(&self.column_order)?,
        )?;
        debug!(
            visible = self.visible_columns.len(),
            ordered = self.column_order.len(),
            "Column preferences saved"
        );
        Ok(())
    }

    /// Returns true if `key` is in the visible set.
    #[must_use]
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible_columns.iter().any(|k| k == key)
    }

    /// Effective columns for rendering: the reconciled order restricted to
    /// the visible set.
    #[must_use]
    pub fn effective_columns<'c>(&self, catalog: &'c ColumnCatalog) -> Vec<&'c ColumnDescriptor> {
        reconcile(&self.column_order, catalog)
            .iter()
            .filter(|key| self.is_visible(key))
            .filter_map(|key| catalog.get(key))
            .collect()
    }
}

fn read_keys(store: &dyn PreferenceStore, key: &str) -> Option<Vec<String>> {
    let raw = store.get(key)?;
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(keys) => Some(keys),
        Err(e) => {
            warn!(key, error = %e, "Discarding invalid stored preference");
            None
        }
    }
}

/// Editable copy of the column preferences, as shown by a settings dialog.
///
/// Pinned columns are locked: they stay visible and keep their position.
#[derive(Debug, Clone)]
pub struct ColumnSettingsDraft<'c> {
    catalog: &'c ColumnCatalog,
    visible: Vec<String>,
    order: Vec<String>,
    search: String,
}

impl<'c> ColumnSettingsDraft<'c> {
    /// Starts a draft from the current preferences.
    #[must_use]
    pub fn new(prefs: &ColumnPreferences, catalog: &'c ColumnCatalog) -> Self {
        Self {
            catalog,
            visible: prefs.visible_columns.clone(),
            order: reconcile(&prefs.column_order, catalog),
            search: String::new(),
        }
    }

    /// Narrows the listed columns to labels containing `query`.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Columns currently listed, in draft order.
    #[must_use]
    pub fn listed(&self) -> Vec<&'c ColumnDescriptor> {
        let needle = self.search.to_lowercase();
        self.order
            .iter()
            .filter_map(|key| self.catalog.get(key))
            .filter(|c| needle.is_empty() || c.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Returns true if `key` is visible in the draft.
    #[must_use]
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.iter().any(|k| k == key)
    }

    /// Shows or hides a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown or pinned.
    pub fn set_visible(&mut self, key: &str, visible: bool) -> Result<()> {
        self.unlocked(key)?;
        self.visible.retain(|k| k != key);
        if visible {
            self.visible.push(key.to_string());
        }
        Ok(())
    }

    /// Flips the visibility of a column and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown or pinned.
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        let visible = !self.is_visible(key);
        self.set_visible(key, visible)?;
        Ok(visible)
    }

    /// Makes every listed column visible.
    pub fn select_all(&mut self) {
        for column in self.listed() {
            if !self.is_visible(&column.key) {
                self.visible.push(column.key.clone());
            }
        }
    }

    /// Hides every listed unpinned column.
    pub fn deselect_all(&mut self) {
        let hidden: HashSet<&str> = self
            .listed()
            .into_iter()
            .filter(|c| !c.pinned)
            .map(|c| c.key.as_str())
            .collect();
        self.visible.retain(|k| !hidden.contains(k.as_str()));
    }

    /// Moves a column one slot towards the front, staying behind the pinned
    /// columns. Returns false if it was already first.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown or pinned.
    pub fn move_up(&mut self, key: &str) -> Result<bool> {
        self.unlocked(key)?;
        let pinned = self.catalog.pinned_keys().count();
        match self.position(key) {
            Some(idx) if idx > pinned => {
                self.order.swap(idx, idx - 1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Moves a column one slot towards the end. Returns false if it was
    /// already last.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown or pinned.
    pub fn move_down(&mut self, key: &str) -> Result<bool> {
        self.unlocked(key)?;
        match self.position(key) {
            Some(idx) if idx + 1 < self.order.len() => {
                self.order.swap(idx, idx + 1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Finishes the draft, returning `(visible, order)` for saving.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.visible, self.order)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }

    fn unlocked(&self, key: &str) -> Result<()> {
        let column = self.catalog.require(key)?;
        if column.pinned {
            return Err(Error::Preferences(format!(
                "column '{}' is locked",
                column.label
            )));
        }
        Ok(())
    }
}
