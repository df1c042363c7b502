//! Filter engine: global search plus per-column filters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apcatalog_core::filter::{filter_records, ColumnFilter, ColumnFilters};
//!
//! let mut filters = ColumnFilters::new();
//! filters.insert("vendor".into(), ColumnFilter::values(["Cisco", "Aruba"]));
//! filters.insert("generation".into(), ColumnFilter::search("wi-fi 7"));
//!
//! let matching = filter_records(store.records(), "outdoor", &filters);
//! ```
//!
//! Every function here is pure and keeps the input order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::record::{display_string, Record};
use crate::sort::locale_compare;

/// Filter state for one column.
///
/// When `selected_values` is non-empty it wins and `search_text` is ignored;
/// the two are never combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Case-insensitive substring to look for.
    #[serde(default)]
    pub search_text: String,
    /// Exact (trimmed) values to keep.
    #[serde(default)]
    pub selected_values: BTreeSet<String>,
}

impl ColumnFilter {
    /// Creates a free-text filter.
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: text.into(),
            selected_values: BTreeSet::new(),
        }
    }

    /// Creates a selected-values filter.
    #[must_use]
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_text: String::new(),
            selected_values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if this filter constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.search_text.is_empty() || !self.selected_values.is_empty()
    }

    /// Evaluates the filter against one attribute value.
    ///
    /// Selected values compare against the trimmed string form, with null
    /// standing in as the empty string. Free text never matches null.
    #[must_use]
    pub fn matches(&self, value: Option<&Value>) -> bool {
        if !self.selected_values.is_empty() {
            let text = value.and_then(display_string).unwrap_or_default();
            return self.selected_values.contains(text.trim());
        }
        if !self.search_text.is_empty() {
            let needle = self.search_text.to_lowercase();
            return value
                .and_then(display_string)
                .is_some_and(|text| text.to_lowercase().contains(&needle));
        }
        true
    }
}

/// Column key to filter state. A missing entry means no filter.
pub type ColumnFilters = BTreeMap<String, ColumnFilter>;

/// Returns true if any attribute value of `record` contains `query_lower`.
///
/// `query_lower` must already be lower-cased. Null attributes never match.
#[must_use]
pub fn matches_global(record: &Record, query_lower: &str) -> bool {
    record.values().any(|value| {
        display_string(value).is_some_and(|text| text.to_lowercase().contains(query_lower))
    })
}

/// Returns true if `record` satisfies every column filter.
#[must_use]
pub fn matches_columns(record: &Record, filters: &ColumnFilters) -> bool {
    filters
        .iter()
        .all(|(key, filter)| filter.matches(record.get(key)))
}

/// Computes the records matching `global_search` and all `filters`.
///
/// Global search scans every attribute of the record, including ones the
/// catalog does not display. Column filters are combined with AND. The
/// output keeps the input order, so filtering an already-filtered sequence
/// with the same arguments returns it unchanged.
pub fn filter_records<'a, I>(records: I, global_search: &str, filters: &ColumnFilters) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let query = (!global_search.is_empty()).then(|| global_search.to_lowercase());
    records
        .into_iter()
        .filter(|record| query.as_deref().is_none_or(|q| matches_global(record, q)))
        .filter(|record| matches_columns(record, filters))
        .collect()
}

/// Extracts the distinct display values of `column_key`.
///
/// Null, missing, and blank values are skipped; values are trimmed.
/// Duplicates are detected ignoring case and the first casing seen wins. The
/// result is sorted case-insensitively with [`locale_compare`].
pub fn unique_values<'a, I>(records: I, column_key: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        let Some(text) = record.text(column_key) else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            values.push(trimmed.to_string());
        }
    }
    values.sort_by(|a, b| locale_compare(a, b));
    values
}

/// Narrows a list of filter options to those containing `query`, ignoring
/// case. An empty query keeps every option.
#[must_use]
pub fn filter_options<'a>(options: &'a [String], query: &str) -> Vec<&'a str> {
    if query.is_empty() {
        return options.iter().map(String::as_str).collect();
    }
    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|value| value.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}
