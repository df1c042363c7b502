//! Record store: the immutable, in-memory list of access points.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::record::Record;

/// Records in dataset order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    by_id: HashMap<String, usize>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from records, assigning `row-<index>` to records with
    /// an empty id.
    ///
    /// Duplicate ids are logged; lookups resolve to the first occurrence.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut out = Vec::with_capacity(records.len());
        for (index, mut record) in records.into_iter().enumerate() {
            if record.id().is_empty() {
                warn!(index, "Record has no usable id, assigning a positional one");
                record.set_id(format!("row-{index}"));
            }
            if by_id.contains_key(record.id()) {
                warn!(id = record.id(), index, "Duplicate record id");
            } else {
                by_id.insert(record.id().to_string(), out.len());
            }
            out.push(record);
        }
        Self { records: out, by_id }
    }

    /// Parses a JSON array document.
    ///
    /// Elements that are not objects are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not an array.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| Error::DatasetFormat(e.to_string()))?;
        let Value::Array(items) = document else {
            return Err(Error::DatasetFormat(
                "expected a JSON array of records".to_string(),
            ));
        };
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match Record::from_json(item) {
                Some(record) => records.push(record),
                None => warn!(index, "Skipping dataset element that is not an object"),
            }
        }
        Ok(Self::from_records(records))
    }

    /// Loads the dataset at `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is a URL, cannot be read, or is not a
    /// JSON array.
    pub fn load(source: &str) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return Err(Error::DatasetLoad {
                path: source.to_string(),
                message: "remote datasets are not supported".to_string(),
            });
        }
        let text = fs::read_to_string(Path::new(source)).map_err(|e| Error::DatasetLoad {
            path: source.to_string(),
            message: e.to_string(),
        })?;
        let store = Self::from_json_str(&text)?;
        info!(path = source, records = store.len(), "Dataset loaded");
        Ok(store)
    }

    /// Loads the dataset, falling back to an empty store on any failure.
    #[must_use]
    pub fn load_or_empty(source: &str) -> Self {
        Self::load(source).unwrap_or_else(|e| {
            error!(path = source, error = %e, "Dataset unavailable, continuing with no records");
            Self::empty()
        })
    }

    /// All records in dataset order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).and_then(|&i| self.records.get(i))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
