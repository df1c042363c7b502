//! Access-point records and the scalar value rules shared by the pipeline.
//!
//! A record keeps its attributes in document order so that every scan over
//! them (global search, JSON output) is deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Placeholder rendered for null or missing values.
pub const EMPTY_CELL: &str = "—";

/// One access point's attribute-value mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identity within the record store.
    id: String,
    /// Attributes in document order (includes `id` when the document has it).
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates a record from an id and its attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: IndexMap<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Builds a record from a JSON object, taking the id from its `id`
    /// attribute.
    ///
    /// Returns `None` for non-object values. The id is empty when the
    /// attribute is missing or not a scalar; the record store assigns a
    /// positional id in that case.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let fields: IndexMap<String, Value> = map.into_iter().collect();
        let id = fields
            .get("id")
            .filter(|v| !matches!(v, Value::Array(_) | Value::Object(_)))
            .and_then(display_string)
            .map(Cow::into_owned)
            .unwrap_or_default();
        Some(Self { id, fields })
    }

    /// Returns the record id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    /// Returns the raw value for `key`, or `None` when the attribute is
    /// missing or null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Returns the stringified value for `key`, or `None` when the attribute
    /// is missing or null.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(display_string)
    }

    /// Iterates over all attribute values in document order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    /// Returns the attributes in document order.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }
}

/// Stringifies a value for matching and display.
///
/// Integral numbers print without a fractional part (`5.0` becomes `"5"`),
/// booleans print as `true`/`false`, and nested arrays or objects from a
/// malformed document fall back to their JSON text. Null has no string form.
#[must_use]
pub fn display_string(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Some(Cow::Owned(n.to_string()));
            }
            let f = n.as_f64()?;
            if f == 0.0 {
                Some(Cow::Borrowed("0"))
            } else if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
                Some(Cow::Owned(format!("{f:.0}")))
            } else {
                Some(Cow::Owned(f.to_string()))
            }
        }
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Formats a value for export and comparison: `—` for null or missing,
/// `Yes`/`No` for booleans, the stringified value otherwise.
#[must_use]
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => EMPTY_CELL.to_string(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(v) => display_string(v).map_or_else(|| EMPTY_CELL.to_string(), Cow::into_owned),
    }
}

/// Formats a value for a table cell: `—` for null or missing, the
/// stringified value otherwise.
#[must_use]
pub fn display_cell(value: Option<&Value>) -> String {
    value
        .and_then(display_string)
        .map_or_else(|| EMPTY_CELL.to_string(), Cow::into_owned)
}
