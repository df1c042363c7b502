//! Sort engine: one explicit comparator and a stable sort built on it.
//!
//! Null and missing values always sort last. Descending order negates the
//! comparison of non-null values only, so nulls stay at the end in both
//! directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use icu_collator::{Collator, CollatorOptions, Strength};
use std::fmt;
use unicase::UniCase;

use crate::catalog::ColumnCatalog;
use crate::error::{Error, Result};
use crate::record::{display_string, Record};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Active sort: column key plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key to sort by.
    pub key: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on `key`.
    #[must_use]
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Creates a descending sort on `key`.
    #[must_use]
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Computes the sort after the user picks `key`: the current key flips
    /// direction, any other key starts ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is unknown or not sortable.
    pub fn toggle(current: Option<&Self>, key: &str, catalog: &ColumnCatalog) -> Result<Self> {
        let column = catalog.require(key)?;
        if !column.sortable {
            return Err(Error::ColumnNotSortable(key.to_string()));
        }
        Ok(match current {
            Some(spec) if spec.key == key => Self {
                key: spec.key.clone(),
                direction: spec.direction.flipped(),
            },
            _ => Self::asc(key),
        })
    }
}

thread_local! {
    /// Root-locale collator at secondary strength: accents count, case does not.
    static COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(&Default::default(), options).ok()
    };
}

/// Locale-aware string comparison.
///
/// The root collation decides first, so accented letters sort next to their
/// base letter and punctuation sorts before digits. Ties fall back to
/// case-folded code points, then lowercase before uppercase, so the order is
/// total.
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.as_ref().map(|c| c.compare(a, b)))
        .unwrap_or(Ordering::Equal)
        .then_with(|| UniCase::new(a).cmp(&UniCase::new(b)))
        .then_with(|| b.cmp(a))
}

/// Compares two values: numerically when both are numbers, otherwise by
/// their string forms with [`locale_compare`].
///
/// `None` stands for null or missing and always sorts after a present value;
/// two absent values tie.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Some(x), Some(y)) => {
            let x = display_string(x).unwrap_or_default();
            let y = display_string(y).unwrap_or_default();
            locale_compare(&x, &y)
        }
    }
}

/// Returns a new vector ordered by `key` in `direction`.
///
/// The sort is stable: records with equal keys keep their input order. The
/// input is not mutated.
#[must_use]
pub fn sort_records<'a>(
    records: &[&'a Record],
    key: &str,
    direction: SortDirection,
) -> Vec<&'a Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let (va, vb) = (a.get(key), b.get(key));
        match (va, vb) {
            (Some(_), Some(_)) => {
                let ord = compare_values(va, vb);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            _ => compare_values(va, vb),
        }
    });
    sorted
}

/// Applies an optional sort spec; `None` keeps the input order.
#[must_use]
pub fn apply_sort<'a>(records: &[&'a Record], spec: Option<&SortSpec>) -> Vec<&'a Record> {
    match spec {
        Some(spec) => sort_records(records, &spec.key, spec.direction),
        None => records.to_vec(),
    }
}
