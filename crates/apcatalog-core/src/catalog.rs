//! Column catalog: static metadata for every displayable attribute.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata describing one displayable attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Attribute key in the record.
    pub key: String,
    /// Display name.
    pub label: String,
    /// Whether the table can be sorted by this column.
    pub sortable: bool,
    /// Whether a column filter can be applied.
    pub filterable: bool,
    /// Pinned columns lead every ordering and cannot be hidden or moved.
    pub pinned: bool,
    /// Fixed display width in pixels (only meaningful when pinned).
    pub width: Option<u16>,
}

impl ColumnDescriptor {
    /// Creates a sortable, filterable, unpinned column.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            filterable: true,
            pinned: false,
            width: None,
        }
    }

    /// Pins the column at a fixed width.
    #[must_use]
    pub fn pinned(mut self, width: u16) -> Self {
        self.pinned = true;
        self.width = Some(width);
        self
    }

    /// Disables column filtering.
    #[must_use]
    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }
}

/// Unpinned access-point attributes, in default display order.
const AP_COLUMNS: &[(&str, &str)] = &[
    ("reference", "Reference"),
    ("generation", "Generation"),
    ("product_positioning", "Product Positioning"),
    ("indoor_outdoor", "Indoor/Outdoor"),
    ("antenna_type", "Antenna Type"),
    ("total_phy_serving_radios", "Total PHY Serving Radios"),
    ("concurrent_serving_radios", "Concurrent Serving Radios"),
    ("serving_radio_1", "Serving Radio 1"),
    ("serving_radio_2", "Serving Radio 2"),
    ("serving_radio_3", "Serving Radio 3"),
    ("serving_radio_4", "Serving Radio 4"),
    ("dedicated_scanning_radio", "Dedicated Scanning Radio"),
    ("poe_class", "PoE Class"),
    ("max_poe_consumption_w", "Max PoE Consumption (W)"),
    ("limited_capabilities_poe_bt", "Limited Capabilities PoE BT"),
    ("limited_capabilities_poe_at", "Limited Capabilities PoE AT"),
    ("limited_capabilities_poe_af", "Limited Capabilities PoE AF"),
    ("ethernet1", "Ethernet 1"),
    ("ethernet2", "Ethernet 2"),
    ("weight_kg", "Weight (kg)"),
    ("dimensions_cm", "Dimensions (cm)"),
    ("geolocation", "Geolocation"),
    ("usb_ports", "USB Ports"),
    ("uwb", "UWB"),
    ("gnss", "GNSS"),
    ("bluetooth", "Bluetooth"),
    ("zigbee", "Zigbee"),
    ("minimum_software_version", "Minimum Software Version"),
    ("public_price_usd", "Public Price (USD)"),
    ("public_price_eur", "Public Price (EUR)"),
];

/// Static, ordered sequence of column descriptors.
///
/// Construction moves pinned columns ahead of unpinned ones (keeping their
/// relative order), so `columns()` is always a valid materialized ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCatalog {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnCatalog {
    /// Creates a catalog from descriptors.
    #[must_use]
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        let (mut pinned, unpinned): (Vec<_>, Vec<_>) =
            columns.into_iter().partition(|c| c.pinned);
        pinned.extend(unpinned);
        Self { columns: pinned }
    }

    /// The access-point catalog: Vendor and Model pinned, then every
    /// specification attribute.
    #[must_use]
    pub fn access_points() -> Self {
        let mut columns = Vec::with_capacity(AP_COLUMNS.len() + 3);
        columns.push(ColumnDescriptor::new("vendor", "Vendor").pinned(150));
        columns.push(ColumnDescriptor::new("model", "Model").pinned(200));
        columns.extend(
            AP_COLUMNS
                .iter()
                .map(|(key, label)| ColumnDescriptor::new(*key, *label)),
        );
        columns.push(ColumnDescriptor::new("comments", "Comments").not_filterable());
        Self::new(columns)
    }

    /// Returns all columns in catalog order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the catalog has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Looks up a column by key, failing with `UnknownColumn`.
    pub fn require(&self, key: &str) -> Result<&ColumnDescriptor> {
        self.get(key)
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))
    }

    /// Resolves user input to a column: exact key first, then key or label
    /// ignoring case.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ColumnDescriptor> {
        let name = name.trim();
        self.get(name).or_else(|| {
            self.columns
                .iter()
                .find(|c| c.key.eq_ignore_ascii_case(name) || c.label.eq_ignore_ascii_case(name))
        })
    }

    /// Returns true if `key` belongs to the catalog.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over all keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    /// Iterates over pinned keys in catalog order.
    pub fn pinned_keys(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.pinned)
            .map(|c| c.key.as_str())
    }
}

impl Default for ColumnCatalog {
    fn default() -> Self {
        Self::access_points()
    }
}
