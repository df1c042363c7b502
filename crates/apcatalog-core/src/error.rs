//! Error types for the AP Catalog.
//!
//! Errors carry a stable `APCAT-XXX` code so that CLI output and logs can be
//! matched against documentation without parsing messages.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset could not be read (APCAT-001).
    #[error("[APCAT-001] Failed to load dataset '{path}': {message}")]
    DatasetLoad {
        /// Path or URL of the dataset.
        path: String,
        /// Underlying cause.
        message: String,
    },

    /// Dataset document is not a JSON array (APCAT-002).
    #[error("[APCAT-002] Dataset format error: {0}")]
    DatasetFormat(String),

    /// Column key is not part of the catalog (APCAT-003).
    #[error("[APCAT-003] Unknown column '{0}'")]
    UnknownColumn(String),

    /// Column cannot be sorted (APCAT-004).
    #[error("[APCAT-004] Column '{0}' is not sortable")]
    ColumnNotSortable(String),

    /// Column cannot be filtered (APCAT-005).
    #[error("[APCAT-005] Column '{0}' is not filterable")]
    ColumnNotFilterable(String),

    /// Page size outside the allowed set (APCAT-006).
    #[error("[APCAT-006] Invalid page size {size}, expected one of {allowed:?}")]
    InvalidPageSize {
        /// Requested page size.
        size: usize,
        /// Allowed page sizes.
        allowed: Vec<usize>,
    },

    /// No record with this id (APCAT-007).
    #[error("[APCAT-007] Record with id '{0}' not found")]
    RecordNotFound(String),

    /// Preference store failure (APCAT-008).
    #[error("[APCAT-008] Preference store error: {0}")]
    Preferences(String),

    /// CSV export failure (APCAT-009).
    #[error("[APCAT-009] Export error: {0}")]
    Export(String),

    /// Configuration error (APCAT-010).
    #[error("[APCAT-010] Configuration error: {0}")]
    Config(String),

    /// IO error (APCAT-011).
    #[error("[APCAT-011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (APCAT-012).
    #[error("[APCAT-012] Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Returns the error code (e.g., "APCAT-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DatasetLoad { .. } => "APCAT-001",
            Self::DatasetFormat(_) => "APCAT-002",
            Self::UnknownColumn(_) => "APCAT-003",
            Self::ColumnNotSortable(_) => "APCAT-004",
            Self::ColumnNotFilterable(_) => "APCAT-005",
            Self::InvalidPageSize { .. } => "APCAT-006",
            Self::RecordNotFound(_) => "APCAT-007",
            Self::Preferences(_) => "APCAT-008",
            Self::Export(_) => "APCAT-009",
            Self::Config(_) => "APCAT-010",
            Self::Io(_) => "APCAT-011",
            Self::Serialization(_) => "APCAT-012",
        }
    }

    /// Returns true if the session can carry on after this error.
    ///
    /// Only configuration errors are fatal: everything else degrades to an
    /// empty or default result.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}
