//! Application-wide error types.
//!
//! Library modules use the specific variants below via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! Only a small set of conditions surface as errors at all: the grid engine
//! recovers locally from bad tag data (sentinel defaults), bad filter
//! patterns (rule fails closed), and bad numeric cells (type default).
//! What remains is the user-visible taxonomy: malformed import input,
//! an empty export column selection, and CLI-layer rule validation.

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited reader/writer error
    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column key that is not in the catalog
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A filter rule rejected at the CLI layer (bad operator/type pairing)
    #[error("Invalid filter rule on column '{column}': {message}")]
    InvalidRule { column: String, message: String },

    /// Export requested with zero columns selected
    #[error("No columns selected for export")]
    EmptyExport,

    /// Import input with fewer than two non-empty lines
    #[error("Import needs a header row and at least one data row")]
    EmptyImport,
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an unknown-column error.
    pub fn unknown_column(key: impl Into<String>) -> Self {
        Self::UnknownColumn(key.into())
    }

    /// Create an invalid-rule error.
    pub fn invalid_rule(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            column: column.into(),
            message: message.into(),
        }
    }
}
