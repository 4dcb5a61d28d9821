//! Error types for BMRB ingestion

use thiserror::Error;

/// Result type alias for BMRB operations
pub type Result<T> = std::result::Result<T, BmrbError>;

/// Main error type for BMRB ingestion
#[derive(Error, Debug)]
pub enum BmrbError {
    /// Transport failure or non-success HTTP status
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Fetched content did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Parsing succeeded but produced nothing to work with
    #[error("No data: {0}")]
    DataAbsent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BmrbError {
    /// Create a network error for the given URL
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a data-absent error
    pub fn data_absent(msg: impl Into<String>) -> Self {
        Self::DataAbsent(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-readable name of the error class, used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            BmrbError::Network { .. } => "network",
            BmrbError::Parse(_) => "parse",
            BmrbError::DataAbsent(_) => "data_absent",
            BmrbError::Io(_) => "io",
            BmrbError::Csv(_) => "csv",
            BmrbError::Config(_) => "config",
        }
    }
}

impl From<regex::Error> for BmrbError {
    fn from(err: regex::Error) -> Self {
        BmrbError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for BmrbError {
    fn from(err: std::num::ParseIntError) -> Self {
        BmrbError::Parse(err.to_string())
    }
}
