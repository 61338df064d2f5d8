// crates/countries-core/src/error.rs

//! Error taxonomy for the pipeline.
//!
//! Adapter-level failures (`Fetch`, unreadable cache) are logged and turned
//! into "no data" by the data source. The orchestrator is the one place that
//! escalates to the fatal variants [`EtlError::SourceUnavailable`] and
//! [`EtlError::ConnectionFailure`].

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Neither the cache nor the remote endpoints produced any record.
    #[error("no country data available from cache or remote source, cannot proceed")]
    SourceUnavailable,

    /// The database is unreachable or rejected the credentials.
    #[error("failed to connect to the database ({target}); check credentials or server status")]
    ConnectionFailure {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport or HTTP status failure against one of the endpoints.
    #[cfg(feature = "fetch")]
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[cfg(feature = "fetch")]
    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A payload that is valid JSON but not the shape we expect.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The external DDL/DML file could not be read.
    #[error("SQL asset not readable at {}: {source}", path.display())]
    SqlAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

