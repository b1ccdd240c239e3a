//! Error types for the comic catalog
//!
//! This module defines the error types for every component of the catalog
//! controller. Errors are grouped by concern and unified under [`AppError`]
//! so the CLI can report them with a consistent category.

use std::path::PathBuf;
use thiserror::Error;

/// Task pool errors
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool no longer accepts work
    #[error("Task pool '{pool}' is closed and no longer accepts tasks")]
    Closed { pool: String },

    /// Workers did not drain within the shutdown window
    #[error("Task pool '{pool}' did not drain within {seconds} seconds")]
    ShutdownTimeout { pool: String, seconds: u64 },
}

/// Errors raised by a catalog data source
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed
    #[error("Catalog request failed")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Catalog server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON shape
    #[error("Catalog payload could not be decoded")]
    Decode(#[from] serde_json::Error),

    /// The fetch did not answer in time
    #[error("Fetching {dataset} timed out after {seconds} seconds")]
    Timeout { dataset: String, seconds: u64 },

    /// A configured or derived URL is malformed
    #[error("Invalid catalog URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The source cannot serve this dataset
    #[error("Catalog source unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Catalog lookup and enrichment errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No comic with this id in the current snapshot
    #[error("Comic not found: {id}")]
    NotFound { id: String },

    /// The comic has no episode at this position
    #[error("Comic {comic_id} has no episode at index {index}")]
    EpisodeNotFound { comic_id: String, index: usize },

    /// The host table has no base URL for the episode's category
    #[error("No download host known for category '{catid}'")]
    UnknownHost { catid: String },

    /// The underlying source failed
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Failures of the ad-hoc HTTP fetch primitive
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request or body read failed
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error: HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// URL could not be parsed
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The rate limiter could not be built from configuration
    #[error("Invalid rate limit: {reason}")]
    RateLimiterConfig { reason: String },
}

/// Search coalescing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A newer request replaced this one before it started
    #[error("Search request was superseded by a newer request")]
    Superseded,

    /// The search loop has shut down
    #[error("Search loop is not running")]
    LoopStopped,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered
    #[error("Configuration could not be serialized")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration validation failed
    #[error("Configuration validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<String> },

    /// Reading or writing the configuration file failed
    #[error("Configuration file I/O error: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Task pool error
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Catalog source error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Catalog lookup error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Ad-hoc HTTP failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Search error
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is transient and the operation may be retried
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Source(SourceError::Http(_))
            | AppError::Source(SourceError::Timeout { .. })
            | AppError::Catalog(CatalogError::Source(SourceError::Http(_)))
            | AppError::Catalog(CatalogError::Source(SourceError::Timeout { .. }))
            | AppError::Transport(TransportError::Http(_))
            | AppError::Search(SearchError::Superseded) => true,

            AppError::Catalog(CatalogError::NotFound { .. })
            | AppError::Pool(PoolError::Closed { .. })
            | AppError::Config(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Pool(_) => "pool",
            AppError::Source(_) => "source",
            AppError::Catalog(_) => "catalog",
            AppError::Transport(_) => "transport",
            AppError::Search(_) => "search",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Pool result type alias
pub type PoolResult<T> = std::result::Result<T, PoolError>;

/// Source result type alias
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Transport result type alias
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
