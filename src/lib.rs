//! Kobis-Scraper: typed extraction of movie and box-office records
//!
//! This crate scrapes the KOBIS movie database site. It turns the daily
//! box-office ranking page, the search listing, the per-movie detail popup
//! and the actor-list JSON endpoint into typed, queryable values.

pub mod boxoffice;
pub mod cache;
pub mod config;
pub mod decoders;
pub mod extract;
pub mod kobis;
pub mod policy;
pub mod transport;

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for Kobis-Scraper operations
#[derive(Debug, Error)]
pub enum KobisError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Malformed page ({context}): {message}")]
    MalformedPage { context: String, message: String },

    #[error("Box office for {0} was not scraped")]
    DateNotScraped(NaiveDate),

    #[error("Field '{field}' not found for movie {code}")]
    FieldNotFound { code: u32, field: String },

    #[error("JSON decode error at '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

impl KobisError {
    /// Builds a `MalformedPage` error
    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPage {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Classifies the error into its taxonomy bucket
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::MalformedPage { .. } | Self::Json { .. } => ErrorKind::MalformedPage,
            Self::DateNotScraped(_) => ErrorKind::DateNotScraped,
            Self::FieldNotFound { .. } => ErrorKind::FieldNotFound,
            Self::Config(_) | Self::HttpClient(_) => ErrorKind::Config,
        }
    }
}

/// Coarse classification of [`KobisError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The site could not be reached
    Transport,
    /// An expected structural element was missing or unparsable
    MalformedPage,
    /// A box-office date outside the scraped result set was queried
    DateNotScraped,
    /// A named info panel is missing from a well-formed page
    FieldNotFound,
    /// Setup failed before any request was made
    Config,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Kobis-Scraper operations
pub type Result<T> = std::result::Result<T, KobisError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use boxoffice::{BoxOffice, BoxOfficeEntry};
pub use cache::{DetailCache, DetailDocument};
pub use config::Config;
pub use decoders::{ActorEntry, ImageKind, MovieCode, RoleType};
pub use kobis::Kobis;
pub use policy::{FailurePolicy, Operation};
pub use transport::{Endpoint, FormFields, Transport};
