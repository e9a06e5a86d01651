//! Vacancy Finder: salary statistics from paginated job search results
//!
//! This crate discovers how many result pages a job search has, fetches them
//! with bounded parallelism, extracts listings from each page and reduces the
//! collected salaries to descriptive statistics.

pub mod config;
pub mod crawler;
pub mod output;
pub mod site;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Vacancy Finder operations
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Pager does not end with a page number: {text:?}")]
    Pagination { text: String },

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Statistics-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("Statistics requested for an empty listing set")]
    EmptyListingSet,
}

/// Result type alias for Vacancy Finder operations
pub type Result<T> = std::result::Result<T, FinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{HttpFetcher, PageFetcher, SearchEvent, SearchReport, StopHandle, VacancyFinder};
pub use output::{Statistics, StatsComparison};
pub use site::{parse_salary, HeadHunterAdapter, Listing, ParsedPage, SiteAdapter};
pub use state::RunState;
pub use crate::url::{EncodedQuery, PagePlanner, PageUrls};
