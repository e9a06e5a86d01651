//! Configuration module for Vacancy Finder
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file section is not an error.
//!
//! # Example
//!
//! ```no_run
//! use vacancy_finder::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("vacancy-finder.toml")).unwrap();
//! println!("Searching {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, SiteConfig, WorkerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
