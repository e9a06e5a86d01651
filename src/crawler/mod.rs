//! Crawler module for fetching and processing result pages
//!
//! This module contains the core search logic, including:
//! - HTTP fetching behind the `PageFetcher` seam
//! - The bounded worker pool
//! - Overall search coordination, progress and stopping

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{SearchEvent, SearchReport, StopHandle, VacancyFinder};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use scheduler::{pool_size, WorkerPool};

use crate::config::Config;
use crate::site::HeadHunterAdapter;
use crate::Result;
use std::sync::Arc;

/// Builds a finder for the configured site with HTTP fetching
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(VacancyFinder)` - An idle finder ready to `start`
/// * `Err(FinderError)` - The HTTP client or the adapter could not be built
pub fn finder_from_config(config: &Config) -> Result<VacancyFinder> {
    let adapter = HeadHunterAdapter::new(&config.site)?;
    let fetcher = HttpFetcher::new(&config.fetcher)?;

    Ok(VacancyFinder::new(
        Arc::new(adapter),
        Arc::new(fetcher),
        WorkerPool::from_config(&config.workers),
    ))
}
