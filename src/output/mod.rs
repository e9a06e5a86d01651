//! Output module for search results
//!
//! This module handles:
//! - Reducing listings into salary statistics
//! - Comparing statistics across queries and rendering them for the terminal
//! - Exporting listings and statistics as delimited text

mod export;
pub mod stats;

pub use export::{export_listings, export_statistics, write_listings, write_statistics};
pub use stats::{format_salary, print_statistics, render_comparison, Statistics, StatsComparison};
