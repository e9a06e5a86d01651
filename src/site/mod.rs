//! Site adapters for job search result pages
//!
//! This module contains:
//! - The `SiteAdapter` trait every supported search site implements
//! - The `Listing` record extracted from result pages
//! - Salary text parsing and text cleanup shared by adapters
//! - The HeadHunter adapter
//!
//! The search orchestrator only talks to `SiteAdapter`, so supporting another
//! site means adding an adapter, never changing the orchestrator.

mod headhunter;
mod salary;
pub mod text;

pub use headhunter::HeadHunterAdapter;
pub use salary::{parse_salary, SalaryRange};

use crate::url::{EncodedQuery, PagePlanner, PageUrls};
use crate::Result;
use std::num::NonZeroU64;

/// One job posting with a usable salary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    title: String,
    employer: String,
    metro_station: Option<String>,
    salary: NonZeroU64,
    url: String,
}

impl Listing {
    /// Creates a listing; the salary is in the target currency
    pub fn new(
        title: impl Into<String>,
        employer: impl Into<String>,
        metro_station: Option<String>,
        salary: NonZeroU64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            employer: employer.into(),
            metro_station,
            salary,
            url: url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn employer(&self) -> &str {
        &self.employer
    }

    pub fn metro_station(&self) -> Option<&str> {
        self.metro_station.as_deref()
    }

    /// Representative salary, always positive
    pub fn salary(&self) -> u64 {
        self.salary.get()
    }

    /// Address of the listing's detail page
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Everything extracted from one result page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Listings in document order
    pub listings: Vec<Listing>,

    /// Total result pages announced by the pager; `None` when the page has no pager
    pub total_pages: Option<usize>,
}

/// A job search site the orchestrator can paginate and parse
pub trait SiteAdapter: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Address builder for this site's result pages
    fn planner(&self) -> &PagePlanner;

    /// Address of the first result page for `query`
    fn result_url(&self, query: &EncodedQuery) -> String {
        self.planner().url_for_page(query, 0)
    }

    /// Every result-page address for `query`, starting at page 0
    fn page_urls(&self, query: &EncodedQuery) -> PageUrls {
        self.planner().page_urls(query)
    }

    /// Extracts listings and the pager's page count from one page
    ///
    /// Malformed listings are skipped; only page-level structure problems
    /// are returned as errors.
    fn parse_page(&self, html: &str, page_url: &str) -> Result<ParsedPage>;
}
