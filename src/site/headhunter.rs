//! HeadHunter (hh.ru) result page adapter
//!
//! Result pages mark their parts with `data-qa` attributes:
//! - pager entries: `pager-page`, the last one holds the total page count
//! - listing blocks: `vacancy-serp__vacancy`
//! - inside a block: `vacancy-serp__vacancy-compensation`,
//!   `vacancy-serp__vacancy-title`, `vacancy-serp__vacancy-employer`
//!
//! The metro station is a `span` with class `metro-station`.

use crate::config::SiteConfig;
use crate::site::text::{clean_text, normalize_whitespace};
use crate::site::{parse_salary, Listing, ParsedPage, SiteAdapter};
use crate::url::PagePlanner;
use crate::{FinderError, Result};
use scraper::{ElementRef, Html, Selector};
use std::num::NonZeroU64;
use url::Url;

/// Employer shown when a listing has no employer link
const UNKNOWN_EMPLOYER: &str = "?";

struct Selectors {
    pager: Selector,
    item: Selector,
    salary: Selector,
    title: Selector,
    employer: Selector,
    metro: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            pager: selector("[data-qa='pager-page']")?,
            item: selector("div[data-qa~='vacancy-serp__vacancy']")?,
            salary: selector("span[data-qa='vacancy-serp__vacancy-compensation']")?,
            title: selector("a[data-qa='vacancy-serp__vacancy-title']")?,
            employer: selector("a[data-qa='vacancy-serp__vacancy-employer']")?,
            metro: selector("span.metro-station")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FinderError::Selector(format!("{}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Adapter for hh.ru vacancy search
pub struct HeadHunterAdapter {
    planner: PagePlanner,
    selectors: Selectors,
}

impl HeadHunterAdapter {
    /// Creates the adapter from site configuration
    ///
    /// Every page request carries the configured currency, region and
    /// salary-only filters.
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut planner = PagePlanner::new(config.base_url.as_str())
            .with_param("currency_code", &config.currency_code);
        if config.only_with_salary {
            planner = planner.with_param("only_with_salary", "true");
        }
        planner = planner.with_param("area", &config.area.to_string());

        Ok(Self {
            planner,
            selectors: Selectors::new()?,
        })
    }

    /// Reads the total page count from the pager
    ///
    /// No pager means the search found nothing.
    fn total_pages(&self, document: &Html) -> Result<Option<usize>> {
        let Some(last) = document.select(&self.selectors.pager).last() else {
            return Ok(None);
        };

        let text = normalize_whitespace(&element_text(last));
        text.parse::<usize>()
            .map(Some)
            .map_err(|_| FinderError::Pagination { text })
    }

    /// Builds a listing from one result block whose salary is already known
    fn extract_listing(
        &self,
        item: ElementRef<'_>,
        salary: NonZeroU64,
        base: Option<&Url>,
    ) -> std::result::Result<Listing, String> {
        let title_link = item
            .select(&self.selectors.title)
            .next()
            .ok_or_else(|| "missing title link".to_string())?;

        let title = clean_text(&element_text(title_link));
        if title.is_empty() {
            return Err("empty title".to_string());
        }

        let href = title_link
            .value()
            .attr("href")
            .ok_or_else(|| format!("title link of '{}' has no href", title))?;
        let url = match base {
            Some(base) => base
                .join(href.trim())
                .map_err(|e| format!("bad href '{}': {}", href, e))?
                .to_string(),
            None => href.trim().to_string(),
        };

        let employer = item
            .select(&self.selectors.employer)
            .next()
            .map(|e| clean_text(&element_text(e)))
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| UNKNOWN_EMPLOYER.to_string());

        let metro_station = item
            .select(&self.selectors.metro)
            .next()
            .map(|m| normalize_whitespace(&element_text(m)))
            .filter(|m| !m.is_empty());

        Ok(Listing::new(title, employer, metro_station, salary, url))
    }
}

impl SiteAdapter for HeadHunterAdapter {
    fn name(&self) -> &str {
        "hh.ru"
    }

    fn planner(&self) -> &PagePlanner {
        &self.planner
    }

    fn parse_page(&self, html: &str, page_url: &str) -> Result<ParsedPage> {
        let document = Html::parse_document(html);
        let total_pages = self.total_pages(&document)?;
        let base = Url::parse(page_url).ok();

        let mut listings = Vec::new();
        for item in document.select(&self.selectors.item) {
            let Some(salary_text) = item.select(&self.selectors.salary).next().map(element_text)
            else {
                continue;
            };

            let Some(salary) = parse_salary(&salary_text).and_then(NonZeroU64::new) else {
                tracing::trace!("Unusable salary {:?} on {}", salary_text, page_url);
                continue;
            };

            match self.extract_listing(item, salary, base.as_ref()) {
                Ok(listing) => listings.push(listing),
                Err(reason) => tracing::debug!("Skipping listing on {}: {}", page_url, reason),
            }
        }

        Ok(ParsedPage {
            listings,
            total_pages,
        })
    }
}
