use serde::Deserialize;

/// Main configuration structure for Vacancy Finder
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
}

/// Search site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Address of the search results page, without query string
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Region filter passed to the search
    pub area: u32,

    /// Currency the site should report salaries in
    #[serde(rename = "currency-code")]
    pub currency_code: String,

    /// Ask the site to return only listings that publish a salary
    #[serde(rename = "only-with-salary")]
    pub only_with_salary: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hh.ru/search/vacancy".to_string(),
            area: 1,
            currency_code: "RUR".to_string(),
            only_with_salary: true,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Timeout for both the connect and read phases of a request (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            user_agent: format!("vacancy-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Lower bound on concurrent page fetches
    #[serde(rename = "min-workers")]
    pub min_workers: usize,

    /// Upper bound on concurrent page fetches
    #[serde(rename = "max-workers")]
    pub max_workers: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            min_workers: 2,
            max_workers: 8,
        }
    }
}
