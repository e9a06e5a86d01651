use crate::config::types::{Config, FetcherConfig, SiteConfig, WorkerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_worker_config(&config.workers)?;
    Ok(())
}

/// Validates search site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must not carry a query string",
            config.base_url
        )));
    }

    if config.currency_code.is_empty()
        || !config.currency_code.chars().all(|c| c.is_ascii_uppercase())
    {
        return Err(ConfigError::Validation(format!(
            "currency_code must be uppercase ASCII letters, got '{}'",
            config.currency_code
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 || config.timeout_seconds > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be between 1 and 120, got {}",
            config.timeout_seconds
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker pool bounds
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.min_workers < 2 {
        return Err(ConfigError::Validation(format!(
            "min_workers must be >= 2, got {}",
            config.min_workers
        )));
    }

    if config.max_workers < config.min_workers || config.max_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between min_workers ({}) and 64, got {}",
            config.min_workers, config.max_workers
        )));
    }

    Ok(())
}
