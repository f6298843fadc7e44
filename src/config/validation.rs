use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// An empty domain list is valid: the job completes immediately with zero
/// results.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    for domain in &config.domains {
        validate_domain(domain)?;
    }
    Ok(())
}

/// Validates crawler limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.max_pages_per_domain < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-per-domain must be >= 1, got {}",
            config.max_pages_per_domain
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates one domain entry
///
/// Domains are bare hosts ("example.com", optionally with a port). They must
/// survive seed normalization and yield a hostname.
fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    if domain.trim().is_empty() {
        return Err(ConfigError::InvalidDomain(
            "domain cannot be empty".to_string(),
        ));
    }

    if domain.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidDomain(format!(
            "domain cannot contain whitespace: '{}'",
            domain
        )));
    }

    let seed = crate::urls::normalize_seed(domain);
    let parsed = Url::parse(&seed)
        .map_err(|e| ConfigError::InvalidDomain(format!("'{}': {}", domain, e)))?;

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidDomain(format!(
            "'{}' has no hostname",
            domain
        )));
    }

    Ok(())
}
