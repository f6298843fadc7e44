use serde::Deserialize;

/// Main configuration structure for picscout
///
/// A config describes one crawl job: the ordered list of domains to visit
/// and the crawler limits. It is immutable for the lifetime of the job.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Domains to crawl, in dispatch order (e.g. "example.com")
    pub domains: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of domains crawled concurrently
    pub concurrency: u32,

    /// Maximum pages visited per domain (fetch attempts, not successes)
    #[serde(rename = "max-pages-per-domain")]
    pub max_pages_per_domain: u32,

    /// Maximum link depth from the seed page (0 = seed page only)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Whether to fall back to a headless browser for thin pages
    #[serde(rename = "render-fallback")]
    pub render_fallback: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            max_pages_per_domain: 20,
            max_depth: 2,
            render_fallback: true,
            user_agent: format!("picscout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Builds a config from a plain domain list with default limits
    pub fn from_domains(domains: Vec<String>) -> Self {
        Self {
            domains,
            crawler: CrawlerConfig::default(),
        }
    }
}
