//! Crawl engine: orchestration, per-domain traversal, fetching, extraction
//!
//! Parallelism is across domains only. Within one domain pages are fetched
//! strictly one at a time in frontier order, which keeps each traversal's
//! visited set and frontier free of locking.

pub mod domain;
pub mod extractor;
pub mod fetcher;
pub mod orchestrator;

pub use domain::{DomainCrawler, FrontierEntry};
pub use extractor::{extract, Extracted};
pub use fetcher::{build_http_client, Fetcher};
pub use orchestrator::{start, CrawlSummary, Orchestrator};
