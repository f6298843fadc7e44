//! Per-domain breadth-first traversal
//!
//! Each domain task exclusively owns its frontier, visited set, and page
//! counter; nothing here is shared across tasks. Pages are fetched strictly
//! one at a time in frontier order, so traversal within a domain is
//! deterministic.

use crate::crawler::extractor;
use crate::crawler::fetcher::Fetcher;
use crate::event::{CrawlEvent, EventSink};
use crate::results::ResultSink;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A domain-progress event fires every this many pages
const PROGRESS_INTERVAL: u32 = 5;

/// A discovered, not-yet-visited page awaiting traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// Breadth-first traversal state for one domain
pub struct DomainCrawler {
    /// The configured domain entry, used in events
    domain: String,
    /// Hostname the traversal is scoped to
    host: String,
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    pages_visited: u32,
    max_pages: u32,
    max_depth: u32,
}

impl DomainCrawler {
    pub fn new(domain: &str, max_pages: u32, max_depth: u32) -> Self {
        // Canonicalize through Url so the seed and later link-resolved
        // forms of the same page compare equal in the visited set.
        let seed = crate::urls::normalize_seed(domain);
        let (seed, host) = match Url::parse(&seed) {
            Ok(u) => {
                let host = u.host_str().unwrap_or(domain).to_string();
                (u.to_string(), host)
            }
            Err(_) => (seed, domain.to_string()),
        };

        let mut frontier = VecDeque::new();
        frontier.push_back(FrontierEntry {
            url: seed,
            depth: 0,
        });

        Self {
            domain: domain.to_string(),
            host,
            frontier,
            visited: HashSet::new(),
            pages_visited: 0,
            max_pages,
            max_depth,
        }
    }

    /// Runs the traversal to completion and returns the page count
    ///
    /// FIFO dequeueing guarantees strict breadth-first order: every entry at
    /// depth d is processed before any entry at depth d+1. A domain with
    /// zero fetchable pages terminates normally; that is not an error.
    pub async fn run(mut self, fetcher: &Fetcher, sink: &ResultSink, events: &EventSink) -> u32 {
        while self.pages_visited < self.max_pages {
            let Some(entry) = self.frontier.pop_front() else {
                break;
            };

            // Already-visited entries are discarded without consuming budget.
            if !self.visited.insert(entry.url.clone()) {
                continue;
            }

            events.emit(CrawlEvent::Progress {
                domain: self.domain.clone(),
                url: entry.url.clone(),
                depth: entry.depth,
            });

            let content = fetcher.fetch(&entry.url, events).await;

            // Attempts are metered, not successes: a failed fetch still
            // costs one unit of page budget.
            self.pages_visited += 1;

            if !content.is_empty() {
                self.process_page(&entry, &content, sink);
            }

            if self.pages_visited % PROGRESS_INTERVAL == 0 {
                events.emit(CrawlEvent::DomainProgress {
                    domain: self.domain.clone(),
                    pages_visited: self.pages_visited,
                });
            }
        }

        tracing::debug!(
            domain = %self.domain,
            pages = self.pages_visited,
            frontier_left = self.frontier.len(),
            "domain traversal complete"
        );
        self.pages_visited
    }

    /// Forwards a page's images to the sink and qualifying links back onto
    /// the frontier
    fn process_page(&mut self, entry: &FrontierEntry, content: &str, sink: &ResultSink) {
        let base = Url::parse(&entry.url).ok();
        let extracted = extractor::extract(content);

        for image in &extracted.images {
            sink.add(image, base.as_ref());
        }

        if entry.depth >= self.max_depth {
            return;
        }
        let Some(base) = base else {
            return;
        };

        for link in &extracted.links {
            // Malformed references are silently discarded.
            let Some(mut resolved) = crate::urls::resolve(&base, link) else {
                continue;
            };
            if !crate::urls::in_scope(&resolved, &self.host) {
                continue;
            }
            resolved.set_fragment(None);
            let url = resolved.to_string();
            if !self.visited.contains(&url) {
                self.frontier.push_back(FrontierEntry {
                    url,
                    depth: entry.depth + 1,
                });
            }
        }
    }
}
