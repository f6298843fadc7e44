//! Job orchestration across domains
//!
//! The orchestrator dispatches one traversal per domain under a global
//! concurrency bound, owns the shared renderer's lifecycle, and emits the
//! job-level events. Once dispatch begins, individual domain failures never
//! abort the job; only pre-dispatch failures are job-fatal.

use crate::config::Config;
use crate::crawler::domain::DomainCrawler;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::event::{CrawlEvent, EventSink};
use crate::render;
use crate::results::ResultSink;
use crate::ScoutError;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of a completed job
#[derive(Debug)]
pub struct CrawlSummary {
    pub processed_domains: usize,
    /// Snapshot of the unique image set
    pub images: Vec<String>,
}

/// Runs one complete crawl job over the configured domain list
///
/// `on_event` receives every [`CrawlEvent`] in emission order; `on_found_image`
/// fires once per newly discovered unique image URL. Completes when every
/// domain is fully traversed. Config validation failures emit an `Error`
/// event and short-circuit before any domain is dispatched.
pub async fn start(
    config: Config,
    on_event: impl Fn(CrawlEvent) + Send + Sync + 'static,
    on_found_image: impl Fn(&str) + Send + Sync + 'static,
) -> crate::Result<CrawlSummary> {
    let events = EventSink::new(on_event);

    if let Err(e) = crate::config::validate(&config) {
        events.emit(CrawlEvent::Error {
            message: e.to_string(),
        });
        return Err(ScoutError::Config(e));
    }

    let sink = Arc::new(ResultSink::with_handler(on_found_image));
    match Orchestrator::new(config, events.clone(), sink) {
        Ok(orchestrator) => orchestrator.run().await,
        Err(e) => {
            // Client construction is the other pre-dispatch failure; it is
            // recorded the same way validation failures are.
            events.emit(CrawlEvent::Error {
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

/// Drives a validated job to completion
pub struct Orchestrator {
    config: Arc<Config>,
    client: Client,
    events: EventSink,
    sink: Arc<ResultSink>,
}

impl Orchestrator {
    pub fn new(config: Config, events: EventSink, sink: Arc<ResultSink>) -> crate::Result<Self> {
        let client = build_http_client(&config.crawler.user_agent)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            events,
            sink,
        })
    }

    pub async fn run(self) -> crate::Result<CrawlSummary> {
        tracing::info!(domains = self.config.domains.len(), "starting crawl");

        // The renderer is acquired exactly once per job; failure degrades
        // every fetch to no-render mode and is not fatal.
        let renderer =
            render::acquire(self.config.crawler.render_fallback, &self.events).await;
        let fetcher = Arc::new(Fetcher::new(self.client.clone(), Arc::clone(&renderer)));

        let limiter = Arc::new(Semaphore::new(self.config.crawler.concurrency as usize));
        let processed = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<()> = JoinSet::new();

        for domain in self.config.domains.clone() {
            // Acquire before spawning: domains dispatch as slots free, not
            // all at once.
            let Ok(permit) = Arc::clone(&limiter).acquire_owned().await else {
                break;
            };

            let fetcher = Arc::clone(&fetcher);
            let sink = Arc::clone(&self.sink);
            let events = self.events.clone();
            let processed = Arc::clone(&processed);
            let max_pages = self.config.crawler.max_pages_per_domain;
            let max_depth = self.config.crawler.max_depth;

            tasks.spawn(async move {
                let _permit = permit;
                let crawler = DomainCrawler::new(&domain, max_pages, max_depth);
                crawler.run(&fetcher, &sink, &events).await;

                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                events.emit(CrawlEvent::DomainDone {
                    domain,
                    processed_domains: done,
                });
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                // A panicked domain task never aborts the job.
                tracing::error!("domain task failed: {}", e);
                self.events.emit(CrawlEvent::Warn {
                    message: format!("domain task failed: {}", e),
                });
            }
        }

        renderer.shutdown().await;

        let unique_images = self.sink.len();
        tracing::info!(
            unique_images,
            processed_domains = processed.load(Ordering::SeqCst),
            "crawl complete"
        );
        self.events.emit(CrawlEvent::Done { unique_images });

        Ok(CrawlSummary {
            processed_domains: processed.load(Ordering::SeqCst),
            images: self.sink.snapshot(),
        })
    }
}
