//! Crawl events: the taxonomy, the emission path, and the replayable log
//!
//! Events are the crawl's only live output besides the result sink. Emission
//! order is the only ordering guarantee; consumers must not assume global
//! coherence across domains beyond it.
//!
//! [`EventSink`] is the write side handed to the crawler: a cheap, cloneable
//! callback wrapper. [`EventLog`] is the read side a status transport builds
//! on: a bounded append-only backlog plus live fan-out, where a late
//! subscriber first receives the retained backlog and is then switched to
//! live delivery with no gap and no duplicate.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Default number of events retained for replay
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// A structured notification of crawl progress or outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CrawlEvent {
    /// General job-level information
    Info { message: String },

    /// A page is being visited
    Progress {
        domain: String,
        url: String,
        depth: u32,
    },

    /// A locally recovered per-page failure
    Warn { message: String },

    /// Periodic per-domain page count
    DomainProgress {
        domain: String,
        #[serde(rename = "pages-visited")]
        pages_visited: u32,
    },

    /// A domain traversal reached its terminal state
    DomainDone {
        domain: String,
        #[serde(rename = "processed-domains")]
        processed_domains: usize,
    },

    /// The job failed before any domain was dispatched
    Error { message: String },

    /// The job completed; carries the total unique image count
    Done {
        #[serde(rename = "unique-images")]
        unique_images: usize,
    },
}

/// Cloneable handle the crawler emits events through
///
/// Concurrent domain tasks all write through the same sink; whatever the
/// callback does (push to an [`EventLog`], print, collect into a Vec) must
/// itself serialize writers; the implementations in this crate use a mutex.
#[derive(Clone)]
pub struct EventSink {
    inner: Arc<dyn Fn(CrawlEvent) + Send + Sync>,
}

impl EventSink {
    pub fn new(handler: impl Fn(CrawlEvent) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(handler),
        }
    }

    /// A sink that discards every event
    pub fn ignore() -> Self {
        Self::new(|_| {})
    }

    pub fn emit(&self, event: CrawlEvent) {
        (self.inner)(event);
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EventSink")
    }
}

/// Bounded append-only event log with live fan-out
///
/// `publish` appends to the backlog (discarding the oldest entry past the
/// capacity) and broadcasts to live subscribers. `subscribe` takes the same
/// lock `publish` takes, so the backlog snapshot and the live receiver are
/// consistent: every event is seen exactly once, either replayed or live.
pub struct EventLog {
    backlog: Mutex<VecDeque<CrawlEvent>>,
    live: broadcast::Sender<CrawlEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (live, _) = broadcast::channel(capacity);
        Self {
            backlog: Mutex::new(VecDeque::with_capacity(capacity)),
            live,
            capacity,
        }
    }

    /// Appends an event and delivers it to live subscribers
    pub fn publish(&self, event: CrawlEvent) {
        let mut backlog = self.backlog.lock().unwrap();
        if backlog.len() == self.capacity {
            backlog.pop_front();
        }
        backlog.push_back(event.clone());
        // No-receiver errors are expected when nobody is watching.
        let _ = self.live.send(event);
    }

    /// Returns the retained backlog and a receiver for everything after it
    pub fn subscribe(&self) -> (Vec<CrawlEvent>, broadcast::Receiver<CrawlEvent>) {
        let backlog = self.backlog.lock().unwrap();
        let replay = backlog.iter().cloned().collect();
        let receiver = self.live.subscribe();
        (replay, receiver)
    }

    /// Number of events currently retained
    pub fn len(&self) -> usize {
        self.backlog.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An [`EventSink`] that publishes into this log
    pub fn sink(self: &Arc<Self>) -> EventSink {
        let log = Arc::clone(self);
        EventSink::new(move |event| log.publish(event))
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
