//! In-memory job registry
//!
//! The library side of the submission/status/export transports: an explicit
//! registry keyed by job id instead of an implicit global table. Each job
//! owns its bounded event log and result sink; observers can attach and
//! detach at any time without affecting crawl progress, and every job
//! reaches a terminal status. Finished jobs are evicted by [`JobRegistry::prune`];
//! nothing is retained across processes.

use crate::config::Config;
use crate::crawler;
use crate::event::EventLog;
use crate::results::ResultSink;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Lifecycle state of a submitted job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Done { unique_images: usize },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

/// One submitted crawl with its observable state
pub struct Job {
    pub id: Uuid,
    /// Bounded replayable event stream
    pub events: Arc<EventLog>,
    /// Live view of the unique image set
    pub results: Arc<ResultSink>,
    state: Mutex<JobState>,
}

struct JobState {
    status: JobStatus,
    finished_at: Option<Instant>,
}

impl Job {
    fn new(id: Uuid, events: Arc<EventLog>, results: Arc<ResultSink>) -> Self {
        Self {
            id,
            events,
            results,
            state: Mutex::new(JobState {
                status: JobStatus::Running,
                finished_at: None,
            }),
        }
    }

    pub fn status(&self) -> JobStatus {
        self.state.lock().unwrap().status.clone()
    }

    fn finish(&self, status: JobStatus) {
        let mut state = self.state.lock().unwrap();
        state.status = status;
        state.finished_at = Some(Instant::now());
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.state
            .lock()
            .unwrap()
            .finished_at
            .map(|at| at.elapsed() >= ttl)
            .unwrap_or(false)
    }
}

/// Registry of in-flight and recently finished jobs
#[derive(Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<Uuid, Arc<Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a job id and spawns the crawl; returns immediately
    ///
    /// The job's status flips to `Done` or `Failed` when the crawl
    /// terminates; there is no mid-job cancellation.
    pub fn submit(&self, config: Config) -> Uuid {
        let id = Uuid::new_v4();
        let events = Arc::new(EventLog::new());
        let results = Arc::new(ResultSink::new());
        let job = Arc::new(Job::new(id, Arc::clone(&events), Arc::clone(&results)));

        self.jobs.lock().unwrap().insert(id, Arc::clone(&job));

        let sink = events.sink();
        tokio::spawn(async move {
            let outcome = crawler::start(
                config,
                move |event| sink.emit(event),
                move |url| {
                    // Already normalized by the crawl's own sink.
                    results.add(url, None);
                },
            )
            .await;

            match outcome {
                Ok(summary) => job.finish(JobStatus::Done {
                    unique_images: summary.images.len(),
                }),
                Err(e) => job.finish(JobStatus::Failed {
                    message: e.to_string(),
                }),
            }
        });

        id
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Job>> {
        self.jobs.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evicts finished jobs whose terminal state is at least `ttl` old
    ///
    /// Running jobs are never evicted.
    pub fn prune(&self, ttl: Duration) -> usize {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|_, job| !job.expired(ttl));
        before - jobs.len()
    }
}
