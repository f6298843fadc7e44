//! Job-scoped deduplicated store of discovered image URLs
//!
//! Membership is the only semantics: insertion order carries no meaning and
//! duplicate inserts are no-ops.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use url::Url;

/// Callback invoked once per newly discovered image URL
pub type ImageHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Deduplicated set of normalized absolute image URLs for one job
///
/// Shared across all concurrently running domain tasks; the inner set is the
/// only cross-task mutable structure besides the event path, and it
/// serializes writers with a mutex.
pub struct ResultSink {
    images: Mutex<HashSet<String>>,
    on_found: Option<ImageHandler>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self {
            images: Mutex::new(HashSet::new()),
            on_found: None,
        }
    }

    /// A sink that invokes `handler` for every fresh insert
    pub fn with_handler(handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            images: Mutex::new(HashSet::new()),
            on_found: Some(Arc::new(handler)),
        }
    }

    /// Resolves a raw image reference against `base` and records it
    ///
    /// Resolution failure falls back to storing the raw string rather than
    /// dropping the reference. Returns true if the URL was new.
    pub fn add(&self, raw: &str, base: Option<&Url>) -> bool {
        let resolved = base
            .and_then(|b| crate::urls::resolve(b, raw))
            .map(|u| u.to_string())
            .unwrap_or_else(|| raw.to_string());

        let inserted = self.images.lock().unwrap().insert(resolved.clone());
        if inserted {
            if let Some(handler) = &self.on_found {
                handler(&resolved);
            }
        }
        inserted
    }

    /// Number of unique images discovered so far
    pub fn len(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the unique set for export; order is not meaningful
    pub fn snapshot(&self) -> Vec<String> {
        let mut images: Vec<String> = self.images.lock().unwrap().iter().cloned().collect();
        images.sort();
        images
    }
}

impl Default for ResultSink {
    fn default() -> Self {
        Self::new()
    }
}
