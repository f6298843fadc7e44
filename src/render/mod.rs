//! Optional headless render fallback
//!
//! The renderer is a polymorphic capability selected once per job: a real
//! chromium instance when the fallback is enabled and a browser can be
//! launched, otherwise a no-op stand-in. Injecting one of the two keeps
//! conditional-presence checks out of the traversal logic.

mod chromium;

pub use chromium::ChromiumRenderer;

use crate::event::{CrawlEvent, EventSink};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Render-specific errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// No renderer for this job; not a failure, just the no-op stand-in
    #[error("render fallback is disabled")]
    Disabled,

    #[error("render timed out after {0:?}")]
    Timeout(Duration),

    #[error("browser error: {0}")]
    Browser(String),
}

/// Capability to obtain a fully constructed document for a URL
///
/// `render` must use an isolated browsing context per call and release it on
/// every exit path. `shutdown` is called exactly once, after all domains
/// complete.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, RenderError>;

    async fn shutdown(&self);
}

/// Stand-in used when no browser is available or the fallback is disabled
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn render(&self, _url: &str) -> Result<String, RenderError> {
        Err(RenderError::Disabled)
    }

    async fn shutdown(&self) {}
}

/// Selects the renderer for a job, attempting the browser launch exactly once
///
/// Launch failure is non-fatal: it degrades every subsequent fetch to
/// no-render mode and is recorded as an info event.
pub async fn acquire(enabled: bool, events: &EventSink) -> Arc<dyn Renderer> {
    if !enabled {
        return Arc::new(NoopRenderer);
    }

    match ChromiumRenderer::launch().await {
        Ok(renderer) => {
            events.emit(CrawlEvent::Info {
                message: "headless renderer ready".to_string(),
            });
            Arc::new(renderer)
        }
        Err(e) => {
            tracing::info!("renderer unavailable: {}", e);
            events.emit(CrawlEvent::Info {
                message: format!("renderer unavailable ({}), continuing without render fallback", e),
            });
            Arc::new(NoopRenderer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_renderer_reports_disabled() {
        let renderer = NoopRenderer;
        let result = renderer.render("http://example.com").await;
        assert!(matches!(result, Err(RenderError::Disabled)));
    }

    #[tokio::test]
    async fn test_acquire_disabled_returns_noop() {
        let renderer = acquire(false, &EventSink::ignore()).await;
        assert!(matches!(
            renderer.render("http://example.com").await,
            Err(RenderError::Disabled)
        ));
    }
}
