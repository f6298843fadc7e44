//! Chromium-backed renderer
//!
//! One browser process is shared by all domain tasks in a job; every render
//! call opens its own page so concurrent renders never share a browsing
//! context. The page is closed on every exit path, navigation failures and
//! timeouts included.

use super::{RenderError, Renderer};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How long a navigation may take to settle before the render is abandoned
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

impl ChromiumRenderer {
    /// Launches the shared browser instance
    pub async fn launch() -> Result<Self, RenderError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .request_timeout(Duration::from_secs(30))
            .build()
            .map_err(RenderError::Browser)?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        // Drain CDP events; the stream ends when the browser goes away.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        // The browser lock is held only for page creation, not navigation.
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        let outcome = tokio::time::timeout(NAVIGATION_TIMEOUT, async {
            page.goto(url)
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;
            page.content()
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))
        })
        .await;

        let _ = page.close().await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(NAVIGATION_TIMEOUT)),
        }
    }

    async fn shutdown(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            tracing::debug!("browser close failed: {}", e);
        }
        let _ = browser.wait().await;
        self.handler.abort();
    }
}
