//! HTTP fetcher with headless render fallback
//!
//! This module handles all page retrieval for the crawler:
//! - Building the HTTP client with timeout and redirect handling
//! - GET requests gated on an HTML content type
//! - Degrading thin or empty responses through the renderer
//! - Classifying failures into warn events, never fatal errors

use crate::event::{CrawlEvent, EventSink};
use crate::render::{RenderError, Renderer};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Overall request timeout
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Responses shorter than this are treated as implausibly thin and retried
/// through the renderer when one is available
const RENDER_THRESHOLD_BYTES: usize = 256;

/// Builds the HTTP client shared by all domain tasks
///
/// Redirects are followed (reqwest's default policy, up to 10 hops).
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(FETCH_TIMEOUT)
        .connect_timeout(Duration::from_secs(5))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves page content, falling back to the renderer for thin pages
///
/// Every failure mode is locally recovered: the result is simply empty
/// content, and the caller still charges the attempt against the page
/// budget.
pub struct Fetcher {
    client: Client,
    renderer: Arc<dyn Renderer>,
}

impl Fetcher {
    pub fn new(client: Client, renderer: Arc<dyn Renderer>) -> Self {
        Self { client, renderer }
    }

    /// Fetches a URL and returns its HTML content, or an empty string
    ///
    /// Schemeless URLs are normalized with an `http://` prefix first. If the
    /// plain fetch yields nothing or implausibly little, the renderer gets
    /// one chance to produce the fully constructed document.
    pub async fn fetch(&self, url: &str, events: &EventSink) -> String {
        let url = crate::urls::normalize_seed(url);
        let body = self.fetch_plain(&url, events).await;

        if body.len() >= RENDER_THRESHOLD_BYTES {
            return body;
        }

        match self.renderer.render(&url).await {
            Ok(rendered) if rendered.len() > body.len() => rendered,
            Ok(_) => body,
            Err(RenderError::Disabled) => body,
            Err(e) => {
                events.emit(CrawlEvent::Warn {
                    message: format!("render failed for {}: {}", url, e),
                });
                body
            }
        }
    }

    async fn fetch_plain(&self, url: &str, events: &EventSink) -> String {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                events.emit(CrawlEvent::Warn {
                    message: format!("fetch failed for {}: {}", url, e),
                });
                return String::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            // Non-2xx is worth reporting but does not discard the body.
            events.emit(CrawlEvent::Warn {
                message: format!("HTTP {} for {}", status.as_u16(), url),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("html") {
            events.emit(CrawlEvent::Warn {
                message: format!("skipping non-HTML content at {} ({})", url, content_type),
            });
            return String::new();
        }

        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                events.emit(CrawlEvent::Warn {
                    message: format!("failed to read body of {}: {}", url, e),
                });
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NoopRenderer;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher() -> Fetcher {
        let client = build_http_client("TestScout/1.0").unwrap();
        Fetcher::new(client, Arc::new(NoopRenderer))
    }

    fn collecting_sink() -> (EventSink, Arc<Mutex<Vec<CrawlEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&events);
        let sink = EventSink::new(move |event| captured.lock().unwrap().push(event));
        (sink, events)
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client("TestScout/1.0").is_ok());
    }

    #[tokio::test]
    async fn test_html_response_is_returned() {
        let server = MockServer::start().await;
        let html = format!("<html><body>{}</body></html>", "x".repeat(300));
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html.clone(), "text/html"))
            .mount(&server)
            .await;

        let content = test_fetcher()
            .fetch(&format!("{}/", server.uri()), &EventSink::ignore())
            .await;
        assert_eq!(content, html);
    }

    #[tokio::test]
    async fn test_non_html_content_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{\"images\": []}", "application/json"),
            )
            .mount(&server)
            .await;

        let (sink, events) = collecting_sink();
        let content = test_fetcher()
            .fetch(&format!("{}/data.json", server.uri()), &sink)
            .await;

        assert!(content.is_empty());
        // The warning names the actual content type of the skipped response.
        let warned = events.lock().unwrap().iter().any(|e| {
            matches!(e, CrawlEvent::Warn { message } if message.contains("application/json"))
        });
        assert!(warned);
    }

    #[tokio::test]
    async fn test_non_2xx_warns_but_keeps_html_body() {
        let server = MockServer::start().await;
        let html = format!("<html><body>{}</body></html>", "x".repeat(300));
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(html.clone(), "text/html"))
            .mount(&server)
            .await;

        let (sink, events) = collecting_sink();
        let content = test_fetcher()
            .fetch(&format!("{}/gone", server.uri()), &sink)
            .await;

        assert_eq!(content, html);
        let warned = events.lock().unwrap().iter().any(|e| {
            matches!(e, CrawlEvent::Warn { message } if message.contains("HTTP 404"))
        });
        assert!(warned);
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty() {
        let (sink, events) = collecting_sink();
        // Reserved TEST-NET address, nothing listens there.
        let content = test_fetcher()
            .fetch("http://192.0.2.1:9/", &sink)
            .await;

        assert!(content.is_empty());
        assert!(!events.lock().unwrap().is_empty());
    }
}
