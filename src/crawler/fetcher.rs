//! Page rendering and HTTP client construction
//!
//! This module handles all listing page requests for the crawler, including:
//! - Building the HTTP client shared by every component of a run
//! - The `PageRenderer` seam the category crawler renders pages through
//! - Classifying render failures (readiness timeout vs. hard failure)

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while rendering a listing page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page {url} did not become ready within {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("page {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A rendered listing page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL of the document after redirects; relative links resolve against it
    pub final_url: Url,

    /// Document markup
    pub html: String,
}

/// Produces the document of a listing page
///
/// The category crawler only depends on this trait, so a browser-backed
/// implementation can replace [`HttpRenderer`] for sites that build their
/// listings client-side.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders `url`, giving up with [`RenderError::Timeout`] after `timeout`
    async fn render(&self, url: &Url, timeout: Duration) -> Result<RenderedPage, RenderError>;
}

/// Renders pages by fetching their server-side HTML
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url, timeout: Duration) -> Result<RenderedPage, RenderError> {
        let classify = |source: reqwest::Error| {
            if source.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                RenderError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(classify)?;

        Ok(RenderedPage { final_url, html })
    }
}

/// Builds the HTTP client used for the whole run
///
/// # Example
///
/// ```no_run
/// use catalog_harvester::config::UserAgentConfig;
/// use catalog_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
