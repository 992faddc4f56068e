use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// How far page loading must progress before the document is handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Initial markup parsed; images and late scripts may still be pending.
    #[default]
    DomContentLoaded,
    /// Every sub-resource finished loading.
    Load,
}

/// Failure to obtain the match page at all.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("timed out loading {url}")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to read page body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Renders a page and returns its loaded document markup.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, policy: LoadPolicy) -> Result<String, RetrievalError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Renderer backed by a plain HTTP GET.
///
/// The scoreboard page ships its live figures in the initial markup, so the
/// server response is already the `DomContentLoaded` document. `Load` is
/// accepted but resolves the same way since no sub-resources are fetched.
pub struct HttpRenderer {
    http: Client,
}

impl HttpRenderer {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpRenderer { http })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    fn name(&self) -> &str {
        "http"
    }

    async fn render(&self, url: &str, policy: LoadPolicy) -> Result<String, RetrievalError> {
        debug!("Rendering {} ({:?})", url, policy);

        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout { url: url.to_string() }
            } else {
                RetrievalError::Request {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        if !resp.status().is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }

        resp.text().await.map_err(|e| RetrievalError::Body {
            url: url.to_string(),
            source: e,
        })
    }
}
