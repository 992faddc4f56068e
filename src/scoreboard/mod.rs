pub mod defaults;
pub mod extract;
pub mod models;
pub mod renderer;
pub mod rules;

pub use extract::extract_snapshot;
pub use models::{BatsmanInfo, MatchSnapshot};
pub use renderer::{HttpRenderer, LoadPolicy, PageRenderer, RetrievalError};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ticker::SnapshotSource;

/// Renders the configured match page and extracts a snapshot from it.
#[derive(Clone)]
pub struct SnapshotService {
    renderer: Arc<dyn PageRenderer>,
    url: String,
    policy: LoadPolicy,
}

impl SnapshotService {
    pub fn new(renderer: Arc<dyn PageRenderer>, url: impl Into<String>, policy: LoadPolicy) -> Self {
        SnapshotService {
            renderer,
            url: url.into(),
            policy,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Render the page and extract it.
    ///
    /// Only retrieval can fail; a page that loads but lacks the expected
    /// structure still produces a (defaulted) snapshot.
    pub async fn fetch(&self) -> Result<MatchSnapshot, RetrievalError> {
        let markup = self.renderer.render(&self.url, self.policy).await?;
        debug!(
            "[{}] Loaded {} bytes from {}",
            self.renderer.name(),
            markup.len(),
            self.url
        );

        // html5ever parsing is CPU-bound; keep it off the async workers
        match tokio::task::spawn_blocking(move || extract_snapshot(&markup)).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!("Extraction task failed: {}", e);
                Ok(MatchSnapshot::default())
            }
        }
    }
}

#[async_trait]
impl SnapshotSource for SnapshotService {
    async fn fetch_snapshot(&self) -> anyhow::Result<MatchSnapshot> {
        Ok(self.fetch().await?)
    }
}
