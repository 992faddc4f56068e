use anyhow::Result;
use async_trait::async_trait;

use crate::scoreboard::MatchSnapshot;

/// Anything the poller can ask for a fresh snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<MatchSnapshot>;
}
