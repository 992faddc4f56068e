//! The single "latest snapshot" slot shared between the poller and the views.
//!
//! ```text
//!            ok                      ok
//!  Loading ──────▶ Ready(snap) ◀───────────┐
//!     │                 │ err: keep snap   │
//!     │ err             └──────────────────┘
//!     ▼        ok
//!   Failed ──────▶ Ready(snap)
//! ```
//!
//! Results are tagged with the sequence number of the fetch that produced
//! them. A snapshot is only applied if it comes from a newer fetch than the
//! one currently shown, so a slow response cannot roll the ticker back.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::scoreboard::MatchSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum TickerState {
    /// No fetch has completed yet.
    Loading,
    Ready(Arc<MatchSnapshot>),
    /// The first fetch failed and nothing has been loaded since.
    Failed,
}

impl TickerState {
    pub fn label(&self) -> &'static str {
        match self {
            TickerState::Loading => "loading",
            TickerState::Ready(_) => "ready",
            TickerState::Failed => "failed",
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<MatchSnapshot>> {
        match self {
            TickerState::Ready(snap) => Some(snap),
            _ => None,
        }
    }
}

/// What a completed fetch did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First snapshot, from `Loading` or `Failed`.
    Loaded,
    /// Newer snapshot replaced the one on display.
    Refreshed,
    /// First fetch failed; nothing to show.
    FirstLoadFailed,
    /// Fetch failed while a snapshot was on display; it stays up.
    KeptStale,
    /// Result came from a fetch older than the one on display.
    Discarded,
}

/// Plain state machine behind [`TickerStore`]. No locking, no clock.
#[derive(Debug, Clone)]
pub struct TickerMachine {
    state: TickerState,
    /// Sequence number of the snapshot on display (0 = none)
    applied_seq: u64,
    updated_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
}

impl Default for TickerMachine {
    fn default() -> Self {
        TickerMachine {
            state: TickerState::Loading,
            applied_seq: 0,
            updated_at: None,
            consecutive_failures: 0,
        }
    }
}

impl TickerMachine {
    pub fn state(&self) -> &TickerState {
        &self.state
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn apply_success(
        &mut self,
        seq: u64,
        snapshot: MatchSnapshot,
        now: DateTime<Utc>,
    ) -> Transition {
        if seq <= self.applied_seq {
            return Transition::Discarded;
        }

        let transition = match self.state {
            TickerState::Ready(_) => Transition::Refreshed,
            TickerState::Loading | TickerState::Failed => Transition::Loaded,
        };
        self.state = TickerState::Ready(Arc::new(snapshot));
        self.applied_seq = seq;
        self.updated_at = Some(now);
        self.consecutive_failures = 0;
        transition
    }

    pub fn apply_failure(&mut self, seq: u64) -> Transition {
        if seq <= self.applied_seq {
            return Transition::Discarded;
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        match self.state {
            TickerState::Ready(_) => Transition::KeptStale,
            TickerState::Loading | TickerState::Failed => {
                self.state = TickerState::Failed;
                Transition::FirstLoadFailed
            }
        }
    }
}

/// Point-in-time copy of the store for rendering.
#[derive(Debug, Clone)]
pub struct TickerReading {
    pub state: TickerState,
    pub updated_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

/// Shared handle to the ticker state.
#[derive(Clone, Default)]
pub struct TickerStore {
    inner: Arc<RwLock<TickerMachine>>,
}

impl TickerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> TickerState {
        self.inner.read().await.state().clone()
    }

    pub async fn reading(&self) -> TickerReading {
        let machine = self.inner.read().await;
        TickerReading {
            state: machine.state().clone(),
            updated_at: machine.updated_at(),
            consecutive_failures: machine.consecutive_failures(),
        }
    }

    pub async fn apply(&self, seq: u64, outcome: anyhow::Result<MatchSnapshot>) -> Transition {
        let mut machine = self.inner.write().await;
        match outcome {
            Ok(snapshot) => machine.apply_success(seq, snapshot, Utc::now()),
            Err(_) => machine.apply_failure(seq),
        }
    }
}
