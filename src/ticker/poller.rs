use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::source::SnapshotSource;
use super::store::{TickerStore, Transition};

/// Keeps the refresh loop alive. Dropping it (or calling [`stop`]) cancels
/// the timer; fetches already in flight finish but their results are ignored.
///
/// [`stop`]: PollerHandle::stop
pub struct PollerHandle {
    timer: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl PollerHandle {
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            info!("Ticker poller stopped");
        }
        self.timer.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if !self.is_stopped() {
            self.stop();
        }
    }
}

/// Spawn the refresh loop: one fetch immediately, then one per `interval`.
///
/// Each fetch runs in its own task, so a slow upstream never delays the next
/// cycle. Results are applied to `store` as they complete; the store drops
/// any that are older than what it already shows.
pub fn start_poller(
    source: Arc<dyn SnapshotSource>,
    store: TickerStore,
    interval: Duration,
) -> PollerHandle {
    let stopped = Arc::new(AtomicBool::new(false));
    let timer_stopped = Arc::clone(&stopped);

    let timer = tokio::spawn(async move {
        info!("Ticker poller started (interval={:?})", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut seq: u64 = 0;

        loop {
            ticker.tick().await;
            seq += 1;

            let source = Arc::clone(&source);
            let store = store.clone();
            let stopped = Arc::clone(&timer_stopped);
            tokio::spawn(async move {
                let outcome = source.fetch_snapshot().await;
                if stopped.load(Ordering::SeqCst) {
                    debug!("Dropping result of fetch #{} after poller stop", seq);
                    return;
                }

                let error = outcome.as_ref().err().map(|e| format!("{:#}", e));
                match store.apply(seq, outcome).await {
                    Transition::Loaded => info!("Ticker loaded (fetch #{})", seq),
                    Transition::Refreshed => debug!("Ticker refreshed (fetch #{})", seq),
                    Transition::FirstLoadFailed => warn!(
                        "Initial load failed (fetch #{}): {}",
                        seq,
                        error.unwrap_or_default()
                    ),
                    Transition::KeptStale => warn!(
                        "Refresh failed, keeping last snapshot (fetch #{}): {}",
                        seq,
                        error.unwrap_or_default()
                    ),
                    Transition::Discarded => {
                        debug!("Discarded out-of-order result of fetch #{}", seq)
                    }
                }
            });
        }
    });

    PollerHandle { timer, stopped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::MatchSnapshot;
    use crate::ticker::store::TickerState;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// Replays `(delay, title)` steps; `None` means the fetch fails.
    struct ScriptedSource {
        steps: Mutex<VecDeque<(Duration, Option<&'static str>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(steps: Vec<(Duration, Option<&'static str>)>) -> Arc<Self> {
            Arc::new(ScriptedSource {
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        async fn fetch_snapshot(&self) -> anyhow::Result<MatchSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.steps.lock().unwrap().pop_front();
            let (delay, title) = step.unwrap_or((Duration::ZERO, Some("steady")));
            tokio::time::sleep(delay).await;
            match title {
                Some(t) => Ok(MatchSnapshot {
                    match_title: t.to_string(),
                    ..MatchSnapshot::default()
                }),
                None => Err(anyhow::anyhow!("upstream unavailable")),
            }
        }
    }

    async fn title(store: &TickerStore) -> Option<String> {
        store.state().await.snapshot().map(|s| s.match_title.clone())
    }

    const INTERVAL: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_every_interval() {
        let source = ScriptedSource::new(vec![]);
        let store = TickerStore::new();
        let _handle = start_poller(source.clone(), store.clone(), INTERVAL);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(title(&store).await.as_deref(), Some("steady"));

        tokio::time::sleep(INTERVAL * 2).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_then_recovery() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, None),
            (Duration::ZERO, Some("live")),
        ]);
        let store = TickerStore::new();
        let _handle = start_poller(source.clone(), store.clone(), INTERVAL);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(store.state().await, TickerState::Failed);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(store.state().await.label(), "ready");
        assert_eq!(title(&store).await.as_deref(), Some("live"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Some("first")),
            (Duration::ZERO, None),
        ]);
        let store = TickerStore::new();
        let _handle = start_poller(source.clone(), store.clone(), INTERVAL);

        tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(title(&store).await.as_deref(), Some("first"));
        assert_eq!(store.reading().await.consecutive_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_does_not_block_or_overwrite() {
        let source = ScriptedSource::new(vec![
            (Duration::from_secs(45), Some("slow-old")),
            (Duration::from_secs(1), Some("fast-new")),
        ]);
        let store = TickerStore::new();
        let _handle = start_poller(source.clone(), store.clone(), INTERVAL);

        // second fetch issued at t=30 while the first is still running
        tokio::time::sleep(Duration::from_secs(32)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(title(&store).await.as_deref(), Some("fast-new"));

        // first fetch lands at t=45 and must not roll the ticker back
        tokio::time::sleep(Duration::from_secs(18)).await;
        assert_eq!(title(&store).await.as_deref(), Some("fast-new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer_and_ignores_in_flight() {
        let source = ScriptedSource::new(vec![(Duration::from_secs(5), Some("late"))]);
        let store = TickerStore::new();
        let handle = start_poller(source.clone(), store.clone(), INTERVAL);

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop();
        assert!(handle.is_stopped());

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(store.state().await, TickerState::Loading);
    }
}
