use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::models::StatsSnapshot;
use crate::services::aggregation::{AggregationEngine, AggregationResult};

/// Per-instance refresh state. Mutated only by the scheduler loop, and only
/// at cycle boundaries, so observers never see a half-updated summary.
#[derive(Debug, Default)]
pub struct RefreshState {
    pub last_result: Option<AggregationResult>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub is_in_flight: bool,
}

type Observer = Arc<dyn Fn(StatsSnapshot) + Send + Sync>;

/// Owns all refresh timing for one dashboard view: the initial fetch, the
/// fixed-period re-fetch, and manual refresh requests, with in-flight
/// de-duplication so two cycles never overlap.
#[derive(Clone)]
pub struct StatRefresher {
    inner: Arc<Inner>,
}

struct Inner {
    engine: AggregationEngine,
    period: Duration,
    state: RwLock<RefreshState>,
    refresh_notify: Notify,
    stop_notify: Notify,
    stopped: AtomicBool,
    observer: RwLock<Option<Observer>>,
}

impl StatRefresher {
    pub fn new(engine: AggregationEngine, period: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                period,
                state: RwLock::new(RefreshState::default()),
                refresh_notify: Notify::new(),
                stop_notify: Notify::new(),
                stopped: AtomicBool::new(false),
                observer: RwLock::new(None),
            }),
        }
    }

    pub fn set_observer(&self, observer: Observer) {
        let mut slot = self
            .inner
            .observer
            .write()
            .expect("refresher observer lock");
        *slot = Some(observer);
    }

    /// Spawns the refresh loop: one cycle immediately, then one per period
    /// until `stop()`.
    pub fn start(&self) {
        let refresher = self.clone();
        tokio::spawn(async move {
            refresher.run_loop().await;
        });
    }

    /// Stops scheduling. An in-flight cycle settles on its own but its result
    /// is discarded; nothing observable is updated after this call.
    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.stop_notify.notify_one();
    }

    /// Requests an immediate cycle. Swallowed while a cycle is already
    /// running; the caller observes that cycle's eventual result instead.
    /// Returns whether the request was accepted.
    pub fn request_refresh(&self) -> bool {
        if self.inner.stopped.load(Ordering::SeqCst) || self.is_in_flight() {
            return false;
        }
        self.inner.refresh_notify.notify_one();
        true
    }

    pub fn is_in_flight(&self) -> bool {
        self.read_state(|state| state.is_in_flight)
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.read_state(|state| state.last_updated_at)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let state = self.inner.state.read().expect("refresh state lock");
        StatsSnapshot {
            summary: state
                .last_result
                .as_ref()
                .map(|result| result.summary.clone())
                .unwrap_or_default(),
            status: state.last_result.as_ref().map(|result| result.status),
            last_updated_at: state.last_updated_at,
            is_in_flight: state.is_in_flight,
            failures: state
                .last_result
                .as_ref()
                .map(|result| result.failures())
                .unwrap_or_default(),
        }
    }

    async fn run_loop(self) {
        self.execute_cycle().await;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.inner.period) => {}
                _ = self.inner.refresh_notify.notified() => {}
                _ = self.inner.stop_notify.notified() => break,
            }
            if self.inner.stopped.load(Ordering::SeqCst) {
                break;
            }
            self.execute_cycle().await;
        }
    }

    async fn execute_cycle(&self) {
        if self.inner.stopped.load(Ordering::SeqCst) {
            return;
        }
        {
            let mut state = self.inner.state.write().expect("refresh state lock");
            state.is_in_flight = true;
        }
        self.notify_observer();

        let result = self.inner.engine.run().await;

        if self.inner.stopped.load(Ordering::SeqCst) {
            // The view is gone. The cycle settled, but nothing may observe
            // its result anymore.
            let mut state = self.inner.state.write().expect("refresh state lock");
            state.is_in_flight = false;
            return;
        }

        {
            let mut state = self.inner.state.write().expect("refresh state lock");
            // A completed cycle means "we checked just now", so the timestamp
            // advances even on partial or total failure.
            state.last_updated_at = Some(Utc::now());
            state.last_result = Some(result);
            state.is_in_flight = false;
        }
        self.notify_observer();
    }

    fn notify_observer(&self) {
        let observer = self
            .inner
            .observer
            .read()
            .expect("refresher observer lock")
            .clone();
        if let Some(observer) = observer {
            observer(self.snapshot());
        }
    }

    fn read_state<T>(&self, read: impl FnOnce(&RefreshState) -> T) -> T {
        let state = self.inner.state.read().expect("refresh state lock");
        read(&state)
    }
}
