//! # PeriodicFetcher: single-source polling loop.
//!
//! Polls one endpoint forever with a fixed delay, handing every successful result
//! to one callback and logging every failure.
//!
//! ## States
//! ```text
//!   Idle ──start()──► Scheduled ──timer──► InFlight ──completion──► Scheduled ──► ...
//!     │                   │                   │
//!     └──stop()──► Stopped ◄──stop()──────────┘ (stop while InFlight: the request
//!                                                finishes, its result is discarded,
//!                                                nothing is rescheduled)
//! ```
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► sleep(interval) (cancellable)
//!   ├─► Scheduled → InFlight, attempt += 1
//!   ├─► transport.fetch(endpoint)   (not cancellable once issued)
//!   ├─► stopped? → exit without publishing
//!   │       ├─ Ok(data) → on_fetched(data)
//!   │       └─ Err(e)   → warn!(...)          (never forwarded)
//!   └─► InFlight → Scheduled
//! }
//! ```
//!
//! ## Rules
//! - The first request happens one full interval after `start()`, never immediately.
//! - **Fixed delay**: the next sleep starts after the previous request completes,
//!   so the achieved period is `interval + latency`.
//! - Failures retry forever at the same interval: no cap, no backoff, no jitter.
//! - A running fetcher has exactly one pending timer or one in-flight request.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::config::SourceConfig;
use crate::core::stats::{FetcherStats, StatsSnapshot};
use crate::error::FetcherError;
use crate::transport::Transport;

/// Callback receiving the data of each successful tick.
pub type OnFetched<P> = Arc<dyn Fn(P) + Send + Sync>;

/// Lifecycle state of a [`PeriodicFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FetcherState {
    /// Constructed, not started.
    Idle = 0,
    /// Timer pending.
    Scheduled = 1,
    /// Request issued to the transport.
    InFlight = 2,
    /// Terminal.
    Stopped = 3,
}

impl FetcherState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => FetcherState::Idle,
            1 => FetcherState::Scheduled,
            2 => FetcherState::InFlight,
            _ => FetcherState::Stopped,
        }
    }

    /// True while the fetcher holds a pending timer or an in-flight request.
    pub fn is_running(&self) -> bool {
        matches!(self, FetcherState::Scheduled | FetcherState::InFlight)
    }
}

/// State shared between the handle and its loop task.
#[derive(Debug)]
struct Shared {
    state: AtomicU8,
    stats: FetcherStats,
}

impl Shared {
    fn state(&self) -> FetcherState {
        FetcherState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn transition(&self, from: FetcherState, to: FetcherState) -> Result<(), FetcherState> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(FetcherState::from_u8)
    }

    fn set(&self, to: FetcherState) {
        self.state.store(to as u8, Ordering::Release);
    }
}

/// Polls one source on a fixed delay.
///
/// ### Responsibilities
/// - **Scheduling**: arms one timer per cycle, measured from request completion
/// - **Execution**: invokes the transport once per tick
/// - **Delivery**: hands successful data to `on_fetched`, logs failures
/// - **Cancellation**: `stop()` cancels the pending timer; an in-flight request
///   is allowed to finish but its result is dropped
pub struct PeriodicFetcher<T: Transport> {
    source: SourceConfig,
    transport: Arc<T>,
    on_fetched: OnFetched<T::Payload>,
    token: CancellationToken,
    shared: Arc<Shared>,
}

impl<T: Transport> std::fmt::Debug for PeriodicFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicFetcher")
            .field("source", &self.source)
            .field("state", &self.state())
            .finish()
    }
}

impl<T: Transport> PeriodicFetcher<T> {
    /// Creates an idle fetcher for `source`.
    pub fn new(source: SourceConfig, transport: Arc<T>, on_fetched: OnFetched<T::Payload>) -> Self {
        Self {
            source,
            transport,
            on_fetched,
            token: CancellationToken::new(),
            shared: Arc::new(Shared {
                state: AtomicU8::new(FetcherState::Idle as u8),
                stats: FetcherStats::default(),
            }),
        }
    }

    /// Ties this fetcher's cancellation to `parent` (cancelling `parent` stops it).
    pub(crate) fn bound_to(mut self, parent: &CancellationToken) -> Self {
        self.token = parent.child_token();
        self
    }

    /// Source this fetcher polls.
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FetcherState {
        self.shared.state()
    }

    /// Live counters.
    pub fn stats(&self) -> &FetcherStats {
        &self.shared.stats
    }

    /// Point-in-time view of state and counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let stats = &self.shared.stats;
        StatsSnapshot {
            alias: Arc::from(self.source.alias()),
            state: self.state(),
            attempts: stats.attempts(),
            successes: stats.successes(),
            failures: stats.failures(),
            last_failure: stats.last_failure(),
        }
    }

    /// Arms the first tick one interval from now.
    ///
    /// Valid only from [`FetcherState::Idle`]. Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<(), FetcherError> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| FetcherError::NoRuntime)?;
        self.shared
            .transition(FetcherState::Idle, FetcherState::Scheduled)
            .map_err(|from| FetcherError::InvalidState { from })?;

        let fetch_loop = FetchLoop {
            source: self.source.clone(),
            transport: Arc::clone(&self.transport),
            on_fetched: Arc::clone(&self.on_fetched),
            token: self.token.clone(),
            shared: Arc::clone(&self.shared),
        };
        handle.spawn(fetch_loop.run());

        tracing::debug!(
            alias = self.source.alias(),
            endpoint = self.source.endpoint(),
            interval_ms = self.source.interval_ms(),
            "fetcher started"
        );
        Ok(())
    }

    /// Cancels the pending tick.
    ///
    /// From `Idle` or `Scheduled` the fetcher becomes `Stopped` immediately. From
    /// `InFlight` it stays `InFlight` until the request resolves, then stops without
    /// publishing or rescheduling. Calling `stop()` again is a no-op.
    pub fn stop(&self) {
        self.token.cancel();
        for from in [FetcherState::Idle, FetcherState::Scheduled] {
            if self.shared.transition(from, FetcherState::Stopped).is_ok() {
                break;
            }
        }
    }
}

/// Loop task driving one fetcher.
struct FetchLoop<T: Transport> {
    source: SourceConfig,
    transport: Arc<T>,
    on_fetched: OnFetched<T::Payload>,
    token: CancellationToken,
    shared: Arc<Shared>,
}

impl<T: Transport> FetchLoop<T> {
    async fn run(self) {
        let alias = self.source.alias();
        let endpoint = self.source.endpoint();
        let interval = self.source.interval();

        loop {
            let sleep = time::sleep(interval);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = &mut sleep => {}
            }

            if self
                .shared
                .transition(FetcherState::Scheduled, FetcherState::InFlight)
                .is_err()
            {
                break;
            }
            let attempt = self.shared.stats.begin_attempt();
            tracing::debug!(alias, endpoint, attempt, "tick");

            let res = self.transport.fetch(endpoint).await;

            if self.token.is_cancelled() {
                tracing::debug!(alias, attempt, "completion after stop discarded");
                break;
            }

            match res {
                Ok(data) => {
                    self.shared.stats.record_success();
                    (self.on_fetched)(data);
                }
                Err(e) => {
                    self.shared.stats.record_failure(&e);
                    tracing::warn!(
                        alias,
                        endpoint,
                        attempt,
                        label = e.as_label(),
                        error = %e,
                        "fail to fetch data"
                    );
                }
            }

            if self
                .shared
                .transition(FetcherState::InFlight, FetcherState::Scheduled)
                .is_err()
            {
                break;
            }
        }

        self.shared.set(FetcherState::Stopped);
        tracing::debug!(alias, "fetcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::transport::TransportFn;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::Instant;

    fn assert_near(actual: Duration, expected_ms: u64) {
        let ms = actual.as_millis() as u64;
        assert!(
            ms >= expected_ms && ms <= expected_ms + 5,
            "expected ~{expected_ms}ms, got {ms}ms"
        );
    }

    fn counter() -> (Arc<AtomicUsize>, OnFetched<u32>) {
        let n = Arc::new(AtomicUsize::new(0));
        let c = n.clone();
        (
            n,
            Arc::new(move |_data: u32| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_from_completion() {
        let start = Instant::now();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let transport = TransportFn::arc(move |_endpoint: String| {
            let c = c.clone();
            async move {
                c.lock().unwrap().push(start.elapsed());
                time::sleep(Duration::from_millis(50)).await;
                Ok::<_, FetchError>(1u32)
            }
        });
        let received = Arc::new(Mutex::new(Vec::new()));
        let r = received.clone();
        let on_fetched: OnFetched<u32> = Arc::new(move |data| {
            r.lock().unwrap().push((start.elapsed(), data));
        });

        let f = PeriodicFetcher::new(SourceConfig::new("A", 1000, "X"), transport, on_fetched);
        f.start().unwrap();
        assert_eq!(f.state(), FetcherState::Scheduled);

        time::sleep(Duration::from_millis(3200)).await;

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 3);
        assert_near(calls[0], 1000);
        assert_near(calls[1], 2050);
        assert_near(calls[2], 3100);

        let received = received.lock().unwrap().clone();
        assert_eq!(received.len(), 3);
        assert_near(received[0].0, 1050);
        assert_eq!(received[0].1, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_retry_at_same_interval_without_callback() {
        let start = Instant::now();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let c = calls.clone();
        let transport = TransportFn::arc(move |_endpoint: String| {
            let c = c.clone();
            async move {
                let n = {
                    let mut calls = c.lock().unwrap();
                    calls.push(start.elapsed());
                    calls.len()
                };
                if n <= 3 {
                    Err(FetchError::Status { status: 503 })
                } else {
                    Ok(n as u32)
                }
            }
        });
        let (hits, on_fetched) = counter();

        let f = PeriodicFetcher::new(SourceConfig::new("A", 100, "X"), transport, on_fetched);
        f.start().unwrap();

        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(f.stats().failures(), 3);
        assert!(f.state().is_running());

        time::sleep(Duration::from_millis(100)).await;
        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 4);
        assert_near(calls[3], 400);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let snap = f.snapshot();
        assert_eq!(snap.attempts, 4);
        assert_eq!(snap.successes, 1);
        assert_eq!(snap.failures, 3);
        assert_eq!(snap.last_failure, Some(FetchError::Status { status: 503 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_while_scheduled_cancels_next_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let transport = TransportFn::arc(move |_endpoint: String| {
            c.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, FetchError>(0u32) }
        });
        let (hits, on_fetched) = counter();

        let f = PeriodicFetcher::new(SourceConfig::new("A", 1000, "X"), transport, on_fetched);
        f.start().unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        f.stop();
        assert_eq!(f.state(), FetcherState::Stopped);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_while_in_flight_discards_completion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let transport = TransportFn::arc(move |_endpoint: String| {
            c.fetch_add(1, Ordering::SeqCst);
            async {
                time::sleep(Duration::from_millis(500)).await;
                Ok::<_, FetchError>(0u32)
            }
        });
        let (hits, on_fetched) = counter();

        let f = PeriodicFetcher::new(SourceConfig::new("A", 1000, "X"), transport, on_fetched);
        f.start().unwrap();
        time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(f.state(), FetcherState::InFlight);

        f.stop();
        assert_eq!(f.state(), FetcherState::InFlight);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.state(), FetcherState::Stopped);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(f.stats().successes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopping_one_fetcher_leaves_other_untouched() {
        let make = |calls: Arc<Mutex<Vec<Duration>>>, start: Instant| {
            TransportFn::arc(move |_endpoint: String| {
                calls.lock().unwrap().push(start.elapsed());
                async { Ok::<_, FetchError>(0u32) }
            })
        };
        let start = Instant::now();
        let a_calls = Arc::new(Mutex::new(Vec::new()));
        let b_calls = Arc::new(Mutex::new(Vec::new()));
        let (_, cb_a) = counter();
        let (_, cb_b) = counter();

        let a = PeriodicFetcher::new(
            SourceConfig::new("A", 100, "A"),
            make(a_calls.clone(), start),
            cb_a,
        );
        let b = PeriodicFetcher::new(
            SourceConfig::new("B", 300, "B"),
            make(b_calls.clone(), start),
            cb_b,
        );
        a.start().unwrap();
        b.start().unwrap();

        time::sleep(Duration::from_millis(350)).await;
        a.stop();
        time::sleep(Duration::from_millis(650)).await;

        assert_eq!(a_calls.lock().unwrap().len(), 3);
        let b_calls = b_calls.lock().unwrap().clone();
        assert_eq!(b_calls.len(), 3);
        assert_near(b_calls[0], 300);
        assert_near(b_calls[1], 600);
        assert_near(b_calls[2], 900);
        assert_eq!(a.state(), FetcherState::Stopped);
        assert!(b.state().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_only_from_idle() {
        let transport = TransportFn::arc(|_endpoint: String| async { Ok::<_, FetchError>(0u32) });
        let (_, on_fetched) = counter();
        let f = PeriodicFetcher::new(SourceConfig::new("A", 10, "X"), transport, on_fetched);

        f.start().unwrap();
        assert_eq!(
            f.start(),
            Err(FetcherError::InvalidState {
                from: FetcherState::Scheduled
            })
        );
        f.stop();
        f.stop();
        assert_eq!(f.state(), FetcherState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_idle_is_terminal() {
        let transport = TransportFn::arc(|_endpoint: String| async { Ok::<_, FetchError>(0u32) });
        let (_, on_fetched) = counter();
        let f = PeriodicFetcher::new(SourceConfig::new("A", 10, "X"), transport, on_fetched);

        f.stop();
        assert_eq!(f.state(), FetcherState::Stopped);
        assert_eq!(
            f.start(),
            Err(FetcherError::InvalidState {
                from: FetcherState::Stopped
            })
        );
    }

    #[tokio::test]
    async fn test_zero_interval_does_not_starve_other_fetchers() {
        let make = |calls: Arc<AtomicUsize>| {
            TransportFn::arc(move |_endpoint: String| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, FetchError>(0u32) }
            })
        };
        let busy_calls = Arc::new(AtomicUsize::new(0));
        let slow_calls = Arc::new(AtomicUsize::new(0));
        let (_, cb_busy) = counter();
        let (slow_hits, cb_slow) = counter();

        let busy = PeriodicFetcher::new(
            SourceConfig::new("A", 0, "A"),
            make(busy_calls.clone()),
            cb_busy,
        );
        let slow = PeriodicFetcher::new(
            SourceConfig::new("B", 100, "B"),
            make(slow_calls.clone()),
            cb_slow,
        );
        busy.start().unwrap();
        slow.start().unwrap();

        time::sleep(Duration::from_millis(350)).await;
        busy.stop();
        slow.stop();

        let slow_n = slow_calls.load(Ordering::SeqCst);
        assert!((2..=3).contains(&slow_n), "slow source ticked {slow_n} times");
        assert_eq!(slow_hits.load(Ordering::SeqCst), slow_n);
        assert!(busy_calls.load(Ordering::SeqCst) > slow_n);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let transport = TransportFn::arc(|_endpoint: String| async { Ok::<_, FetchError>(0u32) });
        let (_, on_fetched) = counter();
        let f = PeriodicFetcher::new(SourceConfig::new("A", 10, "X"), transport, on_fetched);

        assert_eq!(f.start(), Err(FetcherError::NoRuntime));
        assert_eq!(f.state(), FetcherState::Idle);
    }
}
