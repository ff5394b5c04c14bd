//! One-second quiz timer driven by an injectable beat source.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

use quiz_core::Stopwatch;

/// A stream of one-second beats for a single timer run.
#[async_trait]
pub trait Beats: Send {
    /// Wait for the next beat. `false` once no more beats will arrive.
    async fn next_beat(&mut self) -> bool;
}

/// Source of beat streams; injected so tests can drive time by hand.
pub trait Ticker: Send + Sync {
    fn beats(&self) -> Box<dyn Beats>;
}

//
// ─── WALL CLOCK ────────────────────────────────────────────────────────────────
//

/// Real-time ticker backed by `tokio::time::interval`.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTicker {
    period: Duration,
}

impl IntervalTicker {
    #[must_use]
    pub fn every(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::every(Duration::from_secs(1))
    }
}

impl Ticker for IntervalTicker {
    fn beats(&self) -> Box<dyn Beats> {
        // First beat one full period after start, not immediately.
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Box::new(IntervalBeats(interval))
    }
}

struct IntervalBeats(Interval);

#[async_trait]
impl Beats for IntervalBeats {
    async fn next_beat(&mut self) -> bool {
        self.0.tick().await;
        true
    }
}

//
// ─── MANUAL ────────────────────────────────────────────────────────────────────
//

/// Ticker whose beats are pushed by the caller. Only the first `beats()`
/// stream receives them; later streams are already exhausted.
#[derive(Debug, Clone)]
pub struct ManualTicker {
    sender: mpsc::UnboundedSender<()>,
    receiver: Arc<Mutex<Option<mpsc::UnboundedReceiver<()>>>>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(Some(receiver))),
        }
    }

    /// Push `count` beats. Returns `false` if the timer has already gone away.
    pub fn beat(&self, count: u64) -> bool {
        (0..count).all(|_| self.sender.send(()).is_ok())
    }

    /// Whether a timer has claimed this ticker's beat stream.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Default for ManualTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for ManualTicker {
    fn beats(&self) -> Box<dyn Beats> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Box::new(ManualBeats(receiver))
    }
}

struct ManualBeats(Option<mpsc::UnboundedReceiver<()>>);

#[async_trait]
impl Beats for ManualBeats {
    async fn next_beat(&mut self) -> bool {
        match self.0.as_mut() {
            Some(receiver) => receiver.recv().await.is_some(),
            None => false,
        }
    }
}

//
// ─── TIMER TASK ────────────────────────────────────────────────────────────────
//

/// Owns the spawned timer task; dropping the guard aborts it.
#[derive(Debug)]
pub struct TimerGuard {
    handle: JoinHandle<()>,
}

impl TimerGuard {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a task that adds one second to `stopwatch` per beat and publishes
/// the new total on `elapsed`. The task ends when the stopwatch stops or the
/// beat source runs dry.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn spawn_timer(
    ticker: &dyn Ticker,
    stopwatch: Stopwatch,
    elapsed: watch::Sender<u64>,
) -> TimerGuard {
    let mut beats = ticker.beats();
    let handle = tokio::spawn(async move {
        while beats.next_beat().await {
            if !stopwatch.tick() {
                break;
            }
            elapsed.send_replace(stopwatch.elapsed_seconds());
        }
        debug!(seconds = stopwatch.elapsed_seconds(), "quiz timer stopped");
    });
    TimerGuard { handle }
}
