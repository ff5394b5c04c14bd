use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StopwatchState {
    seconds: u64,
    running: bool,
}

/// Elapsed-seconds counter shared between a quiz session and its timer task.
///
/// Ticks only count while the stopwatch is running. `tick` and `stop` take the
/// same lock, so the value returned by `stop` is final: a tick racing with it
/// either lands before the freeze or is dropped.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    state: Arc<Mutex<StopwatchState>>,
}

impl Stopwatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.with_state(|state| state.running = true);
    }

    /// Freeze the counter and return its final value.
    pub fn stop(&self) -> u64 {
        self.with_state(|state| {
            state.running = false;
            state.seconds
        })
    }

    /// Add one second if running. Returns whether the tick counted.
    pub fn tick(&self) -> bool {
        self.with_state(|state| {
            if state.running {
                state.seconds = state.seconds.saturating_add(1);
            }
            state.running
        })
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.with_state(|state| state.seconds)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.with_state(|state| state.running)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut StopwatchState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
