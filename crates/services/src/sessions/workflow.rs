use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use quiz_core::model::{GradedResult, QuizSelector, SubmissionPayload};

use super::service::{QuizPhase, QuizSession};
use super::source::{QuestionFetch, QuestionSource, ScoringService};
use crate::Clock;
use crate::error::{ApiError, SessionError};
use crate::timer::{Ticker, TimerGuard, spawn_timer};

/// Detached question fetch, so callers can await it without holding the controller.
pub struct LoadRequest {
    source: Arc<dyn QuestionSource>,
    selector: QuizSelector,
}

impl LoadRequest {
    pub async fn fetch(self) -> QuestionFetch {
        self.source.fetch_questions(&self.selector).await
    }
}

/// Detached grading call carrying the frozen payload.
pub struct SubmitRequest {
    scoring: Arc<dyn ScoringService>,
    selector: QuizSelector,
    payload: SubmissionPayload,
}

impl SubmitRequest {
    #[must_use]
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// Issue exactly one grading request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the scoring service fails.
    pub async fn send(self) -> Result<GradedResult, ApiError> {
        self.scoring.submit(&self.selector, &self.payload).await
    }
}

/// Drives one quiz attempt: loads questions, owns the timer task, collects
/// answers and submits them for grading.
///
/// The timer runs only while the session is in progress. It is cancelled on
/// submit, on `abandon` and when the controller is dropped.
pub struct QuizSessionController {
    session: QuizSession,
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    scoring: Arc<dyn ScoringService>,
    ticker: Arc<dyn Ticker>,
    timer: Option<TimerGuard>,
    elapsed: watch::Sender<u64>,
    load_issued: bool,
}

impl QuizSessionController {
    #[must_use]
    pub fn new(
        selector: QuizSelector,
        source: Arc<dyn QuestionSource>,
        scoring: Arc<dyn ScoringService>,
        ticker: Arc<dyn Ticker>,
    ) -> Self {
        let (elapsed, _) = watch::channel(0);
        Self {
            session: QuizSession::new(selector),
            clock: Clock::default(),
            source,
            scoring,
            ticker,
            timer: None,
            elapsed,
            load_issued: false,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        self.session.phase()
    }

    /// Elapsed seconds, updated by the timer task on every counted beat.
    #[must_use]
    pub fn elapsed_updates(&self) -> watch::Receiver<u64> {
        self.elapsed.subscribe()
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|guard| !guard.is_finished())
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Hand out the one fetch for this attempt. `None` once it has been issued.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if self.load_issued || *self.session.phase() != QuizPhase::Loading {
            return None;
        }
        self.load_issued = true;
        Some(LoadRequest {
            source: Arc::clone(&self.source),
            selector: self.session.selector().clone(),
        })
    }

    /// Apply the fetch outcome and start the timer if the attempt began.
    pub fn finish_load(&mut self, fetch: QuestionFetch) -> &QuizPhase {
        let now = self.clock.now();
        if *self.session.apply_fetch(fetch, now) == QuizPhase::InProgress && self.timer.is_none() {
            self.elapsed.send_replace(self.session.elapsed_seconds());
            self.timer = Some(spawn_timer(
                self.ticker.as_ref(),
                self.session.stopwatch(),
                self.elapsed.clone(),
            ));
            debug!(selector = %self.session.selector(), "quiz timer started");
        }
        self.session.phase()
    }

    /// Fetch the questions and apply the outcome.
    pub async fn load(&mut self) -> &QuizPhase {
        if let Some(request) = self.begin_load() {
            let fetch = request.fetch().await;
            self.finish_load(fetch);
        }
        self.session.phase()
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// See [`QuizSession::select_answer`].
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.session.select_answer(option)
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn prev(&mut self) -> bool {
        self.session.prev()
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Freeze the payload and cancel the timer before any request is built.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::begin_submit`].
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SessionError> {
        let payload = self.session.begin_submit()?;
        self.stop_timer();
        Ok(self.submit_request(payload))
    }

    /// # Errors
    ///
    /// See [`QuizSession::begin_retry`].
    pub fn begin_retry(&mut self) -> Result<SubmitRequest, SessionError> {
        let payload = self.session.begin_retry()?;
        Ok(self.submit_request(payload))
    }

    pub fn finish_submit(&mut self, outcome: Result<GradedResult, ApiError>) -> &QuizPhase {
        self.session.apply_submission(outcome)
    }

    /// Submit the attempt and wait for grading.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the session cannot be submitted now. Grading
    /// failures are not errors here; they move the session to `SubmitFailed`.
    pub async fn submit(&mut self) -> Result<&QuizPhase, SessionError> {
        let request = self.begin_submit()?;
        let outcome = request.send().await;
        Ok(self.finish_submit(outcome))
    }

    /// Re-send the frozen payload after a failed submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToRetry` unless the last submission failed.
    pub async fn retry_submit(&mut self) -> Result<&QuizPhase, SessionError> {
        let request = self.begin_retry()?;
        let outcome = request.send().await;
        Ok(self.finish_submit(outcome))
    }

    /// Leave the attempt: the clock stops and the timer task is cancelled.
    pub fn abandon(&mut self) {
        self.session.halt_clock();
        self.stop_timer();
    }

    fn submit_request(&self, payload: SubmissionPayload) -> SubmitRequest {
        SubmitRequest {
            scoring: Arc::clone(&self.scoring),
            selector: self.session.selector().clone(),
            payload,
        }
    }

    fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            debug!(
                selector = %self.session.selector(),
                seconds = self.session.elapsed_seconds(),
                "quiz timer cancelled"
            );
        }
    }
}

impl Drop for QuizSessionController {
    fn drop(&mut self) {
        self.abandon();
    }
}
