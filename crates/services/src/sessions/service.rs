use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{info, warn};

use quiz_core::Stopwatch;
use quiz_core::model::{
    AnswerSet, GradedResult, Question, QuizSelector, SubmissionPayload,
};

use super::progress::SessionProgress;
use super::source::QuestionFetch;
use crate::error::{ApiError, QuizFailure, SessionError};

const EMPTY_QUIZ_MESSAGE: &str = "Could not load quiz questions. Please try again.";

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a quiz attempt is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    InProgress,
    Submitting,
    /// Grading failed; the frozen payload is kept for a retry.
    SubmitFailed(String),
    Finished,
    LoadFailed(String),
    AuthRequired,
}

impl QuizPhase {
    /// No further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::LoadFailed(_) | Self::AuthRequired)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::InProgress => "in_progress",
            Self::Submitting => "submitting",
            Self::SubmitFailed(_) => "submit_failed",
            Self::Finished => "finished",
            Self::LoadFailed(_) => "load_failed",
            Self::AuthRequired => "auth_required",
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz attempt: questions, answers, cursor, elapsed time and
/// phase. Pure and synchronous; I/O and the timer task live in
/// `QuizSessionController`.
pub struct QuizSession {
    selector: QuizSelector,
    phase: QuizPhase,
    questions: Vec<Question>,
    answers: AnswerSet,
    current: usize,
    stopwatch: Stopwatch,
    started_at: Option<DateTime<Utc>>,
    pending: Option<SubmissionPayload>,
    result: Option<GradedResult>,
}

impl QuizSession {
    #[must_use]
    pub fn new(selector: QuizSelector) -> Self {
        Self {
            selector,
            phase: QuizPhase::Loading,
            questions: Vec::new(),
            answers: AnswerSet::default(),
            current: 0,
            stopwatch: Stopwatch::new(),
            started_at: None,
            pending: None,
            result: None,
        }
    }

    #[must_use]
    pub fn selector(&self) -> &QuizSelector {
        &self.selector
    }

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Option picked for the current question.
    #[must_use]
    pub fn current_selection(&self) -> Option<usize> {
        self.answers.selected(self.current)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_first_question(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.stopwatch.elapsed_seconds()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Payload of the outstanding or failed submission.
    #[must_use]
    pub fn pending_payload(&self) -> Option<&SubmissionPayload> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn result(&self) -> Option<&GradedResult> {
        self.result.as_ref()
    }

    /// User-facing failure for the failure phases.
    #[must_use]
    pub fn failure(&self) -> Option<QuizFailure> {
        match &self.phase {
            QuizPhase::AuthRequired => Some(QuizFailure::AuthRequired),
            QuizPhase::LoadFailed(reason) => Some(QuizFailure::LoadFailure(reason.clone())),
            QuizPhase::SubmitFailed(reason) => Some(QuizFailure::SubmitFailure(reason.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.current + 1,
            total: self.questions.len(),
            answered: self.answers.answered_count(),
            is_first: self.is_first_question(),
            is_last: self.is_last_question(),
        }
    }

    pub(crate) fn stopwatch(&self) -> Stopwatch {
        self.stopwatch.clone()
    }

    /// Consume the fetch outcome. Ignored unless the session is still loading.
    ///
    /// A non-empty question list starts the attempt and the stopwatch; an
    /// empty one is a load failure.
    pub fn apply_fetch(&mut self, fetch: QuestionFetch, now: DateTime<Utc>) -> &QuizPhase {
        if self.phase != QuizPhase::Loading {
            warn!(phase = self.phase.name(), "ignoring question fetch outside loading");
            return &self.phase;
        }

        self.phase = match fetch {
            QuestionFetch::Loaded(questions) if questions.is_empty() => {
                QuizPhase::LoadFailed(EMPTY_QUIZ_MESSAGE.to_string())
            }
            QuestionFetch::Loaded(questions) => {
                self.answers = AnswerSet::unanswered(questions.len());
                self.questions = questions;
                self.current = 0;
                self.started_at = Some(now);
                self.stopwatch.start();
                QuizPhase::InProgress
            }
            QuestionFetch::AuthRequired => QuizPhase::AuthRequired,
            QuestionFetch::Failed(reason) => QuizPhase::LoadFailed(reason),
        };
        info!(
            selector = %self.selector,
            phase = self.phase.name(),
            questions = self.questions.len(),
            "quiz loaded"
        );
        &self.phase
    }

    /// Record `option` for the current question. Re-selecting is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside an attempt, or
    /// `SessionError::Answer` when `option` is not one of the question's options.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let option_count = self
            .current_question()
            .map_or(0, Question::option_count);
        self.answers.select(self.current, option, option_count)?;
        Ok(())
    }

    /// Move forward, staying on the last question. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.phase != QuizPhase::InProgress || self.is_last_question() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back, staying on the first question. Returns whether the cursor moved.
    pub fn prev(&mut self) -> bool {
        if self.phase != QuizPhase::InProgress || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Freeze the clock and build the submission payload.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` when the attempt is not running
    /// (including while a submission is outstanding), or
    /// `SessionError::NotOnLastQuestion` before the last question.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SessionError> {
        self.ensure_in_progress()?;
        if !self.is_last_question() {
            return Err(SessionError::NotOnLastQuestion);
        }

        let time_taken_seconds = self.stopwatch.stop();
        let payload = SubmissionPayload::new(&self.questions, &self.answers, time_taken_seconds);
        self.pending = Some(payload.clone());
        self.phase = QuizPhase::Submitting;
        info!(
            selector = %self.selector,
            answered = self.answers.answered_count(),
            time_taken_seconds,
            "quiz submitted"
        );
        Ok(payload)
    }

    /// Re-arm a failed submission with the payload frozen by `begin_submit`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToRetry` unless the last submission failed.
    pub fn begin_retry(&mut self) -> Result<SubmissionPayload, SessionError> {
        let QuizPhase::SubmitFailed(_) = self.phase else {
            return Err(SessionError::NothingToRetry);
        };
        let payload = self.pending.clone().ok_or(SessionError::NothingToRetry)?;
        self.phase = QuizPhase::Submitting;
        info!(selector = %self.selector, "retrying quiz submission");
        Ok(payload)
    }

    /// Consume the grading outcome. Ignored unless a submission is outstanding.
    pub fn apply_submission(&mut self, outcome: Result<GradedResult, ApiError>) -> &QuizPhase {
        if self.phase != QuizPhase::Submitting {
            warn!(phase = self.phase.name(), "ignoring grading outcome outside submitting");
            return &self.phase;
        }

        self.phase = match outcome {
            Ok(result) => {
                info!(
                    selector = %self.selector,
                    total_score = result.total_score,
                    max_score = result.max_score,
                    "quiz graded"
                );
                self.result = Some(result);
                QuizPhase::Finished
            }
            Err(err) if err.requires_login() => {
                warn!(selector = %self.selector, "quiz submission needs login");
                QuizPhase::AuthRequired
            }
            Err(err) => {
                warn!(selector = %self.selector, error = %err, "quiz submission failed");
                QuizPhase::SubmitFailed(err.user_message())
            }
        };
        &self.phase
    }

    /// Stop counting time. The phase is left as is.
    pub fn halt_clock(&mut self) {
        self.stopwatch.stop();
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.phase == QuizPhase::InProgress {
            Ok(())
        } else {
            Err(SessionError::NotInProgress)
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("selector", &self.selector)
            .field("phase", &self.phase)
            .field("questions", &self.questions.len())
            .field("current", &self.current)
            .field("elapsed_seconds", &self.elapsed_seconds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;
    use reqwest::StatusCode;

    fn question(text: &str, options: usize) -> Question {
        Question::new(text, (0..options).map(|i| format!("option {i}")).collect())
    }

    fn loaded(count: usize) -> QuizSession {
        let mut session = QuizSession::new(QuizSelector::unit("Unit-I").unwrap());
        let questions = (0..count).map(|i| question(&format!("Q{i}"), 4)).collect();
        session.apply_fetch(QuestionFetch::Loaded(questions), fixed_now());
        session
    }

    fn server_error() -> ApiError {
        ApiError::HttpStatus {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        }
    }

    fn graded() -> GradedResult {
        GradedResult {
            total_score: 1.0,
            max_score: 3.0,
            correct_answers_count: Some(1),
            total_questions: Some(3),
            detailed_results: Vec::new(),
        }
    }

    #[test]
    fn loaded_session_starts_clock_with_unanswered_slots() {
        let session = loaded(3);
        assert_eq!(session.phase(), &QuizPhase::InProgress);
        assert_eq!(session.answers().as_slice(), &[None, None, None]);
        assert_eq!(session.current_index(), 0);
        assert!(session.stopwatch.is_running());
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn empty_fetch_is_a_load_failure() {
        let mut session = QuizSession::new(QuizSelector::Grand);
        session.apply_fetch(QuestionFetch::Loaded(Vec::new()), fixed_now());
        assert!(matches!(session.phase(), QuizPhase::LoadFailed(_)));
        assert!(!session.stopwatch.is_running());
        assert!(matches!(
            session.failure(),
            Some(QuizFailure::LoadFailure(_))
        ));
    }

    #[test]
    fn auth_required_is_not_a_load_error() {
        let mut session = QuizSession::new(QuizSelector::Grand);
        session.apply_fetch(QuestionFetch::AuthRequired, fixed_now());
        assert_eq!(session.phase(), &QuizPhase::AuthRequired);
        assert_eq!(session.failure(), Some(QuizFailure::AuthRequired));
        assert!(session.phase().is_terminal());
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut session = loaded(3);
        assert!(!session.prev());
        assert_eq!(session.current_index(), 0);

        assert!(session.next());
        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.current_index(), 2);
        assert!(session.progress().is_last);

        assert!(session.prev());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn single_question_is_both_first_and_last() {
        let mut session = loaded(1);
        assert!(!session.next());
        assert!(!session.prev());
        let progress = session.progress();
        assert!(progress.is_first && progress.is_last);
        assert!(session.begin_submit().is_ok());
    }

    #[test]
    fn select_answer_is_idempotent_and_range_checked() {
        let mut session = loaded(2);
        session.select_answer(1).unwrap();
        let before = session.answers().clone();
        session.select_answer(1).unwrap();
        assert_eq!(session.answers(), &before);
        assert_eq!(session.phase(), &QuizPhase::InProgress);

        assert!(matches!(
            session.select_answer(4),
            Err(SessionError::Answer(_))
        ));
        assert_eq!(session.current_selection(), Some(1));
    }

    #[test]
    fn submit_only_from_last_question() {
        let mut session = loaded(2);
        assert_eq!(
            session.begin_submit().unwrap_err(),
            SessionError::NotOnLastQuestion
        );
        session.next();
        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.student_answers, vec![None, None]);
        assert_eq!(session.phase(), &QuizPhase::Submitting);

        assert_eq!(session.begin_submit().unwrap_err(), SessionError::NotInProgress);
        assert_eq!(session.select_answer(0).unwrap_err(), SessionError::NotInProgress);
        assert!(!session.prev());
    }

    #[test]
    fn submit_freezes_elapsed_time() {
        let mut session = loaded(1);
        for _ in 0..47 {
            session.stopwatch.tick();
        }
        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.time_taken_seconds, 47);

        session.stopwatch.tick();
        assert_eq!(session.elapsed_seconds(), 47);
    }

    #[test]
    fn failed_submission_can_be_retried_with_same_payload() {
        let mut session = loaded(1);
        session.select_answer(3).unwrap();
        let first = session.begin_submit().unwrap();

        session.apply_submission(Err(server_error()));
        assert!(matches!(session.phase(), QuizPhase::SubmitFailed(_)));
        assert!(session.result().is_none());
        assert_eq!(session.pending_payload(), Some(&first));

        let retry = session.begin_retry().unwrap();
        assert_eq!(retry, first);
        session.apply_submission(Ok(graded()));
        assert_eq!(session.phase(), &QuizPhase::Finished);
        assert!(session.result().is_some());
        assert_eq!(session.begin_retry().unwrap_err(), SessionError::NothingToRetry);
    }

    #[test]
    fn unauthorized_submission_requires_login() {
        let mut session = loaded(1);
        session.begin_submit().unwrap();
        session.apply_submission(Err(ApiError::Unauthorized));
        assert_eq!(session.phase(), &QuizPhase::AuthRequired);
    }

    #[test]
    fn late_outcomes_are_ignored() {
        let mut session = loaded(1);
        session.apply_submission(Ok(graded()));
        assert_eq!(session.phase(), &QuizPhase::InProgress);

        session.apply_fetch(QuestionFetch::AuthRequired, fixed_now());
        assert_eq!(session.phase(), &QuizPhase::InProgress);
    }
}
