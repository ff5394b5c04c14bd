use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{GradedResult, Question, QuizSelector, SubmissionPayload};
use quiz_core::time::fixed_clock;
use reqwest::StatusCode;
use services::{
    ApiError, IntervalTicker, ManualTicker, QuestionFetch, QuestionSource, QuizPhase,
    QuizSessionController, ScoringService, SessionError,
};
use tokio::sync::watch;

struct FakeSource {
    fetch: QuestionFetch,
    calls: AtomicUsize,
}

impl FakeSource {
    fn new(fetch: QuestionFetch) -> Arc<Self> {
        Arc::new(Self {
            fetch,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl QuestionSource for FakeSource {
    async fn fetch_questions(&self, _selector: &QuizSelector) -> QuestionFetch {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetch.clone()
    }
}

#[derive(Default)]
struct RecordingScoring {
    outcomes: Mutex<VecDeque<Result<GradedResult, ApiError>>>,
    payloads: Mutex<Vec<SubmissionPayload>>,
    delay: Option<Duration>,
}

impl RecordingScoring {
    fn answering(outcomes: Vec<Result<GradedResult, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        })
    }

    fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoringService for RecordingScoring {
    async fn submit(
        &self,
        _selector: &QuizSelector,
        payload: &SubmissionPayload,
    ) -> Result<GradedResult, ApiError> {
        self.payloads.lock().unwrap().push(payload.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(graded()))
    }
}

fn questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| {
            Question::new(
                format!("Question {i}"),
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
            )
            .with_field("id", format!("TPL-{i}"))
        })
        .collect()
}

fn graded() -> GradedResult {
    GradedResult {
        total_score: 2.0,
        max_score: 3.0,
        correct_answers_count: Some(2),
        total_questions: Some(3),
        detailed_results: Vec::new(),
    }
}

fn unavailable() -> ApiError {
    ApiError::HttpStatus {
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: None,
    }
}

fn controller(
    source: Arc<FakeSource>,
    scoring: Arc<RecordingScoring>,
    ticker: ManualTicker,
) -> QuizSessionController {
    QuizSessionController::new(
        QuizSelector::unit("Unit-I Descriptive Statistics").unwrap(),
        source,
        scoring,
        Arc::new(ticker),
    )
    .with_clock(fixed_clock())
}

async fn wait_for_elapsed(rx: &mut watch::Receiver<u64>, seconds: u64) {
    while *rx.borrow_and_update() < seconds {
        rx.changed().await.unwrap();
    }
}

#[tokio::test(flavor = "current_thread")]
async fn three_question_attempt_submits_frozen_payload() {
    let source = FakeSource::new(QuestionFetch::Loaded(questions(3)));
    let scoring = RecordingScoring::answering(vec![Ok(graded())]);
    let ticker = ManualTicker::new();
    let mut quiz = controller(source, scoring.clone(), ticker.clone());

    assert_eq!(quiz.load().await, &QuizPhase::InProgress);
    assert!(quiz.is_timer_running());

    let mut elapsed = quiz.elapsed_updates();
    ticker.beat(47);
    wait_for_elapsed(&mut elapsed, 47).await;

    quiz.select_answer(2).unwrap();
    assert!(quiz.next());
    assert!(quiz.next());
    quiz.select_answer(0).unwrap();

    assert_eq!(quiz.submit().await.unwrap(), &QuizPhase::Finished);
    assert!(!quiz.is_timer_running());

    let payloads = scoring.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].student_answers, vec![Some(2), None, Some(0)]);
    assert_eq!(payloads[0].time_taken_seconds, 47);
    assert_eq!(payloads[0].quiz_questions, questions(3));
    assert_eq!(quiz.session().result(), Some(&graded()));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn elapsed_time_is_frozen_while_grading_is_slow() {
    let source = FakeSource::new(QuestionFetch::Loaded(questions(1)));
    let scoring = Arc::new(RecordingScoring {
        delay: Some(Duration::from_secs(30)),
        ..RecordingScoring::default()
    });
    let mut quiz = QuizSessionController::new(
        QuizSelector::Grand,
        source,
        scoring.clone(),
        Arc::new(IntervalTicker::default()),
    );

    quiz.load().await;
    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let request = quiz.begin_submit().unwrap();
    assert_eq!(request.payload().time_taken_seconds, 10);
    assert_eq!(quiz.phase(), &QuizPhase::Submitting);

    let outcome = request.send().await;
    assert_eq!(quiz.session().elapsed_seconds(), 10);
    assert_eq!(quiz.finish_submit(outcome), &QuizPhase::Finished);
    assert_eq!(scoring.payloads()[0].time_taken_seconds, 10);
}

#[tokio::test(flavor = "current_thread")]
async fn empty_fetch_fails_without_timer_or_submission() {
    let source = FakeSource::new(QuestionFetch::Loaded(Vec::new()));
    let scoring = RecordingScoring::answering(Vec::new());
    let ticker = ManualTicker::new();
    let mut quiz = controller(source, scoring.clone(), ticker.clone());

    assert!(matches!(quiz.load().await, QuizPhase::LoadFailed(_)));
    assert!(!ticker.is_claimed());
    assert!(!quiz.is_timer_running());
    assert_eq!(quiz.submit().await.unwrap_err(), SessionError::NotInProgress);
    assert!(scoring.payloads().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn unauthorized_fetch_requires_login() {
    let source = FakeSource::new(QuestionFetch::AuthRequired);
    let ticker = ManualTicker::new();
    let mut quiz = controller(source, RecordingScoring::answering(Vec::new()), ticker.clone());

    assert_eq!(quiz.load().await, &QuizPhase::AuthRequired);
    assert!(!ticker.is_claimed());
}

#[tokio::test(flavor = "current_thread")]
async fn load_is_issued_once() {
    let source = FakeSource::new(QuestionFetch::Failed("Server returned 500".into()));
    let mut quiz = controller(
        source.clone(),
        RecordingScoring::answering(Vec::new()),
        ManualTicker::new(),
    );

    quiz.load().await;
    quiz.load().await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        quiz.phase(),
        &QuizPhase::LoadFailed("Server returned 500".into())
    );
}

#[tokio::test(flavor = "current_thread")]
async fn failed_submission_retries_identical_payload() {
    let source = FakeSource::new(QuestionFetch::Loaded(questions(2)));
    let scoring = RecordingScoring::answering(vec![Err(unavailable()), Ok(graded())]);
    let ticker = ManualTicker::new();
    let mut quiz = controller(source, scoring.clone(), ticker.clone());

    quiz.load().await;
    let mut elapsed = quiz.elapsed_updates();
    ticker.beat(12);
    wait_for_elapsed(&mut elapsed, 12).await;
    quiz.select_answer(1).unwrap();
    quiz.next();

    let phase = quiz.submit().await.unwrap().clone();
    assert!(matches!(phase, QuizPhase::SubmitFailed(_)));
    assert!(quiz.session().result().is_none());
    assert_eq!(scoring.payloads().len(), 1);

    // Answers are locked while the failed submission waits for a retry.
    assert_eq!(quiz.select_answer(3).unwrap_err(), SessionError::NotInProgress);

    assert_eq!(quiz.retry_submit().await.unwrap(), &QuizPhase::Finished);
    let payloads = scoring.payloads();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
    assert_eq!(payloads[1].time_taken_seconds, 12);
    assert_eq!(payloads[1].student_answers, vec![Some(1), None]);
}

#[tokio::test(flavor = "current_thread")]
async fn second_submit_while_outstanding_is_rejected() {
    let source = FakeSource::new(QuestionFetch::Loaded(questions(1)));
    let scoring = RecordingScoring::answering(Vec::new());
    let mut quiz = controller(source, scoring.clone(), ManualTicker::new());
    quiz.load().await;

    let first = quiz.begin_submit().unwrap();
    assert!(matches!(
        quiz.begin_submit(),
        Err(SessionError::NotInProgress)
    ));
    assert!(matches!(
        quiz.begin_retry(),
        Err(SessionError::NothingToRetry)
    ));

    let outcome = first.send().await;
    quiz.finish_submit(outcome);
    assert_eq!(scoring.payloads().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn abandon_stops_the_clock() {
    let source = FakeSource::new(QuestionFetch::Loaded(questions(3)));
    let ticker = ManualTicker::new();
    let mut quiz = controller(source, RecordingScoring::answering(Vec::new()), ticker.clone());
    quiz.load().await;

    let mut elapsed = quiz.elapsed_updates();
    ticker.beat(2);
    wait_for_elapsed(&mut elapsed, 2).await;

    quiz.abandon();
    assert!(!quiz.is_timer_running());
    ticker.beat(5);
    tokio::task::yield_now().await;
    assert_eq!(quiz.session().elapsed_seconds(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn dropping_the_controller_cancels_the_timer() {
    let source = FakeSource::new(QuestionFetch::Loaded(questions(3)));
    let ticker = ManualTicker::new();
    let mut quiz = controller(source, RecordingScoring::answering(Vec::new()), ticker.clone());
    quiz.load().await;

    let mut elapsed = quiz.elapsed_updates();
    drop(quiz);

    // Every sender goes away once the timer task is gone.
    let closed = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if elapsed.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(closed.is_ok());
}
