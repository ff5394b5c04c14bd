use std::sync::Arc;

use quiz_core::model::GradedResult;
use services::{QuestionFetch, QuizPhase};

use super::quiz::QuizAction;
use super::test_harness::{
    FlakyQuestions, GatedScoring, StaticQuestions, ViewKind, backend_down, sample_questions,
    setup_view_harness, setup_view_harness_with_backend, setup_view_harness_with_fetch,
};

#[tokio::test(flavor = "current_thread")]
async fn landing_view_links_subject() {
    let mut harness = setup_view_harness(ViewKind::Landing);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Welcome to EduConnect"), "missing hero in {html}");
    assert!(html.contains("Statistics"), "missing subject in {html}");
    assert!(html.contains("Take a Quiz"), "missing quiz link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn auth_views_render_forms() {
    let mut login = setup_view_harness(ViewKind::Login);
    login.rebuild();
    let html = login.render();
    assert!(html.contains("Remember me"), "missing remember me in {html}");
    assert!(html.contains("Sign Up"), "missing signup link in {html}");

    let mut signup = setup_view_harness(ViewKind::Signup);
    signup.rebuild();
    let html = signup.render();
    assert!(html.contains("name@rvce.edu.in"), "missing email hint in {html}");
    assert!(html.contains("I agree to the terms"), "missing terms in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_selection_asks_for_login() {
    let mut harness = setup_view_harness(ViewKind::QuizSelection);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Please log in to continue."),
        "missing login prompt in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn pre_quiz_shows_question_count() {
    let mut grand = setup_view_harness(ViewKind::PreQuiz("grand", "Statistics"));
    grand.rebuild();
    let html = grand.render();
    assert!(html.contains("Grand Quiz"), "missing title in {html}");
    assert!(html.contains("This quiz has 75 questions."), "missing count in {html}");

    let mut unknown = setup_view_harness(ViewKind::PreQuiz("weekly", "Statistics"));
    unknown.rebuild();
    let html = unknown.render();
    assert!(html.contains("This quiz does not exist."), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz("unit", "Unit-I Descriptive Statistics"));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("What is the mean of 2, 4, 6?"), "missing question in {html}");
    assert!(html.contains("01 / 03"), "missing progress in {html}");
    assert!(html.contains("00:00"), "missing timer in {html}");
    assert!(html.contains("Next"), "missing next in {html}");
    assert!(!html.contains("Submit"), "submit shown early in {html}");
    assert!(harness.ticker.is_claimed());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_mirrors_timer_beats() {
    let mut harness = setup_view_harness(ViewKind::Quiz("unit", "Unit-I Descriptive Statistics"));
    harness.rebuild();
    harness.drive_async().await;

    assert!(harness.ticker.beat(47));
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("00:47"), "missing timer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_reports_empty_quiz() {
    let mut harness = setup_view_harness_with_fetch(
        ViewKind::Quiz("grand", "Statistics"),
        QuestionFetch::Loaded(Vec::new()),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Could not load quiz questions. Please try again."),
        "missing load failure in {html}"
    );
    assert!(html.contains("Back to Quizzes"), "missing back link in {html}");
    assert!(!harness.ticker.is_claimed());
}

#[tokio::test(flavor = "current_thread")]
async fn performance_overview_asks_for_login() {
    let mut harness = setup_view_harness(ViewKind::Performance);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Performance Overview"), "missing heading in {html}");
    assert!(
        html.contains("Please log in to continue."),
        "missing login prompt in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn failed_load_can_be_tried_again() {
    let questions = Arc::new(FlakyQuestions::new(
        QuestionFetch::Failed("Server returned 503".into()),
        QuestionFetch::Loaded(sample_questions()),
    ));
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Quiz("unit", "Unit-I Descriptive Statistics"),
        questions,
        Arc::new(GatedScoring::default()),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Server returned 503"), "missing failure in {html}");
    assert!(html.contains("Try again"), "missing reload button in {html}");
    assert!(!harness.ticker.is_claimed());

    harness.quiz_handles.dispatch().call(QuizAction::Reload);
    harness.drive();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("What is the mean of 2, 4, 6?"), "missing question in {html}");
    assert!(!html.contains("Try again"), "reload button left behind in {html}");
    assert_eq!(harness.quiz_handles.phase(), Some(QuizPhase::InProgress));
    assert!(harness.ticker.is_claimed());
}

#[tokio::test(flavor = "current_thread")]
async fn submit_shows_progress_then_retries_with_same_answers() {
    let graded = GradedResult {
        total_score: 2.0,
        max_score: 3.0,
        correct_answers_count: Some(2),
        total_questions: Some(3),
        detailed_results: Vec::new(),
    };
    let scoring = Arc::new(GatedScoring::scripted(vec![Err(backend_down()), Ok(graded)]));
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Quiz("unit", "Unit-I Descriptive Statistics"),
        Arc::new(StaticQuestions(QuestionFetch::Loaded(sample_questions()))),
        scoring.clone(),
    );
    harness.rebuild();
    harness.drive_async().await;

    let dispatch = harness.quiz_handles.dispatch();
    for (step, option) in [1, 1, 0].into_iter().enumerate() {
        if step > 0 {
            dispatch.call(QuizAction::Next);
        }
        dispatch.call(QuizAction::Select(option));
    }
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Submit"), "missing submit in {html}");

    dispatch.call(QuizAction::Submit);
    harness.drive();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Calculating results..."), "missing progress in {html}");
    assert!(!html.contains("Submit"), "submit still shown in {html}");

    scoring.release();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Failed to submit quiz"), "missing failure in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");

    dispatch.call(QuizAction::RetrySubmit);
    harness.drive();
    let html = harness.render();
    assert!(html.contains("Calculating results..."), "missing progress in {html}");

    scoring.release();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Your Score:"), "missing score in {html}");
    assert_eq!(harness.quiz_handles.phase(), Some(QuizPhase::Finished));

    let received = scoring.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0], received[1]);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_without_login_redirects_to_login_page() {
    let mut harness = setup_view_harness_with_fetch(
        ViewKind::Quiz("grand", "Statistics"),
        QuestionFetch::AuthRequired,
    );
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("redirected to login"), "no redirect in {html}");
    assert!(!harness.ticker.is_claimed());
}
