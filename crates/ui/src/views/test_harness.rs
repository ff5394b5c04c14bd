use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{GradedResult, Question, QuizSelector, SubmissionPayload};
use quiz_core::time::fixed_now;
use services::{
    ApiConfig, ApiError, AppServices, AuthService, CatalogService, Clock, ManualTicker,
    PerformanceService, QuestionFetch, QuestionSource, QuizSessionController, ScoringService,
};
use storage::repository::{Storage, StorageError};
use tokio::sync::Notify;

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{
    LandingView, LoginView, PerformanceView, PreQuizView, QuizSelectionView, QuizView, SignupView,
};

/// Nothing listens here; catalog calls made without a login never leave the client.
const UNREACHABLE_API: &str = "http://127.0.0.1:9/";

pub struct StaticQuestions(pub QuestionFetch);

#[async_trait]
impl QuestionSource for StaticQuestions {
    async fn fetch_questions(&self, _selector: &QuizSelector) -> QuestionFetch {
        self.0.clone()
    }
}

pub struct UnreachableScoring;

#[async_trait]
impl ScoringService for UnreachableScoring {
    async fn submit(
        &self,
        _selector: &QuizSelector,
        _payload: &SubmissionPayload,
    ) -> Result<GradedResult, ApiError> {
        Err(ApiError::NotLoggedIn)
    }
}

/// Each submission waits for `release`, then takes the next scripted outcome.
#[derive(Default)]
pub struct GatedScoring {
    gate: Notify,
    outcomes: Mutex<VecDeque<Result<GradedResult, ApiError>>>,
    received: Mutex<Vec<SubmissionPayload>>,
}

impl GatedScoring {
    pub fn scripted(outcomes: Vec<Result<GradedResult, ApiError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn received(&self) -> Vec<SubmissionPayload> {
        self.received.lock().expect("payload lock").clone()
    }
}

#[async_trait]
impl ScoringService for GatedScoring {
    async fn submit(
        &self,
        _selector: &QuizSelector,
        payload: &SubmissionPayload,
    ) -> Result<GradedResult, ApiError> {
        self.received.lock().expect("payload lock").push(payload.clone());
        self.gate.notified().await;
        self.outcomes
            .lock()
            .expect("outcome lock")
            .pop_front()
            .unwrap_or(Err(ApiError::NotLoggedIn))
    }
}

pub fn backend_down() -> ApiError {
    ApiError::Storage(StorageError::Connection("backend unavailable".into()))
}

/// Fails with `first` on the first fetch, then serves `rest`.
pub struct FlakyQuestions {
    first: QuestionFetch,
    rest: QuestionFetch,
    calls: Mutex<usize>,
}

impl FlakyQuestions {
    pub fn new(first: QuestionFetch, rest: QuestionFetch) -> Self {
        Self {
            first,
            rest,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl QuestionSource for FlakyQuestions {
    async fn fetch_questions(&self, _selector: &QuizSelector) -> QuestionFetch {
        let mut calls = self.calls.lock().expect("call lock");
        *calls += 1;
        if *calls == 1 {
            self.first.clone()
        } else {
            self.rest.clone()
        }
    }
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn performance(&self) -> Arc<PerformanceService> {
        self.services.performance()
    }

    fn quiz_session(&self, selector: QuizSelector) -> QuizSessionController {
        self.services.quiz_session(selector)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Login,
    Signup,
    QuizSelection,
    PreQuiz(&'static str, &'static str),
    Quiz(&'static str, &'static str),
    Performance,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.quiz_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
    #[route("/login")]
    LoginLanding {},
}

#[component]
fn LoginLanding() -> Element {
    rsx! { p { "redirected to login" } }
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Signup => rsx! { SignupView {} },
        ViewKind::QuizSelection => rsx! { QuizSelectionView { subject: "Statistics".to_string() } },
        ViewKind::PreQuiz(kind, name) => rsx! {
            PreQuizView { kind: kind.to_string(), name: name.to_string() }
        },
        ViewKind::Quiz(kind, name) => rsx! {
            QuizView { kind: kind.to_string(), name: name.to_string() }
        },
        ViewKind::Performance => rsx! { PerformanceView { subject: "Statistics".to_string() } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub ticker: Arc<ManualTicker>,
    pub quiz_handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new("What is the mean of 2, 4, 6?", vec!["3".into(), "4".into(), "5".into()]),
        Question::new("What is the median of 1, 9, 3?", vec!["1".into(), "3".into(), "9".into()]),
        Question::new("Which measure is most affected by outliers?", vec!["Mean".into(), "Median".into()]),
    ]
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_fetch(view, QuestionFetch::Loaded(sample_questions()))
}

pub fn setup_view_harness_with_fetch(view: ViewKind, fetch: QuestionFetch) -> ViewHarness {
    setup_view_harness_with_backend(
        view,
        Arc::new(StaticQuestions(fetch)),
        Arc::new(UnreachableScoring),
    )
}

pub fn setup_view_harness_with_backend(
    view: ViewKind,
    questions: Arc<dyn QuestionSource>,
    scoring: Arc<dyn ScoringService>,
) -> ViewHarness {
    let ticker = Arc::new(ManualTicker::new());
    let config = ApiConfig::new(UNREACHABLE_API).expect("valid api url");
    let services = AppServices::from_storage(&Storage::in_memory(), config, Clock::fixed(fixed_now()))
        .with_quiz_backend(questions, scoring, ticker.clone());
    let app = Arc::new(TestApp { services });
    let quiz_handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );
    ViewHarness {
        dom,
        ticker,
        quiz_handles,
    }
}
