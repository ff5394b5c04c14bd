use std::sync::Arc;

use quiz_core::model::QuizSelector;
use storage::repository::Storage;

use crate::Clock;
use crate::api::{ApiClient, ApiConfig, HttpQuizApi};
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::performance_service::PerformanceService;
use crate::sessions::{QuestionSource, QuizSessionController, ScoringService};
use crate::timer::{IntervalTicker, Ticker};

/// Assembles app-facing services over one API client and credential store.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    performance: Arc<PerformanceService>,
    questions: Arc<dyn QuestionSource>,
    scoring: Arc<dyn ScoringService>,
    ticker: Arc<dyn Ticker>,
}

impl AppServices {
    /// Build services backed by `SQLite` credential storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: ApiConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, config, clock))
    }

    /// Build services over an existing store, with the real-time ticker.
    #[must_use]
    pub fn from_storage(storage: &Storage, config: ApiConfig, clock: Clock) -> Self {
        let client = ApiClient::new(config, Arc::clone(&storage.credentials));
        let quiz_api = Arc::new(HttpQuizApi::new(client.clone()));
        let questions: Arc<dyn QuestionSource> = quiz_api.clone();
        let scoring: Arc<dyn ScoringService> = quiz_api;

        Self {
            clock,
            auth: Arc::new(AuthService::new(client.clone(), clock)),
            catalog: Arc::new(CatalogService::new(client.clone())),
            performance: Arc::new(PerformanceService::new(client)),
            questions,
            scoring,
            ticker: Arc::new(IntervalTicker::default()),
        }
    }

    #[must_use]
    pub fn with_email_domain(mut self, email_domain: &str) -> Self {
        let auth = self.auth.as_ref().clone().with_email_domain(email_domain);
        self.auth = Arc::new(auth);
        self
    }

    /// Swap the quiz collaborators, e.g. for fakes in tests.
    #[must_use]
    pub fn with_quiz_backend(
        mut self,
        questions: Arc<dyn QuestionSource>,
        scoring: Arc<dyn ScoringService>,
        ticker: Arc<dyn Ticker>,
    ) -> Self {
        self.questions = questions;
        self.scoring = scoring;
        self.ticker = ticker;
        self
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn performance(&self) -> Arc<PerformanceService> {
        Arc::clone(&self.performance)
    }

    /// Fresh controller for one attempt at `selector`.
    #[must_use]
    pub fn quiz_session(&self, selector: QuizSelector) -> QuizSessionController {
        QuizSessionController::new(
            selector,
            Arc::clone(&self.questions),
            Arc::clone(&self.scoring),
            Arc::clone(&self.ticker),
        )
        .with_clock(self.clock)
    }
}
