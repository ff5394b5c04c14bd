use std::sync::Arc;

use quiz_core::model::QuizSelector;
use services::{AuthService, CatalogService, PerformanceService, QuizSessionController};

pub const DEFAULT_SUBJECT: &str = "Statistics";

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn performance(&self) -> Arc<PerformanceService>;

    /// A fresh controller for one quiz attempt.
    fn quiz_session(&self, selector: QuizSelector) -> QuizSessionController;

    fn subject(&self) -> String {
        DEFAULT_SUBJECT.to_string()
    }
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    subject: String,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    performance: Arc<PerformanceService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            subject: app.subject(),
            auth: app.auth(),
            catalog: app.catalog(),
            performance: app.performance(),
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
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

    #[must_use]
    pub fn start_quiz(&self, selector: QuizSelector) -> QuizSessionController {
        self.app.quiz_session(selector)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
