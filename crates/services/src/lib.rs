#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod error;
pub mod performance_service;
pub mod sessions;
pub mod timer;

pub use quiz_core::Clock;

pub use api::{ApiClient, ApiConfig, HttpQuizApi};
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use error::{ApiError, AppServicesError, AuthError, QuizFailure, SessionError};
pub use performance_service::PerformanceService;
pub use sessions::{
    QuestionFetch, QuestionSource, QuizPhase, QuizSession, QuizSessionController, ScoringService,
    SessionProgress,
};
pub use timer::{IntervalTicker, ManualTicker, Ticker, TimerGuard};
