use async_trait::async_trait;

use quiz_core::model::{GradedResult, Question, QuizSelector, SubmissionPayload};

use crate::error::ApiError;

/// Outcome of asking the backend for a quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionFetch {
    Loaded(Vec<Question>),
    AuthRequired,
    Failed(String),
}

impl QuestionFetch {
    /// Classify a transport-level result.
    #[must_use]
    pub fn from_result(result: Result<Vec<Question>, ApiError>) -> Self {
        match result {
            Ok(questions) => Self::Loaded(questions),
            Err(err) if err.requires_login() => Self::AuthRequired,
            Err(err) => Self::Failed(err.user_message()),
        }
    }
}

/// Produces the question list for a quiz.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self, selector: &QuizSelector) -> QuestionFetch;
}

/// Grades a submitted attempt. Each call is one request; callers decide on retries.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` when the attempt could not be graded.
    async fn submit(
        &self,
        selector: &QuizSelector,
        payload: &SubmissionPayload,
    ) -> Result<GradedResult, ApiError>;
}
