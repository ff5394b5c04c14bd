use async_trait::async_trait;
use tracing::info;

use quiz_core::model::{GradedResult, Question, QuizSelector, SubmissionPayload};

use super::ApiClient;
use crate::error::ApiError;
use crate::sessions::{QuestionFetch, QuestionSource, ScoringService};

/// `QuestionSource` and `ScoringService` over the quiz endpoints.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: ApiClient,
}

impl HttpQuizApi {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn load(&self, selector: &QuizSelector) -> Result<Vec<Question>, ApiError> {
        // The grand quiz endpoint answers `null` when nothing could be generated.
        let questions: Option<Vec<Question>> = match selector {
            QuizSelector::Unit(name) => {
                self.client
                    .get_json(&["quiz", "unit", name.as_str()])
                    .await?
            }
            QuizSelector::Grand => self.client.get_json(&["quiz", "grand"]).await?,
        };
        Ok(questions.unwrap_or_default())
    }
}

#[async_trait]
impl QuestionSource for HttpQuizApi {
    async fn fetch_questions(&self, selector: &QuizSelector) -> QuestionFetch {
        let fetch = QuestionFetch::from_result(self.load(selector).await);
        if let QuestionFetch::Loaded(questions) = &fetch {
            info!(%selector, count = questions.len(), "quiz questions loaded");
        }
        fetch
    }
}

#[async_trait]
impl ScoringService for HttpQuizApi {
    async fn submit(
        &self,
        selector: &QuizSelector,
        payload: &SubmissionPayload,
    ) -> Result<GradedResult, ApiError> {
        self.client
            .post_json(&["quiz", "submit", selector.kind()], payload)
            .await
    }
}
