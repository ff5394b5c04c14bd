use tracing::debug;

use quiz_core::model::{QuizAvailability, StudyMaterial};

use crate::api::ApiClient;
use crate::error::ApiError;

/// Which quizzes and study materials exist for a subject.
#[derive(Clone)]
pub struct CatalogService {
    client: ApiClient,
}

impl CatalogService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Units the student can take and whether the grand quiz is unlocked.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` / `ApiError::Unauthorized` when the
    /// student must log in, or other `ApiError`s on transport failures.
    pub async fn availability(&self, subject: &str) -> Result<QuizAvailability, ApiError> {
        let availability: QuizAvailability = self
            .client
            .get_json(&["quizzes", "availability", subject])
            .await?;
        debug!(
            subject,
            units = availability.units.len(),
            grand_locked = availability.is_grand_quiz_locked,
            "quiz availability"
        );
        Ok(availability)
    }

    /// All unit names known to the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    pub async fn units(&self) -> Result<Vec<String>, ApiError> {
        self.client.get_public(&["units"]).await
    }

    /// Downloadable study materials for a subject.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    pub async fn materials(&self, subject: &str) -> Result<Vec<StudyMaterial>, ApiError> {
        self.client.get_public(&["materials", subject]).await
    }

    /// Absolute download link for a material; relative URLs resolve against
    /// the API base.
    #[must_use]
    pub fn download_url(&self, material: &StudyMaterial) -> String {
        self.client
            .config()
            .base_url()
            .join(&material.url)
            .map_or_else(|_| material.url.clone(), |url| url.to_string())
    }
}
