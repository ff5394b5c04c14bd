use serde::Serialize;

use quiz_core::model::{AttemptRecord, PerformanceEntry, TopicAnalysis};

use crate::api::ApiClient;
use crate::error::ApiError;

/// Saved attempts and per-topic analysis of them.
#[derive(Clone)]
pub struct PerformanceService {
    client: ApiClient,
}

impl PerformanceService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every attempt by the logged-in student.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (including the login-required variants).
    pub async fn history(&self) -> Result<Vec<AttemptRecord>, ApiError> {
        self.client.get_json(&["performance", "history"]).await
    }

    /// Attempts for one unit, newest first as the backend orders them.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (including the login-required variants).
    pub async fn unit_history(&self, unit: &str) -> Result<Vec<AttemptRecord>, ApiError> {
        self.client
            .get_json(&["performance", "history", unit])
            .await
    }

    /// Group one attempt's answers by topic and subtopic.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (including the login-required variants).
    pub async fn analyze(&self, breakdown: &[PerformanceEntry]) -> Result<TopicAnalysis, ApiError> {
        let body = AnalyzeRequest {
            performance_breakdown: breakdown,
        };
        self.client
            .post_json(&["performance", "analyze"], &body)
            .await
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    performance_breakdown: &'a [PerformanceEntry],
}
