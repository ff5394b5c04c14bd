//! Thin REST client for the EduConnect backend.

mod quiz;

use std::env;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use quiz_core::model::AccessToken;
use storage::repository::CredentialRepository;

use crate::error::ApiError;

pub use quiz::HttpQuizApi;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Where the backend lives. Endpoints are built under `<base>/api/v1/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `url::ParseError` when `base_url` is not an absolute
    /// hierarchical URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { base_url })
    }

    /// Read `QUIZ_API_BASE_URL`, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when the configured value is not a valid URL.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let raw = env::var("QUIZ_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        Self::new(raw.trim())
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/api/v1/<segments...>`, percent-encoding every segment.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }
}

/// HTTP client that attaches the stored bearer token to authenticated calls.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    credentials: Arc<dyn CredentialRepository>,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            http: Client::new(),
            config,
            credentials,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialRepository> {
        &self.credentials
    }

    /// Token of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` when nothing is stored, or
    /// `ApiError::Storage` if the credential store fails.
    pub async fn access_token(&self) -> Result<AccessToken, ApiError> {
        self.credentials
            .load_credentials()
            .await?
            .map(|stored| stored.token)
            .ok_or(ApiError::NotLoggedIn)
    }

    /// Authenticated `GET`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` without sending anything when no token
    /// is stored, `ApiError::Unauthorized` on 401, and other `ApiError`s for
    /// transport, status, or decoding failures.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let token = self.access_token().await?;
        let url = self.config.endpoint(segments);
        let request = self.http.get(url.clone()).bearer_auth(token.as_str());
        self.send(request, &url, true).await
    }

    /// Authenticated `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_json`].
    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let token = self.access_token().await?;
        let url = self.config.endpoint(segments);
        let request = self
            .http
            .post(url.clone())
            .bearer_auth(token.as_str())
            .json(body);
        self.send(request, &url, true).await
    }

    /// Unauthenticated `GET`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures. A 401
    /// here is reported as `ApiError::HttpStatus` with the server detail.
    pub async fn get_public<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.config.endpoint(segments);
        let request = self.http.get(url.clone());
        self.send(request, &url, false).await
    }

    /// Unauthenticated `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_public`].
    pub async fn post_public<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(segments);
        let request = self.http.post(url.clone()).json(body);
        self.send(request, &url, false).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        debug!(%url, authenticated, "api request");
        let response = request.send().await.inspect_err(|err| {
            warn!(%url, error = %err, "api request failed");
        })?;

        let status = response.status();
        if authenticated && status == StatusCode::UNAUTHORIZED {
            warn!(%url, "api request unauthorized");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail")?.as_str().map(str::to_string));
            warn!(%url, %status, ?detail, "api request rejected");
            return Err(ApiError::HttpStatus { status, detail });
        }

        Ok(response.json().await?)
    }
}
