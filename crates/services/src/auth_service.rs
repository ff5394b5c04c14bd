use serde::{Deserialize, Serialize};
use tracing::info;

use quiz_core::model::{AccessToken, DEFAULT_EMAIL_DOMAIN, LoginDraft, SignupDraft};
use storage::repository::StoredCredentials;

use crate::Clock;
use crate::api::ApiClient;
use crate::error::{ApiError, AuthError};

/// Login, signup and logout against the user endpoints.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    clock: Clock,
    email_domain: String,
}

impl AuthService {
    #[must_use]
    pub fn new(client: ApiClient, clock: Clock) -> Self {
        Self {
            client,
            clock,
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
        }
    }

    #[must_use]
    pub fn with_email_domain(mut self, email_domain: impl Into<String>) -> Self {
        self.email_domain = email_domain.into();
        self
    }

    #[must_use]
    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Exchange username and password for a token and remember it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for blank fields, `AuthError::Rejected`
    /// with the server message for refused logins, and `AuthError::Api` /
    /// `AuthError::Storage` for transport or persistence failures.
    pub async fn login(&self, draft: &LoginDraft) -> Result<StoredCredentials, AuthError> {
        draft.validate()?;
        let response: TokenResponse = self
            .client
            .post_public(&["users", "login"], draft)
            .await
            .map_err(|err| rejected(err, "Login failed."))?;
        let credentials = self
            .remember(response, &draft.username, draft.remember_me)
            .await?;
        info!(username = %draft.username, "logged in");
        Ok(credentials)
    }

    /// Validate the form, make sure the username is free, then create the
    /// account and remember the returned token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSignup` with every failing field,
    /// `AuthError::UsernameTaken`, `AuthError::Rejected` with the server
    /// message, or transport/persistence errors.
    pub async fn register(&self, draft: &SignupDraft) -> Result<StoredCredentials, AuthError> {
        draft
            .validate(&self.email_domain)
            .map_err(AuthError::InvalidSignup)?;

        if self.username_exists(&draft.username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let body = RegisterRequest {
            username: &draft.username,
            email: &draft.email,
            password: &draft.password,
        };
        let response: TokenResponse = self
            .client
            .post_public(&["users", "register"], &body)
            .await
            .map_err(|err| rejected(err, "An unknown error occurred."))?;
        let credentials = self.remember(response, &draft.username, false).await?;
        info!(username = %draft.username, "registered");
        Ok(credentials)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Api` if the check cannot be completed.
    pub async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let response: UsernameCheck = self
            .client
            .get_public(&["users", "check-username", username])
            .await?;
        Ok(response.username_exists)
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credential store fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.client.credentials().clear_credentials().await?;
        info!("logged out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credential store fails.
    pub async fn current_user(&self) -> Result<Option<StoredCredentials>, AuthError> {
        Ok(self.client.credentials().load_credentials().await?)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the credential store fails.
    pub async fn is_logged_in(&self) -> Result<bool, AuthError> {
        Ok(self.current_user().await?.is_some())
    }

    async fn remember(
        &self,
        response: TokenResponse,
        username: &str,
        remember_me: bool,
    ) -> Result<StoredCredentials, AuthError> {
        let credentials = StoredCredentials::new(
            AccessToken::new(response.access_token),
            username,
            remember_me,
            self.clock.now(),
        );
        self.client
            .credentials()
            .save_credentials(&credentials)
            .await?;
        Ok(credentials)
    }
}

fn rejected(err: ApiError, fallback: &str) -> AuthError {
    match err {
        ApiError::HttpStatus { detail, .. } => {
            AuthError::Rejected(detail.unwrap_or_else(|| fallback.to_string()))
        }
        other => AuthError::Api(other),
    }
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UsernameCheck {
    username_exists: bool,
}
