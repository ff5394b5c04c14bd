//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use quiz_core::model::{AccountError, AnswerError, SignupErrors};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the REST client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("session expired or unauthorized")]
    Unauthorized,
    #[error("request failed with status {status}")]
    HttpStatus {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether the caller should send the user to the login page.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NotLoggedIn | Self::Unauthorized)
    }

    /// Server-provided `detail` message, if the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Short message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::HttpStatus {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::HttpStatus { status, .. } => format!("Server returned {status}"),
            Self::Http(err) if err.is_decode() => "Unexpected response from server".to_string(),
            Self::Http(_) => "Could not reach the server".to_string(),
            other => other.to_string(),
        }
    }
}

/// How a quiz attempt failed, as shown to the student.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QuizFailure {
    #[error("login required")]
    AuthRequired,
    #[error("Failed to load quiz: {0}")]
    LoadFailure(String),
    #[error("Failed to submit quiz: {0}")]
    SubmitFailure(String),
}

/// Illegal operations on a quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz is not in progress")]
    NotInProgress,
    #[error("quiz can only be submitted from the last question")]
    NotOnLastQuestion,
    #[error("no failed submission to retry")]
    NothingToRetry,
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] AccountError),
    #[error("signup form has {} invalid field(s)", .0.iter().count())]
    InvalidSignup(SignupErrors),
    #[error("This username is already taken.")]
    UsernameTaken,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
