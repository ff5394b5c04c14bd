use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Institutional email domain required for new accounts.
pub const DEFAULT_EMAIL_DOMAIN: &str = "@rvce.edu.in";

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

//
// ─── TOKEN ─────────────────────────────────────────────────────────────────────
//

/// Bearer token issued by the backend. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("Username is required.")]
    MissingUsername,

    #[error("Password is required.")]
    MissingPassword,

    #[error("Username must be at least 3 characters.")]
    UsernameTooShort,

    #[error("Username can only contain letters, numbers, and _.")]
    UsernameInvalidChars,

    #[error("Only {domain} email is allowed.")]
    EmailDomain { domain: String },

    #[error("Password must be at least 8 characters.")]
    PasswordTooShort,

    #[error("You must agree to the terms.")]
    TermsNotAccepted,
}

/// Field-by-field signup errors; every failing field is reported at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupErrors {
    pub username: Option<AccountError>,
    pub email: Option<AccountError>,
    pub password: Option<AccountError>,
    pub terms: Option<AccountError>,
}

impl SignupErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.terms.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountError> {
        [&self.username, &self.email, &self.password, &self.terms]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginDraft {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginDraft {
    /// # Errors
    ///
    /// Returns `AccountError::MissingUsername` / `MissingPassword` for blank fields.
    pub fn validate(&self) -> Result<(), AccountError> {
        if self.username.trim().is_empty() {
            return Err(AccountError::MissingUsername);
        }
        if self.password.is_empty() {
            return Err(AccountError::MissingPassword);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub terms_accepted: bool,
}

impl SignupDraft {
    /// Check the form before anything is sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns `SignupErrors` with one entry per failing field.
    pub fn validate(&self, email_domain: &str) -> Result<(), SignupErrors> {
        let mut errors = SignupErrors::default();

        if self.username.chars().count() < MIN_USERNAME_LEN {
            errors.username = Some(AccountError::UsernameTooShort);
        } else if !self
            .username
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            errors.username = Some(AccountError::UsernameInvalidChars);
        }

        if !self.email.ends_with(email_domain) {
            errors.email = Some(AccountError::EmailDomain {
                domain: email_domain.to_string(),
            });
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.password = Some(AccountError::PasswordTooShort);
        }

        if !self.terms_accepted {
            errors.terms = Some(AccountError::TermsNotAccepted);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
