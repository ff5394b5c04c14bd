use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::AccessToken;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted login state: the bearer token plus who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: AccessToken,
    pub username: String,
    pub remember_me: bool,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredentials {
    #[must_use]
    pub fn new(
        token: AccessToken,
        username: impl Into<String>,
        remember_me: bool,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            username: username.into(),
            remember_me,
            saved_at,
        }
    }
}

/// Repository contract for the single logged-in identity.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Current credentials, if a user is logged in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError>;

    /// Replace any stored credentials.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credentials cannot be stored.
    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError>;

    /// Forget stored credentials. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn clear_credentials(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    credentials: Arc<Mutex<Option<StoredCredentials>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that starts out logged in.
    #[must_use]
    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            credentials: Arc::new(Mutex::new(Some(credentials))),
        }
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(credentials.clone());
        Ok(())
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.take();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub credentials: Arc<dyn CredentialRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let credentials: Arc<dyn CredentialRepository> = Arc::new(InMemoryRepository::new());
        Self { credentials }
    }
}
