use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::AccessToken;
use sqlx::Row;

use crate::repository::{CredentialRepository, StorageError, StoredCredentials};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl CredentialRepository for SqliteRepository {
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT access_token, username, remember_me, saved_at
            FROM credentials
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token: String = row.try_get("access_token").map_err(ser)?;
        let username: String = row.try_get("username").map_err(ser)?;
        let remember_me: i64 = row.try_get("remember_me").map_err(ser)?;
        let saved_at: DateTime<Utc> = row.try_get("saved_at").map_err(ser)?;

        Ok(Some(StoredCredentials {
            token: AccessToken::new(token),
            username,
            remember_me: remember_me != 0,
            saved_at,
        }))
    }

    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO credentials (id, access_token, username, remember_me, saved_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                access_token = excluded.access_token,
                username = excluded.username,
                remember_me = excluded.remember_me,
                saved_at = excluded.saved_at
            ",
        )
        .bind(1_i64)
        .bind(credentials.token.as_str())
        .bind(credentials.username.as_str())
        .bind(i64::from(credentials.remember_me))
        .bind(credentials.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
