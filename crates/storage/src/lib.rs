#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CredentialRepository, InMemoryRepository, Storage, StorageError, StoredCredentials,
};
