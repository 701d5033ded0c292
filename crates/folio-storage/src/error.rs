//! Error types for folio-storage

use folio_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Invalid blob path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("User already registered")]
    UserAlreadyRegistered,

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ContentNotFound(id) => CoreError::ContentNotFound(id),
            StorageError::Invalid(msg) | StorageError::InvalidPath(msg) => {
                CoreError::Validation(msg)
            }
            StorageError::UserAlreadyRegistered
            | StorageError::InvalidCredentials
            | StorageError::UserNotFound(_) => CoreError::Auth(err.to_string()),
            StorageError::Io(e) => CoreError::Io(e),
            other => CoreError::Storage(other.to_string()),
        }
    }
}
