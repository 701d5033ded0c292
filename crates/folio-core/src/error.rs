use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// Raw message from the auth collaborator, see `friendly_auth_message`
    #[error("{0}")]
    Auth(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin privileges required")]
    Forbidden,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::ContentNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
