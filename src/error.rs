use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A concurrent write got there first.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The AI text-generation service failed or answered with an error.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Helper conversion from anyhow::Error
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// The usual "not found" error for a content item.
    pub fn content_not_found(kind: crate::models::content::ContentKind, id: &str) -> Self {
        AppError::NotFound(format!("{} '{}' not found", kind, id))
    }
}
