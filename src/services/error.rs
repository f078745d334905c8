use thiserror::Error;

use crate::clients::UpstreamError;
use crate::db::RepoError;

/// Errors surfaced by the entity use cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Upstream error: {0}")]
    Upstream(#[source] UpstreamError),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(key) => Self::NotFound(key),
            RepoError::Conflict(key) => Self::Conflict(key),
            RepoError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<UpstreamError> for ServiceError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::UnknownLeague(code) => {
                Self::InvalidInput(format!("unknown league code: {code}"))
            }
            other => Self::Upstream(other),
        }
    }
}
