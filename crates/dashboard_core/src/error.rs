use thiserror::Error;

use crate::JobId;

/// A precondition failed before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("url must not be blank")]
    BlankUrl,
    #[error("no jobs selected")]
    EmptySelection,
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(u32),
    #[error("page size must be between 1 and {max} (got {0})", max = crate::MAX_PAGE_SIZE)]
    InvalidPageSize(u32),
}

/// A call to the analysis service failed. Local state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("job {0} not found")]
    NotFound(JobId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CommandError {
    /// Every error in this crate leaves state unmodified, so every operation
    /// can be retried; validation failures need different input first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommandError::Service(_))
    }
}
