//! Domain-specific error types and error handling.

mod types;


pub use types::{PushError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Push(#[from] PushError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DomainError {
    /// The push error class, if this error carries one
    pub fn push_error(&self) -> Option<&PushError> {
        match self {
            DomainError::Push(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the failure came from caller input rather than a collaborator
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
