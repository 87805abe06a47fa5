//! Domain layer errors.
//!
//! This module defines errors that can occur within the domain layer,
//! representing business rule violations and entity-level errors.

use thiserror::Error;

/// Domain layer error type.
///
/// Every failure here is local and synchronous; none are transient, so
/// callers never retry them. Storage failures are wrapped as
/// [`DomainError::Persistence`] and stay opaque to API consumers.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Validation error for request fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A reply's context diverges from its parent's context.
    #[error("Reply context does not match parent context")]
    ContextMismatch,

    /// Insufficient authority to edit, delete, or moderate.
    #[error("Forbidden")]
    Forbidden,

    /// Author attempted to vote on their own comment.
    #[error("Cannot vote on your own comment")]
    SelfVote,

    /// Persistence layer error (abstracted).
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        DomainError::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
