//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A credential was empty or blank.
    #[error("empty credential: {0}")]
    EmptyCredential(&'static str),

    /// A genre title is not in the catalog.
    #[error("unknown genre: {0}")]
    UnknownGenre(String),

    /// A payload did not have the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
