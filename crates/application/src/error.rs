//! Application error types

use marquee_domain::DomainError;
use thiserror::Error;

use crate::account::AccountError;
use crate::auth::AuthServiceError;
use crate::ports::{CatalogError, StorageError};
use crate::use_cases::MovieModalError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Authentication failed.
    #[error(transparent)]
    Auth(#[from] AuthServiceError),

    /// An account call could not be made.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The movie metadata provider failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The movie modal could not be loaded.
    #[error(transparent)]
    MovieModal(#[from] MovieModalError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
