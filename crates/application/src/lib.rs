//! Marquee Application - Use cases and ports
//!
//! This crate contains the application logic for the Marquee client:
//! the authenticated HTTP client, token and profile persistence, and the
//! auth, account and movie use cases. It depends only on `marquee-domain`
//! and defines ports (traits) for the infrastructure adapters.

pub mod account;
pub mod auth;
pub mod error;
pub mod ports;
pub mod profile_store;
pub mod storage;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use account::{AccountError, AccountService, ProfileDraft, REGISTERED_STATUS};
pub use auth::{
    AuthService, AuthServiceError, AuthenticatedClient, Endpoints, RequestOptions, TokenStore,
};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    CatalogError, ClientStorage, HttpTransport, MovieCatalog, StorageError, TransportError,
};
pub use profile_store::ActiveProfileStore;
pub use storage::MemoryStorage;
pub use use_cases::{LoadMovieModal, MovieModalError, MovieModalOutput};
