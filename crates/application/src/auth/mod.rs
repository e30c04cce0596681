//! Authentication for the Marquee client.
//!
//! This module provides:
//! - An HTTP client that attaches bearer tokens and refreshes them once on 401
//! - A token store backed by any [`ClientStorage`](crate::ports::ClientStorage)
//! - Login, session fetch and logout

mod client;
mod endpoints;
mod service;
mod token_store;

pub use client::{AuthenticatedClient, RequestOptions};
pub use endpoints::Endpoints;
pub use service::{AuthService, AuthServiceError};
pub use token_store::TokenStore;
