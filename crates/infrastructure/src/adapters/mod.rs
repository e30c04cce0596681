//! Adapters implementing the application ports over the network.

mod reqwest_transport;
mod tmdb_catalog;

pub use reqwest_transport::{DEFAULT_TIMEOUT_MS, ReqwestTransport};
pub use tmdb_catalog::{DEFAULT_LANGUAGE, TMDB_BASE_URL, TmdbCatalog};
