//! Movie metadata provider port

use async_trait::async_trait;
use marquee_domain::{MovieInfo, MovieVideo};

use super::TransportError;

/// Errors returned by a movie metadata provider.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The provider could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The provider answered with a non-2xx status.
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status
        status: u16,
        /// Provider message
        message: String,
    },

    /// The provider payload could not be decoded.
    #[error("invalid provider payload: {0}")]
    InvalidPayload(String),
}

/// Read-only access to movie metadata.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetches the details of a movie.
    ///
    /// # Errors
    /// Returns an error if the provider fails or the movie is unknown.
    async fn movie_info(&self, id: u64) -> Result<MovieInfo, CatalogError>;

    /// Fetches the videos attached to a movie, in provider order.
    ///
    /// # Errors
    /// Returns an error if the provider fails or the movie is unknown.
    async fn movie_videos(&self, id: u64) -> Result<Vec<MovieVideo>, CatalogError>;
}
