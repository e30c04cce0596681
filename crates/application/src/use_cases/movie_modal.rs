//! Load movie modal use case.

use marquee_domain::{MovieInfo, MovieVideo};

use crate::ports::{CatalogError, MovieCatalog};

/// Video type preferred for the modal.
const TRAILER: &str = "Trailer";

/// Errors from loading the movie modal.
#[derive(Debug, thiserror::Error)]
pub enum MovieModalError {
    /// The provider failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The movie has no video to play.
    #[error("no trailer available for movie {id}")]
    MissingTrailer {
        /// Movie id
        id: u64,
    },
}

/// Everything the "more info" modal shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieModalOutput {
    /// Movie details
    pub movie: MovieInfo,
    /// Video to autoplay
    pub video: MovieVideo,
}

/// Use case for loading a movie together with its trailer.
#[derive(Debug)]
pub struct LoadMovieModal<C: MovieCatalog> {
    catalog: C,
}

impl<C: MovieCatalog> LoadMovieModal<C> {
    /// Creates a new `LoadMovieModal` use case.
    #[must_use]
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Fetches the movie and picks its video: the first trailer, else the
    /// first video of any kind.
    ///
    /// # Errors
    /// - Returns [`MovieModalError::MissingTrailer`] if the movie has no video
    /// - Returns [`MovieModalError::Catalog`] if the provider fails
    pub async fn execute(&self, id: u64) -> Result<MovieModalOutput, MovieModalError> {
        let movie = self.catalog.movie_info(id).await?;
        let mut videos = self.catalog.movie_videos(id).await?;

        let index = videos.iter().position(|v| v.kind == TRAILER).unwrap_or(0);
        if videos.is_empty() {
            tracing::info!(id, "movie has no video");
            return Err(MovieModalError::MissingTrailer { id });
        }
        let video = videos.swap_remove(index);

        Ok(MovieModalOutput { movie, video })
    }
}
