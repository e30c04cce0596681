//! Marquee - wiring of the client services.
//!
//! [`App::from_config`] builds every service over one reqwest transport and
//! one storage file, so the token, the active profile and any later run of
//! the binary all see the same state.

use std::sync::Arc;

use marquee_application::{
    AccountService, ActiveProfileStore, ApplicationError, AuthService, AuthenticatedClient,
    LoadMovieModal, ProfileDraft, TokenStore, TransportError,
};
use marquee_domain::{ApiResponse, RequestContext};
use marquee_infrastructure::{
    ClientConfig, ConfigError, FileStorage, ReqwestTransport, TmdbCatalog,
};

/// Errors surfaced by the binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("could not create HTTP client: {0}")]
    Transport(#[from] TransportError),

    /// A use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// `movie` was called without `MARQUEE_TMDB_API_KEY`.
    #[error("MARQUEE_TMDB_API_KEY is not set")]
    MissingApiKey,

    /// The requested profile is not part of the session.
    #[error("no profile with slug {0}")]
    UnknownProfile(String),
}

/// Result type alias for the binary.
pub type AppResult<T> = Result<T, AppError>;

/// All services, wired from one [`ClientConfig`].
#[derive(Debug)]
pub struct App {
    /// Login, session and logout
    pub auth: AuthService,
    /// Registration and profile management
    pub account: AccountService,
    /// The selected profile
    pub profiles: ActiveProfileStore,
    /// Movie modal loader, present when an API key is configured
    pub movies: Option<LoadMovieModal<TmdbCatalog>>,
}

impl App {
    /// Builds the services.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        let transport = Arc::new(ReqwestTransport::with_timeout(config.timeout_ms)?);
        let storage = Arc::new(FileStorage::new(&config.storage_path));
        tracing::debug!(path = %config.storage_path.display(), "using storage file");

        let client = Arc::new(AuthenticatedClient::new(
            transport.clone(),
            TokenStore::new(storage.clone()),
            config.endpoints()?,
        ));

        let movies = config.tmdb_api_key.as_ref().map(|key| {
            LoadMovieModal::new(TmdbCatalog::new(
                transport,
                config.tmdb_url.clone(),
                key.clone(),
                config.language.clone(),
            ))
        });

        Ok(Self {
            auth: AuthService::new(client.clone()),
            account: AccountService::new(client),
            profiles: ActiveProfileStore::new(storage),
            movies,
        })
    }

    /// The movie loader, or [`AppError::MissingApiKey`].
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn movies(&self) -> AppResult<&LoadMovieModal<TmdbCatalog>> {
        self.movies.as_ref().ok_or(AppError::MissingApiKey)
    }

    /// Edits the session's profile with the given slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be fetched, the slug is not
    /// one of its profiles or a genre title is unknown.
    pub async fn update_profile(
        &self,
        context: Option<&RequestContext>,
        slug: &str,
        draft: &ProfileDraft,
    ) -> AppResult<ApiResponse> {
        let session = self
            .auth
            .get_session(context)
            .await
            .map_err(ApplicationError::from)?;
        let profile = session
            .profile(slug)
            .ok_or_else(|| AppError::UnknownProfile(slug.to_string()))?;
        self.account
            .update_profile(&session, profile, draft)
            .await
            .map_err(|e| AppError::Application(e.into()))
    }
}
