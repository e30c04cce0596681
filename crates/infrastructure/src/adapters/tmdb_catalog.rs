//! TMDB-compatible movie metadata adapter.
//!
//! Calls `GET {base}/movie/{id}` and `GET {base}/movie/{id}/videos` with the
//! `api_key` and `language` query parameters, over any [`HttpTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use marquee_application::ports::{CatalogError, HttpTransport, MovieCatalog};
use marquee_domain::{HttpMethod, MovieInfo, MovieVideo, RequestSpec};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Public TMDB v3 API root.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

#[derive(Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<MovieVideo>,
}

/// Movie catalog backed by the TMDB v3 API.
pub struct TmdbCatalog {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for TmdbCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbCatalog")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbCatalog {
    /// Creates a catalog rooted at `base_url`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: Url,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url,
            api_key: api_key.into(),
            language: language.into(),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidPayload(format!("not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("language", &self.language);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CatalogError> {
        let request = RequestSpec::new(HttpMethod::Get, self.url(segments)?);
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|v| v.get("status_message")?.as_str().map(str::to_string))
                .unwrap_or_default();
            tracing::warn!(status = response.status, %message, "movie provider error");
            return Err(CatalogError::Status {
                status: response.status,
                message,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| CatalogError::InvalidPayload(e.to_string()))
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn movie_info(&self, id: u64) -> Result<MovieInfo, CatalogError> {
        self.fetch(&["movie", &id.to_string()]).await
    }

    async fn movie_videos(&self, id: u64) -> Result<Vec<MovieVideo>, CatalogError> {
        let list: VideoList = self.fetch(&["movie", &id.to_string(), "videos"]).await?;
        Ok(list.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReqwestTransport;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_keeps_base_path_and_adds_query() {
        let transport = Arc::new(ReqwestTransport::new().expect("client should build"));
        let base = Url::parse(TMDB_BASE_URL).expect("valid url");
        let catalog = TmdbCatalog::new(transport, base, "k3y", DEFAULT_LANGUAGE);

        let url = catalog.url(&["movie", "550", "videos"]).expect("url");

        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/550/videos?api_key=k3y&language=pt-BR"
        );
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let transport = Arc::new(ReqwestTransport::new().expect("client should build"));
        let base = Url::parse("http://localhost:9000/tmdb/").expect("valid url");
        let catalog = TmdbCatalog::new(transport, base, "k", "en-US");

        let url = catalog.url(&["movie", "1"]).expect("url");

        assert_eq!(url.path(), "/tmdb/movie/1");
    }
}
