//! Client configuration read from the environment.
//!
//! | Variable               | Default                          |
//! |------------------------|----------------------------------|
//! | `MARQUEE_BACKEND_URL`  | `http://localhost:3333`          |
//! | `MARQUEE_APP_URL`      | `http://localhost:3000`          |
//! | `MARQUEE_TMDB_URL`     | `https://api.themoviedb.org/3`   |
//! | `MARQUEE_TMDB_API_KEY` | unset                            |
//! | `MARQUEE_LANGUAGE`     | `pt-BR`                          |
//! | `MARQUEE_TIMEOUT_MS`   | `30000`                          |
//! | `MARQUEE_STORAGE_PATH` | platform config dir              |

use std::path::PathBuf;

use marquee_application::Endpoints;
use url::Url;

use crate::adapters::{DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_MS, TMDB_BASE_URL};
use crate::persistence::FileStorage;

/// Backend API root used when `MARQUEE_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3333";

/// App host used when `MARQUEE_APP_URL` is unset.
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Errors from reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable does not hold an absolute base URL.
    #[error("{name} is not a valid base URL: {value}")]
    InvalidUrl {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// A numeric variable does not hold a number.
    #[error("{name} must be a positive integer, got {value}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// No storage path was given and the platform has no config directory.
    #[error("could not determine a storage path; set MARQUEE_STORAGE_PATH")]
    NoStoragePath,
}

/// Everything needed to wire the client together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend API root
    pub backend_url: Url,
    /// App host serving `/api/refresh`
    pub app_url: Url,
    /// Movie metadata API root
    pub tmdb_url: Url,
    /// Movie metadata API key
    pub tmdb_api_key: Option<String>,
    /// Language for movie metadata
    pub language: String,
    /// Default request timeout
    pub timeout_ms: u64,
    /// Client storage file
    pub storage_path: PathBuf,
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, treating blank values as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = |name: &'static str, default: &str| {
            let value = var(name).unwrap_or_else(|| default.to_string());
            match Url::parse(value.trim()) {
                Ok(url) if !url.cannot_be_a_base() => Ok(url),
                _ => Err(ConfigError::InvalidUrl { name, value }),
            }
        };

        let timeout_ms = match var("MARQUEE_TIMEOUT_MS") {
            None => DEFAULT_TIMEOUT_MS,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "MARQUEE_TIMEOUT_MS",
                        value,
                    });
                }
            },
        };

        let storage_path = match var("MARQUEE_STORAGE_PATH") {
            Some(path) => PathBuf::from(path),
            None => FileStorage::default_path().ok_or(ConfigError::NoStoragePath)?,
        };

        Ok(Self {
            backend_url: url("MARQUEE_BACKEND_URL", DEFAULT_BACKEND_URL)?,
            app_url: url("MARQUEE_APP_URL", DEFAULT_APP_URL)?,
            tmdb_url: url("MARQUEE_TMDB_URL", TMDB_BASE_URL)?,
            tmdb_api_key: var("MARQUEE_TMDB_API_KEY"),
            language: var("MARQUEE_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timeout_ms,
            storage_path,
        })
    }

    /// Backend endpoint layout for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL cannot serve as a base.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        Endpoints::new(self.backend_url.as_str(), self.app_url.as_str()).map_err(|_| {
            ConfigError::InvalidUrl {
                name: "MARQUEE_BACKEND_URL",
                value: self.backend_url.to_string(),
            }
        })
    }
}
