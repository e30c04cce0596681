//! Marquee Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the environment-driven
//! configuration that wires them together.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_MS, ReqwestTransport, TMDB_BASE_URL, TmdbCatalog};
pub use config::{ClientConfig, ConfigError};
pub use persistence::FileStorage;
pub use serialization::{SerializationError, from_json, to_json_stable};
