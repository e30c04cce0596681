//! Marquee Domain - Core types
//!
//! This crate defines the domain model for the Marquee streaming client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod media;
pub mod request;
pub mod response;
pub mod session;

pub use auth::{
    ACCESS_TOKEN_KEY, PROFILE_KEY, REFRESH_TOKEN_KEY, Token, TokenGrant, token_preview,
};
pub use error::{DomainError, DomainResult};
pub use media::{GENRES, Genre, MovieInfo, MovieVideo, format_runtime, genre_ids, image_url};
pub use request::{AUTHORIZATION, Header, Headers, HttpMethod, RequestContext, RequestSpec};
pub use response::{ApiResponse, FailureKind, ResponseSpec};
pub use session::{Profile, ProfileImage, Session, slugify};
