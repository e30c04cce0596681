//! Verbs spoken to the backend and the movie provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verb of a call made by the client.
///
/// The backend reads everything but `GET` as carrying a JSON document,
/// possibly empty, so only `GET` is sent bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Session fetch, profile images, movie metadata
    Get,
    /// Login, logout, register, refresh, profile creation
    Post,
    /// Profile update
    Put,
    /// Partial update
    Patch,
    /// Removal
    Delete,
}

impl HttpMethod {
    /// Whether a JSON body may be attached.
    #[must_use]
    pub const fn accepts_json_body(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
