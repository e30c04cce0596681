//! Bearer credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Storage key and cookie name of the access token.
pub const ACCESS_TOKEN_KEY: &str = "netflix.token";

/// Cookie name of the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "netflix.ref";

/// Storage key of the active profile.
pub const PROFILE_KEY: &str = "usuario";

/// An access token plus the optional refresh credential issued with it.
///
/// The access token is never empty. There is no expiry tracking: a stale
/// token is discovered when the backend answers 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TokenRepr")]
pub struct Token {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    obtained_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenRepr {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    obtained_at: Option<DateTime<Utc>>,
}

impl TryFrom<TokenRepr> for Token {
    type Error = DomainError;

    fn try_from(repr: TokenRepr) -> DomainResult<Self> {
        let mut token = Self::new(repr.access_token)?.with_refresh(repr.refresh_token);
        if let Some(obtained_at) = repr.obtained_at {
            token.obtained_at = obtained_at;
        }
        Ok(token)
    }
}

impl Token {
    /// Creates a token obtained now.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is blank.
    pub fn new(access_token: impl Into<String>) -> DomainResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(DomainError::EmptyCredential("access token"));
        }
        Ok(Self {
            access_token,
            refresh_token: None,
            obtained_at: Utc::now(),
        })
    }

    /// Attaches a refresh credential; blank values are dropped.
    #[must_use]
    pub fn with_refresh(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token.filter(|r| !r.trim().is_empty());
        self
    }

    /// The bearer credential.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The refresh credential, if one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// When this token was obtained.
    #[must_use]
    pub const fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Short form safe to log (first 8 chars + ...).
    #[must_use]
    pub fn preview(&self) -> String {
        token_preview(&self.access_token)
    }
}

/// Short form of a credential safe to log.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let cut = token
            .char_indices()
            .nth(8)
            .map_or(token.len(), |(idx, _)| idx);
        format!("{}...", &token[..cut])
    } else {
        "***".to_string()
    }
}

/// Credentials returned by the login and refresh endpoints.
///
/// Accepts `token` or `access_token`, either at the top level of the body
/// or nested under `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    /// Issued access token
    #[serde(alias = "access_token", default)]
    pub token: Option<String>,
    /// Issued refresh credential
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenGrant {
    /// Extracts a grant from a response body.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let top: Self = serde_json::from_value(body.clone()).unwrap_or_default();
        if top.token.is_some() {
            return top;
        }
        let nested: Self = body
            .get("data")
            .and_then(|data| serde_json::from_value(data.clone()).ok())
            .unwrap_or_default();
        Self {
            token: nested.token,
            refresh_token: top.refresh_token.or(nested.refresh_token),
        }
    }

    /// Converts the grant into a token, if it carries a non-blank one.
    #[must_use]
    pub fn into_token(self) -> Option<Token> {
        let token = Token::new(self.token?).ok()?;
        Some(token.with_refresh(self.refresh_token))
    }
}
