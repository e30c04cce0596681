//! Request specification type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{Header, Headers, HttpMethod};
use crate::error::{DomainError, DomainResult};

/// A fully resolved HTTP request, ready for a transport to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL
    pub url: Url,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// JSON body, sent with `Content-Type: application/json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Per-request timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
            timeout_ms: None,
        }
    }

    /// Parses `url` and creates a request for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse(method: HttpMethod, url: &str) -> DomainResult<Self> {
        let url = Url::parse(url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {url}")))?;
        Ok(Self::new(method, url))
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.add(header);
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces the bearer credential on this request.
    pub fn set_bearer(&mut self, token: &str) {
        self.headers.set(Header::bearer(token));
    }

    /// Returns the bearer credential carried by this request, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(super::AUTHORIZATION)
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}
