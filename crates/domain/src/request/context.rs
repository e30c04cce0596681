//! Request-scoped context.
//!
//! When a call is made on behalf of an incoming request (server-side
//! rendering), that request's cookies take precedence over anything the
//! client has persisted locally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::auth::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Cookies of the request currently being served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    cookies: BTreeMap<String, String>,
}

impl RequestContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cookies: BTreeMap::new(),
        }
    }

    /// Builds a context from a raw `Cookie` header value (`a=1; b=2`).
    ///
    /// Malformed pairs are skipped.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { cookies }
    }

    /// Adds or replaces a cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Returns a cookie value by name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Access token carried by the request, ignoring blank values.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.cookie(ACCESS_TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    /// Refresh credential carried by the request, ignoring blank values.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.cookie(REFRESH_TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_cookie_header() {
        let ctx = RequestContext::from_cookie_header("netflix.token=abc; netflix.ref=def;theme=dark");
        assert_eq!(ctx.access_token(), Some("abc"));
        assert_eq!(ctx.refresh_token(), Some("def"));
        assert_eq!(ctx.cookie("theme"), Some("dark"));
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let ctx = RequestContext::from_cookie_header("garbage; =nameless; ok=1");
        assert_eq!(ctx.cookie("ok"), Some("1"));
        assert_eq!(ctx.cookie(""), None);
        assert_eq!(ctx.access_token(), None);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let ctx = RequestContext::new().with_cookie(ACCESS_TOKEN_KEY, "  ");
        assert_eq!(ctx.access_token(), None);
    }
}
