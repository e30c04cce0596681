//! Normalized API result.
//!
//! Every call made through the authenticated client ends in an
//! [`ApiResponse`]: either `Ok` with the parsed body, or `Err` tagged with
//! a [`FailureKind`]. HTTP-level failures never become Rust errors here;
//! callers inspect the variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ResponseSpec;
use crate::request::Headers;

/// Why a call did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request never produced an HTTP response.
    Transport,
    /// The backend answered `401 Unauthorized`, or there was no credential
    /// to send.
    Unauthorized,
    /// Any other non-2xx answer; the structured body is kept as-is.
    Domain,
}

/// Outcome of a call through the authenticated client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ApiResponse {
    /// 2xx response.
    Ok {
        /// HTTP status code
        status: u16,
        /// Parsed response body
        data: Value,
        /// Response headers
        #[serde(default)]
        headers: Headers,
    },
    /// Transport failure or non-2xx response.
    Err {
        /// Failure category
        kind: FailureKind,
        /// HTTP status, absent for transport failures
        status: Option<u16>,
        /// Human-readable message
        message: String,
        /// Parsed response body (`null` for transport failures)
        body: Value,
    },
}

impl ApiResponse {
    /// Normalizes a raw response.
    ///
    /// Bodies that are not JSON are kept as a JSON string; an empty body
    /// becomes `null`.
    #[must_use]
    pub fn from_response(response: ResponseSpec) -> Self {
        let body = parse_body(&response.body);

        if response.is_success() {
            return Self::Ok {
                status: response.status,
                data: body,
                headers: response.headers,
            };
        }

        let kind = if response.is_unauthorized() {
            FailureKind::Unauthorized
        } else {
            FailureKind::Domain
        };
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", response.status));

        Self::Err {
            kind,
            status: Some(response.status),
            message,
            body,
        }
    }

    /// Builds a transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Err {
            kind: FailureKind::Transport,
            status: None,
            message: message.into(),
            body: Value::Null,
        }
    }

    /// Returns true if the transport succeeded and the status was 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Returns true if the backend answered 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Err {
                kind: FailureKind::Unauthorized,
                ..
            }
        )
    }

    /// Raw HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Ok { status, .. } => Some(*status),
            Self::Err { status, .. } => *status,
        }
    }

    /// Failure category, `None` on success.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Ok { .. } => None,
            Self::Err { kind, .. } => Some(*kind),
        }
    }

    /// Parsed body regardless of outcome.
    #[must_use]
    pub const fn body(&self) -> &Value {
        match self {
            Self::Ok { data, .. } => data,
            Self::Err { body, .. } => body,
        }
    }

    /// Consumes the result and returns its parsed body.
    #[must_use]
    pub fn into_body(self) -> Value {
        match self {
            Self::Ok { data, .. } => data,
            Self::Err { body, .. } => body,
        }
    }

    /// Message to show the user: the body's `message`/`error` field, or a
    /// generic description.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Ok { data, .. } => error_message(data),
            Self::Err { message, .. } => Some(message.clone()),
        }
    }

    /// Response header lookup, only available on success.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            Self::Ok { headers, .. } => headers.get(name),
            Self::Err { .. } => None,
        }
    }
}

fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
