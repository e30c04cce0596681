//! Login, session fetch and logout.
//!
//! `login` hands back the backend's answer whatever its status, the same
//! way the client does. `get_session` and `logout` instead turn any non-2xx
//! answer into an [`AuthServiceError`], so callers of those two must handle
//! an error rather than inspect a status.

use std::sync::Arc;

use marquee_domain::{
    AUTHORIZATION, ApiResponse, FailureKind, RequestContext, Session, Token, TokenGrant,
};
use serde_json::{Map, Value, json};

use super::{AuthenticatedClient, RequestOptions};
use crate::ports::StorageError;

/// Errors raised by [`AuthService`].
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// The session request did not succeed.
    #[error("Unauthorized")]
    Unauthorized {
        /// The failed result
        response: Box<ApiResponse>,
    },

    /// The logout request did not succeed.
    #[error("Logout failed")]
    LogoutFailed {
        /// The failed result
        response: Box<ApiResponse>,
    },

    /// The session payload could not be decoded.
    #[error("invalid session payload: {0}")]
    InvalidSession(String),

    /// The token could not be persisted or removed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Authentication use cases on top of [`AuthenticatedClient`].
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<AuthenticatedClient>,
}

impl AuthService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Signs in with e-mail and password.
    ///
    /// On success the returned token is persisted and, when the body
    /// carries a `refresh_token`, it is handed to the app host's refresh
    /// route. That exchange is best-effort: its failure is logged and
    /// ignored. The backend's answer is returned whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token cannot be persisted.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse, AuthServiceError> {
        let endpoints = self.client.endpoints();
        let response = self
            .client
            .request(
                RequestOptions::post(endpoints.login())
                    .json(json!({ "email": email, "password": password })),
            )
            .await;

        if !response.is_ok() {
            tracing::info!(status = ?response.status(), "login rejected");
            return Ok(response);
        }

        let grant = TokenGrant::from_body(response.body());
        let refresh_token = grant.refresh_token.clone();
        match issued_token(&response, grant) {
            Some(token) => self.client.tokens().save(&token).await?,
            None => tracing::warn!("login succeeded without a token"),
        }

        if let Some(refresh_token) = refresh_token {
            self.exchange_refresh(&refresh_token).await;
        }
        Ok(response)
    }

    /// Fetches the session behind the current token, refreshing it once
    /// if the backend answers 401.
    ///
    /// Nothing is sent when there is neither an access token nor a refresh
    /// credential to fall back on.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Unauthorized`] for any non-2xx result or a
    /// missing credential, and [`AuthServiceError::InvalidSession`] if the
    /// payload is malformed.
    #[tracing::instrument(skip_all)]
    pub async fn get_session(
        &self,
        context: Option<&RequestContext>,
    ) -> Result<Session, AuthServiceError> {
        let tokens = self.client.tokens();
        if tokens.get(context).await?.is_none()
            && tokens.refresh_credential(context).await?.is_none()
        {
            tracing::debug!("no credential, session not requested");
            return Err(AuthServiceError::Unauthorized {
                response: Box::new(ApiResponse::Err {
                    kind: FailureKind::Unauthorized,
                    status: None,
                    message: "no token".to_string(),
                    body: Value::Null,
                }),
            });
        }

        let response = self
            .client
            .request(
                RequestOptions::get(self.client.endpoints().session())
                    .with_bearer()
                    .refresh(true)
                    .context(context.cloned()),
            )
            .await;

        if !response.is_ok() {
            return Err(AuthServiceError::Unauthorized {
                response: Box::new(response),
            });
        }

        let data = response.into_body().get("data").cloned().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| AuthServiceError::InvalidSession(e.to_string()))
    }

    /// Ends the session on the backend and forgets the local token.
    ///
    /// Never refreshes. The refresh credential sent along is the one in the
    /// request context, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::LogoutFailed`] for any non-2xx result.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, context: Option<&RequestContext>) -> Result<Value, AuthServiceError> {
        let mut body = Map::new();
        if let Some(refresh_token) = context.and_then(RequestContext::refresh_token) {
            body.insert("refresh_token".to_string(), Value::from(refresh_token));
        }

        let response = self
            .client
            .request(
                RequestOptions::post(self.client.endpoints().logout())
                    .with_bearer()
                    .refresh(false)
                    .json(Value::Object(body))
                    .context(context.cloned()),
            )
            .await;

        if !response.is_ok() {
            return Err(AuthServiceError::LogoutFailed {
                response: Box::new(response),
            });
        }

        self.client.tokens().clear().await?;
        Ok(response.into_body().get("data").cloned().unwrap_or(Value::Null))
    }

    async fn exchange_refresh(&self, refresh_token: &str) {
        let response = self
            .client
            .request(
                RequestOptions::post(self.client.endpoints().refresh())
                    .json(json!({ "refresh_token": refresh_token })),
            )
            .await;
        if response.is_ok() {
            tracing::debug!("refresh credential exchanged");
        } else {
            tracing::warn!(
                status = ?response.status(),
                message = response.message().unwrap_or_default(),
                "refresh credential exchange failed"
            );
        }
    }
}

/// Token from the body, falling back to the `Authorization` header.
fn issued_token(response: &ApiResponse, grant: TokenGrant) -> Option<Token> {
    let refresh_token = grant.refresh_token.clone();
    grant.into_token().or_else(|| {
        let header = response.header(AUTHORIZATION)?;
        let raw = header.strip_prefix("Bearer ").unwrap_or(header);
        Token::new(raw.trim()).ok().map(|t| t.with_refresh(refresh_token))
    })
}
