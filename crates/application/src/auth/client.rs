//! Authenticated HTTP client.
//!
//! Every call runs through a small state machine:
//!
//! ```text
//! Attempt --(401, refresh enabled)--> Refresh --(ok)--> Retry --> Done
//!    |                                   |
//!    +------------- otherwise -----------+--(failed)--> Done (original 401)
//! ```
//!
//! `Retry` always leads to `Done`, so the original request is re-issued at
//! most once, without backoff. HTTP failures come back as
//! [`ApiResponse::Err`]; nothing here returns a Rust error.
//!
//! Refreshes are coalesced per refresh credential: they run one at a time,
//! and a request whose credential was already exchanged after it started
//! reuses that exchange's token instead of refreshing again. Requests
//! carrying a different credential always run their own exchange.
//!
//! Only tokens refreshed from the persisted credential are saved. A
//! credential taken from the request context belongs to that request.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use marquee_domain::{
    ApiResponse, Header, Headers, HttpMethod, RequestContext, RequestSpec, Token, TokenGrant,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use super::{Endpoints, TokenStore};
use crate::ports::HttpTransport;

/// What to send and how to authenticate it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL
    pub url: Url,
    /// Extra headers
    pub headers: Headers,
    /// JSON body
    pub body: Option<Value>,
    /// Attach `Authorization: Bearer <token>` from the token store
    pub bearer: bool,
    /// Allow a silent refresh and single retry on 401
    pub refresh: bool,
    /// Request being served, if any
    pub context: Option<RequestContext>,
    /// Per-request timeout override
    pub timeout_ms: Option<u64>,
}

impl RequestOptions {
    /// Unauthenticated request without refresh.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
            bearer: false,
            refresh: false,
            context: None,
            timeout_ms: None,
        }
    }

    /// `GET` request.
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// `POST` request.
    #[must_use]
    pub const fn post(url: Url) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// `PUT` request.
    #[must_use]
    pub const fn put(url: Url) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, header: Header) -> Self {
        self.headers.add(header);
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches the stored bearer token.
    #[must_use]
    pub const fn with_bearer(mut self) -> Self {
        self.bearer = true;
        self
    }

    /// Enables or disables refresh-and-retry on 401.
    #[must_use]
    pub const fn refresh(mut self, enabled: bool) -> Self {
        self.refresh = enabled;
        self
    }

    /// Sets the request context.
    #[must_use]
    pub fn context(mut self, context: Option<RequestContext>) -> Self {
        self.context = context;
        self
    }

    /// Overrides the transport timeout.
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

enum Step {
    Attempt,
    Refresh(ApiResponse),
    Retry,
    Done(ApiResponse),
}

/// How long a finished exchange can be reused by requests that waited on it.
const ROTATION_TTL: Duration = Duration::from_secs(30);

/// Outcome of one exchange of a refresh credential.
#[derive(Debug)]
struct Rotation {
    generation: u64,
    access_token: String,
    at: Instant,
}

/// Serializes refreshes and remembers recent rotations by refresh credential.
#[derive(Debug, Default)]
struct RefreshGate {
    generation: AtomicU64,
    rotations: Mutex<HashMap<String, Rotation>>,
}

/// HTTP client that attaches bearer tokens and refreshes them on 401.
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    endpoints: Endpoints,
    gate: RefreshGate,
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedClient {
    /// Creates a client.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: TokenStore, endpoints: Endpoints) -> Self {
        Self {
            transport,
            tokens,
            endpoints,
            gate: RefreshGate::default(),
        }
    }

    /// The token store this client reads and updates.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The backend endpoint layout.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Performs a call and returns its normalized result.
    #[tracing::instrument(
        name = "api_request",
        skip_all,
        fields(
            request_id = %Uuid::now_v7(),
            method = %options.method,
            path = %options.url.path(),
        )
    )]
    pub async fn request(&self, options: RequestOptions) -> ApiResponse {
        let observed = self.gate.generation.load(Ordering::Acquire);
        let mut spec = self.build(&options).await;
        let mut step = Step::Attempt;

        loop {
            step = match step {
                Step::Attempt => {
                    let response = self.send(&spec).await;
                    if options.refresh && response.is_unauthorized() {
                        Step::Refresh(response)
                    } else {
                        Step::Done(response)
                    }
                }
                Step::Refresh(original) => {
                    match self.refresh(observed, options.context.as_ref()).await {
                        Some(access) => {
                            spec.set_bearer(&access);
                            Step::Retry
                        }
                        None => Step::Done(original),
                    }
                }
                Step::Retry => Step::Done(self.send(&spec).await),
                Step::Done(response) => return response,
            };
        }
    }

    async fn build(&self, options: &RequestOptions) -> RequestSpec {
        let mut spec = RequestSpec::new(options.method, options.url.clone());
        spec.headers = options.headers.clone();
        spec.body.clone_from(&options.body);
        spec.timeout_ms = options.timeout_ms;

        if options.bearer {
            match self.tokens.get(options.context.as_ref()).await {
                Ok(Some(token)) => spec.set_bearer(&token),
                Ok(None) => tracing::debug!("no token available, sending without credentials"),
                Err(e) => {
                    tracing::warn!(error = %e, "could not read token, sending without credentials");
                }
            }
        }
        spec
    }

    async fn send(&self, spec: &RequestSpec) -> ApiResponse {
        match self.transport.send(spec).await {
            Ok(response) => {
                tracing::debug!(
                    status = response.status,
                    elapsed_ms = response.duration.as_millis(),
                    "response received"
                );
                ApiResponse::from_response(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "transport failure");
                ApiResponse::transport(e.to_string())
            }
        }
    }

    async fn refresh(&self, observed: u64, context: Option<&RequestContext>) -> Option<String> {
        let refresh_token = match self.tokens.refresh_credential(context).await {
            Ok(Some(refresh_token)) => refresh_token,
            Ok(None) => {
                tracing::info!("401 received but no refresh credential is available");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read refresh credential");
                return None;
            }
        };
        let persist = context.and_then(RequestContext::refresh_token).is_none();

        let mut rotations = self.gate.rotations.lock().await;
        if let Some(rotation) = rotations.get(&refresh_token)
            && rotation.generation > observed
            && rotation.at.elapsed() < ROTATION_TTL
        {
            tracing::debug!("credential already exchanged by a concurrent request");
            return Some(rotation.access_token.clone());
        }

        let token = self.exchange(&refresh_token, persist).await?;
        let access_token = token.access_token().to_string();
        let generation = self.gate.generation.fetch_add(1, Ordering::AcqRel) + 1;
        rotations.retain(|_, r| r.at.elapsed() < ROTATION_TTL);
        rotations.insert(
            refresh_token,
            Rotation {
                generation,
                access_token: access_token.clone(),
                at: Instant::now(),
            },
        );
        Some(access_token)
    }

    async fn exchange(&self, refresh_token: &str, persist: bool) -> Option<Token> {
        let spec = RequestSpec::new(HttpMethod::Post, self.endpoints.refresh())
            .with_json(json!({ "refresh_token": refresh_token }));
        let response = self.send(&spec).await;
        if !response.is_ok() {
            tracing::warn!(status = ?response.status(), "token refresh rejected");
            return None;
        }

        let Some(token) = TokenGrant::from_body(response.body()).into_token() else {
            tracing::warn!("refresh response carried no token");
            return None;
        };
        // Keep the old refresh credential unless the endpoint rotated it.
        let token = if token.refresh_token().is_none() {
            token.with_refresh(Some(refresh_token.to_string()))
        } else {
            token
        };

        if persist && let Err(e) = self.tokens.save(&token).await {
            tracing::warn!(error = %e, "refreshed token could not be persisted");
        }
        tracing::info!(token = %token.preview(), persisted = persist, "token refreshed");
        Some(token)
    }
}
