//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port using the reqwest library.
//! Both the backend calls and the movie metadata calls go through it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use marquee_application::ports::{HttpTransport, TransportError};
use marquee_domain::{Header, Headers, HttpMethod, RequestSpec, ResponseSpec};
use reqwest::{Client, Method};

/// Timeout applied when a request does not set its own.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const MAX_REDIRECTS: usize = 10;

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    default_timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a new transport with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: "Marquee/0.1.0"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT_MS)
    }

    /// Creates a transport whose requests time out after `timeout_ms`
    /// unless they set their own timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_timeout(timeout_ms: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("Marquee/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            default_timeout_ms: timeout_ms,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    ///
    /// The URL is stripped before the error is rendered: query strings carry
    /// the API key.
    fn map_error(error: reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();
        let port = error
            .url()
            .and_then(reqwest::Url::port_or_known_default)
            .unwrap_or(80);
        let error = error.without_url();

        if error.is_connect() {
            let message = describe(&error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError { host, message };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused { host, port };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        TransportError::Other(describe(&error))
    }
}

/// Renders an error with its whole source chain.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError> {
        let timeout_ms = request.timeout_ms.unwrap_or(self.default_timeout_ms);
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone())
            .timeout(Duration::from_millis(timeout_ms));

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(body) = &request.body {
            if !request.method.accepts_json_body() {
                return Err(TransportError::InvalidBody(format!(
                    "{} requests cannot carry a body",
                    request.method
                )));
            }
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| Header::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                let reason = describe(&e.without_url());
                TransportError::Other(format!("Failed to read body: {reason}"))
            })?;

        let mut spec = ResponseSpec::new(status, String::from_utf8_lossy(&body).into_owned());
        spec.headers = headers;
        spec.duration = start.elapsed();
        Ok(spec)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_body_on_get_is_rejected() {
        let transport = ReqwestTransport::new().expect("client should build");
        let request = RequestSpec::parse(HttpMethod::Get, "http://127.0.0.1:9/session")
            .expect("url should parse")
            .with_json(serde_json::json!({ "a": 1 }));

        let result = transport.send(&request).await;

        assert!(matches!(result, Err(TransportError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_connect_failure_does_not_echo_the_query() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let transport = ReqwestTransport::new().expect("client should build");
        let url = format!("http://127.0.0.1:{port}/movie/1?api_key=s3cret");
        let request = RequestSpec::parse(HttpMethod::Get, &url).expect("url should parse");

        let error = transport
            .send(&request)
            .await
            .expect_err("nothing listens on the port");

        assert!(!error.to_string().contains("s3cret"), "{error}");
        assert!(!format!("{error:?}").contains("s3cret"), "{error:?}");
    }
}
