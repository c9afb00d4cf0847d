//! HTTP transport for the remote metrics backends.
//!
//! The [`Transport`] trait is the seam between query orchestration and the
//! network: implementations issue a GraphQL-style JSON POST or a plain JSON
//! GET and hand back the parsed body. [`HttpTransport`] is the production
//! implementation over `reqwest`; tests substitute their own.
//!
//! On a non-success status the returned [`TransportError::Status`] carries
//! the status code, the request URL, and the response body (parsed as JSON
//! when valid, otherwise the raw text) so failures can be diagnosed without
//! re-issuing the request. A per-request timeout is configured on the
//! underlying client; expiry surfaces as [`TransportError::Request`] like
//! any other transport failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use crate::errors::{ConfigError, TransportError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Parse a configured endpoint string, reporting failures as configuration
/// errors.
pub(crate) fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        source,
    })
}

/// Issues HTTP requests against a remote backend.
///
/// Implementations must be thread-safe; the trait is object-safe so clients
/// can hold a `Box<dyn Transport>` when static dispatch is not wanted.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body and return the parsed JSON response.
    async fn post_json(
        &self,
        url: &Url,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<Value, TransportError>;

    /// GET with query parameters and return the parsed JSON response.
    async fn get_json(
        &self,
        url: &Url,
        params: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, TransportError>;
}

/// Production [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default per-request timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to construct HTTP client");
        Self { client }
    }

    fn apply_headers(
        mut request: RequestBuilder,
        headers: &[(String, String)],
    ) -> RequestBuilder {
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    async fn handle_response(url: &Url, response: Response) -> Result<Value, TransportError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| TransportError::decode(url, e));
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable response body>".to_string());
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        Err(TransportError::status(status.as_u16(), url, body))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<Value, TransportError> {
        let request = Self::apply_headers(self.client.post(url.clone()), headers).json(body);
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::request(url, e))?;

        Self::handle_response(url, response).await
    }

    async fn get_json(
        &self,
        url: &Url,
        params: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, TransportError> {
        let request = Self::apply_headers(self.client.get(url.clone()), headers).query(params);
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::request(url, e))?;

        Self::handle_response(url, response).await
    }
}
