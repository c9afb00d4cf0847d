//! Error types for HTTP transport operations.

use serde_json::Value;
use url::Url;

/// Errors that can occur while talking to a remote metrics backend.
///
/// A non-success HTTP status always carries the status code, the request
/// URL, and the response body so that callers and logs can diagnose the
/// remote failure without re-issuing the request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The backend answered with a non-success HTTP status.
    ///
    /// `body` is the response body parsed as JSON when it is valid JSON,
    /// otherwise the raw text wrapped in a JSON string.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The request URL.
        url: String,
        /// The response body (structured if the backend sent JSON).
        body: Value,
    },

    /// The request could not be completed at all.
    ///
    /// Connection failures and per-request timeout expiry both surface here.
    #[error("Request to {url} failed")]
    Request {
        /// The request URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived with a success status but was not valid JSON.
    #[error("Failed to decode response body from {url}")]
    Decode {
        /// The request URL.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Create a `Status` error from a status code, URL, and captured body.
    pub fn status(status: u16, url: &Url, body: Value) -> Self {
        TransportError::Status {
            status,
            url: url.to_string(),
            body,
        }
    }

    /// Create a `Request` error for a failed or timed-out request.
    pub fn request(url: &Url, source: reqwest::Error) -> Self {
        TransportError::Request {
            url: url.to_string(),
            source,
        }
    }

    /// Create a `Decode` error for an undecodable response body.
    pub fn decode(url: &Url, source: reqwest::Error) -> Self {
        TransportError::Decode {
            url: url.to_string(),
            source,
        }
    }
}
