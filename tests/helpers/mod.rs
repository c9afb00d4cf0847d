//! Test helpers for stakescan integration tests.
//!
//! Provides a scripted [`Transport`] implementation so executor and client
//! behavior can be exercised without real network connections.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use stakescan::{Transport, TransportError};
use url::Url;

/// One request observed by the mock, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

#[derive(Default)]
struct MockInner {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Scripted transport: responses are served in push order, and every
/// request is recorded.
///
/// Clones share state, so keep one clone for assertions and move another
/// into the client under test:
///
/// ```rust,ignore
/// let mock = MockTransport::with_responses([json!({ "data": 1 })]);
/// let client = builder.build_with_transport(mock.clone())?;
/// // ...
/// assert_eq!(mock.request_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = Value>) -> Self {
        let mock = Self::new();
        for response in responses {
            mock.push_response(response);
        }
        mock
    }

    pub fn push_response(&self, response: Value) {
        self.inner.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: TransportError) {
        self.inner.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<Value, TransportError> {
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockTransport ran out of scripted responses")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: &Value,
        headers: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.inner.requests.lock().unwrap().push(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            body: Some(body.clone()),
            params: Vec::new(),
            headers: headers.to_vec(),
        });
        self.next_response()
    }

    async fn get_json(
        &self,
        url: &Url,
        params: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, TransportError> {
        self.inner.requests.lock().unwrap().push(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            body: None,
            params: params.to_vec(),
            headers: headers.to_vec(),
        });
        self.next_response()
    }
}

/// A TransportError::Status with the given code, for scripting failures.
#[allow(dead_code)]
pub fn status_error(status: u16, url: &str, body: Value) -> TransportError {
    TransportError::Status {
        status,
        url: url.to_string(),
        body,
    }
}
