//! Cached query execution.
//!
//! [`QueryExecutor`] is the single entry point every higher-level query goes
//! through: it computes the content-addressed key for a request, consults
//! the [`ResponseCache`], and only contacts the network on a miss, storing
//! the fresh payload best-effort afterwards. Cache reads never cause network
//! traffic; each invocation performs at most one network call and one cache
//! write.
//!
//! Whether the cache participates at all is decided once, by the
//! [`CachePolicy`] the executor is constructed with, rather than by a
//! boolean threaded through every call site. A forced refetch that replaces
//! the stored entry wholesale is a separate operation,
//! [`refresh`](QueryExecutor::refresh).
//!
//! Transport errors propagate unchanged; there are no retries.

use serde_json::{Map, Value};
use tracing::{debug, warn, Instrument};
use url::Url;

use crate::cache::{ResponseCache, WriteOutcome};
use crate::codec::{self, CacheKey};
use crate::errors::TransportError;
use crate::spans;
use crate::transport::Transport;

/// How the executor uses the persistent cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Serve hits from the cache and store fresh responses on a miss.
    #[default]
    ReadThrough,
    /// Skip the cache entirely: no reads, no writes.
    Bypass,
}

/// A single outbound query in one of the two supported shapes.
///
/// The cache key is derived from the request's content only - the query
/// text and variables for a GraphQL POST, the URL and parameters for a REST
/// GET. Headers carry credentials and never participate in the key.
#[derive(Debug, Clone)]
pub enum QueryRequest {
    /// A GraphQL document POSTed as `{"query": ..., "variables": ...}`.
    GraphqlPost {
        /// Endpoint URL.
        url: Url,
        /// The GraphQL document.
        query: String,
        /// Optional variables; an empty mapping is omitted from the body.
        variables: Option<Map<String, Value>>,
        /// Headers attached to the request (auth, content negotiation).
        headers: Vec<(String, String)>,
    },
    /// A plain JSON GET.
    RestGet {
        /// Endpoint URL.
        url: Url,
        /// Query-string parameters.
        params: Vec<(String, String)>,
        /// Headers attached to the request.
        headers: Vec<(String, String)>,
    },
}

impl QueryRequest {
    /// The content-addressed cache key for this request.
    pub fn cache_key(&self) -> CacheKey {
        match self {
            QueryRequest::GraphqlPost {
                query, variables, ..
            } => codec::compute_key(query, variables.as_ref()),
            QueryRequest::RestGet { url, params, .. } => {
                let mut variables = Map::new();
                for (name, value) in params {
                    variables.insert(name.clone(), Value::String(value.clone()));
                }
                codec::compute_key(url.as_str(), Some(&variables))
            }
        }
    }
}

/// Orchestrates key computation, cache lookup, and transport dispatch.
#[derive(Debug)]
pub struct QueryExecutor<T> {
    transport: T,
    cache: ResponseCache,
    policy: CachePolicy,
}

impl<T: Transport> QueryExecutor<T> {
    /// Create an executor over a transport, cache, and cache policy.
    pub fn new(transport: T, cache: ResponseCache, policy: CachePolicy) -> Self {
        Self {
            transport,
            cache,
            policy,
        }
    }

    /// The cache this executor reads and writes.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// The configured cache policy.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Execute a request under the executor's configured policy.
    pub async fn execute(&self, request: &QueryRequest) -> Result<Value, TransportError> {
        self.execute_with_policy(request, self.policy).await
    }

    /// Execute a request under an explicit policy.
    ///
    /// With [`CachePolicy::Bypass`] the cache is neither read nor written.
    /// With [`CachePolicy::ReadThrough`] a hit is returned verbatim without
    /// contacting the network; a miss is fetched, stored best-effort, and
    /// returned.
    pub async fn execute_with_policy(
        &self,
        request: &QueryRequest,
        policy: CachePolicy,
    ) -> Result<Value, TransportError> {
        let span = spans::execute_query(policy);
        async {
            match policy {
                CachePolicy::Bypass => self.fetch(request).await,
                CachePolicy::ReadThrough => {
                    let key = request.cache_key();
                    if let Some(payload) = self.cache.get(&key).await {
                        debug!(key = %key, "serving cached response");
                        return Ok(payload);
                    }

                    let payload = self.fetch(request).await?;
                    self.store(&key, &payload).await;
                    Ok(payload)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Force a refetch, overwriting the cached entry wholesale.
    ///
    /// The cache is not read, but the fresh payload replaces whatever was
    /// stored under the request's key (best-effort, like any cache write).
    pub async fn refresh(&self, request: &QueryRequest) -> Result<Value, TransportError> {
        let span = spans::refresh_query();
        async {
            let key = request.cache_key();
            let payload = self.fetch(request).await?;
            self.store(&key, &payload).await;
            Ok(payload)
        }
        .instrument(span)
        .await
    }

    async fn store(&self, key: &CacheKey, payload: &Value) {
        match self.cache.put(key, payload).await {
            WriteOutcome::Written => {}
            WriteOutcome::WriteFailed(reason) => {
                warn!(
                    key = %key,
                    error = %reason,
                    "cache write failed, returning fresh response anyway"
                );
            }
        }
    }

    async fn fetch(&self, request: &QueryRequest) -> Result<Value, TransportError> {
        match request {
            QueryRequest::GraphqlPost {
                url,
                query,
                variables,
                headers,
            } => {
                let mut body = Map::new();
                body.insert("query".to_string(), Value::String(query.clone()));
                if let Some(variables) = variables {
                    if !variables.is_empty() {
                        body.insert("variables".to_string(), Value::Object(variables.clone()));
                    }
                }
                self.transport
                    .post_json(url, &Value::Object(body), headers)
                    .await
            }
            QueryRequest::RestGet {
                url,
                params,
                headers,
            } => self.transport.get_json(url, params, headers).await,
        }
    }
}
