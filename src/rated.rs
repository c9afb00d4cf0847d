//! REST client for the Rated-style network metrics backend.
//!
//! [`RatedClient`] reads network-wide stake totals from per-network
//! "overview" endpoints. Each supported network slug maps to the endpoint
//! and response field that carry its total stake; recognized slugs without
//! a documented network-level stake endpoint are reported as
//! [`ResolveError::UnsupportedSlug`], distinct from unknown input.
//!
//! Overview responses are JSON arrays of time-windowed rows. The row whose
//! `timeWindow` matches the requested window is selected, falling back to
//! the first row when there is no exact match; an empty or non-array
//! response is a shape error.
//!
//! Auth is a bearer token taken from the builder or the `RATED_API_KEY`
//! environment variable at construction time. Some Ethereum endpoints
//! additionally honor an `X-Rated-Network` selector header.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::Instrument;
use url::Url;

use crate::batch::{self, BatchResults};
use crate::cache::ResponseCache;
use crate::errors::{ConfigError, ResolveError, ShapeError, StakescanError};
use crate::executor::{CachePolicy, QueryExecutor, QueryRequest};
use crate::spans;
use crate::transport::{parse_endpoint, HttpTransport, Transport, DEFAULT_TIMEOUT};

/// Environment variable consulted for the API key.
pub const API_KEY_ENV: &str = "RATED_API_KEY";
/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.rated.network";
/// Default cache directory.
pub const DEFAULT_CACHE_DIR: &str = "api_response_cache";
/// Default time window for overview rows.
pub const DEFAULT_TIME_WINDOW: &str = "1d";

/// Network-wide total stake for one slug, with provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalStakeSummary {
    /// The normalized network slug.
    pub slug: String,
    /// The `timeWindow` of the selected row, when the row carried one.
    pub time_window: Option<String>,
    /// The raw stake value from the backend, absent when the selected row
    /// did not carry the source field.
    pub total_staked: Option<Value>,
    /// The response field the value was read from.
    pub source_field: &'static str,
    /// The endpoint path the value came from.
    pub endpoint: &'static str,
}

/// Where a network's total stake lives: endpoint plus source field.
#[derive(Debug, Clone, Copy)]
struct NetworkRoute {
    endpoint: &'static str,
    stake_field: &'static str,
    takes_window_param: bool,
}

/// Slugs the backend serves but without a documented network-level
/// total-stake overview endpoint.
const UNSUPPORTED_SLUGS: [&str; 7] = [
    "cardano",
    "celestia",
    "avalanche",
    "polkadot",
    "cosmos",
    "eigenlayer",
    "babylon",
];

fn route_for(slug: &str) -> Result<NetworkRoute, ResolveError> {
    match slug {
        "solana" => Ok(NetworkRoute {
            endpoint: "/v1/solana/network/overview",
            stake_field: "totalDelegatedStake",
            takes_window_param: false,
        }),
        // Polygon
        "matic-network" => Ok(NetworkRoute {
            endpoint: "/v1/polygon/network/overview",
            stake_field: "totalStake",
            takes_window_param: false,
        }),
        // Ethereum network overview is documented under v0 for activeStake.
        "ethereum-2-0" => Ok(NetworkRoute {
            endpoint: "/v0/eth/network/overview",
            stake_field: "activeStake",
            takes_window_param: true,
        }),
        _ if UNSUPPORTED_SLUGS.contains(&slug) => Err(ResolveError::unsupported_slug(
            slug,
            "no network-level total-stake overview endpoint is documented for this network",
        )),
        _ => Err(ResolveError::unknown_slug(slug)),
    }
}

/// Select the row matching `time_window`, falling back to the first row.
fn pick_time_window_row(
    rows: &Value,
    time_window: &str,
    endpoint: &str,
) -> Result<Map<String, Value>, ShapeError> {
    let rows = rows
        .as_array()
        .ok_or_else(|| ShapeError::not_a_list(endpoint, rows))?;
    if rows.is_empty() {
        return Err(ShapeError::empty_rows(endpoint));
    }

    for row in rows {
        if let Value::Object(map) = row {
            if map.get("timeWindow").and_then(Value::as_str) == Some(time_window) {
                return Ok(map.clone());
            }
        }
    }

    match &rows[0] {
        Value::Object(map) => Ok(map.clone()),
        _ => Ok(Map::new()),
    }
}

/// Builder for [`RatedClient`].
#[derive(Debug, Clone)]
pub struct RatedClientBuilder {
    api_key: Option<String>,
    base_url: String,
    network: Option<String>,
    cache_dir: PathBuf,
    timeout: Duration,
    policy: CachePolicy,
}

impl Default for RatedClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            network: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            timeout: DEFAULT_TIMEOUT,
            policy: CachePolicy::ReadThrough,
        }
    }
}

impl RatedClientBuilder {
    /// Supply the API key explicitly instead of reading `RATED_API_KEY`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `X-Rated-Network` selector header sent with every request
    /// (e.g. `mainnet`, `hoodi`, `holesky`; Ethereum endpoints only).
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Override the cache directory.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the cache policy for every query this client runs.
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the client over the default HTTP transport.
    pub fn build(self) -> Result<RatedClient, StakescanError> {
        let transport = HttpTransport::with_timeout(self.timeout);
        self.build_with_transport(transport)
    }

    /// Build the client over a custom transport.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<RatedClient<T>, StakescanError> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or(ConfigError::MissingApiKey {
                    env_var: API_KEY_ENV,
                })?,
        };

        let base_url = parse_endpoint(&self.base_url)?;

        let mut headers = vec![("Authorization".to_string(), format!("Bearer {api_key}"))];
        if let Some(network) = self.network {
            headers.push(("X-Rated-Network".to_string(), network));
        }

        let executor =
            QueryExecutor::new(transport, ResponseCache::new(self.cache_dir), self.policy);

        Ok(RatedClient {
            executor,
            base_url,
            headers,
        })
    }
}

/// Client for the Rated-style REST API.
pub struct RatedClient<T = HttpTransport> {
    executor: QueryExecutor<T>,
    base_url: Url,
    headers: Vec<(String, String)>,
}

impl RatedClient {
    /// Start building a client.
    pub fn builder() -> RatedClientBuilder {
        RatedClientBuilder::default()
    }
}

impl<T> fmt::Debug for RatedClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatedClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl<T: Transport> RatedClient<T> {
    /// The executor backing this client.
    pub fn executor(&self) -> &QueryExecutor<T> {
        &self.executor
    }

    /// Fetch the network-wide total staked amount for one slug.
    ///
    /// The slug is trimmed and lowercased before routing. Recognized slugs
    /// without a resolution path yield [`ResolveError::UnsupportedSlug`];
    /// unrecognized input yields [`ResolveError::UnknownSlug`].
    pub async fn total_staked_amount(
        &self,
        token_slug: &str,
        time_window: &str,
    ) -> Result<TotalStakeSummary, ResolveError> {
        let span = spans::total_staked_amount(token_slug);
        async {
            let slug = token_slug.trim().to_lowercase();
            let route = route_for(&slug)?;

            let mut url = self.base_url.clone();
            url.set_path(route.endpoint);
            let params = if route.takes_window_param {
                vec![("window".to_string(), time_window.to_string())]
            } else {
                Vec::new()
            };

            let request = QueryRequest::RestGet {
                url,
                params,
                headers: self.headers.clone(),
            };
            let rows = self.executor.execute(&request).await?;
            let row = pick_time_window_row(&rows, time_window, route.endpoint)?;

            Ok(TotalStakeSummary {
                slug,
                time_window: row
                    .get("timeWindow")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                total_staked: row
                    .get(route.stake_field)
                    .filter(|value| !value.is_null())
                    .cloned(),
                source_field: route.stake_field,
                endpoint: route.endpoint,
            })
        }
        .instrument(span)
        .await
    }

    /// Fetch total staked amounts for several slugs.
    ///
    /// Slugs are resolved strictly sequentially in input order; a failure
    /// for one slug is recorded in its slot and the rest still resolve.
    pub async fn total_staked_for_slugs<S: Into<String>>(
        &self,
        slugs: impl IntoIterator<Item = S>,
        time_window: &str,
    ) -> BatchResults<TotalStakeSummary> {
        batch::resolve_all(slugs, |slug| async move {
            self.total_staked_amount(&slug, time_window).await
        })
        .await
    }
}
