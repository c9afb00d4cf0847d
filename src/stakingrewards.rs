//! GraphQL client for the StakingRewards-style metrics backend.
//!
//! [`StakingRewardsClient`] wraps the backend's single GraphQL POST
//! endpoint. Every operation goes through the crate's [`QueryExecutor`],
//! so responses are served from the content-addressed cache whenever the
//! configured [`CachePolicy`] allows it.
//!
//! The API key is taken from the builder or, when not given explicitly,
//! from the `X_API_KEY` environment variable at construction time; a
//! missing key fails fast before any network activity.
//!
//! # Examples
//!
//! ```rust,ignore
//! use stakescan::StakingRewardsClient;
//!
//! let client = StakingRewardsClient::builder()
//!     .cache_dir("/var/cache/stakescan")
//!     .build()?;
//!
//! let report = client
//!     .provider_stake_shares("solana", &Default::default())
//!     .await?;
//! println!("untracked share: {:?}", report.untracked_share);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tracing::Instrument;
use url::Url;

use crate::cache::ResponseCache;
use crate::errors::{ConfigError, StakescanError, TransportError};
use crate::executor::{CachePolicy, QueryExecutor, QueryRequest};
use crate::query::{ArgValue, Arguments};
use crate::report::{self, StakeShareReport, REWARD_RATE_METRIC, STAKED_TOKENS_METRIC};
use crate::spans;
use crate::transport::{parse_endpoint, HttpTransport, Transport, DEFAULT_TIMEOUT};

/// Environment variable consulted for the API key.
pub const API_KEY_ENV: &str = "X_API_KEY";
/// Default GraphQL query endpoint.
pub const DEFAULT_QUERY_URL: &str = "https://api.stakingrewards.com/public/query";
/// Default billing status endpoint.
pub const DEFAULT_BILLING_URL: &str = "https://api.stakingrewards.com/public/billing/status";
/// Default cache directory.
pub const DEFAULT_CACHE_DIR: &str = "api_response_cache";

/// Sort direction for metric ordering clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl OrderDirection {
    fn as_ident(self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// Ordering clause for a metrics selection.
#[derive(Debug, Clone)]
pub struct MetricsOrder {
    /// Field to order by.
    pub field: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl Default for MetricsOrder {
    fn default() -> Self {
        Self {
            field: "createdAt".to_string(),
            direction: OrderDirection::Desc,
        }
    }
}

/// Options for [`StakingRewardsClient::asset_metrics`].
#[derive(Debug, Clone, Default)]
pub struct AssetMetricsOptions {
    /// Metric keys to select; empty selects all.
    pub metric_keys: Vec<String>,
    /// Keep only metrics created strictly before this date.
    pub created_before: Option<NaiveDate>,
    /// Maximum number of metric rows.
    pub limit: Option<u64>,
    /// Ordering; defaults to `createdAt` descending.
    pub order: MetricsOrder,
}

/// Options for [`StakingRewardsClient::providers`].
#[derive(Debug, Clone)]
pub struct ProvidersQuery {
    /// Keep only verified providers.
    pub is_verified: bool,
    /// Metric key providers are ordered by, descending.
    pub order_by_metric: String,
    /// Maximum number of providers.
    pub limit: u64,
    /// Metric keys fetched per provider.
    pub metric_keys: Vec<String>,
}

impl Default for ProvidersQuery {
    fn default() -> Self {
        Self {
            is_verified: true,
            order_by_metric: "assets_under_management".to_string(),
            limit: 10,
            metric_keys: vec![REWARD_RATE_METRIC.to_string()],
        }
    }
}

/// Scope filters for [`StakingRewardsClient::metrics`].
///
/// Leaving every field `None` queries global market metrics; the backend
/// expects explicit GraphQL `null` for absent scopes, which is what the
/// built document carries.
#[derive(Debug, Clone, Default)]
pub struct MetricsScope {
    /// Asset slug filter.
    pub asset: Option<String>,
    /// Provider slug filter.
    pub provider: Option<String>,
    /// Reward option filter.
    pub reward_option: Option<String>,
    /// Validator filter.
    pub validator: Option<String>,
}

/// Options for [`StakingRewardsClient::provider_stake_shares`].
#[derive(Debug, Clone)]
pub struct StakeShareOptions {
    /// Maximum number of reward options fetched.
    pub limit: u64,
    /// When present, keep only providers whose active-flag equals this
    /// value exactly; `None` keeps all.
    pub filter_active: Option<bool>,
    /// Also fetch each provider's reward rate.
    pub include_reward_rate: bool,
}

impl Default for StakeShareOptions {
    fn default() -> Self {
        Self {
            limit: 200,
            filter_active: Some(true),
            include_reward_rate: true,
        }
    }
}

/// Builder for [`StakingRewardsClient`].
#[derive(Debug, Clone)]
pub struct StakingRewardsClientBuilder {
    api_key: Option<String>,
    query_url: String,
    billing_url: String,
    cache_dir: PathBuf,
    timeout: Duration,
    policy: CachePolicy,
}

impl Default for StakingRewardsClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            query_url: DEFAULT_QUERY_URL.to_string(),
            billing_url: DEFAULT_BILLING_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            timeout: DEFAULT_TIMEOUT,
            policy: CachePolicy::ReadThrough,
        }
    }
}

impl StakingRewardsClientBuilder {
    /// Supply the API key explicitly instead of reading `X_API_KEY`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the GraphQL query endpoint.
    pub fn query_url(mut self, url: impl Into<String>) -> Self {
        self.query_url = url.into();
        self
    }

    /// Override the billing status endpoint.
    pub fn billing_url(mut self, url: impl Into<String>) -> Self {
        self.billing_url = url.into();
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
    pub fn build(self) -> Result<StakingRewardsClient, StakescanError> {
        let transport = HttpTransport::with_timeout(self.timeout);
        self.build_with_transport(transport)
    }

    /// Build the client over a custom transport.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<StakingRewardsClient<T>, StakescanError> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or(ConfigError::MissingApiKey {
                    env_var: API_KEY_ENV,
                })?,
        };

        let query_url = parse_endpoint(&self.query_url)?;
        let billing_url = parse_endpoint(&self.billing_url)?;
        let executor =
            QueryExecutor::new(transport, ResponseCache::new(self.cache_dir), self.policy);

        Ok(StakingRewardsClient {
            executor,
            query_url,
            billing_url,
            headers: vec![("X-API-KEY".to_string(), api_key)],
        })
    }
}

/// Client for the StakingRewards-style GraphQL API.
pub struct StakingRewardsClient<T = HttpTransport> {
    executor: QueryExecutor<T>,
    query_url: Url,
    billing_url: Url,
    headers: Vec<(String, String)>,
}

impl StakingRewardsClient {
    /// Start building a client.
    pub fn builder() -> StakingRewardsClientBuilder {
        StakingRewardsClientBuilder::default()
    }
}

impl<T> fmt::Debug for StakingRewardsClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StakingRewardsClient")
            .field("query_url", &self.query_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl<T: Transport> StakingRewardsClient<T> {
    /// The executor backing this client.
    pub fn executor(&self) -> &QueryExecutor<T> {
        &self.executor
    }

    async fn run(&self, query: String) -> Result<Value, TransportError> {
        let request = QueryRequest::GraphqlPost {
            url: self.query_url.clone(),
            query,
            variables: None,
            headers: self.headers.clone(),
        };
        self.executor.execute(&request).await
    }

    /// Query assets, optionally filtered by symbol and extra `where`
    /// conditions.
    pub async fn assets(
        &self,
        symbols: &[&str],
        limit: Option<u64>,
        extra_where: Option<&Map<String, Value>>,
    ) -> Result<Value, StakescanError> {
        Ok(self.run(assets_document(symbols, limit, extra_where)).await?)
    }

    /// Query one asset's metric history.
    pub async fn asset_metrics(
        &self,
        slug: &str,
        options: &AssetMetricsOptions,
    ) -> Result<Value, StakescanError> {
        Ok(self.run(asset_metrics_document(slug, options)).await?)
    }

    /// Query the latest aggregate `staked_tokens` metric for an asset.
    pub async fn total_staked_tokens(
        &self,
        asset_slug: &str,
        metrics_limit: u64,
    ) -> Result<Value, StakescanError> {
        Ok(self
            .run(total_staked_tokens_document(asset_slug, metrics_limit))
            .await?)
    }

    /// Query all reward options for an asset with their providers' staked
    /// token amounts.
    ///
    /// `is_active` of `Some(flag)` filters the returned reward options
    /// client-side on the provider active-flag (exact match); `None` keeps
    /// all of them.
    pub async fn provider_staked_tokens(
        &self,
        asset_slug: &str,
        limit: u64,
        is_active: Option<bool>,
    ) -> Result<Value, StakescanError> {
        let mut result = self
            .run(provider_staked_tokens_document(asset_slug, limit))
            .await?;

        if let Some(wanted) = is_active {
            if let Some(options) = result
                .pointer_mut("/data/rewardOptions")
                .and_then(Value::as_array_mut)
            {
                options.retain(|option| {
                    option
                        .pointer("/providers/0/isActive")
                        .and_then(Value::as_bool)
                        == Some(wanted)
                });
            }
        }

        Ok(result)
    }

    /// Query staked tokens for one provider on one asset.
    ///
    /// `validators_limit` of zero omits the validators block entirely.
    pub async fn provider_stake_for_asset(
        &self,
        provider_slug: &str,
        asset_slug: &str,
        limit: u64,
        validators_limit: u64,
    ) -> Result<Value, StakescanError> {
        Ok(self
            .run(provider_stake_for_asset_document(
                provider_slug,
                asset_slug,
                limit,
                validators_limit,
            ))
            .await?)
    }

    /// Query providers for an asset, ordered by a metric.
    pub async fn providers(
        &self,
        asset_slug: &str,
        query: &ProvidersQuery,
    ) -> Result<Value, StakescanError> {
        Ok(self.run(providers_document(asset_slug, query)).await?)
    }

    /// Query the `active_validators` metric for an asset symbol.
    pub async fn validators(&self, symbol: &str, limit: u64) -> Result<Value, StakescanError> {
        Ok(self.run(validators_document(symbol, limit)).await?)
    }

    /// Query metrics for a scope; an empty scope yields global market
    /// metrics. An empty `metric_keys` slice defaults to `marketcap`.
    pub async fn metrics(
        &self,
        scope: &MetricsScope,
        metric_keys: &[&str],
        limit: u64,
    ) -> Result<Value, StakescanError> {
        Ok(self.run(metrics_document(scope, metric_keys, limit)).await?)
    }

    /// Build the stake-share report for an asset.
    ///
    /// Issues the per-provider reward options query and the aggregate
    /// total-stake query, then combines them with
    /// [`report::build_stake_share_report`].
    pub async fn provider_stake_shares(
        &self,
        asset_slug: &str,
        options: &StakeShareOptions,
    ) -> Result<StakeShareReport, StakescanError> {
        let span = spans::provider_stake_shares(asset_slug);
        async {
            let options_response = self
                .run(stake_share_reward_options_document(
                    asset_slug,
                    options.limit,
                    options.include_reward_rate,
                ))
                .await?;
            let total_response = self.total_staked_tokens(asset_slug, 1).await?;

            Ok(report::build_stake_share_report(
                &total_response,
                &options_response,
                options.filter_active,
            ))
        }
        .instrument(span)
        .await
    }

    /// Execute a raw GraphQL document 1:1.
    pub async fn execute_raw(&self, query: &str) -> Result<Value, StakescanError> {
        Ok(self.run(query.to_string()).await?)
    }

    /// Execute a raw GraphQL document with variables.
    pub async fn execute_raw_with_variables(
        &self,
        query: &str,
        variables: Map<String, Value>,
    ) -> Result<Value, StakescanError> {
        let request = QueryRequest::GraphqlPost {
            url: self.query_url.clone(),
            query: query.to_string(),
            variables: Some(variables),
            headers: self.headers.clone(),
        };
        Ok(self.executor.execute(&request).await?)
    }

    /// Fetch billing status (available credits, subscription state).
    ///
    /// Always hits the network; billing data is never cached.
    pub async fn billing_status(&self) -> Result<Value, StakescanError> {
        let request = QueryRequest::RestGet {
            url: self.billing_url.clone(),
            params: Vec::new(),
            headers: self.headers.clone(),
        };
        Ok(self
            .executor
            .execute_with_policy(&request, CachePolicy::Bypass)
            .await?)
    }
}

// ---------------------------------------------------------------------------
// Document builders
// ---------------------------------------------------------------------------

fn slug_where(field: &str, slug: &str) -> ArgValue {
    ArgValue::object(Arguments::new().arg(field, ArgValue::json(json!([slug]))))
}

fn assets_document(
    symbols: &[&str],
    limit: Option<u64>,
    extra_where: Option<&Map<String, Value>>,
) -> String {
    let mut where_args = Arguments::new();
    if let Some(extra) = extra_where {
        for (key, value) in extra {
            if !symbols.is_empty() && key == "symbols" {
                continue;
            }
            where_args = where_args.arg(key.clone(), ArgValue::json(value.clone()));
        }
    }
    if !symbols.is_empty() {
        where_args = where_args.arg("symbols", ArgValue::json(json!(symbols)));
    }

    let args = Arguments::new()
        .arg_opt(
            "where",
            (!where_args.is_empty()).then(|| ArgValue::object(where_args)),
        )
        .arg_opt("limit", limit.map(|limit| ArgValue::json(json!(limit))));

    format!(
        "{{\n  assets{} {{\n    id\n    name\n    slug\n    description\n    symbol\n  }}\n}}",
        args.render_parenthesized()
    )
}

fn asset_metrics_document(slug: &str, options: &AssetMetricsOptions) -> String {
    let mut metrics_where = Arguments::new();
    if !options.metric_keys.is_empty() {
        metrics_where = metrics_where.arg("metricKeys", ArgValue::json(json!(options.metric_keys)));
    }
    if let Some(date) = options.created_before {
        metrics_where = metrics_where.arg(
            "createdAt_lt",
            ArgValue::json(json!(date.format("%Y-%m-%d").to_string())),
        );
    }

    let metrics_args = Arguments::new()
        .arg_opt(
            "where",
            (!metrics_where.is_empty()).then(|| ArgValue::object(metrics_where)),
        )
        .arg_opt("limit", options.limit.map(|limit| ArgValue::json(json!(limit))))
        .arg(
            "order",
            ArgValue::object(Arguments::new().arg(
                options.order.field.clone(),
                ArgValue::ident(options.order.direction.as_ident()),
            )),
        );

    let asset_args = Arguments::new()
        .arg("where", slug_where("slugs", slug))
        .arg("limit", ArgValue::json(json!(1)));

    format!(
        "{{\n  assets({asset_args}) {{\n    id\n    slug\n    logoUrl\n    metrics{metrics_args} {{\n      defaultValue\n      createdAt\n    }}\n  }}\n}}",
        asset_args = asset_args.render(),
        metrics_args = metrics_args.render_parenthesized(),
    )
}

fn total_staked_tokens_document(asset_slug: &str, metrics_limit: u64) -> String {
    let asset_args = Arguments::new()
        .arg("where", slug_where("slugs", asset_slug))
        .arg("limit", ArgValue::json(json!(1)));

    let metrics_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new()
                    .arg("metricKeys", ArgValue::json(json!([STAKED_TOKENS_METRIC]))),
            ),
        )
        .arg(
            "order",
            ArgValue::object(Arguments::new().arg("createdAt", ArgValue::ident("desc"))),
        )
        .arg("limit", ArgValue::json(json!(metrics_limit)));

    format!(
        "{{\n  assets({asset_args}) {{\n    slug\n    metrics({metrics_args}) {{\n      metricKey\n      defaultValue\n      createdAt\n    }}\n  }}\n}}",
        asset_args = asset_args.render(),
        metrics_args = metrics_args.render(),
    )
}

fn reward_options_args(asset_slug: &str, limit: u64) -> Arguments {
    Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new()
                    .arg("inputAsset", slug_where("slugs", asset_slug))
                    .arg("typeKeys", ArgValue::json(json!(["pos"]))),
            ),
        )
        .arg("limit", ArgValue::json(json!(limit)))
        .arg(
            "order",
            ArgValue::object(
                Arguments::new()
                    .arg("metricKey_desc", ArgValue::json(json!(STAKED_TOKENS_METRIC))),
            ),
        )
}

fn provider_staked_tokens_document(asset_slug: &str, limit: u64) -> String {
    let metrics_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new()
                    .arg("metricKeys", ArgValue::json(json!([STAKED_TOKENS_METRIC]))),
            ),
        )
        .arg("limit", ArgValue::json(json!(1)));

    format!(
        "{{\n  rewardOptions({args}) {{\n    id\n    providers(limit: 1) {{\n      slug\n      isActive\n    }}\n    metrics({metrics_args}) {{\n      metricKey\n      defaultValue\n    }}\n  }}\n}}",
        args = reward_options_args(asset_slug, limit).render(),
        metrics_args = metrics_args.render(),
    )
}

fn provider_stake_for_asset_document(
    provider_slug: &str,
    asset_slug: &str,
    limit: u64,
    validators_limit: u64,
) -> String {
    let args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new()
                    .arg("providers", slug_where("slugs", provider_slug))
                    .arg("inputAsset", slug_where("slugs", asset_slug))
                    .arg("typeKeys", ArgValue::json(json!(["pos"]))),
            ),
        )
        .arg("limit", ArgValue::json(json!(limit)))
        .arg(
            "order",
            ArgValue::object(
                Arguments::new()
                    .arg("metricKey_desc", ArgValue::json(json!(STAKED_TOKENS_METRIC))),
            ),
        );

    let metrics_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new()
                    .arg("metricKeys", ArgValue::json(json!([STAKED_TOKENS_METRIC]))),
            ),
        )
        .arg("limit", ArgValue::json(json!(2)));

    let validators_block = if validators_limit > 0 {
        let validators_args = Arguments::new().arg("limit", ArgValue::json(json!(validators_limit)));
        format!(
            "\n    validators({}) {{\n      id\n      address\n    }}",
            validators_args.render()
        )
    } else {
        String::new()
    };

    format!(
        "{{\n  rewardOptions({args}) {{\n    id\n    inputAssets(limit: 1) {{ slug }}\n    providers(limit: 1) {{ slug }}\n    metrics({metrics_args}) {{\n      defaultValue\n    }}{validators_block}\n  }}\n}}",
        args = args.render(),
        metrics_args = metrics_args.render(),
    )
}

fn providers_document(asset_slug: &str, query: &ProvidersQuery) -> String {
    let args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new()
                    .arg(
                        "rewardOptions",
                        ArgValue::object(
                            Arguments::new().arg("inputAsset", slug_where("slugs", asset_slug)),
                        ),
                    )
                    .arg("isVerified", ArgValue::json(json!(query.is_verified))),
            ),
        )
        .arg(
            "order",
            ArgValue::object(
                Arguments::new()
                    .arg("metricKey_desc", ArgValue::json(json!(query.order_by_metric))),
            ),
        )
        .arg("limit", ArgValue::json(json!(query.limit)));

    let inner_options_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(Arguments::new().arg("inputAsset", slug_where("slugs", asset_slug))),
        )
        .arg("limit", ArgValue::json(json!(1)));

    let inner_metrics_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new().arg("metricKeys", ArgValue::json(json!(query.metric_keys))),
            ),
        )
        .arg("limit", ArgValue::json(json!(1)));

    format!(
        "{{\n  providers({args}) {{\n    slug\n    rewardOptions({inner_options}) {{\n      metrics({inner_metrics}) {{\n        defaultValue\n      }}\n    }}\n  }}\n}}",
        args = args.render(),
        inner_options = inner_options_args.render(),
        inner_metrics = inner_metrics_args.render(),
    )
}

fn validators_document(symbol: &str, limit: u64) -> String {
    let asset_args = Arguments::new()
        .arg("where", slug_where("symbols", symbol))
        .arg("limit", ArgValue::json(json!(1)));

    let metrics_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new().arg("metricKeys", ArgValue::json(json!(["active_validators"]))),
            ),
        )
        .arg("limit", ArgValue::json(json!(limit)));

    format!(
        "{{\n  assets({asset_args}) {{\n    id\n    name\n    slug\n    description\n    symbol\n    metrics({metrics_args}) {{\n      metricKey\n      label\n      defaultValue\n    }}\n  }}\n}}",
        asset_args = asset_args.render(),
        metrics_args = metrics_args.render(),
    )
}

fn metrics_document(scope: &MetricsScope, metric_keys: &[&str], limit: u64) -> String {
    let keys: Vec<&str> = if metric_keys.is_empty() {
        vec!["marketcap"]
    } else {
        metric_keys.to_vec()
    };

    let scope_value = |value: &Option<String>| {
        ArgValue::json(value.as_deref().map_or(Value::Null, |v| json!(v)))
    };

    let where_args = Arguments::new()
        .arg("asset", scope_value(&scope.asset))
        .arg("provider", scope_value(&scope.provider))
        .arg("rewardOption", scope_value(&scope.reward_option))
        .arg("validator", scope_value(&scope.validator))
        .arg("metricKeys", ArgValue::json(json!(keys)));

    let args = Arguments::new()
        .arg("where", ArgValue::object(where_args))
        .arg("limit", ArgValue::json(json!(limit)));

    format!(
        "{{\n  metrics({args}) {{\n    defaultValue\n    changeAbsolutes\n    changePercentages\n    createdAt\n  }}\n}}",
        args = args.render(),
    )
}

fn stake_share_reward_options_document(
    asset_slug: &str,
    limit: u64,
    include_reward_rate: bool,
) -> String {
    let mut metric_keys = vec![STAKED_TOKENS_METRIC];
    if include_reward_rate {
        metric_keys.push(REWARD_RATE_METRIC);
    }

    let metrics_args = Arguments::new()
        .arg(
            "where",
            ArgValue::object(
                Arguments::new().arg("metricKeys", ArgValue::json(json!(metric_keys))),
            ),
        )
        .arg("limit", ArgValue::json(json!(5)));

    format!(
        "{{\n  rewardOptions({args}) {{\n    providers(limit: 1) {{\n      slug\n      name\n      isActive\n    }}\n    metrics({metrics_args}) {{\n      metricKey\n      defaultValue\n    }}\n  }}\n}}",
        args = reward_options_args(asset_slug, limit).render(),
        metrics_args = metrics_args.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_document_with_symbols_and_limit() {
        let document = assets_document(&["ETH"], Some(1), None);
        assert_eq!(
            document,
            "{\n  assets(where: {symbols: [\"ETH\"]}, limit: 1) {\n    id\n    name\n    slug\n    description\n    symbol\n  }\n}"
        );
    }

    #[test]
    fn test_assets_document_without_filters_has_no_argument_list() {
        let document = assets_document(&[], None, None);
        assert!(document.contains("assets {"));
        assert!(!document.contains("assets("));
    }

    #[test]
    fn test_symbols_override_extra_where() {
        let extra = match json!({ "symbols": ["OLD"], "isActive": true }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let document = assets_document(&["ETH"], None, Some(&extra));
        assert!(document.contains(r#"symbols: ["ETH"]"#));
        assert!(!document.contains("OLD"));
        assert!(document.contains("isActive: true"));
    }

    #[test]
    fn test_total_staked_tokens_document() {
        let document = total_staked_tokens_document("solana", 1);
        assert!(document.contains(r#"where: {slugs: ["solana"]}, limit: 1"#));
        assert!(document.contains(r#"metricKeys: ["staked_tokens"]"#));
        assert!(document.contains("order: {createdAt: desc}"));
    }

    #[test]
    fn test_hostile_slug_cannot_escape_the_document() {
        let hostile = "solana\"]}) { apiKeys } #";
        let document = total_staked_tokens_document(hostile, 1);
        // The closing brace structure of the document is unchanged: the
        // hostile payload stays inside one escaped string literal.
        assert!(document.contains(r#"slugs: ["solana\"]}) { apiKeys } #"]"#));
        assert!(!document.contains("slugs: [\"solana\"]})"));
    }

    #[test]
    fn test_stake_share_document_metric_keys() {
        let with_rate = stake_share_reward_options_document("solana", 200, true);
        assert!(with_rate.contains(r#"metricKeys: ["staked_tokens","reward_rate"]"#));

        let without_rate = stake_share_reward_options_document("solana", 200, false);
        assert!(without_rate.contains(r#"metricKeys: ["staked_tokens"]"#));
        assert!(!without_rate.contains("reward_rate"));
    }

    #[test]
    fn test_provider_stake_for_asset_document_validators_block() {
        let without = provider_stake_for_asset_document("kiln", "solana", 20, 0);
        assert!(!without.contains("validators("));

        let with = provider_stake_for_asset_document("kiln", "solana", 20, 3);
        assert!(with.contains("validators(limit: 3)"));
        assert!(with.contains(r#"providers: {slugs: ["kiln"]}"#));
        assert!(with.contains(r#"inputAsset: {slugs: ["solana"]}"#));
    }

    #[test]
    fn test_metrics_document_global_scope_uses_nulls() {
        let document = metrics_document(&MetricsScope::default(), &[], 1);
        assert!(document.contains("asset: null"));
        assert!(document.contains("provider: null"));
        assert!(document.contains("rewardOption: null"));
        assert!(document.contains("validator: null"));
        assert!(document.contains(r#"metricKeys: ["marketcap"]"#));
    }

    #[test]
    fn test_metrics_document_scoped() {
        let scope = MetricsScope {
            asset: Some("solana".to_string()),
            ..Default::default()
        };
        let document = metrics_document(&scope, &["staked_tokens"], 2);
        assert!(document.contains(r#"asset: "solana""#));
        assert!(document.contains("provider: null"));
        assert!(document.contains("limit: 2"));
    }

    #[test]
    fn test_asset_metrics_document_date_filter() {
        let options = AssetMetricsOptions {
            metric_keys: vec![REWARD_RATE_METRIC.to_string()],
            created_before: NaiveDate::from_ymd_opt(2023, 6, 28),
            limit: Some(10),
            order: MetricsOrder::default(),
        };
        let document = asset_metrics_document("polkadot", &options);
        assert!(document.contains(r#"metricKeys: ["reward_rate"]"#));
        assert!(document.contains(r#"createdAt_lt: "2023-06-28""#));
        assert!(document.contains("limit: 10"));
        assert!(document.contains("order: {createdAt: desc}"));
    }

    #[test]
    fn test_providers_document_defaults() {
        let document = providers_document("cosmos", &ProvidersQuery::default());
        assert!(document.contains("isVerified: true"));
        assert!(document.contains(r#"metricKey_desc: "assets_under_management""#));
        assert!(document.contains("limit: 10"));
        assert!(document.contains(r#"metricKeys: ["reward_rate"]"#));
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        std::env::remove_var(API_KEY_ENV);
        let result = StakingRewardsClient::builder().build();
        assert!(matches!(
            result,
            Err(StakescanError::Config(ConfigError::MissingApiKey { .. }))
        ));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = StakingRewardsClient::builder()
            .api_key("test-key")
            .query_url("not a url")
            .build();
        assert!(matches!(
            result,
            Err(StakescanError::Config(ConfigError::InvalidEndpoint { .. }))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = StakingRewardsClient::builder()
            .api_key("secret-key")
            .build()
            .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
