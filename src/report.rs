//! Stake-share aggregation.
//!
//! [`build_stake_share_report`] combines two raw query results for the same
//! asset - the aggregate total-stake query and the per-provider reward
//! options query - into a single [`StakeShareReport`]: each provider's share
//! of total stake, the untracked remainder, and the untracked share.
//!
//! Derived values are computed only when their inputs are actually present:
//! a missing or zero total yields absent shares, never a division result or
//! a garbage value. Metric values are coerced exactly once, at ingestion -
//! JSON numbers and numeric strings become `f64`, anything else is treated
//! as absent - so no downstream computation re-parses or panics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spans;

/// Metric key for an asset's or reward option's staked token amount.
pub const STAKED_TOKENS_METRIC: &str = "staked_tokens";
/// Metric key for a reward option's reward rate.
pub const REWARD_RATE_METRIC: &str = "reward_rate";

/// One tracked provider's stake figures for an asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStakeRecord {
    /// Provider slug, when the reward option carried one.
    pub provider_slug: Option<String>,
    /// Provider display name.
    pub provider_name: Option<String>,
    /// Staked token amount attributed to this provider.
    pub staked_tokens: Option<f64>,
    /// Reward rate for this provider's reward option.
    pub reward_rate: Option<f64>,
    /// `staked_tokens / total`; present only when both operands are present
    /// and the total is non-zero.
    pub share: Option<f64>,
}

/// Aggregated stake-share figures for one asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StakeShareReport {
    /// The asset's total staked tokens; absent when the aggregate query did
    /// not yield a numeric value.
    pub total_staked_tokens: Option<f64>,
    /// `total - sum of tracked provider stake`; computed only when the
    /// total is present and non-zero.
    pub untracked_staked_tokens: Option<f64>,
    /// `untracked_staked_tokens / total`, present exactly when the
    /// numerator is.
    pub untracked_share: Option<f64>,
    /// Tracked providers, in the order the backend returned them.
    pub providers: Vec<ProviderStakeRecord>,
}

// Typed views of the raw GraphQL responses. Every field is optional or
// defaulted: a response that fails to match simply contributes nothing.

#[derive(Debug, Deserialize)]
struct AssetsEnvelope {
    #[serde(default)]
    data: Option<AssetsData>,
}

#[derive(Debug, Deserialize)]
struct AssetsData {
    #[serde(default)]
    assets: Vec<AssetEntry>,
}

#[derive(Debug, Deserialize)]
struct AssetEntry {
    #[serde(default)]
    metrics: Vec<MetricEntry>,
}

#[derive(Debug, Deserialize)]
struct MetricEntry {
    #[serde(rename = "metricKey", default)]
    metric_key: Option<String>,
    #[serde(rename = "defaultValue", default)]
    default_value: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RewardOptionsEnvelope {
    #[serde(default)]
    data: Option<RewardOptionsData>,
}

#[derive(Debug, Deserialize)]
struct RewardOptionsData {
    #[serde(rename = "rewardOptions", default)]
    reward_options: Vec<RewardOption>,
}

#[derive(Debug, Deserialize)]
struct RewardOption {
    #[serde(default)]
    providers: Vec<ProviderInfo>,
    #[serde(default)]
    metrics: Vec<MetricEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderInfo {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "isActive", default)]
    is_active: Option<bool>,
}

/// Coerce a raw metric value to `f64`.
///
/// Accepts JSON numbers and numeric strings; everything else is absent.
/// This is the single ingestion point for metric values.
pub fn metric_value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build a stake-share report from the aggregate total-stake response and
/// the per-provider reward options response for the same asset.
///
/// `filter_active` of `Some(flag)` keeps only entities whose provider
/// active-flag equals `flag` exactly (an absent flag never matches);
/// `None` keeps all entities, preserving their count and order.
pub fn build_stake_share_report(
    total_response: &Value,
    reward_options_response: &Value,
    filter_active: Option<bool>,
) -> StakeShareReport {
    let span = spans::build_stake_share_report(filter_active);
    let _guard = span.enter();

    let total = extract_total(total_response);
    let reward_options = extract_reward_options(reward_options_response);

    let mut providers = Vec::new();
    for option in reward_options {
        let info = option.providers.into_iter().next().unwrap_or_default();
        if let Some(wanted) = filter_active {
            if info.is_active != Some(wanted) {
                continue;
            }
        }

        // Metrics are matched by key: the collection may arrive in any
        // order and may carry unrelated keys.
        let mut staked_tokens = None;
        let mut reward_rate = None;
        for metric in &option.metrics {
            let value = metric.default_value.as_ref().and_then(metric_value_as_f64);
            match metric.metric_key.as_deref() {
                Some(STAKED_TOKENS_METRIC) => staked_tokens = value,
                Some(REWARD_RATE_METRIC) => reward_rate = value,
                _ => {}
            }
        }

        let share = match (total, staked_tokens) {
            (Some(total), Some(staked)) if total != 0.0 => Some(staked / total),
            _ => None,
        };

        providers.push(ProviderStakeRecord {
            provider_slug: info.slug,
            provider_name: info.name,
            staked_tokens,
            reward_rate,
            share,
        });
    }

    let (untracked_staked_tokens, untracked_share) = match total {
        Some(total) if total != 0.0 => {
            let tracked: f64 = providers
                .iter()
                .filter_map(|p| p.staked_tokens)
                .filter(|staked| *staked != 0.0)
                .sum();
            let untracked = total - tracked;
            (Some(untracked), Some(untracked / total))
        }
        _ => (None, None),
    };

    StakeShareReport {
        total_staked_tokens: total,
        untracked_staked_tokens,
        untracked_share,
        providers,
    }
}

/// Total stake from `data.assets[0].metrics[0].defaultValue`.
///
/// Anything missing or non-numeric along the path yields `None`, never zero.
fn extract_total(response: &Value) -> Option<f64> {
    let envelope = AssetsEnvelope::deserialize(response).ok()?;
    envelope
        .data?
        .assets
        .into_iter()
        .next()?
        .metrics
        .into_iter()
        .next()?
        .default_value
        .as_ref()
        .and_then(metric_value_as_f64)
}

fn extract_reward_options(response: &Value) -> Vec<RewardOption> {
    RewardOptionsEnvelope::deserialize(response)
        .ok()
        .and_then(|envelope| envelope.data)
        .map(|data| data.reward_options)
        .unwrap_or_default()
}
