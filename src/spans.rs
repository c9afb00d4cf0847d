//! Tracing span creation helpers for stakescan operations.
//!
//! Telemetry concerns are kept orthogonal to business logic: instead of
//! `#[instrument]` attributes, each instrumented operation has a span helper
//! here. Async operations attach the span with `Instrument::instrument`;
//! synchronous ones enter it directly.

use tracing::Span;

use crate::executor::CachePolicy;

/// Span for a single cached query execution.
///
/// Parent: client operation span
/// Children: transport request, cache read/write events
#[inline]
pub(crate) fn execute_query(policy: CachePolicy) -> Span {
    tracing::debug_span!("stakescan.execute_query", policy = ?policy)
}

/// Span for a forced, cache-overwriting refetch.
#[inline]
pub(crate) fn refresh_query() -> Span {
    tracing::debug_span!("stakescan.refresh_query")
}

/// Span for building a stake-share report from raw query results.
#[inline]
pub(crate) fn build_stake_share_report(filter_active: Option<bool>) -> Span {
    tracing::debug_span!(
        "stakescan.build_stake_share_report",
        filter_active = ?filter_active,
    )
}

/// Span for the provider stake-share client operation.
///
/// Parent: None (root span for this operation)
/// Children: execute_query spans for the per-provider and total queries
#[inline]
pub(crate) fn provider_stake_shares(asset_slug: &str) -> Span {
    tracing::info_span!("stakescan.provider_stake_shares", asset_slug = %asset_slug)
}

/// Span for resolving a total-stake summary for one network slug.
#[inline]
pub(crate) fn total_staked_amount(slug: &str) -> Span {
    tracing::debug_span!("stakescan.total_staked_amount", slug = %slug)
}

/// Span for a multi-slug batch resolution.
///
/// Parent: None (root span for this operation)
/// Children: one per-slug operation span per identifier, in input order
#[inline]
pub(crate) fn resolve_all(slug_count: usize) -> Span {
    tracing::info_span!("stakescan.resolve_all", slug_count = slug_count)
}
