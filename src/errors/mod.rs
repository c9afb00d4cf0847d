//! Error types for the stakescan library.
//!
//! This module provides strongly-typed errors for all public APIs in stakescan.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   (`TransportError`, `ResolveError`, etc.)
//! - **Unified error type** ([`StakescanError`]) for convenience when you
//!   don't need to distinguish between error sources
//!
//! # Architecture
//!
//! Each major concern has its own error type:
//! - [`ConfigError`] - Missing or invalid client configuration (fails fast at
//!   construction, before any network activity)
//! - [`TransportError`] - HTTP failures, including non-success statuses with
//!   the status code, request URL, and response body attached
//! - [`ShapeError`] - A response that did not match the expected shape
//! - [`ResolveError`] - Per-slug resolution failures, distinguishing
//!   recognized-but-unsupported slugs from unknown ones
//! - [`CacheError`] - Read/write/parse failures against the persistent cache
//!
//! [`CacheError`] is deliberately **not** part of [`StakescanError`]: cache
//! failures are recovered locally (a bad read is a miss, a bad write is
//! logged and dropped) and never reach the caller of a query. The only place
//! one can surface is the opt-in [`ResponseCache::validate`] check.
//!
//! [`ResponseCache::validate`]: crate::cache::ResponseCache::validate
//!
//! # Examples
//!
//! ## Fine-grained error handling
//!
//! ```rust,ignore
//! use stakescan::{RatedClient, ResolveError};
//!
//! match client.total_staked_amount("polkadot", "1d").await {
//!     Ok(summary) => println!("total: {:?}", summary.total_staked),
//!     Err(ResolveError::UnsupportedSlug { slug, .. }) => {
//!         eprintln!("{slug} is recognized but has no resolution path yet");
//!     }
//!     Err(ResolveError::UnknownSlug { slug }) => {
//!         eprintln!("{slug} is not a known network slug");
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```
//!
//! ## Using the unified error type
//!
//! ```rust,ignore
//! use stakescan::{StakescanError, StakingRewardsClient};
//!
//! async fn example() -> Result<(), StakescanError> {
//!     let client = StakingRewardsClient::builder().build()?;
//!     let report = client.provider_stake_shares("solana", &Default::default()).await?;
//!     // Errors automatically convert to StakescanError via From implementations
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod resolve;
mod shape;
mod transport;

pub use cache::CacheError;
pub use config::ConfigError;
pub use resolve::ResolveError;
pub use shape::ShapeError;
pub use transport::TransportError;

/// Unified error type for all stakescan operations.
///
/// This enum wraps the module-specific error types, providing a convenient
/// way to handle errors when you don't need to distinguish between different
/// error sources. All module-specific error types automatically convert to
/// `StakescanError` via `From` implementations, so `?` propagates naturally.
///
/// Cache failures are absent by design; see the module documentation.
#[derive(Debug, thiserror::Error)]
pub enum StakescanError {
    /// Invalid or missing client configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP transport failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response did not match the expected shape.
    #[error("Response shape error: {0}")]
    Shape(#[from] ShapeError),

    /// A network slug could not be resolved.
    #[error("Slug resolution error: {0}")]
    Resolve(#[from] ResolveError),
}
