//! Multi-slug batch resolution with per-slug failure isolation.
//!
//! [`resolve_all`] fans a single operation out across independent network
//! slugs. Slugs are processed strictly sequentially in input order - there
//! is no implicit parallelism - and a failure for one slug is converted
//! into an [`ErrorDescriptor`] at that slug's slot instead of aborting the
//! rest. The batch call itself never fails: one bad identifier cannot
//! starve the others of a result.
//!
//! The per-slug operation returns an explicit `Result<T, ResolveError>`;
//! nothing broader is caught.

use std::future::Future;

use serde::Serialize;
use tracing::{warn, Instrument};

use crate::errors::{ResolveError, TransportError};
use crate::spans;

/// Coarse classification of a per-slug failure, for branching without
/// string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Recognized slug with no supported resolution path.
    Unsupported,
    /// Slug not recognized at all.
    UnknownSlug,
    /// Non-success HTTP status from the backend.
    Remote,
    /// Request-level transport failure (connection, timeout, decode).
    Transport,
    /// Response did not match the expected shape.
    DataShape,
}

/// A per-slug failure recorded in a batch result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDescriptor {
    /// The slug whose resolution failed.
    pub slug: String,
    /// Failure classification.
    pub kind: ErrorKind,
    /// Human-readable failure message.
    pub message: String,
}

impl ErrorDescriptor {
    /// Build a descriptor from a slug and the error its resolution produced.
    pub fn from_error(slug: impl Into<String>, error: &ResolveError) -> Self {
        let kind = match error {
            ResolveError::UnsupportedSlug { .. } => ErrorKind::Unsupported,
            ResolveError::UnknownSlug { .. } => ErrorKind::UnknownSlug,
            ResolveError::Transport(TransportError::Status { .. }) => ErrorKind::Remote,
            ResolveError::Transport(_) => ErrorKind::Transport,
            ResolveError::Shape(_) => ErrorKind::DataShape,
        };
        Self {
            slug: slug.into(),
            kind,
            message: error.to_string(),
        }
    }
}

/// Ordered per-slug outcomes of a batch resolution.
///
/// Entry order is the input order. Each slug maps to either its successful
/// result or the descriptor of its failure.
#[derive(Debug, Clone)]
pub struct BatchResults<T> {
    entries: Vec<(String, Result<T, ErrorDescriptor>)>,
}

impl<T> BatchResults<T> {
    /// Number of slugs in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the batch contained no slugs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(slug, outcome)` entries in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<T, ErrorDescriptor>)> {
        self.entries
            .iter()
            .map(|(slug, outcome)| (slug.as_str(), outcome))
    }

    /// Look up the outcome for a slug.
    pub fn get(&self, slug: &str) -> Option<&Result<T, ErrorDescriptor>> {
        self.entries
            .iter()
            .find(|(entry_slug, _)| entry_slug == slug)
            .map(|(_, outcome)| outcome)
    }

    /// Iterate over successful entries only, in input order.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &T)> {
        self.iter()
            .filter_map(|(slug, outcome)| outcome.as_ref().ok().map(|value| (slug, value)))
    }

    /// Iterate over failed entries only, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &ErrorDescriptor> {
        self.iter().filter_map(|(_, outcome)| outcome.as_ref().err())
    }

    /// Consume the batch into its ordered entries.
    pub fn into_entries(self) -> Vec<(String, Result<T, ErrorDescriptor>)> {
        self.entries
    }
}

impl<T> Default for BatchResults<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Run `operation` for each slug, sequentially and in input order,
/// isolating per-slug failures.
///
/// Every error is caught, logged, and recorded as an [`ErrorDescriptor`]
/// at the slug's slot; remaining slugs still run.
pub async fn resolve_all<S, T, F, Fut>(
    slugs: impl IntoIterator<Item = S>,
    mut operation: F,
) -> BatchResults<T>
where
    S: Into<String>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, ResolveError>>,
{
    let slugs: Vec<String> = slugs.into_iter().map(Into::into).collect();
    let span = spans::resolve_all(slugs.len());

    async {
        let mut results = BatchResults::default();
        for slug in slugs {
            let outcome = match operation(slug.clone()).await {
                Ok(value) => Ok(value),
                Err(error) => {
                    warn!(
                        slug = %slug,
                        error = %error,
                        "slug resolution failed, continuing batch"
                    );
                    Err(ErrorDescriptor::from_error(&slug, &error))
                }
            };
            results.entries.push((slug, outcome));
        }
        results
    }
    .instrument(span)
    .await
}
