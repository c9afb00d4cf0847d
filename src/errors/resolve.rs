//! Error types for per-slug resolution operations.

use super::{ShapeError, TransportError};

/// Errors that can occur while resolving a single network slug.
///
/// Recognized-but-unsupported slugs are surfaced distinctly from unknown
/// ones so that callers can branch on "not yet supported" versus "invalid
/// input". In batch operations every variant is caught per slug and
/// converted into an [`ErrorDescriptor`] instead of aborting the batch.
///
/// [`ErrorDescriptor`]: crate::batch::ErrorDescriptor
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The slug is recognized but has no supported resolution path.
    #[error("No supported resolution path for '{slug}': {detail}")]
    UnsupportedSlug {
        /// The recognized slug.
        slug: String,
        /// Why the slug cannot be resolved yet.
        detail: String,
    },

    /// The slug is not recognized at all.
    #[error("Unknown network slug: '{slug}'")]
    UnknownSlug {
        /// The unrecognized input.
        slug: String,
    },

    /// The backend request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend response did not match the expected shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl ResolveError {
    /// Create an `UnsupportedSlug` error.
    pub fn unsupported_slug(slug: impl Into<String>, detail: impl Into<String>) -> Self {
        ResolveError::UnsupportedSlug {
            slug: slug.into(),
            detail: detail.into(),
        }
    }

    /// Create an `UnknownSlug` error.
    pub fn unknown_slug(slug: impl Into<String>) -> Self {
        ResolveError::UnknownSlug { slug: slug.into() }
    }
}
