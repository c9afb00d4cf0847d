//! Error types for the persistent response cache.

use std::path::Path;

/// Errors from the persistent response cache.
///
/// These never propagate out of a query: a failed read is reported as a
/// cache miss and a failed write is logged and dropped, so the caller still
/// receives the freshly fetched payload. The one place a `CacheError` can
/// reach user code is [`ResponseCache::validate`], the opt-in eager check.
///
/// [`ResponseCache::validate`]: crate::cache::ResponseCache::validate
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure while reading or writing an entry.
    #[error("Cache I/O failure at '{path}'")]
    Io {
        /// Path of the entry or directory involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A payload could not be serialized for storage.
    #[error("Failed to serialize cache payload")]
    Serialization(#[from] serde_json::Error),

    /// An entry exists on disk but its contents are not valid JSON.
    ///
    /// Torn writes from uncoordinated concurrent writers land here.
    #[error("Corrupt cache entry at '{path}': {reason}")]
    Corrupt {
        /// Path of the corrupt entry.
        path: String,
        /// Why the entry could not be parsed.
        reason: String,
    },
}

impl CacheError {
    /// Create an `Io` error for the given path.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a `Corrupt` error for the given path.
    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        CacheError::Corrupt {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}
