//! Persistent content-addressed response cache.
//!
//! [`ResponseCache`] stores one JSON file per [`CacheKey`] in a configurable
//! directory. Presence alone means "cached": entries carry no metadata, no
//! TTL, and are never pruned by this crate. An entry is created on the first
//! miss for its key, read thereafter, and only ever replaced wholesale by a
//! forced refetch; deleting entries is an external operator concern.
//!
//! The cache is strictly best-effort:
//!
//! - a read that fails for any reason (missing file, I/O error, corrupt
//!   JSON) is reported as a miss, never as an error;
//! - a write failure is returned as [`WriteOutcome::WriteFailed`] for the
//!   caller to log, and the query that triggered it still succeeds.
//!
//! The cache directory may be shared across process instances. Writers
//! targeting the same key are not coordinated; the last writer wins, and a
//! torn write observed by a reader surfaces as corruption, which is
//! downgraded to a miss.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::CacheKey;
use crate::errors::CacheError;

/// Outcome of a cache write.
///
/// Writes are best-effort: a failure carries its reason so the caller can
/// log it, but it is never escalated into a query failure.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The entry was persisted.
    Written,
    /// The entry could not be persisted; the query result is unaffected.
    WriteFailed(CacheError),
}

/// File-per-key response cache rooted at a directory.
///
/// Construction never touches the filesystem; the directory is created
/// lazily on the first write so that cache trouble cannot surface at query
/// time. Use [`validate`](Self::validate) to check the directory eagerly.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Eagerly create the cache directory and verify it is writable.
    ///
    /// This is the only cache operation that surfaces a [`CacheError`];
    /// everything else degrades to misses or logged write failures.
    pub fn validate(self) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;

        let probe = self.dir.join(".cache_write_test");
        std::fs::write(&probe, b"test").map_err(|e| CacheError::io(&probe, e))?;
        let _ = std::fs::remove_file(&probe);

        debug!(dir = %self.dir.display(), "cache directory validated");
        Ok(self)
    }

    /// Path of the entry file for a key.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Look up a cached payload.
    ///
    /// Returns `None` when no entry exists, when the entry cannot be read,
    /// or when it cannot be parsed. Corruption is logged at `warn` and
    /// reported as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        let path = self.entry_path(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "cache read failed, treating as miss"
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(payload) => {
                debug!(key = %key, "cache hit");
                Some(payload)
            }
            Err(e) => {
                warn!(
                    key = %key,
                    path = %path.display(),
                    error = %e,
                    "corrupt cache entry, treating as miss"
                );
                None
            }
        }
    }

    /// Store a payload under a key, replacing any existing entry.
    ///
    /// The payload is written pretty-printed. Failures are returned as
    /// [`WriteOutcome::WriteFailed`], never propagated.
    pub async fn put(&self, key: &CacheKey, payload: &Value) -> WriteOutcome {
        match self.write_entry(key, payload).await {
            Ok(()) => {
                debug!(key = %key, "cached response");
                WriteOutcome::Written
            }
            Err(reason) => WriteOutcome::WriteFailed(reason),
        }
    }

    async fn write_entry(&self, key: &CacheKey, payload: &Value) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?;

        let bytes = serde_json::to_vec_pretty(payload)?;
        let path = self.entry_path(key);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CacheError::io(&path, e))?;

        Ok(())
    }

    /// Remove every entry file from the cache directory.
    ///
    /// Operator utility: nothing in this crate calls it automatically, so
    /// cached entries are permanent until an operator deletes them.
    pub async fn clear(&self) -> Result<(), CacheError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CacheError::io(&self.dir, e)),
        };

        let mut removed = 0usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| CacheError::io(&path, e))?;
                removed += 1;
            }
        }

        debug!(dir = %self.dir.display(), removed, "cleared cache directory");
        Ok(())
    }
}
