//! Token cache persistence port
//!
//! The identity client keeps its accounts and tokens in an in-memory cache.
//! [`TokenCacheStore`] lets it reload that cache before use and persist it
//! after a change, so silent renewal survives process restarts.

use async_trait::async_trait;
use relay_domain::CachedTokenBlob;
use thiserror::Error;

/// Errors raised while reading or writing the persisted cache
#[derive(Error, Debug)]
pub enum TokenCacheError {
    #[error("Failed to read token cache at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write token cache at {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Durable storage for one serialized token cache blob.
///
/// Implementations must never expose a partially written blob to `load`.
#[async_trait]
pub trait TokenCacheStore: Send + Sync {
    /// Load the stored blob. `Ok(None)` means nothing has been saved yet.
    async fn load(&self) -> Result<Option<CachedTokenBlob>, TokenCacheError>;

    /// Replace the stored blob.
    async fn save(&self, blob: &CachedTokenBlob) -> Result<(), TokenCacheError>;
}
