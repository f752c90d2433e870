//! File-backed [`TokenCacheStore`].
//!
//! The blob is written to a temporary file in the target directory and then
//! renamed over the cache file, so a reader sees either the previous or the
//! new serialization, never a partial one. Concurrent saves race; the last
//! rename wins.

use async_trait::async_trait;
use relay_application::{TokenCacheError, TokenCacheStore};
use relay_domain::CachedTokenBlob;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores one serialized token cache at a fixed path.
#[derive(Debug, Clone)]
pub struct FileTokenCacheStore {
    path: PathBuf,
}

impl FileTokenCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn join_error(e: tokio::task::JoinError) -> std::io::Error {
    std::io::Error::other(e)
}

#[async_trait]
impl TokenCacheStore for FileTokenCacheStore {
    async fn load(&self) -> Result<Option<CachedTokenBlob>, TokenCacheError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "Loaded token cache");
                Ok(Some(CachedTokenBlob::new(bytes)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No token cache on disk");
                Ok(None)
            }
            Err(source) => Err(TokenCacheError::Read {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    async fn save(&self, blob: &CachedTokenBlob) -> Result<(), TokenCacheError> {
        let path = self.path.clone();
        let bytes = blob.as_bytes().to_vec();
        let len = bytes.len();

        tokio::task::spawn_blocking(move || Self::write_atomically(&path, &bytes))
            .await
            .map_err(join_error)
            .and_then(|result| result)
            .map_err(|source| TokenCacheError::Write {
                path: self.path.display().to_string(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = len, "Saved token cache");
        Ok(())
    }
}
