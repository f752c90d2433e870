//! Connection settings port
//!
//! Settings are supplied by an external loader (environment variables in
//! production). [`CachingSettingsProvider`] wraps any provider so settings
//! are loaded once per process instead of once per request.

use async_trait::async_trait;
use relay_domain::{ConnectionSettings, DomainError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Errors that can occur while loading connection settings
#[derive(Error, Debug, Clone)]
pub enum SettingsError {
    #[error("Failed to load connection settings: {0}")]
    Load(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Source of [`ConnectionSettings`]
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn load(&self) -> Result<ConnectionSettings, SettingsError>;
}

/// Loads settings from the inner provider on first use and reuses them.
///
/// A failed load is not cached; the next call retries.
pub struct CachingSettingsProvider {
    inner: Arc<dyn SettingsProvider>,
    cell: OnceCell<ConnectionSettings>,
}

impl CachingSettingsProvider {
    pub fn new(inner: Arc<dyn SettingsProvider>) -> Self {
        Self {
            inner,
            cell: OnceCell::new(),
        }
    }
}

#[async_trait]
impl SettingsProvider for CachingSettingsProvider {
    async fn load(&self) -> Result<ConnectionSettings, SettingsError> {
        self.cell
            .get_or_try_init(|| self.inner.load())
            .await
            .cloned()
    }
}

/// Provider that always returns the same settings.
pub struct StaticSettingsProvider(pub ConnectionSettings);

#[async_trait]
impl SettingsProvider for StaticSettingsProvider {
    async fn load(&self) -> Result<ConnectionSettings, SettingsError> {
        Ok(self.0.clone())
    }
}
