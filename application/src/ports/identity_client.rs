//! Identity client port
//!
//! Abstracts the OAuth2 public client that owns the token cache. Only the
//! silent path is exposed; interactive and device-code flows live outside
//! this service.

use async_trait::async_trait;
use relay_domain::{Account, PublicClientConfig};
use thiserror::Error;

/// Errors from the identity provider or the client's cache handling
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("No cached token for account {0}")]
    NoCachedToken(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Token request rejected: {0}")]
    Rejected(String),

    #[error("Token request failed: {0}")]
    RequestFailed(String),

    #[error("Token cache is corrupt: {0}")]
    CorruptCache(String),
}

/// OAuth2 public client with a persistent token cache
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Accounts present in the token cache.
    async fn accounts(&self, config: &PublicClientConfig) -> Result<Vec<Account>, IdentityError>;

    /// Acquire an access token for `account` without user interaction,
    /// using cached access or refresh tokens.
    async fn acquire_token_silent(
        &self,
        config: &PublicClientConfig,
        account: &Account,
    ) -> Result<String, IdentityError>;
}
