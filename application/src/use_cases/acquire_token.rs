//! Acquire Token use case.
//!
//! Silent-only token acquisition for the service-managed identity flow.
//! The first cached account is used; no account, or any failure along the
//! way, yields [`AccessToken::Unauthenticated`] instead of an error.

use crate::ports::identity_client::IdentityClient;
use relay_domain::{AccessToken, ConnectionSettings, PublicClientConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for acquiring an access token to the agent platform.
#[derive(Clone)]
pub struct AcquireTokenUseCase {
    identity: Arc<dyn IdentityClient>,
}

impl AcquireTokenUseCase {
    pub fn new(identity: Arc<dyn IdentityClient>) -> Self {
        Self { identity }
    }

    /// Acquire a token for the agent identified by `settings`.
    ///
    /// Never prompts and never fails: callers decide what to do with
    /// `Unauthenticated`.
    pub async fn execute(&self, settings: &ConnectionSettings) -> AccessToken {
        let config = PublicClientConfig::for_settings(settings);

        let accounts = match self.identity.accounts(&config).await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "Could not enumerate cached accounts");
                return AccessToken::Unauthenticated;
            }
        };

        let Some(account) = accounts.first() else {
            info!(
                client_id = %config.client_id,
                "No cached accounts; silent token acquisition skipped"
            );
            return AccessToken::Unauthenticated;
        };

        debug!(
            account = %account.username,
            cached_accounts = accounts.len(),
            "Acquiring token silently"
        );

        match self.identity.acquire_token_silent(&config, account).await {
            Ok(token) => {
                let token = AccessToken::from_raw(token);
                if !token.is_authenticated() {
                    warn!(account = %account.username, "Identity provider returned an empty token");
                }
                token
            }
            Err(e) => {
                warn!(account = %account.username, error = %e, "Silent token acquisition failed");
                AccessToken::Unauthenticated
            }
        }
    }
}
