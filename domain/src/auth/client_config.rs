//! OAuth2 public-client configuration.

use crate::settings::connection::ConnectionSettings;
use serde::{Deserialize, Serialize};

/// Default scope of the Power Platform API, which fronts Copilot Studio.
pub const POWER_PLATFORM_SCOPE: &str = "https://api.powerplatform.com/.default";

/// Redirect target registered for the public client.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Microsoft identity platform authority host.
pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Parameters of an OAuth2 public client bound to one tenant and scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicClientConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub authority: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl PublicClientConfig {
    /// Build the config used for silent acquisition against the agent platform.
    pub fn for_settings(settings: &ConnectionSettings) -> Self {
        Self {
            client_id: settings.app_client_id.clone(),
            client_secret: settings.app_client_secret.clone(),
            authority: format!("{}/{}", AUTHORITY_HOST, settings.tenant_id),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![POWER_PLATFORM_SCOPE.to_string()],
        }
    }

    /// OAuth2 v2.0 token endpoint of the authority.
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority)
    }

    /// OAuth2 v2.0 authorize endpoint of the authority.
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/authorize", self.authority)
    }
}

/// An account known to the token cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable cache key, `<object id>.<tenant id>` for Entra ID accounts.
    pub home_account_id: String,
    pub username: String,
    pub tenant_id: String,
}
