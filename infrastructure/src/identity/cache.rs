//! In-memory token cache and its JSON serialization.
//!
//! The blob uses the MSAL cache schema, so a cache seeded by msal-node (or
//! any other MSAL library) can be renewed silently here and vice versa.
//! Entries are matched on their fields; the map keys are only written in
//! MSAL's format for the benefit of other readers. Timestamps are written as
//! strings and read from strings or numbers. Sections and fields this module
//! does not use are kept as they were.
//!
//! Only this module parses the blob; the store treats it as opaque bytes.

use relay_domain::{Account, CachedTokenBlob};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Access tokens this close to expiry are treated as expired.
pub const ACCESS_TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Environment recorded for new entries when the account has none cached.
pub const DEFAULT_ENVIRONMENT: &str = "login.microsoftonline.com";

const CREDENTIAL_ACCESS_TOKEN: &str = "AccessToken";
const CREDENTIAL_REFRESH_TOKEN: &str = "RefreshToken";

/// Scopes MSAL adds to every request and leaves out of token targets.
const OIDC_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];

/// Unix seconds, written as a decimal string and read from either form.
mod unix_seconds {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAccount {
    pub home_account_id: String,
    pub environment: String,
    pub realm: String,
    #[serde(default)]
    pub username: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CachedAccount {
    pub fn new(
        home_account_id: impl Into<String>,
        environment: impl Into<String>,
        realm: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            home_account_id: home_account_id.into(),
            environment: environment.into(),
            realm: realm.into(),
            username: username.into(),
            extra: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    fn key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.home_account_id, self.environment, self.realm
        )
        .to_lowercase()
    }
}

impl From<&CachedAccount> for Account {
    fn from(cached: &CachedAccount) -> Self {
        Account {
            home_account_id: cached.home_account_id.clone(),
            username: cached.username.clone(),
            tenant_id: cached.realm.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRefreshToken {
    pub home_account_id: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub credential_type: String,
    pub client_id: String,
    pub secret: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CachedRefreshToken {
    fn key(&self) -> String {
        format!(
            "{}-{}-refreshtoken-{}--",
            self.home_account_id, self.environment, self.client_id
        )
        .to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAccessToken {
    pub home_account_id: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub credential_type: String,
    pub client_id: String,
    pub realm: String,
    /// Space-separated scopes
    pub target: String,
    pub secret: String,
    #[serde(default, with = "unix_seconds")]
    pub cached_at: i64,
    #[serde(with = "unix_seconds")]
    pub expires_on: i64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CachedAccessToken {
    fn key(&self) -> String {
        format!(
            "{}-{}-accesstoken-{}-{}-{}",
            self.home_account_id, self.environment, self.client_id, self.realm, self.target
        )
        .to_lowercase()
    }

    fn belongs_to(&self, home_account_id: &str, client_id: &str, realm: &str) -> bool {
        self.home_account_id.eq_ignore_ascii_case(home_account_id)
            && self.client_id.eq_ignore_ascii_case(client_id)
            && self.realm.eq_ignore_ascii_case(realm)
    }

    fn scopes(&self) -> impl Iterator<Item = &str> {
        self.target.split_whitespace()
    }

    fn covers(&self, requested: &[String]) -> bool {
        requested_scopes(requested)
            .all(|wanted| self.scopes().any(|have| have.eq_ignore_ascii_case(wanted)))
    }

    fn overlaps(&self, requested: &[String]) -> bool {
        requested_scopes(requested)
            .any(|wanted| self.scopes().any(|have| have.eq_ignore_ascii_case(wanted)))
    }
}

fn requested_scopes(scopes: &[String]) -> impl Iterator<Item = &str> {
    scopes
        .iter()
        .map(String::as_str)
        .filter(|scope| !OIDC_SCOPES.iter().any(|oidc| scope.eq_ignore_ascii_case(oidc)))
}

/// Whole token cache of one public client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedTokenCache {
    #[serde(rename = "Account", default)]
    pub accounts: BTreeMap<String, CachedAccount>,
    #[serde(rename = "IdToken", default)]
    pub id_tokens: BTreeMap<String, Value>,
    #[serde(rename = "AccessToken", default)]
    pub access_tokens: BTreeMap<String, CachedAccessToken>,
    #[serde(rename = "RefreshToken", default)]
    pub refresh_tokens: BTreeMap<String, CachedRefreshToken>,
    #[serde(rename = "AppMetadata", default)]
    pub app_metadata: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl SerializedTokenCache {
    /// Parse a stored blob. An empty blob is an empty cache.
    pub fn from_blob(blob: &CachedTokenBlob) -> Result<Self, serde_json::Error> {
        if blob.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(blob.as_bytes())
    }

    pub fn to_blob(&self) -> Result<CachedTokenBlob, serde_json::Error> {
        serde_json::to_vec_pretty(self).map(CachedTokenBlob::new)
    }

    /// Cached accounts in key order.
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.values().map(Account::from).collect()
    }

    #[cfg(test)]
    pub(crate) fn add_account(&mut self, account: CachedAccount) {
        self.accounts.insert(account.key(), account);
    }

    /// An access token covering these scopes that is still valid at `now`
    /// with the expiry margin applied.
    pub fn valid_access_token(
        &self,
        home_account_id: &str,
        client_id: &str,
        realm: &str,
        scopes: &[String],
        now: i64,
    ) -> Option<&str> {
        self.access_tokens
            .values()
            .filter(|token| token.belongs_to(home_account_id, client_id, realm))
            .filter(|token| token.covers(scopes))
            .find(|token| token.expires_on.saturating_sub(now) > ACCESS_TOKEN_EXPIRY_MARGIN_SECS)
            .map(|token| token.secret.as_str())
    }

    pub fn refresh_token(&self, home_account_id: &str, client_id: &str) -> Option<&str> {
        self.refresh_tokens
            .values()
            .find(|token| {
                token.home_account_id.eq_ignore_ascii_case(home_account_id)
                    && token.client_id.eq_ignore_ascii_case(client_id)
            })
            .map(|token| token.secret.as_str())
    }

    fn environment_of(&self, home_account_id: &str) -> String {
        self.accounts
            .values()
            .find(|account| account.home_account_id.eq_ignore_ascii_case(home_account_id))
            .map(|account| account.environment.clone())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    /// Store the outcome of a token request made at `now`.
    ///
    /// Access tokens of the same account, client and realm whose scopes
    /// overlap the new ones are replaced. A missing refresh token keeps the
    /// previous one.
    #[allow(clippy::too_many_arguments)]
    pub fn record_tokens(
        &mut self,
        account: &Account,
        client_id: &str,
        scopes: &[String],
        access_token: &str,
        refresh_token: Option<&str>,
        now: i64,
        expires_in: i64,
    ) {
        let environment = self.environment_of(&account.home_account_id);

        self.access_tokens.retain(|_, token| {
            !(token.belongs_to(&account.home_account_id, client_id, &account.tenant_id)
                && token.overlaps(scopes))
        });
        let token = CachedAccessToken {
            home_account_id: account.home_account_id.clone(),
            environment: environment.clone(),
            credential_type: CREDENTIAL_ACCESS_TOKEN.to_string(),
            client_id: client_id.to_string(),
            realm: account.tenant_id.clone(),
            target: scopes.join(" "),
            secret: access_token.to_string(),
            cached_at: now,
            expires_on: now.saturating_add(expires_in),
            extra: BTreeMap::from([(
                "token_type".to_string(),
                Value::String("Bearer".to_string()),
            )]),
        };
        self.access_tokens.insert(token.key(), token);

        if let Some(secret) = refresh_token {
            let previous = self
                .refresh_tokens
                .iter()
                .find(|(_, token)| {
                    token.home_account_id.eq_ignore_ascii_case(&account.home_account_id)
                        && token.client_id.eq_ignore_ascii_case(client_id)
                })
                .map(|(key, token)| (key.clone(), token.extra.clone()));
            let extra = match previous {
                Some((key, extra)) => {
                    self.refresh_tokens.remove(&key);
                    extra
                }
                None => BTreeMap::new(),
            };
            let token = CachedRefreshToken {
                home_account_id: account.home_account_id.clone(),
                environment,
                credential_type: CREDENTIAL_REFRESH_TOKEN.to_string(),
                client_id: client_id.to_string(),
                secret: secret.to_string(),
                extra,
            };
            self.refresh_tokens.insert(token.key(), token);
        }
    }
}
