//! [`IdentityClient`] backed by the `oauth2` crate.
//!
//! Only the silent path is implemented: a cached access token is returned
//! while it is valid, otherwise the cached refresh token is redeemed at the
//! tenant's token endpoint. The cache is reloaded from the
//! [`TokenCacheStore`] before every access and written back only when the
//! access changed it.

use super::cache::SerializedTokenCache;
use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, RedirectUrl, RefreshToken, RequestTokenError, Scope,
    TokenResponse, TokenUrl,
};
use relay_application::{IdentityClient, IdentityError, TokenCacheStore};
use relay_domain::{Account, PublicClientConfig};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

pub struct OAuthPublicClient {
    store: Arc<dyn TokenCacheStore>,
    http: reqwest::Client,
    /// Serializes each load-then-maybe-save cycle within this process.
    cache_lock: Mutex<()>,
}

impl OAuthPublicClient {
    pub fn new(store: Arc<dyn TokenCacheStore>) -> Result<Self, reqwest::Error> {
        // Token endpoint redirects are never followed.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self::with_http_client(store, http))
    }

    pub fn with_http_client(store: Arc<dyn TokenCacheStore>, http: reqwest::Client) -> Self {
        Self {
            store,
            http,
            cache_lock: Mutex::new(()),
        }
    }

    /// Seed the in-memory cache from the store. Unreadable or unparsable
    /// state starts an empty cache; an absent one is also written out empty.
    async fn before_cache_access(&self) -> SerializedTokenCache {
        let blob = match self.store.load().await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                let cache = SerializedTokenCache::default();
                self.persist(&cache).await;
                return cache;
            }
            Err(e) => {
                warn!(error = %e, "Token cache load failed; starting with an empty cache");
                return SerializedTokenCache::default();
            }
        };

        match SerializedTokenCache::from_blob(&blob) {
            Ok(cache) => cache,
            Err(e) => {
                let e = IdentityError::CorruptCache(e.to_string());
                warn!(error = %e, "Ignoring stored token cache");
                SerializedTokenCache::default()
            }
        }
    }

    /// Persist the cache if this access changed it. Failures are logged and
    /// otherwise ignored.
    async fn after_cache_access(&self, before: &SerializedTokenCache, after: &SerializedTokenCache) {
        if before != after {
            self.persist(after).await;
        }
    }

    /// Write the cache to the store; failures are logged.
    async fn persist(&self, cache: &SerializedTokenCache) {
        let blob = match cache.to_blob() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Could not serialize token cache");
                return;
            }
        };

        if let Err(e) = self.store.save(&blob).await {
            warn!(error = %e, "Token cache save failed");
        }
    }

    async fn redeem_refresh_token(
        &self,
        config: &PublicClientConfig,
        refresh_token: &str,
    ) -> Result<oauth2::basic::BasicTokenResponse, IdentityError> {
        let token_url = TokenUrl::new(config.token_endpoint())
            .map_err(|e| IdentityError::InvalidConfig(format!("Invalid token endpoint: {e}")))?;

        let auth_url = AuthUrl::new(config.authorize_endpoint())
            .map_err(|e| IdentityError::InvalidConfig(format!("Invalid authorize endpoint: {e}")))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| IdentityError::InvalidConfig(format!("Invalid redirect URI: {e}")))?;

        let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);
        if let Some(secret) = &config.client_secret {
            client = client.set_client_secret(ClientSecret::new(secret.clone()));
        }

        let refresh_token = RefreshToken::new(refresh_token.to_string());
        let mut request = client.exchange_refresh_token(&refresh_token);
        for scope in &config.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        request
            .request_async(&self.http)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(response) => {
                    IdentityError::Rejected(response.to_string())
                }
                other => IdentityError::RequestFailed(other.to_string()),
            })
    }
}

#[async_trait]
impl IdentityClient for OAuthPublicClient {
    async fn accounts(&self, _config: &PublicClientConfig) -> Result<Vec<Account>, IdentityError> {
        let _guard = self.cache_lock.lock().await;
        let cache = self.before_cache_access().await;
        Ok(cache.accounts())
    }

    async fn acquire_token_silent(
        &self,
        config: &PublicClientConfig,
        account: &Account,
    ) -> Result<String, IdentityError> {
        let _guard = self.cache_lock.lock().await;
        let before = self.before_cache_access().await;
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = before.valid_access_token(
            &account.home_account_id,
            &config.client_id,
            &account.tenant_id,
            &config.scopes,
            now,
        ) {
            debug!(account = %account.username, "Using cached access token");
            return Ok(token.to_string());
        }

        let refresh_token = before
            .refresh_token(&account.home_account_id, &config.client_id)
            .ok_or_else(|| IdentityError::NoCachedToken(account.username.clone()))?
            .to_string();

        info!(account = %account.username, "Refreshing access token");
        let response = self.redeem_refresh_token(config, &refresh_token).await?;

        let access_token = response.access_token().secret().clone();
        let expires_in = response
            .expires_in()
            .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let mut after = before.clone();
        after.record_tokens(
            account,
            &config.client_id,
            &config.scopes,
            &access_token,
            response.refresh_token().map(|t| t.secret().as_str()),
            now,
            expires_in,
        );
        self.after_cache_access(&before, &after).await;

        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::cache::CachedAccount;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use relay_application::TokenCacheError;
    use relay_domain::CachedTokenBlob;
    use serde_json::{Value, json};
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Doubles ====================

    #[derive(Default)]
    struct MemoryStore {
        blob: StdMutex<Option<CachedTokenBlob>>,
        saves: AtomicUsize,
        fail_saves: bool,
    }

    impl MemoryStore {
        fn with_cache(cache: &SerializedTokenCache) -> Self {
            Self {
                blob: StdMutex::new(Some(cache.to_blob().unwrap())),
                ..Default::default()
            }
        }

        fn cache(&self) -> SerializedTokenCache {
            let blob = self.blob.lock().unwrap().clone().unwrap_or_default();
            SerializedTokenCache::from_blob(&blob).unwrap()
        }
    }

    #[async_trait]
    impl TokenCacheStore for MemoryStore {
        async fn load(&self) -> Result<Option<CachedTokenBlob>, TokenCacheError> {
            Ok(self.blob.lock().unwrap().clone())
        }

        async fn save(&self, blob: &CachedTokenBlob) -> Result<(), TokenCacheError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                return Err(TokenCacheError::Write {
                    path: "memory".to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            *self.blob.lock().unwrap() = Some(blob.clone());
            Ok(())
        }
    }

    async fn spawn_token_endpoint(status: StatusCode, body: Value) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/tid/oauth2/v2.0/token",
            post(move || {
                let counter = counter.clone();
                let body = body.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, Json(body))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/tid", addr), hits)
    }

    fn config(authority: &str) -> PublicClientConfig {
        PublicClientConfig {
            client_id: "client-123".to_string(),
            client_secret: None,
            authority: authority.to_string(),
            redirect_uri: "http://localhost".to_string(),
            scopes: vec!["https://api.powerplatform.com/.default".to_string()],
        }
    }

    fn account() -> Account {
        Account {
            home_account_id: "oid.tid".to_string(),
            username: "user@contoso.com".to_string(),
            tenant_id: "tid".to_string(),
        }
    }

    fn cache_with(access_expires_on: Option<i64>, refresh: Option<&str>) -> SerializedTokenCache {
        let mut cache = SerializedTokenCache::default();
        cache.add_account(CachedAccount::new(
            "oid.tid",
            "login.microsoftonline.com",
            "tid",
            "user@contoso.com",
        ));
        let config = config("unused");
        if let Some(expires_on) = access_expires_on {
            cache.record_tokens(
                &account(),
                &config.client_id,
                &config.scopes,
                "cached-at",
                refresh,
                0,
                expires_on,
            );
        } else if let Some(rt) = refresh {
            // Expired access token alongside the refresh token.
            cache.record_tokens(
                &account(),
                &config.client_id,
                &config.scopes,
                "stale-at",
                Some(rt),
                0,
                0,
            );
        }
        cache
    }

    fn client(store: Arc<MemoryStore>) -> OAuthPublicClient {
        OAuthPublicClient::new(store).unwrap()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_absent_cache_is_written_out_empty_once() {
        let store = Arc::new(MemoryStore::default());
        let client = client(store.clone());

        assert!(client.accounts(&config("unused")).await.unwrap().is_empty());
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(store.cache(), SerializedTokenCache::default());

        assert!(client.accounts(&config("unused")).await.unwrap().is_empty());
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_accounts_lists_cached_account() {
        let store = Arc::new(MemoryStore::with_cache(&cache_with(None, Some("rt"))));
        let accounts = client(store.clone()).accounts(&config("unused")).await.unwrap();

        assert_eq!(accounts, vec![account()]);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_acts_as_empty() {
        let store = Arc::new(MemoryStore {
            blob: StdMutex::new(Some(CachedTokenBlob::from("{oops".to_string()))),
            ..Default::default()
        });
        let accounts = client(store).accounts(&config("unused")).await.unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_valid_cached_access_token_skips_network_and_save() {
        let far_future = chrono::Utc::now().timestamp() + 3600;
        let store = Arc::new(MemoryStore::with_cache(&cache_with(Some(far_future), Some("rt"))));

        // Unroutable authority: any network call would fail the test.
        let token = client(store.clone())
            .acquire_token_silent(&config("http://127.0.0.1:1/tid"), &account())
            .await
            .unwrap();

        assert_eq!(token, "cached-at");
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_refresh_token_is_no_cached_token() {
        let store = Arc::new(MemoryStore::with_cache(&cache_with(None, None)));
        let err = client(store)
            .acquire_token_silent(&config("http://127.0.0.1:1/tid"), &account())
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NoCachedToken(_)));
    }

    #[tokio::test]
    async fn test_refresh_updates_and_saves_cache_once() {
        let (authority, hits) = spawn_token_endpoint(
            StatusCode::OK,
            json!({
                "access_token": "fresh-at",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "rt-2"
            }),
        )
        .await;
        let store = Arc::new(MemoryStore::with_cache(&cache_with(None, Some("rt-1"))));
        let client = client(store.clone());

        let first = client
            .acquire_token_silent(&config(&authority), &account())
            .await
            .unwrap();
        let second = client
            .acquire_token_silent(&config(&authority), &account())
            .await
            .unwrap();

        assert_eq!(first, "fresh-at");
        assert_eq!(second, "fresh-at");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(store.cache().refresh_token("oid.tid", "client-123"), Some("rt-2"));
    }

    #[tokio::test]
    async fn test_rejected_refresh_is_rejected_error() {
        let (authority, _) = spawn_token_endpoint(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invalid_grant", "error_description": "expired" }),
        )
        .await;
        let store = Arc::new(MemoryStore::with_cache(&cache_with(None, Some("rt-1"))));

        let err = client(store.clone())
            .acquire_token_silent(&config(&authority), &account())
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::Rejected(_)));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_save_still_returns_token() {
        let (authority, _) = spawn_token_endpoint(
            StatusCode::OK,
            json!({ "access_token": "fresh-at", "token_type": "Bearer" }),
        )
        .await;
        let store = Arc::new(MemoryStore {
            fail_saves: true,
            ..MemoryStore::with_cache(&cache_with(None, Some("rt-1")))
        });

        let token = client(store.clone())
            .acquire_token_silent(&config(&authority), &account())
            .await
            .unwrap();

        assert_eq!(token, "fresh-at");
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_redirect_uri_is_config_error() {
        let store = Arc::new(MemoryStore::with_cache(&cache_with(None, Some("rt-1"))));
        let config = PublicClientConfig {
            redirect_uri: "not a url".to_string(),
            ..config("http://127.0.0.1:1/tid")
        };

        let err = client(store)
            .acquire_token_silent(&config, &account())
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_huge_expires_in_does_not_panic() {
        let (authority, _) = spawn_token_endpoint(
            StatusCode::OK,
            json!({
                "access_token": "long-lived",
                "token_type": "Bearer",
                "expires_in": 9223372036854775807u64
            }),
        )
        .await;
        let store = Arc::new(MemoryStore::with_cache(&cache_with(None, Some("rt-1"))));
        let client = client(store.clone());

        let token = client
            .acquire_token_silent(&config(&authority), &account())
            .await
            .unwrap();
        assert_eq!(token, "long-lived");

        let cached = client
            .acquire_token_silent(&config(&authority), &account())
            .await
            .unwrap();
        assert_eq!(cached, "long-lived");
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_renews_from_msal_node_cache() {
        let (authority, hits) = spawn_token_endpoint(
            StatusCode::OK,
            json!({
                "access_token": "renewed-at",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "renewed-rt"
            }),
        )
        .await;
        let msal_blob = json!({
            "Account": {
                "oid.tid-login.microsoftonline.com-tid": {
                    "home_account_id": "oid.tid",
                    "environment": "login.microsoftonline.com",
                    "realm": "tid",
                    "local_account_id": "oid",
                    "username": "user@contoso.com",
                    "authority_type": "MSSTS"
                }
            },
            "IdToken": {},
            "AccessToken": {
                "oid.tid-login.microsoftonline.com-accesstoken-client-123-tid-https://api.powerplatform.com/.default": {
                    "home_account_id": "oid.tid",
                    "environment": "login.microsoftonline.com",
                    "credential_type": "AccessToken",
                    "client_id": "client-123",
                    "secret": "expired-at",
                    "realm": "tid",
                    "target": "https://api.powerplatform.com/.default",
                    "cached_at": "1700000000",
                    "expires_on": "1700003600",
                    "extended_expires_on": "1700007200",
                    "token_type": "Bearer"
                }
            },
            "RefreshToken": {
                "oid.tid-login.microsoftonline.com-refreshtoken-client-123--": {
                    "home_account_id": "oid.tid",
                    "environment": "login.microsoftonline.com",
                    "credential_type": "RefreshToken",
                    "client_id": "client-123",
                    "secret": "msal-rt"
                }
            },
            "AppMetadata": {}
        });
        let store = Arc::new(MemoryStore {
            blob: StdMutex::new(Some(CachedTokenBlob::from(msal_blob.to_string()))),
            ..Default::default()
        });
        let client = client(store.clone());

        let accounts = client.accounts(&config(&authority)).await.unwrap();
        assert_eq!(accounts, vec![account()]);

        let token = client
            .acquire_token_silent(&config(&authority), &accounts[0])
            .await
            .unwrap();

        assert_eq!(token, "renewed-at");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.cache().refresh_token("oid.tid", "client-123"),
            Some("renewed-rt")
        );
    }
}
