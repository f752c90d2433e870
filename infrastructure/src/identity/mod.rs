//! OAuth2 public client with a persisted token cache.

mod cache;
mod public_client;

pub use cache::{
    ACCESS_TOKEN_EXPIRY_MARGIN_SECS, CachedAccessToken, CachedAccount, CachedRefreshToken,
    SerializedTokenCache,
};
pub use public_client::OAuthPublicClient;
