//! Authentication domain.
//!
//! - [`token::AccessToken`]: result of a silent token acquisition
//! - [`token::BearerToken`]: a non-empty bearer credential
//! - [`header::parse_bearer_header`]: `Authorization: Bearer <token>` parsing
//! - [`cache_blob::CachedTokenBlob`]: opaque serialized token cache
//! - [`client_config::PublicClientConfig`]: OAuth2 public-client parameters

pub mod cache_blob;
pub mod client_config;
pub mod header;
pub mod token;
