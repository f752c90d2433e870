//! Durable token cache storage.

mod file_store;

pub use file_store::FileTokenCacheStore;
