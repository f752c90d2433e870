//! Configuration file loading for copilot-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `RELAY_`-prefixed environment variables (`RELAY_SERVER__PORT=8080`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./relay.toml` or `./.relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/copilot-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_TOKEN_CACHE_FILE, FileConfig, FileLoggingConfig,
    FileRelayConfig, FileServerConfig, FileTokenCacheConfig,
};
pub use loader::ConfigLoader;
