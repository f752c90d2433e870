//! Infrastructure layer for copilot-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod copilot_studio;
pub mod identity;
pub mod logging;
pub mod settings;
pub mod token_cache;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileRelayConfig,
    FileServerConfig, FileTokenCacheConfig,
};
pub use copilot_studio::{CopilotStudioClient, CopilotStudioClientFactory, CopilotStudioError};
pub use identity::{OAuthPublicClient, SerializedTokenCache};
pub use logging::JsonlConversationLogger;
pub use settings::{EnvSettingsProvider, load_dotenv};
pub use token_cache::FileTokenCacheStore;
