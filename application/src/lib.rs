//! Application layer for copilot-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{RelayConfig, SettingsMode};
pub use ports::{
    agent_client::{AgentClient, AgentClientError, AgentClientFactory},
    conversation_logger::{ConversationLogger, NoConversationLogger, TurnRecord},
    identity_client::{IdentityClient, IdentityError},
    settings_provider::{
        CachingSettingsProvider, SettingsError, SettingsProvider, StaticSettingsProvider,
    },
    token_cache::{TokenCacheError, TokenCacheStore},
};
pub use use_cases::acquire_token::AcquireTokenUseCase;
pub use use_cases::conversation_relay::{ConversationRelay, RelayError};
pub use use_cases::run_turn::{
    Credential, RunTurnError, RunTurnInput, RunTurnOutput, RunTurnUseCase,
};
