//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_client;
pub mod conversation_logger;
pub mod identity_client;
pub mod settings_provider;
pub mod token_cache;
