//! Domain layer for copilot-relay
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A conversation with a remote Copilot Studio agent is identified by an
//! agent-issued [`ConversationId`]. Each turn produces an ordered sequence of
//! [`ConversationEvent`]s which [`aggregate`] folds into a single
//! [`AggregatedResponse`].
//!
//! ## Auth
//!
//! - [`AccessToken`]: either a usable [`BearerToken`] or `Unauthenticated`
//! - [`CachedTokenBlob`]: the identity client's opaque serialized cache
//!
//! ## Settings
//!
//! [`ConnectionSettings`] identify the target agent (tenant, app, environment,
//! cloud) and know how to build the agent's conversation endpoint.

pub mod auth;
pub mod conversation;
pub mod core;
pub mod settings;

// Re-export commonly used types
pub use auth::{
    cache_blob::CachedTokenBlob,
    client_config::{Account, PublicClientConfig},
    header::{AuthorizationHeaderError, parse_bearer_header},
    token::{AccessToken, BearerToken},
};
pub use conversation::{
    aggregate::{AggregatedResponse, aggregate},
    entities::{ConversationId, ConversationStart},
    event::{ConversationEvent, SuggestedAction},
    query::Query,
};
pub use core::error::DomainError;
pub use settings::{
    agent_type::AgentType,
    cloud::PowerPlatformCloud,
    connection::{ConnectionSettings, DIRECT_TO_ENGINE_API_VERSION},
};
