//! Agent client port
//!
//! Defines how the application layer talks to the remote conversational
//! agent. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use relay_domain::{
    AccessToken, ConnectionSettings, ConversationEvent, ConversationId, ConversationStart, Query,
};
use thiserror::Error;

/// Errors that can occur while talking to the agent service
#[derive(Error, Debug)]
pub enum AgentClientError {
    #[error("Agent rejected the credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Agent returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Agent did not return a conversation id")]
    MissingConversationId,

    #[error("Invalid connection settings: {0}")]
    Configuration(String),
}

/// A client bound to one agent endpoint and one credential.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Open a new conversation.
    ///
    /// When `emit_start_event` is set the agent also sends its greeting and
    /// suggested actions, returned in [`ConversationStart::events`].
    async fn start_conversation(
        &self,
        emit_start_event: bool,
    ) -> Result<ConversationStart, AgentClientError>;

    /// Send one query on an existing conversation and return the reply
    /// events in delivery order.
    async fn ask_question(
        &self,
        conversation_id: &ConversationId,
        query: &Query,
    ) -> Result<Vec<ConversationEvent>, AgentClientError>;
}

/// Builds [`AgentClient`]s.
///
/// Construction is pure: the token is not validated here. An invalid or
/// missing token surfaces as [`AgentClientError::Unauthorized`] on the
/// first call.
pub trait AgentClientFactory: Send + Sync {
    fn create_client(
        &self,
        settings: &ConnectionSettings,
        token: AccessToken,
    ) -> Box<dyn AgentClient>;
}
