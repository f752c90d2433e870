//! Error types for the Copilot Studio adapter

use relay_application::AgentClientError;
use relay_domain::DomainError;
use thiserror::Error;

/// Result type alias for Copilot Studio operations
pub type Result<T> = std::result::Result<T, CopilotStudioError>;

/// Errors that can occur when talking to a Copilot Studio agent
#[derive(Error, Debug)]
pub enum CopilotStudioError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Agent rejected the request (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("Agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse activity: {error}\nRaw frame: {raw}")]
    InvalidFrame { error: String, raw: String },

    #[error("No conversation id in response headers or activities")]
    MissingConversationId,

    #[error("Invalid connection settings: {0}")]
    InvalidSettings(#[from] DomainError),
}

impl From<CopilotStudioError> for AgentClientError {
    fn from(e: CopilotStudioError) -> Self {
        match e {
            CopilotStudioError::Request(e) => AgentClientError::Connection(e.to_string()),
            CopilotStudioError::Unauthorized { status, body } => AgentClientError::Unauthorized {
                status,
                message: body,
            },
            CopilotStudioError::Status { status, body } => AgentClientError::Http { status, body },
            e @ (CopilotStudioError::Serialization(_) | CopilotStudioError::InvalidFrame { .. }) => {
                AgentClientError::Protocol(e.to_string())
            }
            CopilotStudioError::MissingConversationId => AgentClientError::MissingConversationId,
            CopilotStudioError::InvalidSettings(e) => AgentClientError::Configuration(e.to_string()),
        }
    }
}
