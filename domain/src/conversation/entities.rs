//! Conversation entities

use super::event::ConversationEvent;
use serde::{Deserialize, Serialize};

/// Agent-issued conversation identifier.
///
/// Opaque to the relay: it is only echoed back to the agent on later turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns `None` for an empty id.
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of opening a conversation: the id plus the agent's greeting events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStart {
    pub conversation_id: ConversationId,
    pub events: Vec<ConversationEvent>,
}

impl ConversationStart {
    pub fn new(conversation_id: ConversationId, events: Vec<ConversationEvent>) -> Self {
        Self {
            conversation_id,
            events,
        }
    }
}
