//! Conversation events emitted by the remote agent.
//!
//! The agent replies to every turn with a stream of activities. Only two
//! kinds carry text the relay cares about; everything else (typing
//! indicators, traces, events) is kept as [`ConversationEvent::Other`] so
//! the sequence stays complete for logging.

use serde::{Deserialize, Serialize};

/// A follow-up option proposed by the agent alongside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Value sent back to the agent when the action is picked.
    pub value: String,
}

impl SuggestedAction {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// One event in an agent reply stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A text message, optionally carrying suggested actions.
    Message {
        text: String,
        suggested_actions: Vec<SuggestedAction>,
    },
    /// The agent closed the conversation; `text` is its trailing remark.
    EndOfConversation { text: String },
    /// Any other activity kind (typing, event, trace, ...).
    Other { kind: String },
}

impl ConversationEvent {
    /// Create a message event without suggested actions.
    pub fn message(text: impl Into<String>) -> Self {
        ConversationEvent::Message {
            text: text.into(),
            suggested_actions: Vec::new(),
        }
    }

    /// Create a message event with suggested action values.
    pub fn message_with_actions<I, S>(text: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConversationEvent::Message {
            text: text.into(),
            suggested_actions: actions.into_iter().map(SuggestedAction::new).collect(),
        }
    }

    pub fn end_of_conversation(text: impl Into<String>) -> Self {
        ConversationEvent::EndOfConversation { text: text.into() }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        ConversationEvent::Other { kind: kind.into() }
    }

    /// Returns the event's text if it is a `Message` or `EndOfConversation`.
    pub fn text(&self) -> Option<&str> {
        match self {
            ConversationEvent::Message { text, .. }
            | ConversationEvent::EndOfConversation { text } => Some(text),
            ConversationEvent::Other { .. } => None,
        }
    }

    /// Short kind label, used in logs.
    pub fn kind(&self) -> &str {
        match self {
            ConversationEvent::Message { .. } => "message",
            ConversationEvent::EndOfConversation { .. } => "endOfConversation",
            ConversationEvent::Other { kind } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_is_exposed() {
        let event = ConversationEvent::message("hello");
        assert_eq!(event.text(), Some("hello"));
        assert_eq!(event.kind(), "message");
    }

    #[test]
    fn other_has_no_text() {
        let event = ConversationEvent::other("typing");
        assert_eq!(event.text(), None);
        assert_eq!(event.kind(), "typing");
    }

    #[test]
    fn message_with_actions_keeps_order() {
        let event = ConversationEvent::message_with_actions("pick", ["a", "b", "c"]);
        match event {
            ConversationEvent::Message {
                suggested_actions, ..
            } => {
                let values: Vec<_> = suggested_actions.iter().map(|a| a.value.as_str()).collect();
                assert_eq!(values, vec!["a", "b", "c"]);
            }
            _ => panic!("Expected Message"),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(ConversationEvent::end_of_conversation("bye")).unwrap();
        assert_eq!(json["type"], "end_of_conversation");
        assert_eq!(json["text"], "bye");
    }
}
