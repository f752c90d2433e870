//! Direct-to-Engine wire types.
//!
//! Only the activity fields the relay reads are modelled; unknown fields are
//! ignored on input.
//!
//! # Protocol Overview
//!
//! - **Start**: `POST …/conversations` with [`StartConversationRequest`]
//! - **Ask**: `POST …/conversations/{id}` with [`ExecuteTurnRequest`]
//! - **Reply**: `text/event-stream` of `event: activity` frames whose data is
//!   one JSON [`Activity`]

use relay_domain::{ConversationEvent, ConversationId, Query};
use serde::{Deserialize, Serialize};

/// SSE event name carrying an activity.
pub const ACTIVITY_EVENT: &str = "activity";

/// Response header carrying the conversation id.
pub const CONVERSATION_ID_HEADER: &str = "x-ms-conversationid";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    pub emit_start_conversation_event: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteTurnRequest {
    pub activity: OutgoingActivity,
}

impl ExecuteTurnRequest {
    pub fn message(conversation_id: &ConversationId, query: &Query) -> Self {
        Self {
            activity: OutgoingActivity {
                kind: "message",
                text: query.content().to_string(),
                conversation: ConversationAccount {
                    id: conversation_id.as_str().to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingActivity {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
    pub conversation: ConversationAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
}

/// Inbound activity
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub conversation: Option<ConversationAccount>,
    #[serde(default)]
    pub suggested_actions: Option<SuggestedActions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestedActions {
    #[serde(default)]
    pub actions: Vec<CardAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardAction {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl CardAction {
    /// Display value; non-string values use their JSON text.
    fn display_value(&self) -> String {
        match &self.value {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

impl Activity {
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation
            .as_ref()
            .map(|c| c.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn into_event(self) -> ConversationEvent {
        match self.kind.as_str() {
            "message" => ConversationEvent::message_with_actions(
                self.text.unwrap_or_default(),
                self.suggested_actions
                    .unwrap_or_default()
                    .actions
                    .iter()
                    .map(CardAction::display_value),
            ),
            "endOfConversation" => {
                ConversationEvent::end_of_conversation(self.text.unwrap_or_default())
            }
            other => ConversationEvent::other(other),
        }
    }
}
