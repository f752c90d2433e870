//! Folding a turn's events into one reply.
//!
//! ```
//! use relay_domain::{ConversationEvent, aggregate};
//!
//! let events = vec![
//!     ConversationEvent::message_with_actions("hi there", ["Yes"]),
//!     ConversationEvent::other("typing"),
//!     ConversationEvent::end_of_conversation("bye"),
//! ];
//! assert_eq!(aggregate(&events).as_str(), "\nhi thereYes\nbye");
//! ```

use super::event::ConversationEvent;
use serde::{Deserialize, Serialize};

/// The single string reply built from a turn's event sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedResponse(String);

impl AggregatedResponse {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AggregatedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AggregatedResponse> for String {
    fn from(response: AggregatedResponse) -> Self {
        response.0
    }
}

/// Fold events into an [`AggregatedResponse`], in delivery order.
///
/// - `Message`: newline, text, then every suggested action value with no separator
/// - `EndOfConversation`: newline, text
/// - anything else is skipped
pub fn aggregate(events: &[ConversationEvent]) -> AggregatedResponse {
    let text = events.iter().fold(String::new(), |mut acc, event| {
        match event {
            ConversationEvent::Message {
                text,
                suggested_actions,
            } => {
                acc.push('\n');
                acc.push_str(text);
                for action in suggested_actions {
                    acc.push_str(&action.value);
                }
            }
            ConversationEvent::EndOfConversation { text } => {
                acc.push('\n');
                acc.push_str(text);
            }
            ConversationEvent::Other { .. } => {}
        }
        acc
    });
    AggregatedResponse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straightforward concatenation used as the reference for the fold.
    fn reference(events: &[ConversationEvent]) -> String {
        let mut out = String::new();
        for event in events {
            if let ConversationEvent::Message {
                text,
                suggested_actions,
            } = event
            {
                out += &format!("\n{}", text);
                out += &suggested_actions
                    .iter()
                    .map(|a| a.value.clone())
                    .collect::<String>();
            } else if let ConversationEvent::EndOfConversation { text } = event {
                out += &format!("\n{}", text);
            }
        }
        out
    }

    #[test]
    fn empty_sequence_yields_empty_response() {
        let response = aggregate(&[]);
        assert!(response.is_empty());
        assert_eq!(response.as_str(), "");
    }

    #[test]
    fn message_only() {
        let events = vec![
            ConversationEvent::message("first"),
            ConversationEvent::message("second"),
        ];
        assert_eq!(aggregate(&events).as_str(), "\nfirst\nsecond");
    }

    #[test]
    fn end_of_conversation_only() {
        let events = vec![ConversationEvent::end_of_conversation("goodbye")];
        assert_eq!(aggregate(&events).as_str(), "\ngoodbye");
    }

    #[test]
    fn suggested_actions_appended_without_separator() {
        let events = vec![ConversationEvent::message_with_actions(
            "hi there",
            ["Yes"],
        )];
        assert_eq!(aggregate(&events).as_str(), "\nhi thereYes");

        let events = vec![ConversationEvent::message_with_actions(
            "Choose:",
            ["A", "B", "C"],
        )];
        assert_eq!(aggregate(&events).as_str(), "\nChoose:ABC");
    }

    #[test]
    fn other_events_are_skipped() {
        let events = vec![
            ConversationEvent::other("typing"),
            ConversationEvent::message("visible"),
            ConversationEvent::other("event"),
        ];
        assert_eq!(aggregate(&events).as_str(), "\nvisible");
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let events = vec![
            ConversationEvent::message("same"),
            ConversationEvent::message("same"),
        ];
        assert_eq!(aggregate(&events).as_str(), "\nsame\nsame");
    }

    #[test]
    fn empty_message_text_still_adds_newline() {
        let events = vec![ConversationEvent::message_with_actions("", ["x"])];
        assert_eq!(aggregate(&events).as_str(), "\nx");
    }

    #[test]
    fn mixed_sequences_match_reference() {
        let sequences = vec![
            vec![
                ConversationEvent::message_with_actions("Hello", ["Opt1", "Opt2"]),
                ConversationEvent::other("typing"),
                ConversationEvent::message("How can I help?"),
                ConversationEvent::end_of_conversation("Bye"),
            ],
            vec![
                ConversationEvent::end_of_conversation("early"),
                ConversationEvent::message("late"),
            ],
            vec![
                ConversationEvent::other("trace"),
                ConversationEvent::other("typing"),
            ],
            vec![
                ConversationEvent::message_with_actions("multi\nline", ["🙂", "ü"]),
                ConversationEvent::message_with_actions("", Vec::<String>::new()),
            ],
        ];

        for events in sequences {
            assert_eq!(aggregate(&events).as_str(), reference(&events));
        }
    }
}
