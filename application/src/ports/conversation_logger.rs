//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording relay turns
//! (conversation starts, queries, aggregated replies) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! conversation transcript in a machine-readable format (JSONL).

use relay_domain::{AggregatedResponse, ConversationId, Query};
use serde::Serialize;

/// One relay step, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnRecord {
    ConversationStarted {
        conversation_id: ConversationId,
        greeting: AggregatedResponse,
    },
    TurnCompleted {
        conversation_id: ConversationId,
        query: Query,
        /// Kinds of the reply events, in arrival order.
        event_kinds: Vec<String>,
        response: AggregatedResponse,
    },
}

impl TurnRecord {
    pub fn conversation_id(&self) -> &ConversationId {
        match self {
            TurnRecord::ConversationStarted {
                conversation_id, ..
            }
            | TurnRecord::TurnCompleted {
                conversation_id, ..
            } => conversation_id,
        }
    }
}

/// Port for logging relay turns to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures are
/// ignored so they never break a request.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, record: TurnRecord);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _record: TurnRecord) {}
}
