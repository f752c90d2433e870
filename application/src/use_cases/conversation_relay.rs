//! Conversation relay use case.
//!
//! Starts conversations with the remote agent and forwards single queries,
//! folding each turn's reply events into one [`AggregatedResponse`].
//!
//! The relay keeps no state between calls: the conversation id returned by
//! [`ConversationRelay::start_conversation`] must be passed back by the
//! caller on every later turn. No retries are performed.

use crate::ports::agent_client::{AgentClient, AgentClientError};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger, TurnRecord};
use relay_domain::{AggregatedResponse, ConversationId, ConversationStart, Query, aggregate};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while relaying a conversation
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to start conversation: {0}")]
    Start(#[source] AgentClientError),

    #[error("Failed to ask question on conversation {conversation_id}: {source}")]
    Ask {
        conversation_id: ConversationId,
        #[source]
        source: AgentClientError,
    },
}

impl RelayError {
    /// The underlying agent client error.
    pub fn client_error(&self) -> &AgentClientError {
        match self {
            RelayError::Start(e) => e,
            RelayError::Ask { source, .. } => source,
        }
    }
}

/// Relays single-query turns to an [`AgentClient`].
#[derive(Clone)]
pub struct ConversationRelay {
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Default for ConversationRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationRelay {
    pub fn new() -> Self {
        Self {
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Open a new conversation, asking the agent to emit its start event.
    pub async fn start_conversation(
        &self,
        client: &dyn AgentClient,
    ) -> Result<ConversationStart, RelayError> {
        let start = client
            .start_conversation(true)
            .await
            .map_err(RelayError::Start)?;

        info!(
            conversation_id = %start.conversation_id,
            greeting_events = start.events.len(),
            "Conversation started"
        );

        self.conversation_logger.log(TurnRecord::ConversationStarted {
            conversation_id: start.conversation_id.clone(),
            greeting: aggregate(&start.events),
        });

        Ok(start)
    }

    /// Send `query` on `conversation_id` and aggregate the reply.
    ///
    /// An absent or empty query is a no-op: it returns `Ok(None)` without
    /// contacting the agent.
    pub async fn ask_question(
        &self,
        client: &dyn AgentClient,
        conversation_id: &ConversationId,
        query: Option<&str>,
    ) -> Result<Option<AggregatedResponse>, RelayError> {
        let Some(query) = Query::from_optional(query) else {
            debug!(conversation_id = %conversation_id, "Empty query; nothing to relay");
            return Ok(None);
        };

        let events = client
            .ask_question(conversation_id, &query)
            .await
            .map_err(|source| RelayError::Ask {
                conversation_id: conversation_id.clone(),
                source,
            })?;

        let response = aggregate(&events);

        debug!(
            conversation_id = %conversation_id,
            events = events.len(),
            bytes = response.as_str().len(),
            "Reply aggregated"
        );

        self.conversation_logger.log(TurnRecord::TurnCompleted {
            conversation_id: conversation_id.clone(),
            query,
            event_kinds: events.iter().map(|e| e.kind().to_string()).collect(),
            response: response.clone(),
        });

        Ok(Some(response))
    }
}
