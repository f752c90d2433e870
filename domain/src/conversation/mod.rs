//! Conversation domain.
//!
//! - [`event::ConversationEvent`]: one unit of the agent's reply stream
//! - [`aggregate::aggregate`]: folds a turn's events into one reply string
//! - [`entities::ConversationId`]: agent-issued conversation identifier
//! - [`query::Query`]: a non-empty user query

pub mod aggregate;
pub mod entities;
pub mod event;
pub mod query;
