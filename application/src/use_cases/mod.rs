//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod acquire_token;
pub mod conversation_relay;
pub mod run_turn;
