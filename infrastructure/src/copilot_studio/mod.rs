//! Copilot Studio adapter
//!
//! Talks to a Copilot Studio agent over the Direct-to-Engine API: JSON
//! requests in, server-sent activity streams out.

pub mod client;
pub mod error;
pub mod factory;
pub mod protocol;
pub mod sse;

pub use client::CopilotStudioClient;
pub use error::CopilotStudioError;
pub use factory::CopilotStudioClientFactory;
