//! Connection settings domain.
//!
//! - [`connection::ConnectionSettings`]: identifies one Copilot Studio agent
//! - [`cloud::PowerPlatformCloud`]: the Power Platform cloud hosting it
//! - [`agent_type::AgentType`]: published or prebuilt agent

pub mod agent_type;
pub mod cloud;
pub mod connection;
