//! Presentation layer for copilot-relay
//!
//! This crate contains the CLI definition and the HTTP gateway.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, RouterOptions, router};
