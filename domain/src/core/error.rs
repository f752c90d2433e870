//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing connection setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid connection setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("Invalid cloud: {0}")]
    InvalidCloud(String),

    #[error("Invalid agent type: {0}")]
    InvalidAgentType(String),
}

impl DomainError {
    /// Check if this error was caused by a setting that was never provided
    pub fn is_missing_setting(&self) -> bool {
        matches!(self, DomainError::MissingSetting(_))
    }
}
