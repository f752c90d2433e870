//! Agent type value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How a Copilot Studio agent is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AgentType {
    /// A maker-published agent, addressed by its schema name.
    #[default]
    Published,
    /// A first-party prebuilt agent, addressed by its identifier.
    Prebuilt,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Published => "Published",
            AgentType::Prebuilt => "Prebuilt",
        }
    }

    /// Path segment between `/copilotstudio/` and `/authenticated/bots/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            AgentType::Published => "dataverse-backed",
            AgentType::Prebuilt => "prebuilt",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "published" => Ok(AgentType::Published),
            "prebuilt" => Ok(AgentType::Prebuilt),
            _ => Err(DomainError::InvalidAgentType(s.to_string())),
        }
    }
}

impl Serialize for AgentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
