//! Request and response bodies.

use relay_application::RunTurnOutput;
use serde::{Deserialize, Serialize};

/// Body of `/start` and `/invoke`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Body of `/continue`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Reply of `/start` and `/invoke`. `message` is `null` for an empty query.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub message: Option<String>,
    pub conversation_id: String,
}

impl From<RunTurnOutput> for TurnResponse {
    fn from(output: RunTurnOutput) -> Self {
        Self {
            message: output.message.map(|m| m.into_string()),
            conversation_id: output.conversation_id.as_str().to_string(),
        }
    }
}
