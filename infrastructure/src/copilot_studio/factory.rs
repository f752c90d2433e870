//! [`AgentClientFactory`] producing [`CopilotStudioClient`]s.

use super::client::CopilotStudioClient;
use relay_application::{AgentClient, AgentClientFactory};
use relay_domain::{AccessToken, ConnectionSettings};
use tracing::debug;

/// `User-Agent` sent to the agent service.
pub const USER_AGENT: &str = concat!("copilot-relay/", env!("CARGO_PKG_VERSION"));

/// Shares one connection pool across every client it builds.
#[derive(Clone)]
pub struct CopilotStudioClientFactory {
    http: reqwest::Client,
}

impl CopilotStudioClientFactory {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl AgentClientFactory for CopilotStudioClientFactory {
    fn create_client(
        &self,
        settings: &ConnectionSettings,
        token: AccessToken,
    ) -> Box<dyn AgentClient> {
        debug!(
            user_agent = USER_AGENT,
            settings = %serde_json::to_string(settings).unwrap_or_default(),
            authenticated = token.is_authenticated(),
            "Creating Copilot Studio client"
        );
        Box::new(CopilotStudioClient::new(
            self.http.clone(),
            settings.clone(),
            token,
        ))
    }
}
