//! Connection settings for one Copilot Studio agent.

use super::agent_type::AgentType;
use super::cloud::PowerPlatformCloud;
use crate::conversation::entities::ConversationId;
use crate::core::error::DomainError;
use serde::Serialize;

/// API version of the Direct-to-Engine conversation endpoint.
pub const DIRECT_TO_ENGINE_API_VERSION: &str = "2022-03-01-preview";

/// Identifies the target agent and the app registration used to reach it.
///
/// Read-only once built. Serializing skips the client secret, so the value
/// can be logged as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    pub tenant_id: String,
    pub app_client_id: String,
    #[serde(skip_serializing)]
    pub app_client_secret: Option<String>,
    pub environment_id: String,
    pub agent_identifier: String,
    pub cloud: PowerPlatformCloud,
    pub custom_power_platform_cloud: Option<String>,
    pub agent_type: AgentType,
    pub direct_connect_url: Option<String>,
}

impl ConnectionSettings {
    pub fn builder() -> ConnectionSettingsBuilder {
        ConnectionSettingsBuilder::default()
    }

    /// Host of the Power Platform environment API.
    ///
    /// The environment id is lower-cased and stripped of dashes, then split
    /// into `<prefix>.<suffix>` where the suffix length depends on the cloud.
    pub fn environment_host(&self) -> Result<String, DomainError> {
        let normalized: String = self
            .environment_id
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '-')
            .collect();
        if !normalized.is_ascii() {
            return Err(non_ascii_environment_id());
        }
        let suffix_len = self.cloud.id_suffix_length();
        if normalized.len() <= suffix_len {
            return Err(DomainError::InvalidSetting {
                name: "environmentId",
                reason: format!("must be longer than {} characters", suffix_len),
            });
        }
        let (prefix, suffix) = normalized.split_at(normalized.len() - suffix_len);

        let endpoint_suffix = match self.cloud.endpoint_suffix() {
            Some(s) => s.to_string(),
            None => self
                .custom_power_platform_cloud
                .clone()
                .filter(|host| !host.is_empty())
                .ok_or(DomainError::MissingSetting("customPowerPlatformCloud"))?,
        };

        Ok(format!(
            "{}.{}.environment.{}",
            prefix, suffix, endpoint_suffix
        ))
    }

    /// URL of the conversations endpoint, or of one conversation when an id
    /// is given.
    pub fn conversation_url(
        &self,
        conversation_id: Option<&ConversationId>,
    ) -> Result<String, DomainError> {
        if let Some(base) = self.direct_connect_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(direct_connect_conversation_url(base, conversation_id));
        }

        if self.environment_id.is_empty() {
            return Err(DomainError::MissingSetting("environmentId"));
        }
        if self.agent_identifier.is_empty() {
            return Err(DomainError::MissingSetting("agentIdentifier"));
        }

        let host = self.environment_host()?;
        let mut url = format!(
            "https://{}/copilotstudio/{}/authenticated/bots/{}/conversations",
            host,
            self.agent_type.path_segment(),
            self.agent_identifier
        );
        if let Some(id) = conversation_id {
            url.push('/');
            url.push_str(id.as_str());
        }
        url.push_str("?api-version=");
        url.push_str(DIRECT_TO_ENGINE_API_VERSION);
        Ok(url)
    }
}

/// Rebase a direct-connect URL onto `/conversations[/id]`, keeping its query
/// and adding `api-version` when absent.
fn direct_connect_conversation_url(base: &str, conversation_id: Option<&ConversationId>) -> String {
    let (path, query) = match base.split_once('?') {
        Some((path, query)) => (path, query),
        None => (base, ""),
    };
    let path = path.trim_end_matches('/');
    let path = match path.find("/conversations") {
        Some(idx) => &path[..idx],
        None => path,
    };

    let mut url = format!("{}/conversations", path);
    if let Some(id) = conversation_id {
        url.push('/');
        url.push_str(id.as_str());
    }

    let has_version = query
        .split('&')
        .any(|pair| pair.starts_with("api-version="));
    let query = if has_version {
        query.to_string()
    } else if query.is_empty() {
        format!("api-version={}", DIRECT_TO_ENGINE_API_VERSION)
    } else {
        format!("{}&api-version={}", query, DIRECT_TO_ENGINE_API_VERSION)
    };
    url.push('?');
    url.push_str(&query);
    url
}

/// Builder for [`ConnectionSettings`].
#[derive(Debug, Default)]
pub struct ConnectionSettingsBuilder {
    tenant_id: Option<String>,
    app_client_id: Option<String>,
    app_client_secret: Option<String>,
    environment_id: Option<String>,
    agent_identifier: Option<String>,
    cloud: PowerPlatformCloud,
    custom_power_platform_cloud: Option<String>,
    agent_type: AgentType,
    direct_connect_url: Option<String>,
}

impl ConnectionSettingsBuilder {
    pub fn tenant_id(mut self, value: impl Into<String>) -> Self {
        self.tenant_id = Some(value.into());
        self
    }

    pub fn app_client_id(mut self, value: impl Into<String>) -> Self {
        self.app_client_id = Some(value.into());
        self
    }

    pub fn app_client_secret(mut self, value: Option<String>) -> Self {
        self.app_client_secret = value.filter(|s| !s.is_empty());
        self
    }

    pub fn environment_id(mut self, value: impl Into<String>) -> Self {
        self.environment_id = Some(value.into());
        self
    }

    pub fn agent_identifier(mut self, value: impl Into<String>) -> Self {
        self.agent_identifier = Some(value.into());
        self
    }

    pub fn cloud(mut self, cloud: PowerPlatformCloud) -> Self {
        self.cloud = cloud;
        self
    }

    pub fn custom_power_platform_cloud(mut self, value: Option<String>) -> Self {
        self.custom_power_platform_cloud = value.filter(|s| !s.is_empty());
        self
    }

    pub fn agent_type(mut self, agent_type: AgentType) -> Self {
        self.agent_type = agent_type;
        self
    }

    pub fn direct_connect_url(mut self, value: Option<String>) -> Self {
        self.direct_connect_url = value.filter(|s| !s.is_empty());
        self
    }

    /// Build the settings.
    ///
    /// Tenant and client id are always required. Environment id and agent
    /// identifier are required unless a direct-connect URL is given.
    pub fn build(self) -> Result<ConnectionSettings, DomainError> {
        let tenant_id = required(self.tenant_id, "tenantId")?;
        let app_client_id = required(self.app_client_id, "appClientId")?;

        let (environment_id, agent_identifier) = if self.direct_connect_url.is_some() {
            (
                self.environment_id.unwrap_or_default(),
                self.agent_identifier.unwrap_or_default(),
            )
        } else {
            (
                required(self.environment_id, "environmentId")?,
                required(self.agent_identifier, "agentIdentifier")?,
            )
        };

        if !environment_id.is_ascii() {
            return Err(non_ascii_environment_id());
        }

        if self.cloud == PowerPlatformCloud::Other && self.custom_power_platform_cloud.is_none() {
            return Err(DomainError::MissingSetting("customPowerPlatformCloud"));
        }

        Ok(ConnectionSettings {
            tenant_id,
            app_client_id,
            app_client_secret: self.app_client_secret,
            environment_id,
            agent_identifier,
            cloud: self.cloud,
            custom_power_platform_cloud: self.custom_power_platform_cloud,
            agent_type: self.agent_type,
            direct_connect_url: self.direct_connect_url,
        })
    }
}

fn non_ascii_environment_id() -> DomainError {
    DomainError::InvalidSetting {
        name: "environmentId",
        reason: "must be ASCII".to_string(),
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, DomainError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(DomainError::MissingSetting(name))
}
