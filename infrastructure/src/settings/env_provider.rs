//! [`SettingsProvider`] reading the agent connection from environment
//! variables.
//!
//! Variable names match case-insensitively (`tenantId`, `TENANTID`, ...).
//! `CLIENTSECRET` is accepted as a fallback for `appClientSecret`.

use async_trait::async_trait;
use figment::{Figment, providers::Env};
use relay_application::{SettingsError, SettingsProvider};
use relay_domain::{AgentType, ConnectionSettings, PowerPlatformCloud};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Environment variables read for the connection, lower-cased.
pub const CONNECTION_ENV_KEYS: [&str; 10] = [
    "environmentid",
    "agentidentifier",
    "tenantid",
    "appclientid",
    "appclientsecret",
    "clientsecret",
    "cloud",
    "custompowerplatformcloud",
    "copilotagenttype",
    "directconnecturl",
];

#[derive(Debug, Default, Deserialize)]
struct RawConnectionEnv {
    #[serde(rename = "environmentid")]
    environment_id: Option<String>,
    #[serde(rename = "agentidentifier")]
    agent_identifier: Option<String>,
    #[serde(rename = "tenantid")]
    tenant_id: Option<String>,
    #[serde(rename = "appclientid")]
    app_client_id: Option<String>,
    #[serde(rename = "appclientsecret")]
    app_client_secret: Option<String>,
    #[serde(rename = "clientsecret")]
    client_secret: Option<String>,
    cloud: Option<String>,
    #[serde(rename = "custompowerplatformcloud")]
    custom_power_platform_cloud: Option<String>,
    #[serde(rename = "copilotagenttype")]
    agent_type: Option<String>,
    #[serde(rename = "directconnecturl")]
    direct_connect_url: Option<String>,
}

impl RawConnectionEnv {
    fn into_settings(self) -> Result<ConnectionSettings, SettingsError> {
        let cloud = match non_empty(self.cloud) {
            Some(value) => value.parse::<PowerPlatformCloud>()?,
            None => PowerPlatformCloud::default(),
        };
        let agent_type = match non_empty(self.agent_type) {
            Some(value) => value.parse::<AgentType>()?,
            None => AgentType::default(),
        };

        let mut builder = ConnectionSettings::builder()
            .app_client_secret(non_empty(self.app_client_secret).or(self.client_secret))
            .cloud(cloud)
            .custom_power_platform_cloud(self.custom_power_platform_cloud)
            .agent_type(agent_type)
            .direct_connect_url(self.direct_connect_url);
        if let Some(v) = self.tenant_id {
            builder = builder.tenant_id(v);
        }
        if let Some(v) = self.app_client_id {
            builder = builder.app_client_id(v);
        }
        if let Some(v) = self.environment_id {
            builder = builder.environment_id(v);
        }
        if let Some(v) = self.agent_identifier {
            builder = builder.agent_identifier(v);
        }

        Ok(builder.build()?)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads [`ConnectionSettings`] from the environment on every `load`.
pub struct EnvSettingsProvider {
    figment: Figment,
}

impl EnvSettingsProvider {
    pub fn new() -> Self {
        Self::from_figment(Figment::from(Env::raw().only(&CONNECTION_ENV_KEYS)))
    }

    /// Use an arbitrary figment whose keys are the lower-cased variable names.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }
}

impl Default for EnvSettingsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsProvider for EnvSettingsProvider {
    async fn load(&self) -> Result<ConnectionSettings, SettingsError> {
        let raw: RawConnectionEnv = self
            .figment
            .extract()
            .map_err(|e| SettingsError::Load(e.to_string()))?;
        let settings = raw.into_settings()?;
        debug!(
            environment_id = %settings.environment_id,
            agent_identifier = %settings.agent_identifier,
            cloud = %settings.cloud,
            "Loaded connection settings"
        );
        Ok(settings)
    }
}

/// Load `.env` from the working directory when present.
///
/// Variables already set in the process win over the file.
pub fn load_dotenv() {
    let path = Path::new(".env");
    if !path.exists() {
        trace!("No .env file in current directory");
        return;
    }
    match dotenv::from_path(path) {
        Ok(()) => debug!("Loaded environment variables from {}", path.display()),
        Err(e) => warn!("Could not load {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use relay_domain::DomainError;

    fn load_in(jail_env: &[(&str, &str)]) -> Result<ConnectionSettings, SettingsError> {
        let mut result = None;
        Jail::expect_with(|jail| {
            jail.clear_env();
            for (k, v) in jail_env {
                jail.set_env(k, v);
            }
            let provider = EnvSettingsProvider::new();
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            result = Some(runtime.block_on(provider.load()));
            Ok(())
        });
        result.unwrap()
    }

    #[test]
    fn test_loads_required_fields_case_insensitively() {
        let settings = load_in(&[
            ("environmentId", "Default-1234-ABCD"),
            ("AGENTIDENTIFIER", "cr123_agent"),
            ("tenantId", "tid"),
            ("appClientId", "client-123"),
        ])
        .unwrap();

        assert_eq!(settings.environment_id, "Default-1234-ABCD");
        assert_eq!(settings.agent_identifier, "cr123_agent");
        assert_eq!(settings.tenant_id, "tid");
        assert_eq!(settings.cloud, PowerPlatformCloud::Prod);
        assert_eq!(settings.agent_type, AgentType::Published);
        assert!(settings.app_client_secret.is_none());
    }

    #[test]
    fn test_clientsecret_is_fallback_for_app_client_secret() {
        let base = [
            ("environmentId", "env-id"),
            ("agentIdentifier", "cr123_agent"),
            ("tenantId", "tid"),
            ("appClientId", "client-123"),
        ];

        let mut vars = base.to_vec();
        vars.push(("CLIENTSECRET", "fallback"));
        assert_eq!(
            load_in(&vars).unwrap().app_client_secret.as_deref(),
            Some("fallback")
        );

        vars.push(("appClientSecret", "primary"));
        assert_eq!(
            load_in(&vars).unwrap().app_client_secret.as_deref(),
            Some("primary")
        );
    }

    #[test]
    fn test_cloud_and_agent_type_are_parsed() {
        let settings = load_in(&[
            ("environmentId", "env-id"),
            ("agentIdentifier", "msdyn_agent"),
            ("tenantId", "tid"),
            ("appClientId", "client-123"),
            ("cloud", "gov"),
            ("copilotAgentType", "prebuilt"),
        ])
        .unwrap();

        assert_eq!(settings.cloud, PowerPlatformCloud::Gov);
        assert_eq!(settings.agent_type, AgentType::Prebuilt);
    }

    #[test]
    fn test_missing_tenant_is_invalid() {
        let err = load_in(&[
            ("environmentId", "env-id"),
            ("agentIdentifier", "cr123_agent"),
            ("appClientId", "client-123"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            SettingsError::Invalid(DomainError::MissingSetting("tenantId"))
        ));
    }

    #[test]
    fn test_unknown_cloud_is_invalid() {
        let err = load_in(&[
            ("environmentId", "env-id"),
            ("agentIdentifier", "cr123_agent"),
            ("tenantId", "tid"),
            ("appClientId", "client-123"),
            ("cloud", "mars"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            SettingsError::Invalid(DomainError::InvalidCloud(_))
        ));
    }
}
