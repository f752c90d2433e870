//! Power Platform cloud value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Power Platform cloud an agent is deployed to (Value Object)
///
/// Each cloud has its own API host suffix and splits the environment id
/// differently when building the environment host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerPlatformCloud {
    Local,
    Exp,
    Dev,
    Prv,
    Test,
    Preprod,
    FirstRelease,
    #[default]
    Prod,
    GovFr,
    Gov,
    High,
    DoD,
    Mooncake,
    Ex,
    Rx,
    /// Custom host, taken from `customPowerPlatformCloud`.
    Other,
}

impl PowerPlatformCloud {
    /// Get the string identifier for this cloud
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerPlatformCloud::Local => "Local",
            PowerPlatformCloud::Exp => "Exp",
            PowerPlatformCloud::Dev => "Dev",
            PowerPlatformCloud::Prv => "Prv",
            PowerPlatformCloud::Test => "Test",
            PowerPlatformCloud::Preprod => "Preprod",
            PowerPlatformCloud::FirstRelease => "FirstRelease",
            PowerPlatformCloud::Prod => "Prod",
            PowerPlatformCloud::GovFr => "GovFR",
            PowerPlatformCloud::Gov => "Gov",
            PowerPlatformCloud::High => "High",
            PowerPlatformCloud::DoD => "DoD",
            PowerPlatformCloud::Mooncake => "Mooncake",
            PowerPlatformCloud::Ex => "Ex",
            PowerPlatformCloud::Rx => "Rx",
            PowerPlatformCloud::Other => "Other",
        }
    }

    /// API host suffix, or `None` for [`PowerPlatformCloud::Other`].
    pub fn endpoint_suffix(&self) -> Option<&'static str> {
        Some(match self {
            PowerPlatformCloud::Local => "api.powerplatform.localhost",
            PowerPlatformCloud::Exp => "api.exp.powerplatform.com",
            PowerPlatformCloud::Dev => "api.dev.powerplatform.com",
            PowerPlatformCloud::Prv => "api.prv.powerplatform.com",
            PowerPlatformCloud::Test => "api.test.powerplatform.com",
            PowerPlatformCloud::Preprod => "api.preprod.powerplatform.com",
            PowerPlatformCloud::FirstRelease | PowerPlatformCloud::Prod => "api.powerplatform.com",
            PowerPlatformCloud::GovFr | PowerPlatformCloud::Gov => {
                "api.gov.powerplatform.microsoft.us"
            }
            PowerPlatformCloud::High => "api.high.powerplatform.microsoft.us",
            PowerPlatformCloud::DoD => "api.appsplatform.us",
            PowerPlatformCloud::Mooncake => "api.powerplatform.partner.microsoftonline.cn",
            PowerPlatformCloud::Ex => "api.powerplatform.eaglex.ic.gov",
            PowerPlatformCloud::Rx => "api.powerplatform.microsoft.scloud",
            PowerPlatformCloud::Other => return None,
        })
    }

    /// Number of trailing environment-id characters that form the second
    /// host label.
    pub fn id_suffix_length(&self) -> usize {
        match self {
            PowerPlatformCloud::FirstRelease | PowerPlatformCloud::Prod => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for PowerPlatformCloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PowerPlatformCloud {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "local" => PowerPlatformCloud::Local,
            "exp" => PowerPlatformCloud::Exp,
            "dev" => PowerPlatformCloud::Dev,
            "prv" => PowerPlatformCloud::Prv,
            "test" => PowerPlatformCloud::Test,
            "preprod" => PowerPlatformCloud::Preprod,
            "firstrelease" => PowerPlatformCloud::FirstRelease,
            "prod" => PowerPlatformCloud::Prod,
            "govfr" => PowerPlatformCloud::GovFr,
            "gov" => PowerPlatformCloud::Gov,
            "high" => PowerPlatformCloud::High,
            "dod" => PowerPlatformCloud::DoD,
            "mooncake" => PowerPlatformCloud::Mooncake,
            "ex" => PowerPlatformCloud::Ex,
            "rx" => PowerPlatformCloud::Rx,
            "other" => PowerPlatformCloud::Other,
            _ => return Err(DomainError::InvalidCloud(s.to_string())),
        })
    }
}

impl Serialize for PowerPlatformCloud {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PowerPlatformCloud {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
