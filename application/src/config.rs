//! Application-level configuration.
//!
//! Controls how the relay use cases obtain connection settings.

use serde::{Deserialize, Serialize};

/// When connection settings are (re)loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsMode {
    /// Load settings afresh for every request.
    #[default]
    PerRequest,
    /// Load settings once and reuse them for the life of the process.
    Cached,
}

/// Relay behavior configuration.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub settings_mode: SettingsMode,
}

impl RelayConfig {
    pub fn with_settings_mode(mut self, mode: SettingsMode) -> Self {
        self.settings_mode = mode;
        self
    }
}
