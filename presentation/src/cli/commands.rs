//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for copilot-relay
#[derive(Parser, Debug)]
#[command(name = "copilot-relay")]
#[command(author, version, about = "HTTP relay for Copilot Studio agents")]
#[command(long_about = r#"
Copilot Relay exposes a Copilot Studio agent over a small JSON API.

Endpoints:
  POST /start     {query}                  -> {message, conversationId}
  POST /continue  {query, conversationId}  -> aggregated reply text
  POST /invoke    {query} + Authorization: Bearer <token>
  GET  /health

The agent connection is read from environment variables (or ./.env):
  environmentId, agentIdentifier, tenantId, appClientId, appClientSecret,
  cloud, customPowerPlatformCloud, copilotAgentType, directConnectUrl

Configuration files are loaded from (in priority order):
1. RELAY_* environment variables (RELAY_SERVER__PORT=8080)
2. --config <path>     Explicit config file
3. ./relay.toml        Project-level config
4. ~/.config/copilot-relay/config.toml   Global config

Example:
  copilot-relay --port 8080 -v
"#)]
pub struct Cli {
    /// Interface to bind (overrides server.host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
