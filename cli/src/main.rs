//! CLI entrypoint for Copilot Relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then serves the HTTP gateway until Ctrl-C.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use relay_application::{
    AcquireTokenUseCase, CachingSettingsProvider, ConversationRelay, RelayConfig,
    RunTurnUseCase, SettingsMode, SettingsProvider,
};
use relay_infrastructure::copilot_studio::factory::USER_AGENT;
use relay_infrastructure::{
    ConfigLoader, CopilotStudioClientFactory, EnvSettingsProvider, FileConfig,
    FileTokenCacheStore, JsonlConversationLogger, OAuthPublicClient, load_dotenv,
};
use relay_presentation::{AppState, Cli, RouterOptions, router};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    load_dotenv();

    let mut config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    info!("Starting Copilot Relay ({})", USER_AGENT);

    // === Dependency Injection ===
    let cache_path = config.token_cache.resolved_path();
    info!(path = %cache_path.display(), "Token cache");
    let token_store = Arc::new(FileTokenCacheStore::new(cache_path));
    let identity = Arc::new(
        OAuthPublicClient::new(token_store).context("Failed to build OAuth2 HTTP client")?,
    );

    let relay_config = RelayConfig::default().with_settings_mode(config.relay.settings_mode);
    let env_settings: Arc<dyn SettingsProvider> = Arc::new(EnvSettingsProvider::new());
    let settings: Arc<dyn SettingsProvider> = match relay_config.settings_mode {
        SettingsMode::PerRequest => env_settings,
        SettingsMode::Cached => Arc::new(CachingSettingsProvider::new(env_settings)),
    };

    // Log the effective connection once; secrets are never serialized.
    match settings.load().await {
        Ok(s) => info!(
            settings = %serde_json::to_string_pretty(&s).unwrap_or_default(),
            "Connection settings"
        ),
        Err(e) => warn!(error = %e, "Connection settings are incomplete"),
    }

    let mut relay = ConversationRelay::new();
    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!(path = %logger.path().display(), "Writing turn log");
                relay = relay.with_conversation_logger(Arc::new(logger));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Turn log disabled"),
        }
    }

    let clients = Arc::new(
        CopilotStudioClientFactory::new().context("Failed to build agent HTTP client")?,
    );
    let run_turn = RunTurnUseCase::new(
        settings,
        AcquireTokenUseCase::new(identity),
        clients,
        relay,
    );

    let options = RouterOptions {
        cors_allow_origin: config.server.cors_allow_origin.clone(),
        request_timeout: config.server.request_timeout_seconds.map(Duration::from_secs),
    };
    let app = router(AppState::new(run_turn), &options)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
