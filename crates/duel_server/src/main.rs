//! Word-duel coordinator - main entry point.

use anyhow::Result;
use clap::Parser;
use duel_core::Lexicon;
use duel_server::config::{self, Args};
use duel_server::{logging, shutdown, DuelServer, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config(&args).await?;
    logging::setup_logging(&args, &config.logging)?;

    info!("Starting word-duel session coordinator");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let lexicon = load_lexicon(&args, &config)?;
    info!("Lexicon loaded: {} words", lexicon.len());

    let server_config = create_server_config(&config, &args)?;
    log_server_configuration(&server_config);

    let server = DuelServer::new(server_config, lexicon);
    let shutdown_receiver = shutdown::setup_shutdown_handler().await;

    tokio::select! {
        result = server.start() => {
            match result {
                Ok(()) => info!("Server stopped normally"),
                Err(e) => {
                    error!("Server error: {e}");
                    return Err(e.into());
                }
            }
        }
        _ = shutdown_receiver => {
            info!("Shutdown signal received");
            if let Err(e) = server.shutdown().await {
                error!("Error during shutdown: {e}");
            }
        }
    }

    Ok(())
}

/// Builds the lexicon from the CLI override, the configured file, or
/// the embedded word list, in that order.
fn load_lexicon(args: &Args, config: &config::Config) -> Result<Arc<Lexicon>> {
    if let Some(path) = &args.words {
        return Ok(Arc::new(Lexicon::from_file(path)?));
    }
    if let Some(path) = &config.lexicon.words_file {
        return Ok(Arc::new(Lexicon::from_file(path)?));
    }
    Ok(Arc::new(Lexicon::embedded().clone()))
}

/// Merges configuration-file settings with CLI overrides.
fn create_server_config(config: &config::Config, args: &Args) -> Result<ServerConfig> {
    let bind_address = args
        .listen
        .as_deref()
        .unwrap_or(&config.server.listen_addr)
        .parse()
        .map_err(|e| anyhow::anyhow!("Failed to parse listen address: {e}"))?;

    Ok(ServerConfig {
        bind_address,
        session_grace: Duration::from_secs(config.server.session_grace_secs),
    })
}

fn log_server_configuration(config: &ServerConfig) {
    info!("Server configuration:");
    info!("  Listen address: {}", config.bind_address);
    info!("  Session grace: {:?}", config.session_grace);
}
