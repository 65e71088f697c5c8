//! automaton - IRC automation bot.

use automaton::client::Bot;
use automaton::commands::default_registry;
use automaton::{Config, Database, Dispatcher};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        nick = %config.bot.nick,
        server = %config.server.address,
        network = %config.bot.network,
        "Starting automaton"
    );

    automaton::metrics::init();
    if let Some(port) = config.metrics.port {
        tokio::spawn(automaton::http::run_http_server(port));
    }

    let db = Database::new(&config.database.path).await?;

    let registry = Arc::new(default_registry(&db, &config.bot.network)?);
    info!(commands = ?registry.names(), "Commands registered");

    let dispatcher = Arc::new(Dispatcher::new(
        registry,
        db.clone(),
        config.bot.nick.clone(),
        config.bot.command_prefix.clone(),
        config.bot.operator.clone(),
    ));

    let bot = Bot::new(Arc::new(config), dispatcher);

    tokio::select! {
        _ = bot.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down");
        }
    }

    db.close().await;
    Ok(())
}
