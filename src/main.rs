//! MechaSqueak console driver.
//!
//! Loads the configuration, registers the built-in commands and dispatches
//! chat lines typed on stdin, printing every reply. Useful for trying
//! commands without an IRC connection.

use mechasqueak::config::Config;
use mechasqueak::handlers::{Dispatcher, Registry, register_all};
use mechasqueak::message::Reply;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Outgoing reply queue depth.
const REPLY_QUEUE: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("MECHASQUEAK_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        nickname = %config.bot.nickname,
        locale = %config.bot.default_locale,
        drill_mode = config.dispatch.drill_mode,
        "Starting MechaSqueak"
    );

    mechasqueak::metrics::init();

    // Register commands. A conflicting name keeps its first registrant.
    let mut registry = Registry::new();
    if let Err(errors) = register_all(&mut registry) {
        for err in &errors {
            warn!(error = %err, code = err.error_code(), "Command registration problem");
        }
    }
    info!(commands = registry.len(), "Commands registered");
    let registry = Arc::new(registry);

    if let Some(port) = config.bot.metrics_port {
        tokio::spawn(mechasqueak::http::run_http_server(
            port,
            Arc::clone(&registry),
        ));
    }

    let dispatcher = Dispatcher::new(registry, &config);

    let (tx, mut rx) = mpsc::channel::<Reply>(REPLY_QUEUE);
    let printer = tokio::spawn(async move {
        while let Some(reply) = rx.recv().await {
            println!("{reply}");
        }
    });

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = mechasqueak::console::run(&dispatcher, &config.console, input, &tx) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    drop(tx);
    if let Err(e) = printer.await {
        warn!(error = %e, "Reply printer task failed");
    }

    Ok(())
}
