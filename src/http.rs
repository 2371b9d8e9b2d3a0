//! Status endpoint for the bot.
//!
//! Serves Prometheus metrics on `/metrics` and per-command usage on
//! `/commands`. Runs on its own tokio task and never touches dispatch.

use crate::handlers::Registry;
use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// One row of `/commands`.
#[derive(Debug, Serialize)]
struct CommandUsage {
    command: String,
    category: &'static str,
    uses: u64,
}

/// Handler for GET /metrics.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

/// Handler for GET /commands: every registered command, most used first.
async fn commands_handler(State(registry): State<Arc<Registry>>) -> Json<Vec<CommandUsage>> {
    let used: std::collections::HashMap<&str, u64> =
        registry.command_stats().into_iter().collect();
    let mut rows: Vec<CommandUsage> = registry
        .iter()
        .map(|declaration| CommandUsage {
            command: declaration.name().to_string(),
            category: declaration.category.as_str(),
            uses: used.get(declaration.name()).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.command.cmp(&b.command)));
    Json(rows)
}

pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/commands", get(commands_handler))
        .with_state(registry)
}

/// Serve on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>) -> std::io::Result<()> {
    axum::serve(listener, router(registry)).await
}

/// Bind `0.0.0.0:port` and serve. Errors are logged, not returned.
pub async fn run_http_server(port: u16, registry: Arc<Registry>) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind status endpoint");
            return;
        }
    };
    tracing::info!(%addr, "Status endpoint listening");

    if let Err(e) = serve(listener, registry).await {
        tracing::error!(error = %e, "Status endpoint failed");
    }
}
