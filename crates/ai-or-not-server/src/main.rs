//! ai-or-not Inference Server
//!
//! An HTTP server exposing the dual-ensemble AI text detector: one decision
//! endpoint (`POST /predict`) and a health probe. All model artifacts load
//! once at startup; a missing or corrupt artifact aborts the process before
//! the listener binds.

mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use ai_or_not::Detector;
use anyhow::Context;
use tracing::info;

use crate::config::ServerConfig;
use crate::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt::init();

    // Load configuration: from CLI arg, env var, or default
    let config = load_server_config()?;

    info!(
        listen_addr = %config.listen_addr,
        artifacts_dir = %config.artifacts_dir.display(),
        "Starting ai-or-not server"
    );

    // The registry is fatal-on-failure: the service must not accept traffic
    // with missing or mismatched artifacts.
    let detector =
        Detector::load(&config.artifacts_dir).context("Failed to load model artifacts")?;
    let state = Arc::new(AppState { detector });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(listen_addr = %config.listen_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load server configuration from a YAML file or fall back to defaults.
///
/// Checks (in order):
/// 1. First CLI argument as config path
/// 2. `AI_OR_NOT_CONFIG` environment variable
/// 3. Default configuration
fn load_server_config() -> anyhow::Result<ServerConfig> {
    let config_path: Option<PathBuf> = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AI_OR_NOT_CONFIG").ok())
        .map(PathBuf::from);

    match config_path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from file");
            config::load_config(&path)
        }
        None => {
            info!("No config file specified, using defaults");
            Ok(ServerConfig::default())
        }
    }
}
