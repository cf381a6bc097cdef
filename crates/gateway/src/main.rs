mod cli;

use anyhow::Context;
use clap::Parser;
use gateway::app::{build_router, build_state};
use gateway::config::{load_gateway_config, GatewaySettings};
use gateway::logging::{init_tracing, LogOptions};
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(LogOptions {
        dir: &args.log_dir,
        file_prefix: &args.log_file_prefix,
        to_stderr: args.log_to_stderr,
    })?;

    info!(config = %args.config.display(), "gateway starting");
    let config = load_gateway_config(&args.config)?;
    let mut settings = GatewaySettings::resolve(config, |key| std::env::var(key).ok())
        .with_context(|| format!("failed to resolve settings from {}", args.config.display()))?;
    if let Some(addr) = args.listen_addr.as_deref() {
        settings.listen_addr = addr
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("invalid --listen-addr {addr}"))?;
    }

    let state = build_state(&settings)?;
    let app = build_router(state);

    let listener = TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, "gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    info!("gateway shutting down");
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
