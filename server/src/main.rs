use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shroud_server::config::ServerConfig;
use shroud_server::relay::Relay;
use shroud_server::roster::Roster;
use shroud_server::web::app_state::AppState;
use shroud_server::web::router::build_router;

/// Anonymous Slack slash-command relay.
#[derive(Parser, Debug)]
#[command(name = "shroud", version, about)]
struct Cli {
    /// Path to the TOML config file. Missing file means defaults.
    #[arg(long, default_value = "shroud.toml")]
    config: PathBuf,

    /// HTTP server port (overrides config and PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Roster JSON file (overrides config and ROSTER_PATH).
    #[arg(long)]
    roster: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(&cli.config).context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(roster) = cli.roster {
        config.roster.path = roster;
    }

    // The roster must load before we accept traffic; serving without it would
    // silently post everyone as Civilian.
    let roster = Roster::load(&config.roster.path).context("failed to load roster")?;

    let relay = Relay::from_config(&config, roster).context("failed to build webhook client")?;
    if !relay.has_token() {
        warn!("INCOMING_SLACK_TOKEN is not set; every request will be rejected");
    }
    if !relay.has_webhook() {
        warn!("INCOMING_SLACK_WEBHOOK is not set; messages cannot be delivered");
    }

    let app = build_router(Arc::new(AppState { relay }));

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Shroud relay listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shroud relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
