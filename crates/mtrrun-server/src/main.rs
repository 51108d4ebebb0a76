//! mtrrun collector server
//!
//! - `POST /update/{type}/{name}/{value}`, `GET /value/{type}/{name}`, `GET /`
//! - In-memory state, lost on restart
//! - Graceful shutdown on Ctrl-C / SIGTERM

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mtrrun_core::signal::shutdown_signal;
use mtrrun_server::{app_state, config, router};

#[derive(Debug, Parser)]
#[command(name = "mtrrun-server", about = "Stores the latest value per metric and serves it back")]
struct Cli {
    /// YAML config path. Defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let cfg = match cli.config.as_deref() {
        Some(path) => match config::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(%path, error = %e, "config load failed");
                return ExitCode::FAILURE;
            }
        },
        None => config::ServerConfig::default(),
    };

    let listen = match cfg.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "invalid listen address");
            return ExitCode::FAILURE;
        }
    };

    let app = router::build_router(app_state::AppState::in_memory());

    let listener = match tokio::net::TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%listen, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%listen, "mtrrun-server started");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("server exited properly");
    ExitCode::SUCCESS
}
