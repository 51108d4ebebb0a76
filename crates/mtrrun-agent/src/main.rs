//! mtrrun agent
//!
//! - Poll loop: refresh the metric catalog every `poll_interval_secs`
//! - Report loop: push a snapshot to the collector every `report_interval_secs`
//! - Ctrl-C / SIGTERM: stop both loops, release pooled connections

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mtrrun_agent::{config, Agent, Poller};
use mtrrun_core::signal::shutdown_signal;

#[derive(Debug, Parser)]
#[command(name = "mtrrun-agent", about = "Samples runtime metrics and pushes them to the collector")]
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
        None => config::AgentConfig::default(),
    };

    let agent = match Agent::new(cfg.settings()) {
        Ok(agent) => Arc::new(agent),
        Err(e) => {
            tracing::error!(error = %e, "agent init failed");
            return ExitCode::FAILURE;
        }
    };

    let poller = Poller::register(&agent);
    let poll_task = tokio::spawn(poller.run(agent.settings().poll_interval, agent.shutdown_signal()));

    let run_task = {
        let agent = Arc::clone(&agent);
        tokio::spawn(async move { agent.run().await })
    };

    tracing::info!(host = %agent.settings().host, "agent started");

    shutdown_signal().await;
    agent.shutdown();

    let (poll_res, run_res) = tokio::join!(poll_task, run_task);
    if let Err(e) = poll_res.and(run_res) {
        tracing::error!(error = %e, "agent task failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("agent exited properly");
    ExitCode::SUCCESS
}
