//! BridgeHub daemon
//!
//! Starts the adapter health-monitoring engine and the dashboard HTTP
//! surface over in-memory collaborator implementations.

use bridgehub::config::Config;
use bridgehub::monitoring::{Collaborators, MonitoringSystem};
use bridgehub::server;
use bridgehub::storage::memory::{
    InMemoryAdapterStore, InMemoryHealthRecordSink, InMemoryMetricsRegistry, InMemoryPoolManager,
    StaticSlaReports,
};
use bridgehub::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "bridgehub", version, about = "Integration-platform adapter health monitor")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BRIDGEHUB_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Arc::new(Config::load(cli.config.as_deref())?);

    let store = Arc::new(InMemoryAdapterStore::new());
    for adapter in &config.adapters {
        store.upsert(adapter.clone());
    }
    info!(adapters = config.adapters.len(), "loaded adapter configuration");

    let system = Arc::new(MonitoringSystem::new(
        config.monitoring.clone(),
        Collaborators {
            store,
            sink: Arc::new(InMemoryHealthRecordSink::new()),
            metrics: Arc::new(InMemoryMetricsRegistry::new()),
            sla: Arc::new(StaticSlaReports::default()),
            pools: Arc::new(InMemoryPoolManager::new()),
        },
    ));
    system.start();

    server::run(config, system).await
}
