//! reckond — reckoner daemon.
//!
//! Serves the calculator and journal services over gRPC. The calculator is
//! stateless; the journal runs over an in-process [`MemoryStore`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tonic::transport::Server;
use tracing::info;

use reckoner::server::config::Config;
use reckoner::server::proto::calculator_server::CalculatorServer;
use reckoner::server::proto::journal_server::JournalServer;
use reckoner::server::{CalculatorService, JournalService};
use reckoner::{MemoryStore, ReckonerError};

/// Reckoner daemon — calculator and journal gRPC services.
#[derive(Parser)]
#[command(name = "reckond")]
#[command(version = reckoner::PKG_VERSION)]
#[command(about = "Reckoner calculator service daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| ReckonerError::Configuration(format!("invalid address: {e}")))?;

    info!(version = reckoner::PKG_VERSION, %addr, "reckond starting");

    let calculator = CalculatorServer::new(CalculatorService::new());
    let journal = JournalServer::new(JournalService::new(Arc::new(MemoryStore::new())));

    // Deadlines live here, at the dispatcher; handlers only ever see an
    // expired one as a failed inbound stream.
    Server::builder()
        .timeout(Duration::from_secs(config.server.limits.request_timeout_secs))
        .concurrency_limit_per_connection(config.server.limits.max_concurrent_requests)
        .add_service(calculator)
        .add_service(journal)
        .serve(addr)
        .await?;

    Ok(())
}
