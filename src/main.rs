use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use analytics_gateway::analytics::{PgQueryService, QueryService};
use analytics_gateway::config::load_config;
use analytics_gateway::lifecycle::Shutdown;
use analytics_gateway::observability::{logging, metrics};
use analytics_gateway::security::clock::SystemClock;
use analytics_gateway::store::StorePool;
use analytics_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "analytics-gateway")]
#[command(about = "Rate-limited read-only analytics API over PostgreSQL")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Fail fast: a config the validator rejects never starts the server.
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_exporter(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            );
        }
    }

    let pool = StorePool::new(&config.database)?;
    let queries: Arc<dyn QueryService> = Arc::new(PgQueryService::new(pool));

    let server = HttpServer::new(&config, queries, Arc::new(SystemClock));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_ctrl_c();

    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
