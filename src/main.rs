use std::path::PathBuf;

use clap::Parser;

use edge_gateway::config::load_config;
use edge_gateway::lifecycle::startup;
use edge_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Authenticating edge gateway for namespaced backend services", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!("edge-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        public_routes = config.auth.public_routes.len(),
        "Configuration loaded"
    );

    startup::run(config).await?;
    Ok(())
}
