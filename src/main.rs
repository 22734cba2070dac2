//! JSON transform demo server.
//!
//! Serves `POST /echo` and `GET /health` behind the JSON transform
//! middleware.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use json_transform::config::{load_config, AppConfig};
use json_transform::observability::logging::init_logging;
use json_transform::HttpServer;

#[derive(Parser)]
#[command(name = "json-transform")]
#[command(about = "HTTP server decoding JSON requests and encoding JSON responses", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Disable decoding of JSON request bodies.
    #[arg(long)]
    no_transform_request: bool,

    /// Disable encoding of JSON response bodies.
    #[arg(long)]
    no_transform_response: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if cli.no_transform_request {
        config.transform.transform_request = false;
    }
    if cli.no_transform_response {
        config.transform.transform_response = false;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        transform_request = config.transform.transform_request,
        transform_response = config.transform.transform_response,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
