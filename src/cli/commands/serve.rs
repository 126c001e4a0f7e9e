//! Serve command implementation

use crate::cli::config::create_gateway_config;
use crate::cli::error::{CliError, CliResult};
use clap::Args;
use publiccode_gateway::http::server::GatewayServer;
use publiccode_gateway::GatewayService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Serve the validation API via HTTP
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Host to bind the server to
    #[arg(long, help = "Host to bind the server to [default: 0.0.0.0]")]
    pub host: Option<String>,

    /// Port to bind the server to
    #[arg(long, help = "Port to bind the server to [default: 5000]")]
    pub port: Option<u16>,

    /// Configuration file
    #[arg(long, help = "Path to a publiccode-gateway.toml file")]
    pub config: Option<PathBuf>,
}

pub async fn execute_serve(args: ServeArgs) -> CliResult<()> {
    let config = create_gateway_config(args.config.as_deref(), args.host, args.port)?;

    info!(
        "Starting publiccode-gateway HTTP server on {}:{}",
        config.host, config.port
    );
    println!("publiccode-gateway {} starting...", publiccode_gateway::VERSION);
    println!("  Listening on: http://{}:{}", config.host, config.port);

    let host = config.host.clone();
    let port = config.port;
    let service = Arc::new(GatewayService::new(config)?);
    let server = GatewayServer::new(service, &host, port)?;

    // Blocks until shutdown
    server
        .serve()
        .await
        .map_err(|e| CliError::Server(format!("{:#}", e)))
}
