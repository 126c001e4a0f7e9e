//! Main CLI application structure

use clap::Parser;

use crate::cli::commands::{serve, validate, version, Commands};
use crate::cli::error::CliResult;

/// publiccode-gateway - validate publiccode.yml descriptors
#[derive(Debug, Parser)]
#[command(name = "publiccode-gateway")]
#[command(version = publiccode_gateway::VERSION)]
#[command(about = "Validation gateway for publiccode.yml descriptors")]
#[command(long_about = "Validates publiccode.yml descriptors over HTTP or from the command line.\n\n\
                         Configuration is read from publiccode-gateway.toml (or --config),\n\
                         then GATEWAY_HOST, GATEWAY_PORT and GATEWAY_REQUEST_TIMEOUT_SECS,\n\
                         then command-line flags.\n\n\
                         Examples:\n\
                           publiccode-gateway serve --port 5000\n\
                           publiccode-gateway validate publiccode.yml --disable-network\n\
                           publiccode-gateway validate --url https://github.com/italia/pcv/blob/master/publiccode.yml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> CliResult<()> {
        publiccode_gateway::init_logging();

        match self.command {
            Commands::Serve(args) => serve::execute_serve(args).await,
            Commands::Validate(args) => validate::execute_validate(args).await,
            Commands::Version(args) => version::execute_version(args).await,
        }
    }
}
