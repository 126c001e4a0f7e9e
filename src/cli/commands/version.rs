//! Version command implementation

use crate::cli::error::CliResult;
use clap::Args;

/// Display gateway version
#[derive(Debug, Args)]
pub struct VersionArgs {}

pub async fn execute_version(_args: VersionArgs) -> CliResult<()> {
    println!("publiccode-gateway {}", publiccode_gateway::VERSION);
    Ok(())
}
