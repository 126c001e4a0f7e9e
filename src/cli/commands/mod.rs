//! Command modules for CLI

pub mod serve;
pub mod validate;
pub mod version;

use clap::Subcommand;

#[derive(Debug, Subcommand)]
#[command(about = "publiccode-gateway commands")]
pub enum Commands {
    /// Run the HTTP validation gateway
    #[command(about = "Serve the validation API over HTTP")]
    Serve(serve::ServeArgs),

    /// Validate a descriptor without starting the server
    #[command(about = "Validate a local file or a remote descriptor URL")]
    Validate(validate::ValidateArgs),

    /// Show version information
    #[command(about = "Show version information")]
    Version(version::VersionArgs),
}
