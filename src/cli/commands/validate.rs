//! Validate command implementation

use crate::cli::config::create_gateway_config;
use crate::cli::error::{CliError, CliResult};
use clap::{Args, ValueEnum};
use publiccode_gateway::core::format::{self, serialize_as};
use publiccode_gateway::{GatewayService, RequestContext, ResponseEnvelope, WireFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Output format for the validate command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for WireFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Yaml => WireFormat::Yaml,
            OutputFormat::Json => WireFormat::Json,
        }
    }
}

/// Validate a descriptor file or a remote descriptor URL
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Descriptor file to validate ("-" reads standard input)
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Remote descriptor on GitHub, GitLab or Bitbucket
    #[arg(long, help = "URL of a publiccode.yml hosted on a code hosting platform")]
    pub url: Option<String>,

    /// Treat the input as JSON instead of YAML
    #[arg(long, help = "Read the descriptor as JSON")]
    pub json_input: bool,

    /// Skip checks that need the network
    #[arg(long, help = "Skip checks that need network access")]
    pub disable_network: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(long, help = "Path to a publiccode-gateway.toml file")]
    pub config: Option<PathBuf>,
}

pub async fn execute_validate(args: ValidateArgs) -> CliResult<()> {
    let config = create_gateway_config(args.config.as_deref(), None, None)?;
    let service = GatewayService::new(config)?;
    let mut stdout = std::io::stdout();
    run_validate(&service, &args, &mut stdout).await
}

/// Run one validation, writing the document or the failure envelope to `out`
pub async fn run_validate<W: Write>(
    service: &GatewayService,
    args: &ValidateArgs,
    out: &mut W,
) -> CliResult<()> {
    let ctx = RequestContext {
        ingest_format: if args.json_input {
            WireFormat::Json
        } else {
            WireFormat::Yaml
        },
        response_format: args.format.into(),
        disable_network: args.disable_network,
    };

    let result = match (&args.url, &args.file) {
        (Some(url), _) => service.validate_remote(Some(url), &ctx).await,
        (None, Some(file)) => {
            let body = read_input(file).await?;
            service.validate_inline(&body, &ctx).await
        }
        (None, None) => {
            return Err(CliError::Config(
                "a descriptor file or --url is required".to_string(),
            ))
        }
    };

    match result {
        Ok(canonical) => {
            out.write_all(&format::to_requested_format(&canonical, ctx.response_format))?;
            Ok(())
        }
        Err(e) => {
            let envelope = ResponseEnvelope::from_error(&e);
            let body = serialize_as(&envelope, ctx.response_format)
                .map_err(|err| CliError::Config(format!("failed to render result: {}", err)))?;
            out.write_all(&body)?;
            Err(CliError::Gateway(e))
        }
    }
}

async fn read_input(file: &Path) -> CliResult<Vec<u8>> {
    if file == Path::new("-") {
        let mut buffer = Vec::new();
        tokio::io::stdin().read_to_end(&mut buffer).await?;
        return Ok(buffer);
    }
    tokio::fs::read(file).await.map_err(|e| {
        CliError::Config(format!("Failed to read {}: {}", file.display(), e))
    })
}
