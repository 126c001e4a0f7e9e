//! Configuration resolution for the CLI: file, then environment, then flags

use crate::cli::config_file::load_config;
use crate::cli::error::{CliError, CliResult};
use publiccode_gateway::GatewayConfig;
use std::path::Path;
use tracing::debug;

pub const ENV_HOST: &str = "GATEWAY_HOST";
pub const ENV_PORT: &str = "GATEWAY_PORT";
pub const ENV_REQUEST_TIMEOUT: &str = "GATEWAY_REQUEST_TIMEOUT_SECS";

/// Build the gateway configuration with every override applied
pub fn create_gateway_config(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<GatewayConfig> {
    let config = load_config(config_path)?;
    let mut config = apply_env_overrides(config, |key| std::env::var(key).ok())?;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    debug!(
        "gateway configuration: {}:{} timeout {}s",
        config.host, config.port, config.request_timeout_secs
    );
    Ok(config)
}

/// Apply `GATEWAY_*` overrides read through `lookup`
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> CliResult<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
        config.host = host;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.port = port
            .trim()
            .parse()
            .map_err(|_| CliError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port)))?;
    }
    if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
        config.request_timeout_secs = secs.trim().parse().map_err(|_| {
            CliError::Config(format!(
                "{} must be a number of seconds, got '{}'",
                ENV_REQUEST_TIMEOUT, secs
            ))
        })?;
    }
    Ok(config)
}
