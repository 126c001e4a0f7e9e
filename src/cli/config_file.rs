//! Configuration file parsing for the gateway CLI

use crate::cli::error::{CliError, CliResult};
use publiccode_gateway::GatewayConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "publiccode-gateway.toml";

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] in the
/// working directory when it exists. Missing keys keep their defaults.
pub fn load_config(path: Option<&Path>) -> CliResult<GatewayConfig> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => {
            let candidate = default_config_path()?;
            if !candidate.is_file() {
                debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(GatewayConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        CliError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_config(&content, &path)
}

/// Parse TOML configuration content
pub fn parse_config(content: &str, source: &Path) -> CliResult<GatewayConfig> {
    toml::from_str(content).map_err(|e| {
        CliError::Config(format!("Failed to parse {}: {}", source.display(), e))
    })
}

fn default_config_path() -> CliResult<PathBuf> {
    let current_dir = std::env::current_dir()
        .map_err(|e| CliError::Config(format!("Failed to get current directory: {}", e)))?;
    Ok(current_dir.join(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gateway.toml");
        fs::write(
            &path,
            r#"
port = 8080

[cors]
allowed_origins = ["https://developers.italia.it"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.cors.allowed_origins, vec!["https://developers.italia.it"]);
        assert_eq!(config.cors.allowed_methods.len(), 5);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config(Some(&temp_dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let err = parse_config("port = \"five thousand\"", Path::new("x.toml")).unwrap_err();
        assert!(err.to_string().contains("x.toml"));
    }
}
