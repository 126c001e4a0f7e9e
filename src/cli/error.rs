//! CLI-specific error types

use publiccode_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{summary}: {0}", summary = .0.summary())]
    Gateway(#[from] GatewayError),

    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Process exit code: 1 when the descriptor was rejected, 2 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Gateway(GatewayError::Validation { .. }) => 1,
            _ => 2,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
