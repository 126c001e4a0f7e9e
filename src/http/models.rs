//! Request and response models for the HTTP API

use crate::core::normalize::ValidationIssue;
use crate::core::service::GatewayError;
use serde::{Deserialize, Serialize};

/// Body of every non-success response.
///
/// At most one of `error`, `validation_errors` and `pc` is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationIssue>>,
    /// Parsed descriptor; successful responses send the bare document instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    pub fn from_error(err: &GatewayError) -> Self {
        let status = err.status_code().as_u16();
        let message = err.summary().to_string();
        match err.issues() {
            Some(issues) => Self {
                status,
                message,
                error: None,
                validation_errors: Some(issues.to_vec()),
                pc: None,
            },
            None => Self {
                status,
                message,
                error: Some(err.to_string()),
                validation_errors: None,
                pc: None,
            },
        }
    }
}

/// Query parameters of the inline validation routes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuery {
    pub disable_network: Option<String>,
}

/// Query parameters of the remote validation routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateUrlQuery {
    pub url: Option<String>,
}

/// Service status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
