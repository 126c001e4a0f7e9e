//! YAML/JSON negotiation at the request and response boundaries
//!
//! YAML is the canonical representation handed to the validator. JSON
//! bodies are converted on the way in; documents are converted back when
//! the client asks for JSON.

use serde::Serialize;
use tracing::warn;

/// Media type used for YAML responses
pub const YAML_CONTENT_TYPE: &str = "application/x-yaml";
/// Media type selecting JSON on either side
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Errors crossing the YAML/JSON boundary
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Wire format of a request body or a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Yaml,
    Json,
}

impl WireFormat {
    /// Ingestion format from a `Content-Type` header; YAML unless JSON
    pub fn from_content_type(value: Option<&str>) -> Self {
        match value {
            Some(v) if media_essence(v) == JSON_CONTENT_TYPE => WireFormat::Json,
            _ => WireFormat::Yaml,
        }
    }

    /// Response format from an `Accept` header.
    ///
    /// JSON when any listed media range is exactly `application/json`;
    /// wildcards, other types and a missing header fall back to YAML.
    pub fn from_accept(value: Option<&str>) -> Self {
        let wants_json = value
            .map(|v| v.split(',').any(|range| media_essence(range) == JSON_CONTENT_TYPE))
            .unwrap_or(false);
        if wants_json {
            WireFormat::Json
        } else {
            WireFormat::Yaml
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            WireFormat::Yaml => YAML_CONTENT_TYPE,
            WireFormat::Json => JSON_CONTENT_TYPE,
        }
    }
}

/// `type/subtype` without parameters, lowercased
fn media_essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Normalise a request body to canonical YAML.
///
/// YAML bodies pass through untouched; nothing is validated here.
pub fn to_canonical(body: &[u8], declared: WireFormat) -> Result<Vec<u8>, ConversionError> {
    match declared {
        WireFormat::Yaml => Ok(body.to_vec()),
        WireFormat::Json => {
            let value: serde_json::Value = serde_json::from_slice(body)?;
            Ok(serde_yaml::to_string(&value)?.into_bytes())
        }
    }
}

/// Convert a canonical YAML document to the requested format.
///
/// A failed conversion is logged and the canonical bytes are returned
/// as they are, so a response is never lost.
pub fn to_requested_format(canonical: &[u8], requested: WireFormat) -> Vec<u8> {
    render_document(canonical, requested).0
}

/// Like [`to_requested_format`], also returning the format actually produced
pub fn render_document(canonical: &[u8], requested: WireFormat) -> (Vec<u8>, WireFormat) {
    match requested {
        WireFormat::Yaml => (canonical.to_vec(), WireFormat::Yaml),
        WireFormat::Json => match yaml_to_json(canonical) {
            Ok(json) => (json, WireFormat::Json),
            Err(e) => {
                warn!("conversion to JSON failed, returning canonical YAML: {}", e);
                (canonical.to_vec(), WireFormat::Yaml)
            }
        },
    }
}

/// Compact JSON rendering of a YAML document
pub fn yaml_to_json(yaml: &[u8]) -> Result<Vec<u8>, ConversionError> {
    let value: serde_yaml::Value = serde_yaml::from_slice(yaml)?;
    let json = serde_json::to_value(&value)?;
    Ok(serde_json::to_vec(&json)?)
}

/// Serialise any value (e.g. a response envelope) in the given format
pub fn serialize_as<T: Serialize>(value: &T, format: WireFormat) -> Result<Vec<u8>, ConversionError> {
    match format {
        WireFormat::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
        WireFormat::Json => Ok(serde_json::to_vec(value)?),
    }
}
