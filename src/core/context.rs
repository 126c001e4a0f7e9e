//! Per-request negotiation state

use crate::core::format::WireFormat;
use tracing::info;

/// Everything a single request decided about formats and network use.
///
/// Built fresh for each request and passed down explicitly; it is never
/// stored anywhere shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    /// Format the request body arrives in
    pub ingest_format: WireFormat,
    /// Format the response is written in
    pub response_format: WireFormat,
    /// Skip network checks while validating
    pub disable_network: bool,
}

impl RequestContext {
    pub fn new(content_type: Option<&str>, accept: Option<&str>) -> Self {
        Self {
            ingest_format: WireFormat::from_content_type(content_type),
            response_format: WireFormat::from_accept(accept),
            disable_network: false,
        }
    }

    /// Apply a `disableNetwork` query value; unreadable values keep `default`
    pub fn with_network_flag(mut self, raw: Option<&str>, default: bool) -> Self {
        self.disable_network = match raw {
            None => default,
            Some(value) => parse_bool(value).unwrap_or_else(|| {
                info!(
                    "disableNetwork value '{}' not understood, defaulting to {}",
                    value, default
                );
                default
            }),
        };
        self
    }
}

/// Boolean spellings accepted in query strings
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
