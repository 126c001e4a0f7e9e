//! Best-effort lookup of a descriptor's `url` key
//!
//! This is a lookup, not validation: any buffer that is not a mapping, or
//! that lacks a usable `url`, yields `None` and never fails the caller.

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;
use url::Url;

/// Only the `url` key is decoded; every other key is ignored.
#[derive(Debug, Default, Deserialize)]
struct UrlField {
    #[serde(default)]
    url: Option<Value>,
}

/// Find and parse the `url` key of a YAML (or JSON) descriptor.
///
/// Scalars that are not strings are read in their string form. The result
/// is `Some` only when the value parses as an absolute URL with a host.
pub fn extract_url(buffer: &[u8]) -> Option<Url> {
    let field: UrlField = match serde_yaml::from_slice(buffer) {
        Ok(field) => field,
        Err(e) => {
            debug!("descriptor is not a mapping, no url read: {}", e);
            return None;
        }
    };

    let raw = scalar_text(field.url?)?;
    let url = Url::parse(raw.trim()).ok()?;

    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    (!url.scheme().is_empty() && has_host).then_some(url)
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
