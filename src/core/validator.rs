//! Descriptor validator seam
//!
//! The gateway only needs "bytes in, canonical document or failure out".
//! [`BasicValidator`] fills that seam with the mandatory-key checks of the
//! publiccode.yml format so the service runs on its own; a complete schema
//! validator can be plugged in through [`DescriptorValidator`].

use crate::core::normalize::{ValidationIssue, ValidatorFailure};
use async_trait::async_trait;
use reqwest::Client;
use serde_yaml::{Mapping, Value};
use tracing::debug;
use url::Url;

/// Per-request validator settings. Never shared between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Skip every check that needs the network
    pub disable_network: bool,
    /// Root that relative file references are resolved against
    pub remote_base_url: Option<Url>,
}

/// Validates descriptors and renders them canonically
#[async_trait]
pub trait DescriptorValidator: Send + Sync {
    /// Validate a canonical YAML buffer, returning the canonical document
    async fn validate(
        &self,
        buffer: &[u8],
        options: &ParserOptions,
    ) -> Result<Vec<u8>, ValidatorFailure>;

    /// Download the descriptor at `raw_url` and validate it
    async fn validate_remote(
        &self,
        raw_url: &Url,
        options: &ParserOptions,
    ) -> Result<Vec<u8>, ValidatorFailure>;
}

/// Top-level keys every descriptor must carry
const MANDATORY_KEYS: &[&str] = &[
    "publiccodeYmlVersion",
    "name",
    "url",
    "platforms",
    "categories",
    "developmentStatus",
    "softwareType",
    "description",
    "legal",
    "maintenance",
    "localisation",
];

/// Nested keys checked once their parent is present
const MANDATORY_NESTED_KEYS: &[(&str, &str)] = &[
    ("legal", "license"),
    ("maintenance", "type"),
    ("localisation", "localisationReady"),
    ("localisation", "availableLanguages"),
];

const DEVELOPMENT_STATUSES: &[&str] = &["concept", "development", "beta", "stable", "obsolete"];

const SOFTWARE_TYPES: &[&str] = &[
    "standalone/mobile",
    "standalone/iot",
    "standalone/desktop",
    "standalone/web",
    "standalone/backend",
    "standalone/other",
    "addon",
    "library",
    "configurationFiles",
];

/// Mandatory-key validator for publiccode.yml descriptors
#[derive(Debug, Clone)]
pub struct BasicValidator {
    client: Client,
}

impl BasicValidator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn parse(buffer: &[u8]) -> Result<Mapping, ValidatorFailure> {
        if buffer.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidatorFailure::message("document: empty descriptor"));
        }
        match serde_yaml::from_slice::<Value>(buffer) {
            Ok(Value::Mapping(mapping)) => Ok(mapping),
            Ok(_) => Err(ValidatorFailure::message(
                "document: descriptor must be a mapping",
            )),
            Err(e) => Err(ValidatorFailure::message(format!("document: {}", e))),
        }
    }

    fn check_keys(document: &Mapping) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for key in MANDATORY_KEYS {
            if is_blank(document.get(*key)) {
                issues.push(ValidationIssue::new(format!("{}: missing mandatory key", key)));
            }
        }

        for (parent, child) in MANDATORY_NESTED_KEYS {
            if let Some(Value::Mapping(section)) = document.get(*parent) {
                if is_blank(section.get(*child)) {
                    issues.push(ValidationIssue::new(format!(
                        "{}.{}: missing mandatory key",
                        parent, child
                    )));
                }
            }
        }

        if let Some(value) = document.get("url").filter(|v| !is_blank(Some(*v))) {
            let valid = value
                .as_str()
                .and_then(|s| Url::parse(s).ok())
                .is_some_and(|u| u.host_str().is_some());
            if !valid {
                issues.push(ValidationIssue::new("url: must be an absolute URL"));
            }
        }

        check_enum(document, "developmentStatus", DEVELOPMENT_STATUSES, &mut issues);
        check_enum(document, "softwareType", SOFTWARE_TYPES, &mut issues);

        issues
    }

    /// Reachability of referenced files; only runs with network enabled
    async fn check_files(&self, document: &Mapping, options: &ParserOptions) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if options.disable_network {
            return issues;
        }

        let Some(logo) = document.get("logo").and_then(Value::as_str) else {
            return issues;
        };

        let target = match Url::parse(logo) {
            Ok(absolute) => Some(absolute),
            Err(_) => options
                .remote_base_url
                .as_ref()
                .and_then(|base| base.join(logo.trim_start_matches('/')).ok()),
        };
        let Some(target) = target else {
            debug!("no base URL to resolve logo '{}' against", logo);
            return issues;
        };

        match self.client.get(target.clone()).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(_) => issues.push(ValidationIssue::new(format!(
                "logo: no such file at {}",
                target
            ))),
            Err(e) => issues.push(ValidationIssue::new(format!(
                "logo: unable to reach {}: {}",
                target, e
            ))),
        }
        issues
    }

    async fn validate_document(
        &self,
        buffer: &[u8],
        options: &ParserOptions,
    ) -> Result<Vec<u8>, ValidatorFailure> {
        let document = Self::parse(buffer)?;

        let mut issues = Self::check_keys(&document);
        issues.extend(self.check_files(&document, options).await);
        if !issues.is_empty() {
            return Err(ValidatorFailure::Issues(issues));
        }

        serde_yaml::to_string(&Value::Mapping(document))
            .map(String::into_bytes)
            .map_err(|e| ValidatorFailure::message(format!("document: {}", e)))
    }
}

#[async_trait]
impl DescriptorValidator for BasicValidator {
    async fn validate(
        &self,
        buffer: &[u8],
        options: &ParserOptions,
    ) -> Result<Vec<u8>, ValidatorFailure> {
        debug!(
            "validate() called with disable_network: {}, remote_base_url: {:?}",
            options.disable_network,
            options.remote_base_url.as_ref().map(Url::as_str)
        );
        self.validate_document(buffer, options).await
    }

    async fn validate_remote(
        &self,
        raw_url: &Url,
        options: &ParserOptions,
    ) -> Result<Vec<u8>, ValidatorFailure> {
        let response = self
            .client
            .get(raw_url.clone())
            .send()
            .await
            .map_err(|e| ValidatorFailure::Fetch(format!("GET {}: {}", raw_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidatorFailure::message(format!(
                "GET {}: HTTP {}",
                raw_url, status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ValidatorFailure::Fetch(format!("GET {}: {}", raw_url, e)))?;

        self.validate_document(&body, options).await
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Sequence(items)) => items.is_empty(),
        Some(Value::Mapping(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn check_enum(document: &Mapping, key: &str, allowed: &[&str], issues: &mut Vec<ValidationIssue>) {
    if let Some(value) = document.get(key).filter(|v| !is_blank(Some(*v))) {
        if !value.as_str().is_some_and(|s| allowed.contains(&s)) {
            issues.push(ValidationIssue::new(format!(
                "{}: must be one of {}",
                key,
                allowed.join(", ")
            )));
        }
    }
}
