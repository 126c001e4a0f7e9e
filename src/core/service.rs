//! Validation gateway service: configuration, error taxonomy and pipeline

use crate::core::context::RequestContext;
use crate::core::format::{self, ConversionError};
use crate::core::normalize::{classify, normalize, FailureClass, ValidationIssue, ValidatorFailure};
use crate::core::remote::{RemoteResolver, ResolveError};
use crate::core::url_extract::extract_url;
use crate::core::validator::{BasicValidator, DescriptorValidator, ParserOptions};
use crate::core::vcs::PlatformTable;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// CORS configuration for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed for CORS; `*` allows any
    pub allowed_origins: Vec<String>,

    /// Methods advertised to preflight requests
    pub allowed_methods: Vec<String>,

    /// Request headers advertised to preflight requests
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["POST", "GET", "OPTIONS", "PUT", "DELETE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_headers: [
                "Accept",
                "Content-Type",
                "Content-Length",
                "Accept-Encoding",
                "X-CSRF-Token",
                "Authorization",
                "Cache-Control",
                "Postman-Token",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address the server binds to
    pub host: String,

    /// Port the server binds to
    pub port: u16,

    /// Deadline for the remote work of one request (reachability check + validation)
    pub request_timeout_secs: u64,

    /// Largest request body accepted
    pub max_body_bytes: usize,

    /// CORS configuration
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 5,
            max_body_bytes: 2 * 1024 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Gateway error types
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conversion(#[from] ConversionError),

    #[error("descriptor has {} validation error(s)", .issues.len())]
    Validation { issues: Vec<ValidationIssue> },

    #[error("request body is empty")]
    EmptyPayload,

    #[error("{0}")]
    ReadBody(String),

    #[error("Not found")]
    MissingUrl,

    #[error("network access is disabled for this request")]
    NetworkDisabled,

    #[error("remote work did not finish within {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Only the remote-URL route produces InvalidUrl, where an
            // unresolvable URL is reported as not found
            GatewayError::InvalidUrl(_) | GatewayError::NotFound(_) | GatewayError::MissingUrl => {
                StatusCode::NOT_FOUND
            }
            GatewayError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Network(_)
            | GatewayError::Conversion(_)
            | GatewayError::EmptyPayload
            | GatewayError::ReadBody(_)
            | GatewayError::NetworkDisabled
            | GatewayError::Timeout(_) => StatusCode::BAD_REQUEST,
            GatewayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short summary used as the envelope message
    pub fn summary(&self) -> &'static str {
        match self {
            GatewayError::InvalidUrl(_) | GatewayError::NotFound(_) | GatewayError::MissingUrl => {
                "URL error"
            }
            GatewayError::Network(_) | GatewayError::NetworkDisabled => "Network error",
            GatewayError::Conversion(_) => "Error converting",
            GatewayError::Validation { .. } => "Validation Errors",
            GatewayError::EmptyPayload => "Empty payload",
            GatewayError::ReadBody(_) => "Error reading body",
            GatewayError::Timeout(_) => "Request timed out",
            GatewayError::Config(_) => "Configuration error",
        }
    }

    /// Issues carried by a content validation failure
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            GatewayError::Validation { issues } => Some(issues),
            _ => None,
        }
    }
}

impl From<ResolveError> for GatewayError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidUrl { .. } => GatewayError::InvalidUrl(err.to_string()),
            ResolveError::NotFound { .. } => GatewayError::NotFound(err.to_string()),
            ResolveError::Network { .. } => GatewayError::Network(err.to_string()),
        }
    }
}

impl GatewayError {
    /// An inline body was read and rejected; it is never a missing resource
    fn from_inline_failure(failure: ValidatorFailure) -> Self {
        match failure {
            ValidatorFailure::Fetch(text) => GatewayError::Network(text),
            other => GatewayError::Validation {
                issues: normalize(&other),
            },
        }
    }

    fn from_remote_failure(failure: ValidatorFailure) -> Self {
        match classify(&failure) {
            FailureClass::NotFound => GatewayError::NotFound(failure.to_string()),
            FailureClass::Unreachable => GatewayError::Network(failure.to_string()),
            FailureClass::Invalid => GatewayError::Validation {
                issues: normalize(&failure),
            },
        }
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Sequences ingestion, resolution and validation for one request at a time.
///
/// Holds only immutable collaborators, so one instance serves every
/// concurrent request; all per-request state lives in [`RequestContext`].
pub struct GatewayService {
    config: GatewayConfig,
    resolver: RemoteResolver,
    validator: Arc<dyn DescriptorValidator>,
}

impl GatewayService {
    /// Create a service backed by the bundled [`BasicValidator`]
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("publiccode-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {}", e)))?;

        let resolver = RemoteResolver::new(client.clone());
        let validator = Arc::new(BasicValidator::new(client));
        Ok(Self::with_parts(config, resolver, validator))
    }

    /// Create a service from explicit collaborators
    pub fn with_parts(
        config: GatewayConfig,
        resolver: RemoteResolver,
        validator: Arc<dyn DescriptorValidator>,
    ) -> Self {
        Self {
            config,
            resolver,
            validator,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn platforms(&self) -> &PlatformTable {
        self.resolver.platforms()
    }

    /// Validate an inline descriptor, returning its canonical YAML
    pub async fn validate_inline(&self, body: &[u8], ctx: &RequestContext) -> GatewayResult<Vec<u8>> {
        if body.is_empty() {
            info!("empty payload");
            return Err(GatewayError::EmptyPayload);
        }

        let canonical = format::to_canonical(body, ctx.ingest_format)?;

        // A missing url is normal while a descriptor is still being edited
        let remote_base_url = match extract_url(&canonical) {
            Some(url) => self.platforms().resolve_root(&url),
            None => {
                warn!("url not found in body, no remote base URL available");
                None
            }
        };

        let options = ParserOptions {
            disable_network: ctx.disable_network,
            remote_base_url,
        };
        debug!(
            "validating inline descriptor with disable_network: {}, remote_base_url: {:?}",
            options.disable_network,
            options.remote_base_url.as_ref().map(|u| u.as_str())
        );

        let validated = self
            .with_deadline(self.validator.validate(&canonical, &options))
            .await?;
        validated.map_err(GatewayError::from_inline_failure)
    }

    /// Resolve, check and validate the descriptor at `url`
    pub async fn validate_remote(
        &self,
        url: Option<&str>,
        ctx: &RequestContext,
    ) -> GatewayResult<Vec<u8>> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(GatewayError::MissingUrl)?;

        if ctx.disable_network {
            return Err(GatewayError::NetworkDisabled);
        }

        self.with_deadline(async {
            let raw = self.resolver.resolve_file(url).await?;
            let options = ParserOptions {
                disable_network: false,
                remote_base_url: raw.join("./").ok(),
            };
            self.validator
                .validate_remote(&raw, &options)
                .await
                .map_err(GatewayError::from_remote_failure)
        })
        .await?
    }

    /// Bound remote work by the request deadline. Dropping the returned
    /// future (client gone) drops the in-flight requests with it.
    async fn with_deadline<F, T>(&self, work: F) -> GatewayResult<T>
    where
        F: Future<Output = T>,
    {
        let deadline = self.config.request_timeout();
        tokio::time::timeout(deadline, work)
            .await
            .map_err(|_| GatewayError::Timeout(deadline))
    }
}
