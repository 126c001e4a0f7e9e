//! # publiccode.yml validation gateway
//!
//! An HTTP front end for a publiccode.yml descriptor validator. Clients
//! post a descriptor (YAML or JSON) or point at one hosted on a code
//! hosting platform; the gateway resolves where relative references in
//! the descriptor live, runs the validator and answers with the canonical
//! document or a structured list of problems.
//!
//! ## Architecture
//!
//! - [`core::vcs`] derives raw-content URLs for GitHub, GitLab and Bitbucket
//! - [`core::remote`] checks a remote descriptor is reachable before it is validated
//! - [`core::format`] negotiates YAML/JSON on the way in and out
//! - [`core::normalize`] flattens validator failures into issues
//! - [`core::service`] sequences one request through all of the above
//! - [`http`] exposes the service over axum
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use publiccode_gateway::{GatewayConfig, GatewayService, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = GatewayService::new(GatewayConfig::default())?;
//!
//!     let ctx = RequestContext::default().with_network_flag(Some("true"), false);
//!     match service.validate_inline(b"name: Medusa\n", &ctx).await {
//!         Ok(document) => println!("{}", String::from_utf8_lossy(&document)),
//!         Err(e) => println!("{}: {:?}", e.summary(), e.issues()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod http;

pub use core::context::RequestContext;
pub use core::format::WireFormat;
pub use core::normalize::{ValidationIssue, ValidatorFailure};
pub use core::service::{CorsConfig, GatewayConfig, GatewayError, GatewayResult, GatewayService};
pub use core::validator::{BasicValidator, DescriptorValidator, ParserOptions};
pub use http::ResponseEnvelope;

// Re-export commonly used types
pub use async_trait::async_trait;

/// Version of the gateway
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging for the gateway (safe for testing)
pub fn init_logging() {
    // Only initialize logging once
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "publiccode_gateway=info,tower_http=info".into());

        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

        // This will fail silently if already initialized
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
