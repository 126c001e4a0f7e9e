//! Axum HTTP server implementation

use crate::core::service::{CorsConfig, GatewayError, GatewayService};
use crate::http::handlers::{status, validate, AppState};
use anyhow::Context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::{info, warn};

fn allowed_methods(config: &CorsConfig) -> Vec<Method> {
    config
        .allowed_methods
        .iter()
        .filter_map(|m| match Method::from_bytes(m.trim().as_bytes()) {
            Ok(method) => Some(method),
            Err(_) => {
                warn!("ignoring invalid CORS method '{}'", m);
                None
            }
        })
        .collect()
}

fn allowed_headers(config: &CorsConfig) -> Vec<HeaderName> {
    config
        .allowed_headers
        .iter()
        .filter_map(|h| match HeaderName::from_bytes(h.trim().as_bytes()) {
            Ok(name) => Some(name),
            Err(_) => {
                warn!("ignoring invalid CORS header '{}'", h);
                None
            }
        })
        .collect()
}

/// Comma separated allow-list value; `None` when nothing is allowed
fn allow_list<'a>(items: impl Iterator<Item = &'a str>) -> Option<HeaderValue> {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        return None;
    }
    HeaderValue::from_str(&joined).ok()
}

/// Build the CORS layer from configuration.
///
/// `*` among the origins allows any origin. Preflight `OPTIONS` requests
/// are answered by the layer itself with an empty 200.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allowed_origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
            .collect();
        if origins.is_empty() {
            warn!("no CORS origins configured, cross-origin requests will be refused");
        }
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(allowed_methods(config))
        .allow_headers(allowed_headers(config))
}

/// Allow-list headers for every response.
///
/// `CorsLayer` only emits these on preflight; regular responses get them
/// here unless already present.
pub fn build_allow_list_layers(
    config: &CorsConfig,
) -> (
    SetResponseHeaderLayer<Option<HeaderValue>>,
    SetResponseHeaderLayer<Option<HeaderValue>>,
) {
    let methods = allowed_methods(config);
    let headers = allowed_headers(config);
    (
        SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            allow_list(methods.iter().map(Method::as_str)),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            allow_list(headers.iter().map(HeaderName::as_str)),
        ),
    )
}

/// Create the router with both route families and all middleware
pub fn create_router(service: Arc<GatewayService>) -> Router {
    let cors = build_cors_layer(&service.config().cors);
    let (allow_methods, allow_headers) = build_allow_list_layers(&service.config().cors);
    let state = AppState::new(service);

    Router::new()
        // Legacy routes
        .route("/pc/validate", post(validate::validate))
        .route("/pc/validateURL", post(validate::validate_url))
        .route("/pc/status", get(status::status))
        // v1 routes
        .route("/api/v1/validate", post(validate::validate))
        .route("/api/v1/validateURL", post(validate::validate_url))
        .route("/api/v1/status", get(status::status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(allow_methods)
                .layer(allow_headers)
                .layer(cors),
        )
        .with_state(state)
}

/// Validation gateway HTTP server
pub struct GatewayServer {
    service: Arc<GatewayService>,
    addr: SocketAddr,
}

impl GatewayServer {
    /// Create a new server instance
    pub fn new(service: Arc<GatewayService>, host: &str, port: u16) -> Result<Self, GatewayError> {
        let addr = Self::parse_address(host, port).map_err(GatewayError::Config)?;
        Ok(Self { service, addr })
    }

    /// Parse and normalize host:port into a SocketAddr
    fn parse_address(host: &str, port: u16) -> Result<SocketAddr, String> {
        let normalized_host = Self::normalize_host(host);

        // IPv6 addresses need brackets
        let addr_str = if normalized_host.contains(':') {
            format!("[{}]:{}", normalized_host, port)
        } else {
            format!("{}:{}", normalized_host, port)
        };

        addr_str.parse().map_err(|_| {
            format!(
                "Unable to parse address '{}'. Use IP addresses like '127.0.0.1', '0.0.0.0', '::1'",
                addr_str
            )
        })
    }

    /// Normalize hostnames for SocketAddr compatibility
    fn normalize_host(host: &str) -> String {
        match host {
            "localhost" => "127.0.0.1".to_string(),
            "::1" | "[::1]" => "::1".to_string(),
            "::" | "[::]" => "::".to_string(),
            _ => host.to_string(),
        }
    }

    /// Start the server and run until Ctrl-C
    pub async fn serve(self) -> anyhow::Result<()> {
        info!("publiccode-gateway version {}", crate::VERSION);

        let app = create_router(self.service);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        let actual_addr = listener.local_addr()?;
        info!("Server bound to {}", actual_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server terminated with an error")?;

        info!("Server stopped");
        Ok(())
    }

    /// Get server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Convenience function to create and start a server
pub async fn serve(service: Arc<GatewayService>, host: &str, port: u16) -> anyhow::Result<()> {
    GatewayServer::new(service, host, port)?.serve().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_variants() {
        assert_eq!(
            GatewayServer::parse_address("localhost", 5000).unwrap().to_string(),
            "127.0.0.1:5000"
        );
        assert_eq!(
            GatewayServer::parse_address("::1", 8080).unwrap().to_string(),
            "[::1]:8080"
        );
        assert_eq!(
            GatewayServer::parse_address("0.0.0.0", 5000).unwrap().port(),
            5000
        );
        assert!(GatewayServer::parse_address("not a host", 5000).is_err());
    }

    #[test]
    fn test_new_rejects_bad_host() {
        let service = Arc::new(GatewayService::new(Default::default()).unwrap());
        let err = GatewayServer::new(service, "bad host", 1).err().unwrap();
        assert!(matches!(err, GatewayError::Config(_)));
    }
}
