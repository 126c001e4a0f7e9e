//! Status endpoint handler

use crate::core::service::GatewayService;
use crate::http::models::StatusResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use std::time::SystemTime;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GatewayService>,
    pub start_time: SystemTime,
}

impl AppState {
    pub fn new(service: Arc<GatewayService>) -> Self {
        Self {
            service,
            start_time: SystemTime::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.start_time)
            .unwrap_or_default()
            .as_secs()
    }
}

/// GET /pc/status, /api/v1/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        version: crate::VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}
