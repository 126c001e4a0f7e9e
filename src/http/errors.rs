//! HTTP error handling and conversion

use crate::core::format::{self, WireFormat};
use crate::core::service::GatewayError;
use crate::http::models::ResponseEnvelope;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, info};

/// A gateway error bound to the format the client asked for
#[derive(Debug)]
pub struct HttpError {
    pub error: GatewayError,
    pub format: WireFormat,
}

impl HttpError {
    pub fn new(error: GatewayError, format: WireFormat) -> Self {
        Self { error, format }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.summary(), self.error)
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        match &self.error {
            GatewayError::Validation { issues } => {
                info!("descriptor rejected with {} issue(s)", issues.len())
            }
            other => error!("{} ({}): {}", other.summary(), status.as_u16(), other),
        }

        let envelope = ResponseEnvelope::from_error(&self.error);
        encode(status, &envelope, self.format)
    }
}

/// Write `value` in `format` with the matching content type
pub fn encode<T: Serialize>(status: StatusCode, value: &T, format: WireFormat) -> Response {
    match format::serialize_as(value, format) {
        Ok(body) => (status, [(header::CONTENT_TYPE, format.content_type())], body).into_response(),
        Err(e) => {
            error!("failed to serialize response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Result type alias for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;
