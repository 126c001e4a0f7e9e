//! Descriptor validation handlers

use crate::core::context::RequestContext;
use crate::core::format::{self, WireFormat};
use crate::core::service::GatewayError;
use crate::http::errors::{HttpError, HttpResult};
use crate::http::handlers::AppState;
use crate::http::models::{ValidateQuery, ValidateUrlQuery};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// 200 response carrying the bare validated document
fn document_response(canonical: &[u8], requested: WireFormat) -> Response {
    let (body, produced) = format::render_document(canonical, requested);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, produced.content_type())],
        body,
    )
        .into_response()
}

/// POST /pc/validate, /api/v1/validate
pub async fn validate(
    State(state): State<AppState>,
    query: Option<Query<ValidateQuery>>,
    headers: HeaderMap,
    body: Body,
) -> HttpResult<Response> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let ctx = RequestContext::new(
        header_str(&headers, header::CONTENT_TYPE),
        header_str(&headers, header::ACCEPT),
    )
    .with_network_flag(query.disable_network.as_deref(), false);

    info!(
        "validate: ingest {:?}, egress {:?}, disable_network {}",
        ctx.ingest_format, ctx.response_format, ctx.disable_network
    );

    let limit = state.service.config().max_body_bytes;
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        HttpError::new(
            GatewayError::ReadBody(format!("failed to read request body: {}", e)),
            ctx.response_format,
        )
    })?;

    let canonical = state
        .service
        .validate_inline(&bytes, &ctx)
        .await
        .map_err(|e| HttpError::new(e, ctx.response_format))?;

    Ok(document_response(&canonical, ctx.response_format))
}

/// POST /pc/validateURL, /api/v1/validateURL
pub async fn validate_url(
    State(state): State<AppState>,
    query: Option<Query<ValidateUrlQuery>>,
    headers: HeaderMap,
) -> HttpResult<Response> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let ctx = RequestContext::new(None, header_str(&headers, header::ACCEPT));

    info!("validateURL: url {:?}", query.url);

    let canonical = state
        .service
        .validate_remote(query.url.as_deref(), &ctx)
        .await
        .map_err(|e| HttpError::new(e, ctx.response_format))?;

    Ok(document_response(&canonical, ctx.response_format))
}
