//! Router tests for the inline validation routes
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use publiccode_gateway::http::server::create_router;
use publiccode_gateway::{GatewayConfig, GatewayService};
use std::sync::Arc;
use tower::ServiceExt;

const VALID: &str = include_str!("fixtures/publiccode.yml");
const INCOMPLETE: &str = include_str!("fixtures/incomplete.yml");

fn router_with(config: GatewayConfig) -> Router {
    create_router(Arc::new(GatewayService::new(config).unwrap()))
}

fn router() -> Router {
    router_with(GatewayConfig::default())
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

fn content_type(headers: &HeaderMap) -> &str {
    headers.get(header::CONTENT_TYPE).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_empty_payload_yaml_envelope() {
    let (status, headers, body) = send(router(), post("/pc/validate", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&headers), "application/x-yaml");
    insta::assert_snapshot!(String::from_utf8(body).unwrap(), @r###"
    status: 400
    message: Empty payload
    error: request body is empty
    "###);
}

#[tokio::test]
async fn test_empty_payload_json_envelope() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/validate")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&headers), "application/json");
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        envelope,
        serde_json::json!({
            "status": 400,
            "message": "Empty payload",
            "error": "request body is empty"
        })
    );
}

#[tokio::test]
async fn test_valid_descriptor_returns_document() {
    let (status, headers, body) = send(router(), post("/pc/validate", VALID)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "application/x-yaml");
    let document: serde_yaml::Value = serde_yaml::from_slice(&body).unwrap();
    assert_eq!(document["name"].as_str(), Some("Medusa"));
    assert!(document.get("status").is_none());
}

#[tokio::test]
async fn test_network_flag_does_not_change_output() {
    let (on_status, _, online) =
        send(router(), post("/pc/validate?disableNetwork=false", VALID)).await;
    let (off_status, _, offline) =
        send(router(), post("/pc/validate?disableNetwork=true", VALID)).await;

    assert_eq!(on_status, StatusCode::OK);
    assert_eq!(off_status, StatusCode::OK);
    assert_eq!(online, offline);
}

#[tokio::test]
async fn test_unreadable_network_flag_falls_back() {
    let (status, _, _) = send(router(), post("/pc/validate?disableNetwork=maybe", VALID)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_route_families_are_equivalent() {
    let (_, _, legacy) = send(router(), post("/pc/validate", VALID)).await;
    let (_, _, v1) = send(router(), post("/api/v1/validate", VALID)).await;
    assert_eq!(legacy, v1);

    let (legacy_status, _, legacy) = send(router(), post("/pc/validate", INCOMPLETE)).await;
    let (v1_status, _, v1) = send(router(), post("/api/v1/validate", INCOMPLETE)).await;
    assert_eq!(legacy_status, v1_status);
    assert_eq!(legacy, v1);
}

#[tokio::test]
async fn test_json_in_json_out() {
    let input: serde_yaml::Value = serde_yaml::from_str(VALID).unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/validate")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .header(header::ACCEPT, "application/json")
        .body(Body::from(serde_json::to_vec(&input).unwrap()))
        .unwrap();
    let (status, headers, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "application/json");
    let output: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(output, serde_json::to_value(&input).unwrap());
}

#[tokio::test]
async fn test_missing_fields_are_reported_individually() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/pc/validate")
        .header(header::ACCEPT, "application/json")
        .body(Body::from(INCOMPLETE))
        .unwrap();
    let (status, _, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["status"], 422);
    assert_eq!(envelope["message"], "Validation Errors");
    assert!(envelope.get("error").is_none());

    let mut keys: Vec<String> = envelope["validationErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["key"].as_str().unwrap().to_string())
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "categories: missing mandatory key",
            "description: missing mandatory key",
            "legal: missing mandatory key",
            "localisation: missing mandatory key",
            "maintenance: missing mandatory key",
            "platforms: missing mandatory key",
        ]
    );
}

#[tokio::test]
async fn test_syntax_error_on_line_404_is_a_validation_error() {
    let mut body: String = (1..=403).map(|n| format!("k{}: v\n", n)).collect();
    body.push_str("name: [unterminated\n");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/pc/validate?disableNetwork=true")
        .header(header::ACCEPT, "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, _, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["message"], "Validation Errors");
    let issues = envelope["validationErrors"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert!(issues[0]["key"].as_str().unwrap().contains("line 404"));
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/pc/validate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, headers, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&headers), "application/x-yaml");
    let envelope: serde_yaml::Value = serde_yaml::from_slice(&body).unwrap();
    assert_eq!(envelope["message"].as_str(), Some("Error converting"));
    assert!(envelope["error"].as_str().unwrap().starts_with("malformed JSON"));
}

#[tokio::test]
async fn test_oversized_body_is_a_read_error() {
    let config = GatewayConfig {
        max_body_bytes: 16,
        ..Default::default()
    };
    let (status, _, body) = send(router_with(config), post("/pc/validate", VALID)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let envelope: serde_yaml::Value = serde_yaml::from_slice(&body).unwrap();
    assert_eq!(envelope["message"].as_str(), Some("Error reading body"));
}

#[tokio::test]
async fn test_validate_url_without_url_is_not_found() {
    for uri in ["/pc/validateURL", "/api/v1/validateURL?url="] {
        let (status, _, body) = send(router(), post(uri, Body::empty())).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        let envelope: serde_yaml::Value = serde_yaml::from_slice(&body).unwrap();
        assert_eq!(envelope["status"].as_u64(), Some(404));
        assert_eq!(envelope["message"].as_str(), Some("URL error"));
    }
}

#[tokio::test]
async fn test_validate_url_with_unrecognized_host_is_not_found() {
    let (status, _, _) = send(
        router(),
        post(
            "/pc/validateURL?url=https://example.com/publiccode.yml",
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_route() {
    let request = Request::builder()
        .uri("/api/v1/status")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["version"], publiccode_gateway::VERSION);
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_settings() {
    let router = router();
    let offline = router
        .clone()
        .oneshot(post("/pc/validate?disableNetwork=true", VALID));
    let empty = router.clone().oneshot(post("/api/v1/validate", Body::empty()));
    let invalid = router.oneshot(post("/pc/validate", INCOMPLETE));

    let (offline, empty, invalid) = tokio::join!(offline, empty, invalid);
    assert_eq!(offline.unwrap().status(), StatusCode::OK);
    assert_eq!(empty.unwrap().status(), StatusCode::BAD_REQUEST);
    assert_eq!(invalid.unwrap().status(), StatusCode::UNPROCESSABLE_ENTITY);
}
