//! HTTP Integration Tests
//!
//! Each test starts a real server on an ephemeral port and talks to it with reqwest.

use std::sync::Arc;

use pipeparse::{server, ResourceLimits, ServerConfig};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

// =============================================================================
// HELPERS
// =============================================================================

const ORIGIN: &str = "http://localhost:3000";

/// Start a server with `config` and return its base URL
async fn spawn_server(config: ServerConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve_on(
        listener,
        Arc::new(config),
        std::future::pending(),
    ));
    format!("http://{addr}")
}

async fn spawn_default() -> String {
    spawn_server(ServerConfig::default()).await
}

async fn post_pipeline(base: &str, body: Value) -> (StatusCode, Value) {
    let response = Client::new()
        .post(format!("{base}/pipelines/parse"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

// =============================================================================
// ROUTES
// =============================================================================

#[tokio::test]
async fn test_ping() {
    let base = spawn_default().await;
    let body: Value = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"Ping": "Pong"}));
}

#[tokio::test]
async fn test_parse_chain_is_dag() {
    let base = spawn_default().await;
    let (status, body) = post_pipeline(
        &base,
        json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
            "edges": [{"source": "a", "target": "b"}, {"source": "b", "target": "c"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"num_nodes": 3, "num_edges": 2, "is_dag": true}));
}

#[tokio::test]
async fn test_parse_two_cycle_is_not_dag() {
    let base = spawn_default().await;
    let (status, body) = post_pipeline(
        &base,
        json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [{"source": "a", "target": "b"}, {"source": "b", "target": "a"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"num_nodes": 2, "num_edges": 2, "is_dag": false}));
}

#[tokio::test]
async fn test_parse_empty_pipeline() {
    let base = spawn_default().await;
    let (status, body) = post_pipeline(&base, json!({"nodes": [], "edges": []})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"num_nodes": 0, "num_edges": 0, "is_dag": true}));
}

#[tokio::test]
async fn test_parse_editor_payload_with_extra_attributes() {
    let base = spawn_default().await;
    let (status, body) = post_pipeline(
        &base,
        json!({
            "nodes": [
                {"id": "customInput-1", "type": "customInput", "position": {"x": 0, "y": 0},
                 "data": {"id": "customInput-1", "nodeType": "customInput"}},
                {"id": "llm-1", "type": "llm", "width": 200, "height": 80},
                {"id": "customOutput-1", "type": "customOutput"}
            ],
            "edges": [
                {"id": "reactflow__edge-1", "source": "customInput-1", "target": "llm-1",
                 "sourceHandle": "customInput-1-value", "targetHandle": "llm-1-prompt",
                 "type": "smoothstep", "animated": true, "markerEnd": {"type": "arrow"}},
                {"id": "reactflow__edge-2", "source": "llm-1", "target": "customOutput-1"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"num_nodes": 3, "num_edges": 2, "is_dag": true}));
}

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

#[tokio::test]
async fn test_missing_edges_is_unprocessable() {
    let base = spawn_default().await;
    let (status, body) = post_pipeline(&base, json!({"nodes": [{"id": "a"}]})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "PIPE-001");
    assert!(body["detail"].as_str().unwrap().contains("edges"));
}

#[tokio::test]
async fn test_node_without_id_is_unprocessable() {
    let base = spawn_default().await;
    let (status, _) = post_pipeline(
        &base,
        json!({"nodes": [{"type": "llm"}], "edges": []}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let base = spawn_default().await;
    let response = Client::new()
        .post(format!("{base}/pipelines/parse"))
        .header("content-type", "application/json")
        .body("{\"nodes\": [")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_content_type_is_unsupported() {
    let base = spawn_default().await;
    let response = Client::new()
        .post(format!("{base}/pipelines/parse"))
        .body(r#"{"nodes": [], "edges": []}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// =============================================================================
// LIMITS
// =============================================================================

#[tokio::test]
async fn test_too_many_nodes_is_rejected() {
    let mut config = ServerConfig::default();
    config.limits = ResourceLimits {
        max_nodes: 2,
        ..ResourceLimits::testing()
    };
    let base = spawn_server(config).await;

    let (status, body) = post_pipeline(
        &base,
        json!({"nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}], "edges": []}),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "PIPE-002");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = ServerConfig::default();
    config.limits = ResourceLimits {
        max_body_bytes: 64,
        ..ResourceLimits::testing()
    };
    let base = spawn_server(config).await;

    let nodes: Vec<Value> = (0..20).map(|i| json!({"id": format!("node-{i}")})).collect();
    let response = Client::new()
        .post(format!("{base}/pipelines/parse"))
        .json(&json!({"nodes": nodes, "edges": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_preflight_from_allowed_origin() {
    let base = spawn_default().await;
    let response = Client::new()
        .request(Method::OPTIONS, format!("{base}/pipelines/parse"))
        .header("origin", ORIGIN)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-allow-methods"], "POST");
    assert_eq!(headers["access-control-allow-headers"], "content-type");
}

#[tokio::test]
async fn test_cors_other_origin_gets_no_allow_header() {
    let base = spawn_default().await;
    let response = Client::new()
        .post(format!("{base}/pipelines/parse"))
        .header("origin", "http://evil.example.com")
        .json(&json!({"nodes": [], "edges": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_cors_configured_origin() {
    let mut config = ServerConfig::default();
    config.server.allowed_origin = "https://studio.example.com".into();
    let base = spawn_server(config).await;

    let response = Client::new()
        .get(format!("{base}/"))
        .header("origin", "https://studio.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://studio.example.com"
    );
}
