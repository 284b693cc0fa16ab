//! Gateway behaviour tests against in-process downstream services

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    routing::{get, post},
    Json, Router,
};
use indexmap::IndexMap;
use serde_json::{json, Value};

use activo_server::gateway::{self, GatewayState};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}

async fn spawn_gateway(registry: IndexMap<String, String>) -> SocketAddr {
    let state = GatewayState {
        client: reqwest::Client::new(),
        registry,
    };
    spawn(gateway::router(state)).await
}

fn registry(entries: &[(&str, SocketAddr)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(name, addr)| (name.to_string(), format!("http://{}", addr)))
        .collect()
}

#[tokio::test]
async fn relays_downstream_status_and_body_unchanged() {
    let downstream = Router::new()
        .route(
            "/widgets",
            get(|| async { (StatusCode::OK, Json(json!({"items": [1, 2, 3]}))) }),
        )
        .route(
            "/widgets",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"detail": "Asset code already exists"})),
                )
            }),
        );
    let downstream_addr = spawn(downstream).await;
    let gateway_addr = spawn_gateway(registry(&[("equipment", downstream_addr)])).await;

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/api/equipment/widgets", gateway_addr))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["items"], json!([1, 2, 3]));

    let response = client
        .post(format!("http://{}/api/equipment/widgets", gateway_addr))
        .json(&json!({"asset_code": "EQ-001"}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["detail"], "Asset code already exists");
}

#[tokio::test]
async fn empty_downstream_body_becomes_an_empty_object() {
    let downstream = Router::new().route("/nothing", get(|| async { "" }));
    let downstream_addr = spawn(downstream).await;
    let gateway_addr = spawn_gateway(registry(&[("auth", downstream_addr)])).await;

    let response = reqwest::get(format!("http://{}/api/auth/nothing", gateway_addr))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn binary_downloads_keep_upstream_headers_and_bytes() {
    let downstream = Router::new().route(
        "/equipment/pdf",
        get(|| async {
            (
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"equipment_report.pdf\"",
                    ),
                    (header::CACHE_CONTROL, "no-store"),
                ],
                &b"%PDF-1.4 not a real report"[..],
            )
        }),
    );
    let downstream_addr = spawn(downstream).await;
    let gateway_addr = spawn_gateway(registry(&[("reports", downstream_addr)])).await;

    let response = reqwest::get(format!("http://{}/api/reports/equipment/pdf", gateway_addr))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"equipment_report.pdf\""
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    let bytes = response.bytes().await.expect("No body");
    assert_eq!(&bytes[..], b"%PDF-1.4 not a real report");
}

#[tokio::test]
async fn unknown_service_is_rejected_without_downstream_contact() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let downstream = Router::new().route(
        "/anything",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                "hit"
            }
        }),
    );
    let downstream_addr = spawn(downstream).await;
    let gateway_addr = spawn_gateway(registry(&[("auth", downstream_addr)])).await;

    let response = reqwest::get(format!("http://{}/api/billing/anything", gateway_addr))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["detail"], "Unknown service: billing");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn plural_provider_alias_routes_to_the_provider_service() {
    let downstream =
        Router::new().route("/providers", get(|| async { Json(json!({"ok": true})) }));
    let downstream_addr = spawn(downstream).await;
    let gateway_addr = spawn_gateway(registry(&[("provider", downstream_addr)])).await;

    let response = reqwest::get(format!("http://{}/api/providers/providers", gateway_addr))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn unreachable_downstream_maps_to_503_naming_the_service() {
    // nothing listens on port 1
    let registry: IndexMap<String, String> =
        [("reports".to_string(), "http://127.0.0.1:1".to_string())]
            .into_iter()
            .collect();
    let gateway_addr = spawn_gateway(registry).await;

    let response = reqwest::get(format!(
        "http://{}/api/reports/dashboard/statistics",
        gateway_addr
    ))
    .await
    .expect("Request failed");
    assert_eq!(response.status(), 503);
    let body: Value = response.json().await.expect("Invalid JSON");
    let detail = body["detail"].as_str().expect("No detail");
    assert!(detail.contains("reports"), "detail was: {}", detail);
}

#[tokio::test]
async fn health_reports_each_service_independently() {
    let healthy = Router::new().route("/health", get(|| async { Json(json!({"status": "healthy"})) }));
    let unhealthy = Router::new().route(
        "/health",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
    );
    let healthy_addr = spawn(healthy).await;
    let unhealthy_addr = spawn(unhealthy).await;

    let mut registry = registry(&[("auth", healthy_addr), ("equipment", unhealthy_addr)]);
    registry.insert("reports".to_string(), "http://127.0.0.1:1".to_string());
    let gateway_addr = spawn_gateway(registry).await;

    let response = reqwest::get(format!("http://{}/health", gateway_addr))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["gateway"], "healthy");
    assert_eq!(body["services"]["auth"], "healthy");
    assert_eq!(body["services"]["equipment"], "unhealthy");
    assert_eq!(body["services"]["reports"], "unreachable");
}

#[tokio::test]
async fn info_route_lists_the_known_services() {
    let gateway_addr = spawn_gateway(
        [("auth".to_string(), "http://127.0.0.1:1".to_string())]
            .into_iter()
            .collect(),
    )
    .await;

    let response = reqwest::get(format!("http://{}/", gateway_addr))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["services"], json!(["auth"]));
}
