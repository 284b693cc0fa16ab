//! End-to-end API tests against a running deployment
//!
//! These expect the full stack (gateway + services + Postgres) to be up,
//! with the default admin/admin account seeded.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8000/api";

/// Helper to get an admin token through the gateway
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_gateway_health() {
    let client = Client::new();

    let response = client
        .get("http://localhost:8000/health")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["gateway"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_asset_code_conflict() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let equipment = json!({
        "asset_code": "TEST-DUP-001",
        "name": "Test laptop",
        "purchase_date": "2024-01-15",
        "warranty_months": 12
    });

    let first = client
        .post(format!("{}/equipment/equipment", BASE_URL))
        .bearer_auth(&token)
        .json(&equipment)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);
    let created: Value = first.json().await.expect("Failed to parse response");
    // warranty runs 12 months from the purchase date
    assert_eq!(created["warranty_end_date"], "2025-01-15");

    let second = client
        .post(format!("{}/equipment/equipment", BASE_URL))
        .bearer_auth(&token)
        .json(&equipment)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);

    // cleanup
    let id = created["id"].as_i64().expect("No id");
    client
        .delete(format!("{}/equipment/equipment/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete");
}

#[tokio::test]
#[ignore]
async fn test_move_appends_history() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let location: Value = client
        .post(format!("{}/equipment/locations", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"building": "Test Building"}))
        .send()
        .await
        .expect("Failed to create location")
        .json()
        .await
        .expect("Failed to parse location");

    let equipment: Value = client
        .post(format!("{}/equipment/equipment", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "asset_code": "TEST-MOVE-001",
            "name": "Movable printer"
        }))
        .send()
        .await
        .expect("Failed to create equipment")
        .json()
        .await
        .expect("Failed to parse equipment");
    let id = equipment["id"].as_i64().expect("No id");

    let moved = client
        .post(format!("{}/equipment/equipment/{}/move", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({
            "location_id": location["id"],
            "move_date": "2024-06-01",
            "reason": "Office reshuffle"
        }))
        .send()
        .await
        .expect("Failed to move");
    assert_eq!(moved.status(), 200);
    let moved: Value = moved.json().await.expect("Failed to parse move response");
    assert_eq!(moved["current_location_id"], location["id"]);

    let history: Value = client
        .get(format!("{}/equipment/equipment/{}/history", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch history")
        .json()
        .await
        .expect("Failed to parse history");
    let entries = history.as_array().expect("History is not an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["location"]["id"], location["id"]);

    client
        .delete(format!("{}/equipment/equipment/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete");
}

#[tokio::test]
#[ignore]
async fn test_provider_delete_blocked_by_active_contract() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let provider: Value = client
        .post(format!("{}/providers/providers", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": "Test Provider SA", "ruc": "20123456789"}))
        .send()
        .await
        .expect("Failed to create provider")
        .json()
        .await
        .expect("Failed to parse provider");

    let contract = client
        .post(format!("{}/providers/contracts", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "provider_id": provider["id"],
            "contract_number": "TEST-CT-001",
            "start_date": "2024-01-01"
        }))
        .send()
        .await
        .expect("Failed to create contract");
    assert_eq!(contract.status(), 201);
    let contract: Value = contract.json().await.expect("Failed to parse contract");

    let blocked = client
        .delete(format!(
            "{}/providers/providers/{}",
            BASE_URL, provider["id"]
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(blocked.status(), 409);

    // cleanup: remove the contract first, then the provider
    client
        .delete(format!(
            "{}/providers/contracts/{}",
            BASE_URL, contract["id"]
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete contract");
    let deleted = client
        .delete(format!(
            "{}/providers/providers/{}",
            BASE_URL, provider["id"]
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete provider");
    assert_eq!(deleted.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_equipment_excel_download() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/reports/equipment/excel", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("equipment_report_"));

    let bytes = response.bytes().await.expect("Failed to read body");
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
#[ignore]
async fn test_dashboard_statistics_shape() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/reports/dashboard/statistics", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_equipment"].is_number());
    assert!(body["equipment_by_status"].is_array());
    assert!(body["maintenance_costs_by_month"].is_array());
    assert!(body["top_providers"].is_array());
}
