//! Machine API integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_machine_success() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/v1/machines")
        .json(&json!({ "name": "Snack Hub" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(!body["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_machine_with_empty_name_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/v1/machines")
        .json(&json!({ "name": "" }))
        .await;

    response.assert_status_bad_request();
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn list_machines_returns_created_machines() {
    let harness = TestHarness::new();

    let a = harness.create_machine("Machine A").await;
    let b = harness.create_machine("Machine B").await;

    let response = harness.server.get("/api/v1/machines").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let machines = body.as_array().unwrap();
    assert_eq!(machines.len(), 2);

    let ids: Vec<&str> = machines
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&a.as_str()));
    assert!(ids.contains(&b.as_str()));
}

#[tokio::test]
async fn list_machines_empty() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/v1/machines").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

// ============================================================================
// Get
// ============================================================================

#[tokio::test]
async fn get_machine_returns_inventory() {
    let harness = TestHarness::new();
    let id = harness.create_machine("Lobby").await;

    harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({
            "items": [
                { "name": "Soda", "cost_pennies": 150, "quantity": 10 },
                { "name": "Chips", "cost_pennies": 100, "quantity": 7 }
            ]
        }))
        .await
        .assert_status_ok();

    let response = harness.server.get(&format!("/api/v1/machines/{id}")).await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Lobby");
    let inventory = body["inventory"].as_array().unwrap();
    assert_eq!(inventory.len(), 2);
}

#[tokio::test]
async fn get_unknown_machine_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/v1/machines/00000000-0000-4000-8000-000000000000")
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn get_machine_with_malformed_id_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/v1/machines/not-a-uuid").await;

    response.assert_status_bad_request();
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_machine_removes_it_and_its_inventory() {
    let harness = TestHarness::new();
    let id = harness.create_machine("Lobby").await;

    harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({
            "items": [{ "name": "Soda", "cost_pennies": 150, "quantity": 10 }]
        }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .delete(&format!("/api/v1/machines/{id}"))
        .await;
    response.assert_status_ok();

    let response = harness.server.get(&format!("/api/v1/machines/{id}")).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn delete_unknown_machine_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .delete("/api/v1/machines/00000000-0000-4000-8000-000000000000")
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Restock
// ============================================================================

#[tokio::test]
async fn restock_returns_previous_inventory() {
    let harness = TestHarness::new();
    let id = harness.create_machine("Lobby").await;

    // First restock: nothing there before.
    let response = harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({
            "items": [
                { "name": "Soda", "cost_pennies": 150, "quantity": 5 },
                { "name": "Chips", "cost_pennies": 100, "quantity": 2 }
            ]
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["previous_inventory"].as_array().unwrap().len(), 0);

    // Second restock: previous snapshot is the first one.
    let response = harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({
            "items": [
                { "name": "Soda", "cost_pennies": 150, "quantity": 10 },
                { "name": "Chips", "cost_pennies": 100, "quantity": 5 },
                { "name": "Candy", "cost_pennies": 125, "quantity": 3 }
            ]
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let previous = body["previous_inventory"].as_array().unwrap();
    assert_eq!(previous.len(), 2);

    let soda = previous.iter().find(|e| e["name"] == "Soda").unwrap();
    assert_eq!(soda["quantity"], 5);

    // The stored state is the new one.
    let response = harness.server.get(&format!("/api/v1/machines/{id}")).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["inventory"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn restock_with_empty_items_clears_inventory() {
    let harness = TestHarness::new();
    let id = harness.create_machine("Lobby").await;

    harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({
            "items": [{ "name": "Juice", "cost_pennies": 200, "quantity": 1 }]
        }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({ "items": [] }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["previous_inventory"].as_array().unwrap().len(), 1);

    let response = harness.server.get(&format!("/api/v1/machines/{id}")).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["inventory"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn restock_rejects_null_items() {
    let harness = TestHarness::new();
    let id = harness.create_machine("Lobby").await;

    let response = harness
        .server
        .post(&format!("/api/v1/machines/{id}/restock"))
        .json(&json!({
            "items": [
                { "name": "Soda", "cost_pennies": 150, "quantity": 5 },
                null
            ]
        }))
        .await;

    response.assert_status_bad_request();

    // Nothing was written.
    let response = harness.server.get(&format!("/api/v1/machines/{id}")).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["inventory"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn restock_unknown_machine_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/v1/machines/00000000-0000-4000-8000-000000000000/restock")
        .json(&json!({
            "items": [{ "name": "Soda", "cost_pennies": 150, "quantity": 5 }]
        }))
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_endpoint_is_public() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "vendhub");
}
