//! Integration tests for the onramp API
//!
//! These tests exercise the REST surface end to end and need a running
//! server (and a reachable cluster) behind ONRAMP_TEST_URL, so they are
//! ignored by default.
//!
//! Run with: cargo test --test api_tests -- --ignored

mod common;

use common::{api_base, create_test_client, with_auth};
use serde_json::{json, Value};

const TEST_USER: &str = "onramp-test-user";
const TEST_PROJECT: &str = "onramp-test-project";

#[tokio::test]
#[ignore]
async fn test_healthz_requires_no_auth() {
    let client = create_test_client();

    let response = client
        .get(format!("{}/healthz", api_base()))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
#[ignore]
async fn test_protected_routes_reject_missing_auth() {
    let client = create_test_client();

    let response = client
        .get(format!("{}/users/{}", api_base(), TEST_USER))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], true);
}

#[tokio::test]
#[ignore]
async fn test_user_lifecycle() {
    let client = create_test_client();
    let base = api_base();

    // Create
    let response = with_auth(client.post(format!("{base}/users")))
        .json(&json!({"name": TEST_USER, "fullName": "Onramp Test User"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], false);
    assert_eq!(body["user"]["metadata"]["name"], TEST_USER);

    // Creating the same user again conflicts
    let response = with_auth(client.post(format!("{base}/users")))
        .json(&json!({"name": TEST_USER}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 409);

    // Get
    let response = with_auth(client.get(format!("{base}/users/{TEST_USER}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);

    // Delete
    let response = with_auth(client.delete(format!("{base}/users/{TEST_USER}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);

    // Deleting again is a 404
    let response = with_auth(client.delete(format!("{base}/users/{TEST_USER}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], true);
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_project_lifecycle_with_quotas() {
    let client = create_test_client();
    let base = api_base();

    // Create project
    let response = with_auth(client.post(format!("{base}/projects")))
        .json(&json!({"name": TEST_PROJECT, "requester": "tester"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);

    // Invalid names are rejected with a suggestion
    let response = with_auth(client.post(format!("{base}/projects")))
        .json(&json!({"name": "Bad Name", "requester": "tester"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("bad-name"));

    // Apply quotas
    let response = with_auth(client.put(format!("{base}/projects/{TEST_PROJECT}/quotas")))
        .json(&json!({"multiplier": 2}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], false);
    assert!(body["quotas"].is_array());
    assert!(body["limits"].is_array());

    // A non-positive multiplier is a validation error
    let response = with_auth(client.put(format!("{base}/projects/{TEST_PROJECT}/quotas")))
        .json(&json!({"multiplier": 0}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 400);

    // Clear quotas and delete the project
    let response = with_auth(client.delete(format!("{base}/projects/{TEST_PROJECT}/quotas")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);

    let response = with_auth(client.delete(format!("{base}/projects/{TEST_PROJECT}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 200);

    // Deleting a nonexistent project yields 404 with the error envelope
    let response = with_auth(client.delete(format!("{base}/projects/{TEST_PROJECT}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], true);
}

#[tokio::test]
#[ignore]
async fn test_role_lifecycle() {
    let client = create_test_client();
    let base = api_base();

    with_auth(client.post(format!("{base}/users")))
        .json(&json!({"name": TEST_USER}))
        .send()
        .await
        .expect("request failed");
    with_auth(client.post(format!("{base}/projects")))
        .json(&json!({"name": TEST_PROJECT, "requester": "tester"}))
        .send()
        .await
        .expect("request failed");

    let role_url =
        format!("{base}/users/{TEST_USER}/projects/{TEST_PROJECT}/roles/admin");

    // Not a member yet
    let response = with_auth(client.get(&role_url)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"]["has_role"], false);

    // Grant, then check
    let response = with_auth(client.put(&role_url)).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let response = with_auth(client.get(&role_url)).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"]["has_role"], true);

    // Revoke
    let response = with_auth(client.delete(&role_url)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"]["has_role"], false);

    // Unknown role names are a validation error
    let bad_url =
        format!("{base}/users/{TEST_USER}/projects/{TEST_PROJECT}/roles/sudoer");
    let response = with_auth(client.get(&bad_url)).send().await.unwrap();
    assert_eq!(response.status(), 400);

    // Cleanup
    with_auth(client.delete(format!("{base}/projects/{TEST_PROJECT}")))
        .send()
        .await
        .expect("request failed");
    with_auth(client.delete(format!("{base}/users/{TEST_USER}")))
        .send()
        .await
        .expect("request failed");
}
