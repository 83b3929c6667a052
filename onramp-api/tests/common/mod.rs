//! Common test utilities and helpers

use reqwest::Client;
use std::time::Duration;

/// Base URL of a running onramp API, overridable for CI environments
pub fn api_base() -> String {
    std::env::var("ONRAMP_TEST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Admin credentials matching the server under test
pub fn credentials() -> (String, String) {
    let username = std::env::var("ONRAMP_TEST_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ONRAMP_TEST_PASSWORD").unwrap_or_else(|_| "secret".to_string());
    (username, password)
}

/// Create HTTP client with default settings
pub fn create_test_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
}

/// Send an authenticated request
pub fn with_auth(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    let (username, password) = credentials();
    request.basic_auth(username, Some(password))
}
