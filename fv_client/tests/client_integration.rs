//! Integration tests for fv_client network functionality.
//!
//! Tests network error handling against unreachable or wrong endpoints;
//! no server is required.

use std::time::Duration;

use file_vault::gateway::{AuthApi, FilesApi, GatewayError, UsersApi};
use file_vault::session::{LoginRequest, RegisterRequest, Role};
use fv_client::api_client::ApiClient;
use tokio::time::timeout;

fn login_request() -> LoginRequest {
    LoginRequest {
        username: "testuser".to_string(),
        password: "password1".to_string(),
    }
}

fn register_request() -> RegisterRequest {
    let rand_id: u32 = rand::random();
    RegisterRequest {
        username: format!("testuser_{}", rand_id % 100000),
        email: "t@example.com".to_string(),
        password: "password1".to_string(),
        role: Role::User,
    }
}

// ============================================================================
// Network Error Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    // Try to connect to an invalid port
    let client = ApiClient::new("http://localhost:19999").unwrap();

    let result = client.login(&login_request()).await;

    assert!(result.is_err(), "Should fail when server is not available");
    assert!(
        matches!(result, Err(GatewayError::Network(_))),
        "Connection failure should surface as a network error"
    );
}

#[tokio::test]
async fn test_timeout_handling() {
    // Non-routable IP: either times out or fails with a connection error
    let client = ApiClient::new("http://192.0.2.1:80").unwrap();

    let result = timeout(Duration::from_secs(3), client.login(&login_request())).await;

    assert!(
        result.is_err() || result.unwrap().is_err(),
        "Should fail when connecting to unreachable host"
    );
}

#[tokio::test]
async fn test_invalid_hostname() {
    let client = ApiClient::new("http://invalid-hostname-that-does-not-exist.local").unwrap();

    let result = client.register(&register_request()).await;

    assert!(result.is_err(), "Should fail with invalid hostname");
}

#[tokio::test]
async fn test_network_error_on_list_files() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    let result = client.list_files().await;

    assert!(result.is_err(), "Should fail when server is not available");
}

#[tokio::test]
async fn test_network_error_on_list_users() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    let result = client.list_users().await;

    assert!(result.is_err(), "Should fail when server is not available");
}

#[tokio::test]
async fn test_network_error_on_binary_fetch() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    assert!(client.fetch_file(1).await.is_err());
    assert!(client.fetch_shared_file("abc123").await.is_err());
    assert!(client.mfa_qr_code().await.is_err());
}

// ============================================================================
// Connection State Tests
// ============================================================================

#[tokio::test]
async fn test_client_state_after_failed_request() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    // First request fails
    let result1 = client.login(&login_request()).await;
    assert!(result1.is_err());

    // Client should still be usable after failures
    let result2 = client.list_files().await;
    assert!(result2.is_err());
}

#[tokio::test]
async fn test_concurrent_api_calls() {
    let mut handles = vec![];

    for _ in 0..5 {
        let client = ApiClient::new("http://localhost:19999").unwrap();
        let handle = tokio::spawn(async move { client.list_files().await });
        handles.push(handle);
    }

    let mut error_count = 0;
    for handle in handles {
        let result = handle.await.expect("Task should complete");
        if result.is_err() {
            error_count += 1;
        }
    }

    assert_eq!(
        error_count, 5,
        "All concurrent requests should fail without server"
    );
}

// ============================================================================
// URL Construction Tests
// ============================================================================

#[tokio::test]
async fn test_url_with_trailing_slash() {
    let client = ApiClient::new("http://localhost:19999/").unwrap();

    // URL construction should work; the call fails because nothing listens.
    let result = client.login(&login_request()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_url_with_path() {
    let client = ApiClient::new("http://localhost:19999/api").unwrap();

    let result = client.register(&register_request()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_https_url() {
    let client = ApiClient::new("https://localhost:19443").unwrap();

    let result = client.login(&login_request()).await;
    assert!(result.is_err());
}

// ============================================================================
// Retry Behavior Tests
// ============================================================================

#[tokio::test]
async fn test_no_automatic_retry_on_failure() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    let start = std::time::Instant::now();
    let result = client.login(&login_request()).await;
    let elapsed = start.elapsed();

    // Should fail quickly without retries (< 5 seconds)
    assert!(result.is_err());
    assert!(
        elapsed < Duration::from_secs(5),
        "Should not retry automatically"
    );
}

// ============================================================================
// Edge Case Tests
// ============================================================================

#[tokio::test]
async fn test_special_characters_in_credentials() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    let request = LoginRequest {
        username: "user@#$%".to_string(),
        password: "pass!@#$%^&*()".to_string(),
    };
    let result = client.login(&request).await;

    // Should handle special characters without panicking
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_and_share_error_paths() {
    let client = ApiClient::new("http://localhost:19999").unwrap();

    assert!(client.delete_file(7).await.is_err());
    assert!(client.share_file(7).await.is_err());
    assert!(client.upload_file("x.txt", b"hello".to_vec()).await.is_err());
}
