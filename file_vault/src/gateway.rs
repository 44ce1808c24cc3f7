//! Gateway trait definitions for testability and dependency injection.
//!
//! The session manager and the file view path only ever see these traits;
//! the client binary provides an HTTP implementation, and tests provide
//! mocks with call counters. The gateway is a pure transport shim: no
//! retries, no backoff, no response interpretation beyond decoding.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::files::{BinaryPayload, FileId, FileRecord};
use crate::session::{LoginRequest, LoginResponse, RegisterRequest, VerifiedProfile, VerifyMfaRequest};
use crate::users::UserRecord;

/// Errors surfaced by a gateway implementation
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connection refused, timeout, DNS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("{0}")]
    Rejected(String),

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Standard response envelope used by the file-storage API.
///
/// `code` is an optional discriminator (e.g. `"MFA_REQUIRED"`); `data` is
/// absent whenever the discriminator says the payload is not yet available.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub code: Option<String>,
    pub data: Option<T>,
}

/// Authentication operations
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Register a new account
    async fn register(&self, request: &RegisterRequest) -> GatewayResult<()>;

    /// Login with username and password
    async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse>;

    /// Invalidate the server-side session
    async fn logout(&self) -> GatewayResult<()>;

    /// Enable MFA for the logged-in account
    async fn enable_mfa(&self) -> GatewayResult<()>;

    /// Fetch the TOTP provisioning QR image (binary)
    async fn mfa_qr_code(&self) -> GatewayResult<Vec<u8>>;

    /// Submit a six-digit TOTP and receive the verified profile
    async fn verify_mfa(&self, request: &VerifyMfaRequest) -> GatewayResult<VerifiedProfile>;
}

/// File storage operations
#[async_trait]
pub trait FilesApi: Send + Sync {
    /// Fetch the full file list snapshot
    async fn list_files(&self) -> GatewayResult<Vec<FileRecord>>;

    /// Fetch a file's binary content and content type
    async fn fetch_file(&self, id: FileId) -> GatewayResult<BinaryPayload>;

    /// Upload a file as a multipart form (field `file`)
    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> GatewayResult<()>;

    /// Delete a file by id
    async fn delete_file(&self, id: FileId) -> GatewayResult<()>;

    /// Create a share link, returning the share identifier
    async fn share_file(&self, id: FileId) -> GatewayResult<String>;

    /// Fetch a shared file's binary content by share identifier
    async fn fetch_shared_file(&self, share_id: &str) -> GatewayResult<BinaryPayload>;
}

/// Admin roster operations
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Fetch the user roster (admin only)
    async fn list_users(&self) -> GatewayResult<Vec<UserRecord>>;
}
