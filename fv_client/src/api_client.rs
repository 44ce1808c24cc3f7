//! HTTP gateway for the file-storage API.
//!
//! A pure transport shim: it normalizes the base endpoint, forwards
//! caller-supplied paths and payloads verbatim, and carries the session
//! cookies automatically. No retries, no backoff, no interpretation of
//! responses beyond decoding what the caller asked for.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use file_vault::files::{BinaryPayload, FileId, FileRecord};
use file_vault::gateway::{AuthApi, Envelope, FilesApi, GatewayError, GatewayResult, UsersApi};
use file_vault::session::{
    LoginRequest, LoginResponse, ProfileData, RegisterRequest, VerifiedProfile, VerifyMfaRequest,
};
use file_vault::users::UserRecord;

/// Gateway to the file-storage server.
///
/// Credentials arrive as `Set-Cookie` on login/register and are replayed
/// automatically by the underlying cookie store on every later call.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ShareData {
    id: String,
}

impl ApiClient {
    /// Create a new gateway for the given base endpoint
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> GatewayResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Rejected(error_message(response).await))
        }
    }

    async fn fetch_binary(&self, path: &str) -> GatewayResult<BinaryPayload> {
        let response = self.send(self.client.get(self.url(path))).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(BinaryPayload {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Best-effort extraction of a human-readable message from an error body
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let fallback = format!("request failed with status {status}");
    match response.text().await {
        Ok(body) if !body.is_empty() => extract_message(&body).unwrap_or(body),
        _ => fallback,
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> GatewayResult<()> {
        self.send(self.client.post(self.url("users/")).json(request))
            .await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse> {
        let response = self
            .send(self.client.post(self.url("users/login/")).json(request))
            .await?;
        let envelope: Envelope<ProfileData> = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(LoginResponse {
            code: envelope.code,
            data: envelope.data,
        })
    }

    async fn logout(&self) -> GatewayResult<()> {
        self.send(self.client.delete(self.url("users/logout")))
            .await?;
        Ok(())
    }

    async fn enable_mfa(&self) -> GatewayResult<()> {
        self.send(
            self.client
                .post(self.url("users/mfa/enable/"))
                .json(&serde_json::json!({})),
        )
        .await?;
        Ok(())
    }

    async fn mfa_qr_code(&self) -> GatewayResult<Vec<u8>> {
        let payload = self.fetch_binary("users/mfa/qr-code").await?;
        Ok(payload.bytes)
    }

    async fn verify_mfa(&self, request: &VerifyMfaRequest) -> GatewayResult<VerifiedProfile> {
        let response = self
            .send(self.client.post(self.url("users/mfa/verify/")).json(request))
            .await?;
        let envelope: Envelope<VerifiedProfile> = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        envelope.data.ok_or_else(|| {
            GatewayError::MalformedResponse("verification response carried no profile".to_string())
        })
    }
}

#[async_trait]
impl FilesApi for ApiClient {
    async fn list_files(&self) -> GatewayResult<Vec<FileRecord>> {
        let response = self.send(self.client.get(self.url("files"))).await?;
        let envelope: Envelope<Vec<FileRecord>> = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn fetch_file(&self, id: FileId) -> GatewayResult<BinaryPayload> {
        self.fetch_binary(&format!("files?id={id}")).await
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> GatewayResult<()> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(self.client.post(self.url("files")).multipart(form))
            .await?;

        // The server signals a stored file with 201 specifically.
        if response.status() != reqwest::StatusCode::CREATED {
            return Err(GatewayError::Rejected(format!(
                "upload not stored (status {})",
                response.status()
            )));
        }
        Ok(())
    }

    async fn delete_file(&self, id: FileId) -> GatewayResult<()> {
        self.send(self.client.delete(self.url(&format!("files/?id={id}"))))
            .await?;
        Ok(())
    }

    async fn share_file(&self, id: FileId) -> GatewayResult<String> {
        let response = self
            .send(self.client.get(self.url(&format!("files/share?id={id}"))))
            .await?;
        let envelope: Envelope<ShareData> = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        envelope
            .data
            .map(|data| data.id)
            .ok_or_else(|| {
                GatewayError::MalformedResponse("share response carried no id".to_string())
            })
    }

    async fn fetch_shared_file(&self, share_id: &str) -> GatewayResult<BinaryPayload> {
        self.fetch_binary(&format!("files/shared/{share_id}")).await
    }
}

#[async_trait]
impl UsersApi for ApiClient {
    async fn list_users(&self) -> GatewayResult<Vec<UserRecord>> {
        let response = self.send(self.client.get(self.url("users"))).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.url("files"), "http://localhost:8000/api/files");

        let client = ApiClient::new("http://localhost:8000/api").unwrap();
        assert_eq!(client.url("files"), "http://localhost:8000/api/files");
    }

    #[test]
    fn test_extract_message_prefers_message_field() {
        let body = r#"{"success":false,"message":"Invalid credentials"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_extract_message_falls_back_to_error_field() {
        let body = r#"{"error":"boom"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("boom"));
    }

    #[test]
    fn test_extract_message_rejects_non_json() {
        assert!(extract_message("<html>502</html>").is_none());
        assert!(extract_message(r#"{"message":""}"#).is_none());
    }
}
