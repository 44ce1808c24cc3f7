//! File metadata models, blob conversion, and the cached view path.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::gateway::{FilesApi, GatewayError};
use crate::store::{CachedBlob, Store};

/// Server-assigned file identifier
pub type FileId = i64;

/// Metadata for a stored file.
///
/// The client holds a read-only, refreshable snapshot of these; a full
/// list re-fetch replaces the snapshot wholesale.
#[derive(Clone, Debug, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    /// Server-side storage path of the content
    pub file: String,
    pub filename: String,
    /// Size in bytes, non-negative
    pub size: i64,
    /// Content type label as reported by the server
    #[serde(rename = "type")]
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub owner: Option<String>,
}

/// Binary response body plus its content-type header
#[derive(Clone, Debug)]
pub struct BinaryPayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Errors converting a binary payload into a renderable data URI
#[derive(Debug, Eq, Error, PartialEq)]
pub enum ConversionError {
    /// The payload carried no content
    #[error("Failed to convert file to a viewable format")]
    EmptyPayload,

    /// The content-type header was missing or unusable
    #[error("Failed to convert file to a viewable format")]
    MissingContentType,
}

/// Errors from the cached file view path
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Convert fetched binary content into an inline-renderable data URI.
///
/// Failure leaves the cache untouched; the caller surfaces it as a
/// transient notification.
pub fn to_data_uri(payload: &BinaryPayload) -> Result<CachedBlob, ConversionError> {
    if payload.bytes.is_empty() {
        return Err(ConversionError::EmptyPayload);
    }
    let content_type = payload.content_type.trim();
    if content_type.is_empty() || !content_type.contains('/') {
        return Err(ConversionError::MissingContentType);
    }
    let encoded = BASE64.encode(&payload.bytes);
    Ok(CachedBlob {
        content: format!("data:{content_type};base64,{encoded}"),
        content_type: content_type.to_string(),
    })
}

/// Cache key for an owned file
pub fn file_cache_key(id: FileId) -> String {
    format!("file-{id}")
}

/// Cache key for a shared link
pub fn shared_cache_key(share_id: &str) -> String {
    format!("shared-file-{share_id}")
}

/// View a file through the blob cache.
///
/// A hit returns immediately with no network call. On a miss the content
/// is fetched, converted, cached, and returned. Cache read/write failures
/// degrade to a fetch rather than failing the view.
pub async fn view_file(
    store: &Store,
    api: &dyn FilesApi,
    id: FileId,
) -> Result<CachedBlob, ViewError> {
    fetch_through_cache(store, &file_cache_key(id), api.fetch_file(id)).await
}

/// View a shared file through the blob cache, keyed by share identifier.
pub async fn view_shared_file(
    store: &Store,
    api: &dyn FilesApi,
    share_id: &str,
) -> Result<CachedBlob, ViewError> {
    fetch_through_cache(store, &shared_cache_key(share_id), api.fetch_shared_file(share_id)).await
}

async fn fetch_through_cache(
    store: &Store,
    key: &str,
    fetch: impl Future<Output = Result<BinaryPayload, GatewayError>>,
) -> Result<CachedBlob, ViewError> {
    match store.cache_get(key) {
        Ok(Some(hit)) => return Ok(hit),
        Ok(None) => {}
        Err(e) => log::warn!("cache read failed for {key}: {e}"),
    }

    let payload = fetch.await?;
    let blob = to_data_uri(&payload)?;

    // Last writer wins on concurrent views of the same key; content for a
    // given id is immutable once uploaded.
    if let Err(e) = store.cache_put(key, &blob) {
        log::warn!("cache write failed for {key}: {e}");
    }

    Ok(blob)
}
