//! Durable on-device storage.
//!
//! A single SQLite database in the platform data directory holds both the
//! persisted session profile and the blob cache. The store is process-wide
//! and unsynchronized; a single active client is assumed, and concurrent
//! cache writes resolve to last-writer-wins.

pub mod cache;
pub mod database;
pub mod errors;
pub mod profile;

pub use cache::{CachedBlob, DEFAULT_CACHE_CAP_BYTES};
pub use database::Store;
pub use errors::{StoreError, StoreResult};
