//! # File Vault
//!
//! Client-side core for a file-storage service: session state management,
//! TOTP multi-factor authentication flow, and a durable on-device cache for
//! viewed file content.
//!
//! All network access goes through the async traits in [`gateway`]; the
//! library itself never opens a socket. A thin client binary supplies the
//! HTTP implementation and drives the components from its UI loop:
//!
//! - [`session`]: the session state manager and its five transitions
//!   (register, login, enable MFA, verify MFA, logout)
//! - [`mfa`]: the enrollment/verification state machine and code validation
//! - [`store`]: durable on-device storage (persisted profile + blob cache)
//! - [`files`] / [`users`]: wire models for file metadata and the admin
//!   roster
//!
//! ## Example
//!
//! ```no_run
//! use file_vault::session::SessionManager;
//!
//! let mut session = SessionManager::new();
//! assert!(!session.is_admin());
//! ```

/// Gateway trait seams between the core and the network layer.
pub mod gateway;
pub use gateway::{AuthApi, FilesApi, GatewayError, GatewayResult, UsersApi};

/// Session state manager and auth transitions.
pub mod session;
pub use session::{Role, SessionManager, SessionProfile, SessionState};

/// MFA challenge flow state machine.
pub mod mfa;
pub use mfa::{MfaError, MfaFlow, validate_totp_format};

/// Durable on-device storage: session persistence and the blob cache.
pub mod store;
pub use store::{CachedBlob, Store, StoreError};

/// File metadata models and blob conversion.
pub mod files;
pub use files::{BinaryPayload, FileId, FileRecord, to_data_uri};

/// Admin roster models.
pub mod users;
pub use users::UserRecord;
