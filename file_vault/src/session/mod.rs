//! Session module providing the client-side authentication state manager.
//!
//! The manager is an explicit, injected state container: the UI holds it by
//! reference and mutates it only through the named transitions
//! (register, login, enable MFA, verify MFA, logout). Every transition
//! absorbs its failure path into state as a human-readable message, so
//! callers never handle transport errors themselves.
//!
//! ## Example
//!
//! ```
//! use file_vault::session::{Role, SessionManager, SessionProfile};
//!
//! let mut session = SessionManager::new();
//! session.restore(SessionProfile {
//!     username: "alice1".to_string(),
//!     email: "a@x.com".to_string(),
//!     role: Role::Admin,
//!     is_mfa_enabled: true,
//! });
//! assert!(session.is_admin());
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{SessionError, SessionResult};
pub use manager::SessionManager;
pub use models::{
    LoginRequest, LoginResponse, MFA_REQUIRED, ProfileData, RegisterRequest, Role, SessionProfile,
    SessionState, VerifiedProfile, VerifyMfaRequest,
};
