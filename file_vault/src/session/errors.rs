//! Session error types.

use thiserror::Error;

/// Errors produced while validating or applying session transitions.
///
/// Transition failures are absorbed into [`SessionState`] as messages; this
/// type exists for the validation seams that run before a network call.
///
/// [`SessionState`]: super::SessionState
#[derive(Debug, Error)]
pub enum SessionError {
    /// Username format invalid
    #[error("Username must be at least {min} characters")]
    UsernameTooShort { min: usize },

    /// Email format invalid
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Password too short
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Password confirmation mismatch
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Registration role must be admin or user
    #[error("Invalid role selection")]
    InvalidRole,
}

/// Result type for session validation
pub type SessionResult<T> = Result<T, SessionError>;
