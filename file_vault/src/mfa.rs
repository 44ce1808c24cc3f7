//! MFA challenge flow state machine.
//!
//! Tracks where an account stands in the enrollment/verification sequence:
//!
//! ```text
//! Unenrolled -> Enrolling -> AwaitingVerification -> Verified
//! ```
//!
//! Two extra paths exist beyond the straight line: a login answered with
//! the MFA-required discriminator jumps directly to `AwaitingVerification`
//! (the account enrolled in an earlier session), and a user may decline
//! enrollment entirely, leaving the flow at `Unenrolled` as a legitimate
//! terminal state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of digits in a TOTP code
pub const TOTP_DIGITS: usize = 6;

/// Errors from the MFA flow
#[derive(Debug, Eq, Error, PartialEq)]
pub enum MfaError {
    /// The requested transition is not legal from the current state
    #[error("can't {event} while {from}")]
    InvalidTransition { from: MfaFlow, event: &'static str },

    /// Code format rejected before any network call
    #[error("TOTP must be exactly {TOTP_DIGITS} digits")]
    MalformedCode,
}

/// Result type for MFA flow operations
pub type MfaResult<T> = Result<T, MfaError>;

/// Enrollment/verification state for the current session
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum MfaFlow {
    #[default]
    Unenrolled,
    Enrolling,
    AwaitingVerification,
    Verified,
}

impl fmt::Display for MfaFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Unenrolled => "unenrolled",
            Self::Enrolling => "enrolling",
            Self::AwaitingVerification => "awaiting verification",
            Self::Verified => "verified",
        };
        write!(f, "{repr}")
    }
}

impl MfaFlow {
    /// Start at the beginning of the flow
    pub fn new() -> Self {
        Self::default()
    }

    /// User opts in to MFA; the enable request goes out
    pub fn opt_in(&mut self) -> MfaResult<()> {
        match self {
            Self::Unenrolled => {
                *self = Self::Enrolling;
                Ok(())
            }
            from => Err(MfaError::InvalidTransition {
                from: *from,
                event: "opt in",
            }),
        }
    }

    /// Server confirmed enablement; the QR provisioning step begins
    pub fn enrollment_confirmed(&mut self) -> MfaResult<()> {
        match self {
            Self::Enrolling => {
                *self = Self::AwaitingVerification;
                Ok(())
            }
            from => Err(MfaError::InvalidTransition {
                from: *from,
                event: "confirm enrollment",
            }),
        }
    }

    /// A login response demanded MFA: jump straight to the verification
    /// step regardless of how far enrollment got in this session.
    pub fn challenge(&mut self) -> MfaResult<()> {
        match self {
            Self::Verified => Err(MfaError::InvalidTransition {
                from: *self,
                event: "re-challenge",
            }),
            _ => {
                *self = Self::AwaitingVerification;
                Ok(())
            }
        }
    }

    /// A six-digit code was accepted by the server
    pub fn verified(&mut self) -> MfaResult<()> {
        match self {
            Self::AwaitingVerification => {
                *self = Self::Verified;
                Ok(())
            }
            from => Err(MfaError::InvalidTransition {
                from: *from,
                event: "verify",
            }),
        }
    }

    /// User declines enrollment and proceeds without MFA.
    ///
    /// Only legal before enrollment starts; the flow stays at
    /// `Unenrolled`, which is a valid terminal state rather than a
    /// failure.
    pub fn skip(&mut self) -> MfaResult<()> {
        match self {
            Self::Unenrolled => Ok(()),
            from => Err(MfaError::InvalidTransition {
                from: *from,
                event: "skip",
            }),
        }
    }
}

/// Check a TOTP code's shape before letting it anywhere near the network:
/// exactly six ASCII digits.
pub fn validate_totp_format(code: &str) -> MfaResult<()> {
    if code.len() != TOTP_DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(MfaError::MalformedCode);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Straight-line flow ===

    #[test]
    fn test_full_enrollment_flow() {
        let mut flow = MfaFlow::new();
        assert_eq!(flow, MfaFlow::Unenrolled);
        flow.opt_in().unwrap();
        assert_eq!(flow, MfaFlow::Enrolling);
        flow.enrollment_confirmed().unwrap();
        assert_eq!(flow, MfaFlow::AwaitingVerification);
        flow.verified().unwrap();
        assert_eq!(flow, MfaFlow::Verified);
    }

    #[test]
    fn test_login_challenge_shortcut() {
        // Previously-enrolled account: login jumps straight to the
        // verification step without an opt-in this session.
        let mut flow = MfaFlow::new();
        flow.challenge().unwrap();
        assert_eq!(flow, MfaFlow::AwaitingVerification);
        flow.verified().unwrap();
        assert_eq!(flow, MfaFlow::Verified);
    }

    #[test]
    fn test_skip_is_a_legitimate_terminal_state() {
        let mut flow = MfaFlow::new();
        flow.skip().unwrap();
        assert_eq!(flow, MfaFlow::Unenrolled);
    }

    // === Illegal transitions ===

    #[test]
    fn test_verify_requires_awaiting_state() {
        let mut flow = MfaFlow::new();
        let result = flow.verified();
        assert!(matches!(result, Err(MfaError::InvalidTransition { .. })));
        assert_eq!(flow, MfaFlow::Unenrolled);
    }

    #[test]
    fn test_opt_in_twice_rejected() {
        let mut flow = MfaFlow::new();
        flow.opt_in().unwrap();
        assert!(flow.opt_in().is_err());
    }

    #[test]
    fn test_challenge_after_verified_rejected() {
        let mut flow = MfaFlow::new();
        flow.challenge().unwrap();
        flow.verified().unwrap();
        assert!(flow.challenge().is_err());
    }

    #[test]
    fn test_skip_after_opt_in_rejected() {
        let mut flow = MfaFlow::new();
        flow.opt_in().unwrap();
        assert!(flow.skip().is_err());
    }

    // === Code format validation ===

    #[test]
    fn test_totp_format_accepts_six_digits() {
        assert!(validate_totp_format("123456").is_ok());
        assert!(validate_totp_format("000000").is_ok());
    }

    #[test]
    fn test_totp_format_rejects_wrong_length() {
        assert_eq!(validate_totp_format(""), Err(MfaError::MalformedCode));
        assert_eq!(validate_totp_format("12345"), Err(MfaError::MalformedCode));
        assert_eq!(validate_totp_format("1234567"), Err(MfaError::MalformedCode));
    }

    #[test]
    fn test_totp_format_rejects_non_digits() {
        assert_eq!(validate_totp_format("12a456"), Err(MfaError::MalformedCode));
        assert_eq!(validate_totp_format("12 456"), Err(MfaError::MalformedCode));
        // Unicode digits outside ASCII don't count.
        assert_eq!(validate_totp_format("１２３４５６"), Err(MfaError::MalformedCode));
    }
}
