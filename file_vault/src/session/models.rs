//! Session data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator returned by the login endpoint when MFA verification is
/// still outstanding.
pub const MFA_REQUIRED: &str = "MFA_REQUIRED";

/// Account role
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    #[default]
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Guest => "guest",
        };
        write!(f, "{repr}")
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "guest" => Ok(Self::Guest),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Registration request
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Login request
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// MFA verification request
#[derive(Clone, Debug, Serialize)]
pub struct VerifyMfaRequest {
    pub token: String,
    pub username: String,
}

/// Profile fields carried by a full (non-challenged) login response
#[derive(Clone, Debug, Deserialize)]
pub struct ProfileData {
    pub email: String,
    pub role: Role,
    #[serde(rename = "isMFAEnabled")]
    pub is_mfa_enabled: bool,
}

/// Login response: either a full profile or a challenge discriminator with
/// no profile fields populated.
#[derive(Clone, Debug)]
pub struct LoginResponse {
    pub code: Option<String>,
    pub data: Option<ProfileData>,
}

impl LoginResponse {
    /// Whether this response demands MFA verification before the profile
    /// becomes trustworthy.
    pub fn is_mfa_challenge(&self) -> bool {
        self.code.as_deref() == Some(MFA_REQUIRED)
    }
}

/// Profile returned by a successful MFA verification
#[derive(Clone, Debug, Deserialize)]
pub struct VerifiedProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// The subset of session state that survives process restarts.
///
/// Never contains passwords or tokens; credentials live in the HTTP
/// client's cookie store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_mfa_enabled: bool,
}

/// Full session state: identity plus transient flags.
///
/// Transient flags (`pending`, `error`, `success`, `logout_success`,
/// `challenge_code`) never persist.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_mfa_enabled: bool,
    /// An operation is in flight; the UI disables re-submission
    pub pending: bool,
    /// Human-readable failure message from the last transition
    pub error: Option<String>,
    /// The last transition completed successfully
    pub success: bool,
    /// One-shot flag consumed by the UI to redirect after logout
    pub logout_success: bool,
    /// Challenge discriminator from the last login response
    pub challenge_code: Option<String>,
}

impl SessionState {
    /// The persistable subset of this state
    pub fn profile(&self) -> SessionProfile {
        SessionProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            is_mfa_enabled: self.is_mfa_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_default_is_guest() {
        assert_eq!(Role::default(), Role::Guest);
    }

    #[test]
    fn test_role_wire_format() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_profile_data_wire_format() {
        let data: ProfileData =
            serde_json::from_str(r#"{"email":"a@x.com","role":"user","isMFAEnabled":true}"#)
                .unwrap();
        assert_eq!(data.email, "a@x.com");
        assert_eq!(data.role, Role::User);
        assert!(data.is_mfa_enabled);
    }

    #[test]
    fn test_login_response_challenge_detection() {
        let challenged = LoginResponse {
            code: Some(MFA_REQUIRED.to_string()),
            data: None,
        };
        assert!(challenged.is_mfa_challenge());

        let plain = LoginResponse {
            code: None,
            data: None,
        };
        assert!(!plain.is_mfa_challenge());

        let other_code = LoginResponse {
            code: Some("PASSWORD_EXPIRED".to_string()),
            data: None,
        };
        assert!(!other_code.is_mfa_challenge());
    }
}
