//! Session state manager implementation.

use super::{
    errors::{SessionError, SessionResult},
    models::{
        LoginRequest, RegisterRequest, Role, SessionProfile, SessionState, VerifyMfaRequest,
    },
};
use crate::gateway::AuthApi;
use crate::mfa::validate_totp_format;

/// Minimum username length accepted by the forms
pub const MIN_USERNAME_LEN: usize = 6;
/// Minimum password length accepted by the forms
pub const MIN_PASSWORD_LEN: usize = 8;

/// Client-side session state manager.
///
/// Holds identity, role, and MFA status plus the transient flags the UI
/// renders from. State is read via [`state`](Self::state) and written only
/// through the named transitions below. Failures (validation or transport)
/// are captured as a message in `state().error` and never propagated.
#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
}

impl SessionManager {
    /// Create an anonymous guest session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the session belongs to an administrator
    pub fn is_admin(&self) -> bool {
        self.state.role == Role::Admin
    }

    /// Whether the session belongs to a regular user
    pub fn is_user(&self) -> bool {
        self.state.role == Role::User
    }

    /// Adopt a profile persisted by a previous process run.
    ///
    /// Called at startup before any gated screen renders. Transient flags
    /// are left at their defaults.
    pub fn restore(&mut self, profile: SessionProfile) {
        self.state.username = profile.username;
        self.state.email = profile.email;
        self.state.role = profile.role;
        self.state.is_mfa_enabled = profile.is_mfa_enabled;
    }

    /// Reset transient flags without touching identity.
    ///
    /// The UI calls this when entering a form screen so stale
    /// error/success state from a previous screen cannot leak through.
    pub fn clear_flags(&mut self) {
        self.state.error = None;
        self.state.pending = false;
        self.state.success = false;
        self.state.logout_success = false;
    }

    /// Register a new account.
    ///
    /// Validation runs before any network call; on success the manager
    /// records `username`/`email` and sets the success flag. `role` is
    /// forwarded to the server but never adopted client-side; the server
    /// is the authority on the role actually granted.
    pub async fn register(
        &mut self,
        api: &dyn AuthApi,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: Role,
    ) {
        self.begin();

        if let Err(e) = validate_registration(username, email, password, confirm_password, role) {
            self.fail(e.to_string(), "User registration failed");
            return;
        }

        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        };

        match api.register(&request).await {
            Ok(()) => {
                self.state.username = username.to_string();
                self.state.email = email.to_string();
                self.state.pending = false;
                self.state.success = true;
                log::debug!("registered account {username}");
            }
            Err(e) => self.fail(e.to_string(), "User registration failed"),
        }
    }

    /// Login with username and password.
    ///
    /// The server answers with either a full profile or the
    /// `MFA_REQUIRED` discriminator and no profile fields. When the
    /// discriminator is present, `role`/`email`/`is_mfa_enabled` are left
    /// untouched (they are not trustworthy until verification succeeds)
    /// and callers branch navigation on `state().challenge_code` alone.
    pub async fn login(&mut self, api: &dyn AuthApi, username: &str, password: &str) {
        self.begin();

        if let Err(e) = validate_login(username, password) {
            self.fail(e.to_string(), "User login failed");
            return;
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        match api.login(&request).await {
            Ok(response) => {
                self.state.pending = false;
                self.state.success = true;
                let challenged = response.is_mfa_challenge();
                self.state.challenge_code = response.code;
                if !challenged {
                    if let Some(data) = response.data {
                        self.state.username = username.to_string();
                        self.state.email = data.email;
                        self.state.role = data.role;
                        self.state.is_mfa_enabled = data.is_mfa_enabled;
                    }
                } else {
                    // Keep the username for the verification request, but
                    // adopt nothing else until the code is accepted.
                    self.state.username = username.to_string();
                    log::debug!("login for {username} challenged with MFA");
                }
            }
            Err(e) => self.fail(e.to_string(), "User login failed"),
        }
    }

    /// Enable MFA for the logged-in account
    pub async fn enable_mfa(&mut self, api: &dyn AuthApi) {
        self.begin();

        match api.enable_mfa().await {
            Ok(()) => {
                self.state.pending = false;
                self.state.is_mfa_enabled = true;
                self.state.success = true;
            }
            Err(e) => {
                self.fail(e.to_string(), "MFA enable failed");
                self.state.is_mfa_enabled = false;
            }
        }
    }

    /// Verify a six-digit TOTP code.
    ///
    /// The format check runs before any network call. On success the
    /// manager adopts the verified profile returned by the server and the
    /// session counts as trusted.
    pub async fn verify_mfa(&mut self, api: &dyn AuthApi, totp: &str) {
        self.begin();

        if let Err(e) = validate_totp_format(totp) {
            self.fail(e.to_string(), "MFA verification failed");
            return;
        }

        let request = VerifyMfaRequest {
            token: totp.to_string(),
            username: self.state.username.clone(),
        };

        match api.verify_mfa(&request).await {
            Ok(profile) => {
                self.state.username = profile.username;
                self.state.email = profile.email;
                self.state.role = profile.role;
                self.state.is_mfa_enabled = true;
                self.state.challenge_code = None;
                self.state.pending = false;
                self.state.success = true;
                log::debug!("MFA verified for {}", self.state.username);
            }
            Err(e) => self.fail(e.to_string(), "MFA verification failed"),
        }
    }

    /// Logout, clearing identity fields and raising the one-shot
    /// `logout_success` flag the UI consumes to redirect.
    pub async fn logout(&mut self, api: &dyn AuthApi) {
        self.begin();

        match api.logout().await {
            Ok(()) => {
                self.state.username.clear();
                self.state.email.clear();
                self.state.role = Role::Guest;
                self.state.is_mfa_enabled = false;
                self.state.challenge_code = None;
                self.state.pending = false;
                self.state.success = true;
                self.state.logout_success = true;
            }
            Err(e) => self.fail(e.to_string(), "User logout failed"),
        }
    }

    /// Consume the one-shot logout flag, returning whether it was set
    pub fn take_logout_success(&mut self) -> bool {
        std::mem::take(&mut self.state.logout_success)
    }

    fn begin(&mut self) {
        self.state.error = None;
        self.state.pending = true;
    }

    fn fail(&mut self, message: String, fallback: &str) {
        self.state.error = Some(if message.is_empty() {
            fallback.to_string()
        } else {
            message
        });
        self.state.pending = false;
        self.state.success = false;
    }
}

/// Validate registration form fields before any network call
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
    role: Role,
) -> SessionResult<()> {
    if username.len() < MIN_USERNAME_LEN {
        return Err(SessionError::UsernameTooShort {
            min: MIN_USERNAME_LEN,
        });
    }
    validate_email(email)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(SessionError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if password != confirm_password {
        return Err(SessionError::PasswordMismatch);
    }
    if role == Role::Guest {
        return Err(SessionError::InvalidRole);
    }
    Ok(())
}

/// Validate login form fields before any network call
pub fn validate_login(username: &str, password: &str) -> SessionResult<()> {
    if username.len() < MIN_USERNAME_LEN {
        return Err(SessionError::UsernameTooShort {
            min: MIN_USERNAME_LEN,
        });
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(SessionError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> SessionResult<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(SessionError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(SessionError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Form validation ===

    #[test]
    fn test_validate_registration_accepts_valid_input() {
        let result = validate_registration("alice1", "a@x.com", "password1", "password1", Role::User);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_registration_rejects_short_username() {
        let result = validate_registration("al", "a@x.com", "password1", "password1", Role::User);
        assert!(matches!(result, Err(SessionError::UsernameTooShort { .. })));
    }

    #[test]
    fn test_validate_registration_rejects_bad_email() {
        for email in ["", "ax.com", "a@", "@x.com", "a@xcom"] {
            let result = validate_registration("alice1", email, "password1", "password1", Role::User);
            assert!(
                matches!(result, Err(SessionError::InvalidEmail)),
                "email {email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_registration_rejects_password_mismatch() {
        let result = validate_registration("alice1", "a@x.com", "password1", "password2", Role::User);
        assert!(matches!(result, Err(SessionError::PasswordMismatch)));
    }

    #[test]
    fn test_validate_registration_rejects_guest_role() {
        let result = validate_registration("alice1", "a@x.com", "password1", "password1", Role::Guest);
        assert!(matches!(result, Err(SessionError::InvalidRole)));
    }

    #[test]
    fn test_validate_login_rejects_short_password() {
        let result = validate_login("alice1", "short");
        assert!(matches!(result, Err(SessionError::PasswordTooShort { .. })));
    }

    // === Accessors ===

    #[test]
    fn test_new_session_is_guest() {
        let session = SessionManager::new();
        assert_eq!(session.state().role, Role::Guest);
        assert!(!session.is_admin());
        assert!(!session.is_user());
        assert!(session.state().username.is_empty());
    }

    #[test]
    fn test_restore_adopts_profile_without_flags() {
        let mut session = SessionManager::new();
        session.restore(SessionProfile {
            username: "alice1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Admin,
            is_mfa_enabled: true,
        });
        assert!(session.is_admin());
        assert!(session.state().is_mfa_enabled);
        assert!(!session.state().pending);
        assert!(session.state().error.is_none());
    }

    #[test]
    fn test_clear_flags_keeps_identity() {
        let mut session = SessionManager::new();
        session.restore(SessionProfile {
            username: "bob123".to_string(),
            email: "b@x.com".to_string(),
            role: Role::User,
            is_mfa_enabled: false,
        });
        session.state.error = Some("stale".to_string());
        session.state.success = true;
        session.clear_flags();
        assert!(session.state().error.is_none());
        assert!(!session.state().success);
        assert_eq!(session.state().username, "bob123");
        assert_eq!(session.state().role, Role::User);
    }

    #[test]
    fn test_take_logout_success_is_one_shot() {
        let mut session = SessionManager::new();
        session.state.logout_success = true;
        assert!(session.take_logout_success());
        assert!(!session.take_logout_success());
    }
}
