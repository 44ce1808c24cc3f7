//! Persisted session profile.
//!
//! Exactly one durable record under a namespaced key, holding
//! `{username, email, role, is_mfa_enabled}`, never passwords or tokens.
//! Restored at startup before any gated screen renders.

use std::str::FromStr;

use rusqlite::{OptionalExtension, params};

use super::database::Store;
use super::errors::{StoreError, StoreResult};
use crate::session::{Role, SessionProfile};

/// Namespaced key for the single persisted session record
const SESSION_KEY: &str = "file-vault:session";

impl Store {
    /// Persist the session profile, replacing any previous record
    pub fn save_profile(&self, profile: &SessionProfile) -> StoreResult<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO session (key, username, email, role, is_mfa_enabled)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                SESSION_KEY,
                profile.username,
                profile.email,
                profile.role.to_string(),
                profile.is_mfa_enabled as i32,
            ],
        )?;
        Ok(())
    }

    /// Load the persisted session profile, if one exists
    pub fn load_profile(&self) -> StoreResult<Option<SessionProfile>> {
        self.conn()
            .query_row(
                "SELECT username, email, role, is_mfa_enabled FROM session WHERE key = ?1",
                params![SESSION_KEY],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i32>(3)?,
                    ))
                },
            )
            .optional()?
            .map(|(username, email, role, is_mfa_enabled)| {
                let role = Role::from_str(&role)
                    .map_err(|_| StoreError::CorruptValue(format!("unknown role '{role}'")))?;
                Ok(SessionProfile {
                    username,
                    email,
                    role,
                    is_mfa_enabled: is_mfa_enabled != 0,
                })
            })
            .transpose()
    }

    /// Remove the persisted session profile (logout)
    pub fn clear_profile(&self) -> StoreResult<()> {
        self.conn()
            .execute("DELETE FROM session WHERE key = ?1", params![SESSION_KEY])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_profile_round_trip() {
        let (_dir, store) = test_store();
        assert!(store.load_profile().unwrap().is_none());

        let profile = SessionProfile {
            username: "alice1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Admin,
            is_mfa_enabled: true,
        };
        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile().unwrap(), Some(profile));
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let (_dir, store) = test_store();
        let first = SessionProfile {
            username: "alice1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::User,
            is_mfa_enabled: false,
        };
        let second = SessionProfile {
            username: "bob123".to_string(),
            email: "b@x.com".to_string(),
            role: Role::User,
            is_mfa_enabled: true,
        };
        store.save_profile(&first).unwrap();
        store.save_profile(&second).unwrap();
        assert_eq!(store.load_profile().unwrap(), Some(second));
    }

    #[test]
    fn test_clear_profile() {
        let (_dir, store) = test_store();
        let profile = SessionProfile {
            username: "alice1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::User,
            is_mfa_enabled: false,
        };
        store.save_profile(&profile).unwrap();
        store.clear_profile().unwrap();
        assert!(store.load_profile().unwrap().is_none());
    }

    #[test]
    fn test_profile_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let profile = SessionProfile {
            username: "alice1".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Admin,
            is_mfa_enabled: true,
        };
        {
            let store = Store::open_at(&path).unwrap();
            store.save_profile(&profile).unwrap();
        }
        let store = Store::open_at(&path).unwrap();
        assert_eq!(store.load_profile().unwrap(), Some(profile));
    }
}
