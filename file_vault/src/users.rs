//! Admin roster models.

use serde::Deserialize;

use crate::session::Role;

/// One row of the admin user roster.
///
/// Read-only projection fetched per admin view; never mutated locally.
#[derive(Clone, Debug, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "isMFAEnabled")]
    pub is_mfa_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_wire_format() {
        let json = r#"[
            {"id":1,"username":"alice1","email":"a@x.com","role":"admin","isMFAEnabled":true},
            {"id":2,"username":"bob123","email":"b@x.com","role":"user","isMFAEnabled":false}
        ]"#;
        let roster: Vec<UserRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].role, Role::Admin);
        assert!(roster[0].is_mfa_enabled);
        assert_eq!(roster[1].username, "bob123");
        assert!(!roster[1].is_mfa_enabled);
    }
}
