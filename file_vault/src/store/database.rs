//! Database connection management.
//!
//! [`Store`] owns a [`rusqlite::Connection`] and guarantees the schema is
//! in place before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use super::cache::DEFAULT_CACHE_CAP_BYTES;
use super::errors::{StoreError, StoreResult};

const DB_FILE: &str = "file_vault.db";
const SCHEMA_VERSION: u32 = 1;

/// Wrapper around a [`rusqlite::Connection`] holding the persisted session
/// profile and the blob cache.
pub struct Store {
    conn: Connection,
    cache_cap_bytes: u64,
}

impl Store {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data
    /// directory, e.g. `~/.local/share/file-vault/file_vault.db` on Linux.
    pub fn open_default() -> StoreResult<Self> {
        let project_dirs =
            ProjectDirs::from("com", "file-vault", "file-vault").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Self::open_at(&data_dir.join(DB_FILE))
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// Used by tests and by the `FILE_VAULT_DATA_DIR` override.
    pub fn open_at(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::debug!("opening store at {}", path.display());
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        run_migrations(&conn)?;

        Ok(Self {
            conn,
            cache_cap_bytes: DEFAULT_CACHE_CAP_BYTES,
        })
    }

    /// Override the blob cache size cap (bytes)
    pub fn set_cache_cap(&mut self, cap_bytes: u64) {
        self.cache_cap_bytes = cap_bytes;
    }

    /// Current blob cache size cap (bytes)
    pub fn cache_cap(&self) -> u64 {
        self.cache_cap_bytes
    }

    /// Filesystem path of the open database, if any
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    pub(super) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Bring the schema up to the current version.
///
/// Guarded by the `user_version` pragma so each step runs exactly once.
fn run_migrations(conn: &Connection) -> StoreResult<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if current < 1 {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                 key TEXT PRIMARY KEY,
                 username TEXT NOT NULL,
                 email TEXT NOT NULL,
                 role TEXT NOT NULL,
                 is_mfa_enabled INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS blobs (
                 key TEXT PRIMARY KEY,
                 content TEXT NOT NULL,
                 content_type TEXT NOT NULL,
                 byte_len INTEGER NOT NULL,
                 last_access TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_blobs_last_access
                 ON blobs (last_access);",
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(&dir.path().join("test.db")).expect("should open");
        assert!(store.path().is_some());

        // Tables exist and are queryable.
        let blob_count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM blobs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(blob_count, 0);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        drop(Store::open_at(&path).unwrap());
        let store = Store::open_at(&path).expect("reopen should succeed");
        assert_eq!(store.cache_cap(), DEFAULT_CACHE_CAP_BYTES);
    }
}
