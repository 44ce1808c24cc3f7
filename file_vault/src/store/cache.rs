//! Blob cache: durable key-value storage for viewed file content.
//!
//! Keys are `file-<id>` for owned files and `shared-file-<shareId>` for
//! shared links. A hit short-circuits the network fetch entirely; entries
//! are only ever overwritten by a successful new fetch under the same key.
//! Total size is bounded by a cap with least-recently-used eviction,
//! enforced on write.

use chrono::{SecondsFormat, Utc};
use rusqlite::{OptionalExtension, params};

use super::database::Store;
use super::errors::StoreResult;

/// Default blob cache size cap: 256 MiB
pub const DEFAULT_CACHE_CAP_BYTES: u64 = 256 * 1024 * 1024;

/// A cached, inline-renderable file blob
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CachedBlob {
    /// Data-URI representation of the content
    pub content: String,
    pub content_type: String,
}

impl Store {
    /// Look up a cached blob, bumping its access stamp on a hit
    pub fn cache_get(&self, key: &str) -> StoreResult<Option<CachedBlob>> {
        let hit = self
            .conn()
            .query_row(
                "SELECT content, content_type FROM blobs WHERE key = ?1",
                params![key],
                |row| {
                    Ok(CachedBlob {
                        content: row.get(0)?,
                        content_type: row.get(1)?,
                    })
                },
            )
            .optional()?;

        if hit.is_some() {
            self.conn().execute(
                "UPDATE blobs SET last_access = ?1 WHERE key = ?2",
                params![access_stamp(), key],
            )?;
        }

        Ok(hit)
    }

    /// Insert or overwrite a cached blob, then evict least-recently-used
    /// entries until the size cap is respected.
    ///
    /// The freshly written key is never evicted, even when it alone
    /// exceeds the cap.
    pub fn cache_put(&self, key: &str, blob: &CachedBlob) -> StoreResult<()> {
        let byte_len = blob.content.len() as i64;
        self.conn().execute(
            "INSERT OR REPLACE INTO blobs (key, content, content_type, byte_len, last_access)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![key, blob.content, blob.content_type, byte_len, access_stamp()],
        )?;

        self.evict_to_cap(key)?;
        Ok(())
    }

    /// Total bytes currently held by the cache
    pub fn cache_size(&self) -> StoreResult<u64> {
        let total: i64 = self.conn().query_row(
            "SELECT COALESCE(SUM(byte_len), 0) FROM blobs",
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }

    fn evict_to_cap(&self, keep_key: &str) -> StoreResult<()> {
        let cap = self.cache_cap();
        let mut total = self.cache_size()?;
        if total <= cap {
            return Ok(());
        }

        let mut stmt = self.conn().prepare(
            "SELECT key, byte_len FROM blobs WHERE key != ?1
             ORDER BY last_access ASC, key ASC",
        )?;
        let victims: Vec<(String, i64)> = stmt
            .query_map(params![keep_key], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;

        for (key, byte_len) in victims {
            if total <= cap {
                break;
            }
            self.conn()
                .execute("DELETE FROM blobs WHERE key = ?1", params![key])?;
            total = total.saturating_sub(byte_len as u64);
            log::debug!("evicted cached blob {key} ({byte_len} bytes)");
        }

        Ok(())
    }
}

fn access_stamp() -> String {
    // Fixed fractional width keeps lexicographic order consistent with
    // chronological order.
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
