use crate::error::CacheError;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use tripmap_resolver::{ResolutionStore, ResolveError};

pub const CACHE_FILE_NAME: &str = "links.db";

/// Persistent short link -> target store backed by SQLite.
///
/// Dropping the cache closes the connection; use [`LinkCache::close`] to see
/// errors from doing so.
pub struct LinkCache {
    conn: Mutex<Connection>,
    path: PathBuf,
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

impl LinkCache {
    /// Open (creating if needed) the cache database inside `dir`.
    pub fn open(dir: &Path) -> Result<Self, CacheError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(CACHE_FILE_NAME);
        let conn = Connection::open(&path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        let cache = LinkCache {
            conn: Mutex::new(conn),
            path,
        };
        cache.init_schema()?;
        debug!("Opened link cache at {}", cache.path.display());
        Ok(cache)
    }

    fn init_schema(&self) -> Result<(), CacheError> {
        self.conn().execute_batch(
            "
            CREATE TABLE IF NOT EXISTS resolved_links (
                short_url TEXT PRIMARY KEY,
                target TEXT NOT NULL,
                resolved_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lookup(&self, short_url: &str) -> Result<Option<String>, CacheError> {
        let target = self
            .conn()
            .query_row(
                "SELECT target FROM resolved_links WHERE short_url = ?1",
                params![short_url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(target)
    }

    pub fn insert(&self, short_url: &str, target: &str) -> Result<(), CacheError> {
        self.conn().execute(
            "INSERT OR REPLACE INTO resolved_links (short_url, target, resolved_at)
             VALUES (?1, ?2, ?3)",
            params![short_url, target, current_timestamp()],
        )?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, CacheError> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM resolved_links", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Forget every entry; returns how many were removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let removed = self.conn().execute("DELETE FROM resolved_links", [])?;
        Ok(removed)
    }

    pub fn close(self) -> Result<(), CacheError> {
        let conn = self.conn.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, e)| CacheError::Sqlite(e))?;
        debug!("Closed link cache at {}", self.path.display());
        Ok(())
    }
}

impl ResolutionStore for LinkCache {
    fn get(&self, url: &str) -> tripmap_resolver::error::Result<Option<String>> {
        self.lookup(url).map_err(|e| ResolveError::Cache(e.to_string()))
    }

    fn put(&self, url: &str, target: &str) -> tripmap_resolver::error::Result<()> {
        self.insert(url, target)
            .map_err(|e| ResolveError::Cache(e.to_string()))
    }
}
