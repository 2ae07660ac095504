//! Connection pool for SQLite with thread-safe resource management.

use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use callsight_core::StoreError;

/// Fixed-size connection pool. Connections are created up front with WAL
/// mode and a busy timeout, handed out via [`PooledConnection`], and
/// returned on drop.
pub struct SqlitePool {
    available: Arc<Mutex<Vec<Connection>>>,
    path: PathBuf,
}

/// Configuration applied to every pooled connection.
#[derive(Debug, Clone)]
struct ConnectionConfig {
    wal_mode: bool,
    cache_size_kb: i32,
    busy_timeout_ms: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            wal_mode: true,
            cache_size_kb: 2048,
            busy_timeout_ms: 5000,
        }
    }
}

impl SqlitePool {
    /// Validate the database path: no traversal sequences, and a known
    /// SQLite file extension.
    fn validate_database_path(path: &Path) -> Result<PathBuf, StoreError> {
        let path_str = path.to_string_lossy();

        if path_str.contains("..") {
            return Err(StoreError::InvalidPath {
                reason: "path traversal detected".to_string(),
            });
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("db" | "sqlite" | "sqlite3") => Ok(path.to_path_buf()),
            Some(other) => Err(StoreError::InvalidPath {
                reason: format!("unsupported extension '.{other}' (expected .db, .sqlite or .sqlite3)"),
            }),
            None => Err(StoreError::InvalidPath {
                reason: "file extension required".to_string(),
            }),
        }
    }

    /// Create a pool with `pool_size` connections against `path`.
    pub fn new(path: impl AsRef<Path>, pool_size: usize) -> Result<Self, StoreError> {
        let path = Self::validate_database_path(path.as_ref())?;
        let config = ConnectionConfig::default();

        let mut connections = Vec::with_capacity(pool_size);
        for _ in 0..pool_size.max(1) {
            connections.push(Self::open_connection(&path, &config)?);
        }

        tracing::debug!(path = %path.display(), pool_size, "SQLite pool initialized");

        Ok(Self {
            available: Arc::new(Mutex::new(connections)),
            path,
        })
    }

    fn open_connection(path: &Path, config: &ConnectionConfig) -> Result<Connection, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::ConnectionFailed {
            reason: e.to_string(),
        })?;

        // Negative cache_size means kibibytes rather than pages.
        let cache_pragma = format!("PRAGMA cache_size = -{};", config.cache_size_kb);
        let timeout_pragma = format!("PRAGMA busy_timeout = {};", config.busy_timeout_ms);

        let mut pragmas = Vec::new();
        if config.wal_mode {
            pragmas.push("PRAGMA journal_mode = WAL;");
        }
        pragmas.push("PRAGMA synchronous = NORMAL;");
        pragmas.push(&cache_pragma);
        pragmas.push(&timeout_pragma);
        pragmas.push("PRAGMA foreign_keys = ON;");

        conn.execute_batch(&pragmas.join("\n"))
            .map_err(|e| StoreError::ConnectionFailed {
                reason: format!("failed to configure SQLite: {e}"),
            })?;

        Ok(conn)
    }

    /// Acquire a connection, opening a fresh one if the pool is exhausted.
    pub fn acquire(&self) -> Result<PooledConnection, StoreError> {
        let conn = {
            let mut available = self.available.lock().map_err(|_| StoreError::ConnectionFailed {
                reason: "connection pool lock poisoned".to_string(),
            })?;
            available.pop()
        };

        let conn = match conn {
            Some(conn) => conn,
            None => Self::open_connection(&self.path, &ConnectionConfig::default())?,
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.available),
        })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A connection checked out of the pool; returned on drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<Mutex<Vec<Connection>>>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref().expect("connection taken before drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().expect("connection taken before drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Ok(mut available) = self.pool.lock() {
                available.push(conn);
            }
            // A poisoned lock drops the connection instead of returning it.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn pool_rejects_suspicious_paths() {
        assert!(SqlitePool::new("../escape.db", 1).is_err());
        assert!(SqlitePool::new("calls.txt", 1).is_err());
        assert!(SqlitePool::new("calls", 1).is_err());
    }

    #[test]
    fn pool_hands_out_and_reclaims_connections() {
        let dir = tempdir().unwrap();
        let pool = SqlitePool::new(dir.path().join("pool.db"), 2).unwrap();

        {
            let first = pool.acquire().unwrap();
            let second = pool.acquire().unwrap();
            // Pool is empty now; a third acquire opens a fresh connection.
            let third = pool.acquire().unwrap();
            drop((first, second, third));
        }

        let conn = pool.acquire().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }
}
