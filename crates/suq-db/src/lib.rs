pub mod migrations;
pub mod models;
pub mod queries;

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Handle to the store backing the admin console. SQLite does the real
/// work; the mutex serializes handlers onto the single connection.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the store file and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening store at {}", path.display()))?;

        // Dashboard reads must not block behind order/product writes.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;

        migrations::run(&conn)?;
        info!("Store ready at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run one query closure under the connection lock. A poisoned lock
    /// surfaces as an error on this call rather than tearing down the
    /// caller.
    pub fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&conn)
    }
}
