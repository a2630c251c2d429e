//! SQLite storage medium for eza-history
//!
//! Stores each key as one row of a `kv_store` table, so several stores
//! (different keys) can share one database file.

use crate::error::Result;
use crate::medium::StorageMedium;
use crate::types::StorageKey;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Default database file name inside the data directory
pub const DEFAULT_DB_FILE: &str = "history.db";

/// Summary of what the database holds
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub total_keys: usize,
    pub total_bytes: usize,
    pub last_write: Option<DateTime<Utc>>,
}

/// SQLite-backed key-value medium
pub struct SqliteMedium {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteMedium {
    /// Open (or create) a database file and initialize the schema
    #[must_use = "Database connection must be used"]
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        let medium = Self {
            conn,
            path: Some(db_path.to_path_buf()),
        };
        medium.initialize_schema()?;
        Ok(medium)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let medium = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        medium.initialize_schema()?;
        Ok(medium)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Get statistics about the stored keys
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let (total_keys, total_bytes): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv_store",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let last_write: Option<DateTime<Utc>> = self
            .conn
            .query_row("SELECT MAX(updated_at) FROM kv_store", [], |row| {
                row.get::<_, Option<DateTime<Utc>>>(0)
            })
            .optional()?
            .flatten();

        Ok(DatabaseStats {
            total_keys: total_keys as usize,
            total_bytes: total_bytes as usize,
            last_write,
        })
    }
}

impl StorageMedium for SqliteMedium {
    fn get_item(&self, key: &StorageKey) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &StorageKey, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), value, Utc::now()],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &StorageKey) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key.as_str()])?;
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite ({})", path.display()),
            None => "sqlite (in-memory)".to_string(),
        }
    }
}
