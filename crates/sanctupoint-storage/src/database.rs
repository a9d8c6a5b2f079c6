// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All work is serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;
use std::time::Duration;

use sanctupoint_core::SanctuError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into `SanctuError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SanctuError {
    SanctuError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the application database.
#[derive(Debug)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database file, apply PRAGMAs and run
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, SanctuError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SanctuError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SanctuError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the full schema.
    pub async fn open_in_memory() -> Result<Self, SanctuError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| SanctuError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), SanctuError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.busy_timeout(Duration::from_secs(5))?;
                conn.pragma_update(None, "foreign_keys", true)?;
                if wal_mode {
                    let mode: String = conn.pragma_update_and_check(
                        None,
                        "journal_mode",
                        "WAL",
                        |row| row.get(0),
                    )?;
                    debug!(journal_mode = %mode, "journal mode set");
                    conn.pragma_update(None, "synchronous", "NORMAL")?;
                }
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| -> Result<(), SanctuError> { migrations::run_migrations(conn) })
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => SanctuError::Storage {
                    source: other.to_string().into(),
                },
            })
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), SanctuError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_parent_dirs_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/app.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        assert!(path.exists());

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'refinery%' AND name NOT LIKE 'sqlite%' ORDER BY name",
                )?;
                let names = stmt.query_map([], |r| r.get(0))?;
                names.collect()
            })
            .await
            .unwrap();
        assert_eq!(
            tables,
            ["appointments", "donations", "payments", "services", "users"]
        );
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        let path = path.to_str().unwrap();
        drop(Database::open(path, true).await.unwrap());
        let db = Database::open(path, true).await.unwrap();
        db.checkpoint().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory().await.unwrap();
        let result = db
            .connection()
            .call(|conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO appointments (status, created_by) VALUES ('Pending', 999)",
                    [],
                )
            })
            .await;
        assert!(result.is_err());
    }
}
