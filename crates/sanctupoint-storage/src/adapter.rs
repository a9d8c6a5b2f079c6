// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DataAccessAdapter trait.

use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use sanctupoint_config::model::StorageConfig;
use sanctupoint_core::query::{Filter, Row, SelectQuery, Table};
use sanctupoint_core::{
    AdapterType, ChangeFeed, ChangeKind, ChangeSubscription, DataAccessAdapter, HealthStatus,
    PluginAdapter, SanctuError, SubscriptionId,
};

use crate::database::{map_tr_err, Database};
use crate::sql::{self, Statement};

/// SQLite-backed table client.
///
/// The database is opened on [`SqliteStore::initialize`]; every other call
/// fails until then. Successful writes are published on the store's
/// [`ChangeFeed`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
    feed: ChangeFeed,
}

impl SqliteStore {
    /// Create a store for the configured path without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
            feed: ChangeFeed::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, SanctuError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Open the database file, apply PRAGMAs and run migrations.
    pub async fn initialize(&self) -> Result<(), SanctuError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SanctuError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, SanctuError> {
        self.db.get().ok_or_else(|| SanctuError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn require_filters(filters: &[Filter], op: &str, table: Table) -> Result<(), SanctuError> {
        if filters.is_empty() {
            return Err(SanctuError::validation(format!(
                "{op} on '{table}' requires a match filter"
            )));
        }
        for f in filters {
            table.check_columns(f.columns())?;
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::DataAccess
    }

    async fn health_check(&self) -> Result<HealthStatus, SanctuError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get(0))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SanctuError> {
        self.feed.close_all();
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl DataAccessAdapter for SqliteStore {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Row>, SanctuError> {
        query.validate()?;
        let db = self.db()?;

        // Foreign keys needed for embeds are fetched even when not projected
        // and stripped again afterwards.
        let mut columns: Vec<String> = query.projection().iter().map(|c| c.to_string()).collect();
        let mut hidden = Vec::new();
        for embed in &query.embeds {
            let fk = embed.foreign_key();
            if !columns.iter().any(|c| c == fk) {
                columns.push(fk.to_string());
                hidden.push(fk.to_string());
            }
        }

        let statement = sql::select(
            query.table,
            &columns,
            &query.filters,
            &query.order,
            query.limit,
        )?;
        let embeds = query.embeds.clone();

        db.connection()
            .call(move |conn| -> Result<Vec<Row>, rusqlite::Error> {
                let mut rows = sql::query_rows(conn, &statement)?;
                for embed in embeds {
                    sql::attach_embed(conn, &mut rows, embed)?;
                }
                for row in &mut rows {
                    for column in &hidden {
                        row.remove(column);
                    }
                }
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>, SanctuError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let db = self.db()?;

        let mut statements = Vec::with_capacity(rows.len());
        for row in &rows {
            table.check_columns(row.keys().map(String::as_str))?;
            statements.push(sql::insert(table, row)?);
        }
        let columns: Vec<String> = table
            .default_columns()
            .iter()
            .map(|c| c.to_string())
            .collect();
        let select_back = sql::select(table, &columns, &[], &[], None)?.sql
            + &format!(" WHERE \"{}\" = ?1", table.primary_key());

        let inserted = db
            .connection()
            .call(move |conn| -> Result<Vec<Row>, rusqlite::Error> {
                let tx = conn.transaction()?;
                let mut out = Vec::with_capacity(statements.len());
                for statement in &statements {
                    sql::execute(&tx, statement)?;
                    let lookup = Statement {
                        sql: select_back.clone(),
                        params: vec![SqlValue::Integer(tx.last_insert_rowid())],
                    };
                    out.extend(sql::query_rows(&tx, &lookup)?);
                }
                tx.commit()?;
                Ok(out)
            })
            .await
            .map_err(map_tr_err)?;

        info!(%table, count = inserted.len(), "rows inserted");
        self.feed.publish(table, ChangeKind::Insert);
        Ok(inserted)
    }

    async fn update(
        &self,
        table: Table,
        patch: Row,
        filters: Vec<Filter>,
    ) -> Result<usize, SanctuError> {
        if patch.is_empty() {
            return Err(SanctuError::validation(format!(
                "update on '{table}' has nothing to change"
            )));
        }
        table.check_columns(patch.keys().map(String::as_str))?;
        Self::require_filters(&filters, "update", table)?;
        let db = self.db()?;

        let statement = sql::update(table, &patch, &filters)?;
        let changed = db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                sql::execute(conn, &statement)
            })
            .await
            .map_err(map_tr_err)?;

        info!(%table, changed, "rows updated");
        if changed > 0 {
            self.feed.publish(table, ChangeKind::Update);
        }
        Ok(changed)
    }

    async fn delete(&self, table: Table, filters: Vec<Filter>) -> Result<usize, SanctuError> {
        Self::require_filters(&filters, "delete", table)?;
        let db = self.db()?;

        let statement = sql::delete(table, &filters)?;
        let removed = db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                sql::execute(conn, &statement)
            })
            .await
            .map_err(map_tr_err)?;

        info!(%table, removed, "rows deleted");
        if removed > 0 {
            self.feed.publish(table, ChangeKind::Delete);
        }
        Ok(removed)
    }

    fn subscribe(&self, table: Table) -> ChangeSubscription {
        self.feed.subscribe(table)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.feed.unsubscribe(id);
    }
}
