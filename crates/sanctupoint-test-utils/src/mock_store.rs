// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory data store for deterministic tests.
//!
//! `MockStore` implements `DataAccessAdapter` over plain vectors of rows,
//! evaluating filters and orderings the same way the SQLite store does.
//! Reads of a table can be made to fail on demand.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use sanctupoint_core::query::{compare_rows, values_equal, Filter, Row, SelectQuery, Table};
use sanctupoint_core::{
    AdapterType, ChangeFeed, ChangeKind, ChangeSubscription, DataAccessAdapter, HealthStatus,
    PluginAdapter, SanctuError, SubscriptionId,
};

/// Columns that must be unique per table.
fn unique_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Users => &["username", "email"],
        _ => &[],
    }
}

/// Column defaults applied on insert.
fn column_default(table: Table, column: &str) -> Value {
    match (table, column) {
        (Table::Users, "role") => json!("User"),
        (Table::Appointments, "status") => json!("Pending"),
        _ => Value::Null,
    }
}

#[derive(Default)]
struct Tables {
    rows: HashMap<Table, Vec<Row>>,
    next_id: HashMap<Table, i64>,
}

/// An in-memory table store.
#[derive(Default)]
pub struct MockStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<Table>>,
    selects: Mutex<HashMap<Table, usize>>,
    feed: ChangeFeed,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read of `table` fail until [`MockStore::recover`] is called.
    pub async fn fail_reads(&self, table: Table) {
        self.failing.lock().await.insert(table);
    }

    pub async fn recover(&self, table: Table) {
        self.failing.lock().await.remove(&table);
    }

    /// Number of selects issued against `table` so far.
    pub async fn select_count(&self, table: Table) -> usize {
        self.selects.lock().await.get(&table).copied().unwrap_or(0)
    }

    /// Current rows of `table`, unfiltered and in insertion order.
    pub async fn dump(&self, table: Table) -> Vec<Row> {
        self.tables
            .lock()
            .await
            .rows
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}

fn project(row: &Row, columns: &[&str]) -> Row {
    columns
        .iter()
        .map(|c| ((*c).to_string(), row.get(*c).cloned().unwrap_or(Value::Null)))
        .collect()
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

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::DataAccess
    }

    async fn health_check(&self) -> Result<HealthStatus, SanctuError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SanctuError> {
        self.feed.close_all();
        Ok(())
    }
}

#[async_trait]
impl DataAccessAdapter for MockStore {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Row>, SanctuError> {
        query.validate()?;
        *self.selects.lock().await.entry(query.table).or_default() += 1;
        if self.failing.lock().await.contains(&query.table) {
            return Err(SanctuError::service(format!(
                "simulated outage reading '{}'",
                query.table
            )));
        }

        let tables = self.tables.lock().await;
        let source = tables.rows.get(&query.table).map(Vec::as_slice).unwrap_or(&[]);
        let mut matched: Vec<&Row> = source
            .iter()
            .filter(|r| query.filters.iter().all(|f| f.matches(r)))
            .collect();
        matched.sort_by(|a, b| compare_rows(a, b, &query.order));
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        let projection = query.projection();
        let mut out = Vec::with_capacity(matched.len());
        for parent in matched {
            let mut row = project(parent, &projection);
            for embed in &query.embeds {
                let key = parent.get(embed.foreign_key()).unwrap_or(&Value::Null);
                let target = embed.target_table();
                let related = tables.rows.get(&target).and_then(|rows| {
                    rows.iter().find(|r| {
                        r.get(target.primary_key())
                            .is_some_and(|pk| values_equal(pk, key))
                    })
                });
                let value = related.map_or(Value::Null, |r| {
                    Value::Object(project(r, embed.target_columns()))
                });
                row.insert(embed.alias().to_string(), value);
            }
            out.push(row);
        }
        Ok(out)
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>, SanctuError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut tables = self.tables.lock().await;
        let mut next_id = tables.next_id.get(&table).copied().unwrap_or(1);
        let existing = tables.rows.get(&table).cloned().unwrap_or_default();

        let mut staged: Vec<Row> = Vec::with_capacity(rows.len());
        for input in rows {
            table.check_columns(input.keys().map(String::as_str))?;
            let mut stored = Map::new();
            for column in table.columns() {
                let value = input
                    .get(*column)
                    .cloned()
                    .unwrap_or_else(|| column_default(table, column));
                stored.insert((*column).to_string(), value);
            }
            let pk = table.primary_key();
            if stored.get(pk).is_none_or(Value::is_null) {
                stored.insert(pk.to_string(), json!(next_id));
            }
            if let Some(id) = stored.get(pk).and_then(Value::as_i64) {
                next_id = next_id.max(id + 1);
            }

            for column in unique_columns(table) {
                let value = &stored[*column];
                let clash = existing
                    .iter()
                    .chain(staged.iter())
                    .any(|r| r.get(*column).is_some_and(|v| values_equal(v, value)));
                if clash {
                    return Err(SanctuError::service(format!(
                        "UNIQUE constraint failed: {table}.{column}"
                    )));
                }
            }
            staged.push(stored);
        }

        let defaults = table.default_columns();
        let returned = staged.iter().map(|r| project(r, &defaults)).collect();
        tables.next_id.insert(table, next_id);
        tables.rows.entry(table).or_default().extend(staged);
        drop(tables);

        self.feed.publish(table, ChangeKind::Insert);
        Ok(returned)
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
        require_filters(&filters, "update", table)?;

        let mut tables = self.tables.lock().await;
        let mut changed = 0;
        for row in tables.rows.entry(table).or_default().iter_mut() {
            if filters.iter().all(|f| f.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                changed += 1;
            }
        }
        drop(tables);

        if changed > 0 {
            self.feed.publish(table, ChangeKind::Update);
        }
        Ok(changed)
    }

    async fn delete(&self, table: Table, filters: Vec<Filter>) -> Result<usize, SanctuError> {
        require_filters(&filters, "delete", table)?;

        let mut tables = self.tables.lock().await;
        let rows = tables.rows.entry(table).or_default();
        let before = rows.len();
        rows.retain(|r| !filters.iter().all(|f| f.matches(r)));
        let removed = before - rows.len();
        drop(tables);

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
