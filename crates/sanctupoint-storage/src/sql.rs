// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL generation and row conversion.
//!
//! Identifiers are only ever taken from a table's column allow-list, so
//! they can be quoted directly; every value travels as a bound parameter.

use std::collections::HashMap;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use sanctupoint_core::query::{Direction, Embed, Filter, Order, Row, Table};
use sanctupoint_core::SanctuError;
use serde_json::Value;

/// SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

fn ident(name: &str) -> String {
    format!("\"{name}\"")
}

/// Converts a JSON scalar into an SQLite value.
pub fn to_sql(value: &Value) -> Result<SqlValue, SanctuError> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            return Err(SanctuError::validation(
                "nested values cannot be stored in a column",
            ));
        }
    })
}

/// Converts an SQLite cell into JSON.
pub fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
    }
}

fn filter_sql(filter: &Filter, params: &mut Vec<SqlValue>) -> Result<String, SanctuError> {
    match filter {
        Filter::Eq(column, value) => {
            params.push(to_sql(value)?);
            Ok(format!("{} = ?{}", ident(column), params.len()))
        }
        Filter::In(column, values) => {
            if values.is_empty() {
                return Ok("0".to_string());
            }
            let mut placeholders = Vec::with_capacity(values.len());
            for value in values {
                params.push(to_sql(value)?);
                placeholders.push(format!("?{}", params.len()));
            }
            Ok(format!("{} IN ({})", ident(column), placeholders.join(", ")))
        }
        Filter::Or(inner) => {
            if inner.is_empty() {
                return Ok("0".to_string());
            }
            let mut parts = Vec::with_capacity(inner.len());
            for f in inner {
                parts.push(filter_sql(f, params)?);
            }
            Ok(format!("({})", parts.join(" OR ")))
        }
    }
}

fn where_clause(filters: &[Filter], params: &mut Vec<SqlValue>) -> Result<String, SanctuError> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let mut parts = Vec::with_capacity(filters.len());
    for f in filters {
        parts.push(filter_sql(f, params)?);
    }
    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

pub fn select(
    table: Table,
    columns: &[String],
    filters: &[Filter],
    order: &[Order],
    limit: Option<usize>,
) -> Result<Statement, SanctuError> {
    let mut params = Vec::new();
    let cols: Vec<String> = columns.iter().map(|c| ident(c)).collect();
    let mut sql = format!("SELECT {} FROM {}", cols.join(", "), ident(&table.to_string()));
    sql.push_str(&where_clause(filters, &mut params)?);
    if !order.is_empty() {
        let terms: Vec<String> = order
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                format!("{} {dir}", ident(&o.column))
            })
            .collect();
        sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));
    }
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }
    Ok(Statement { sql, params })
}

pub fn insert(table: Table, row: &Row) -> Result<Statement, SanctuError> {
    if row.is_empty() {
        return Ok(Statement {
            sql: format!("INSERT INTO {} DEFAULT VALUES", ident(&table.to_string())),
            params: Vec::new(),
        });
    }
    let mut columns = Vec::with_capacity(row.len());
    let mut params = Vec::with_capacity(row.len());
    for (column, value) in row {
        columns.push(ident(column));
        params.push(to_sql(value)?);
    }
    let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("?{i}")).collect();
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(&table.to_string()),
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    })
}

pub fn update(table: Table, patch: &Row, filters: &[Filter]) -> Result<Statement, SanctuError> {
    let mut params = Vec::with_capacity(patch.len());
    let mut assignments = Vec::with_capacity(patch.len());
    for (column, value) in patch {
        params.push(to_sql(value)?);
        assignments.push(format!("{} = ?{}", ident(column), params.len()));
    }
    let mut sql = format!(
        "UPDATE {} SET {}",
        ident(&table.to_string()),
        assignments.join(", ")
    );
    sql.push_str(&where_clause(filters, &mut params)?);
    Ok(Statement { sql, params })
}

pub fn delete(table: Table, filters: &[Filter]) -> Result<Statement, SanctuError> {
    let mut params = Vec::new();
    let mut sql = format!("DELETE FROM {}", ident(&table.to_string()));
    sql.push_str(&where_clause(filters, &mut params)?);
    Ok(Statement { sql, params })
}

/// Runs a statement and collects its rows as JSON objects.
pub fn query_rows(conn: &Connection, statement: &Statement) -> Result<Vec<Row>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(&statement.sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut obj = Row::new();
        for (i, name) in names.iter().enumerate() {
            obj.insert(name.clone(), from_sql(row.get_ref(i)?));
        }
        out.push(obj);
    }
    Ok(out)
}

pub fn execute(conn: &Connection, statement: &Statement) -> Result<usize, rusqlite::Error> {
    conn.execute(&statement.sql, params_from_iter(statement.params.iter()))
}

/// Resolves `embed` for every row with one `IN` lookup on the target table.
///
/// Each row gains `embed.alias()` holding the related columns, or `null`
/// when the foreign key is null or dangling.
pub fn attach_embed(
    conn: &Connection,
    rows: &mut [Row],
    embed: Embed,
) -> Result<(), rusqlite::Error> {
    let fk = embed.foreign_key();
    let mut keys: Vec<i64> = rows
        .iter()
        .filter_map(|r| r.get(fk).and_then(Value::as_i64))
        .collect();
    keys.sort_unstable();
    keys.dedup();

    let mut related: HashMap<i64, Row> = HashMap::new();
    if !keys.is_empty() {
        let target = embed.target_table();
        let pk = target.primary_key();
        let mut columns = vec![ident(pk)];
        columns.extend(embed.target_columns().iter().map(|c| ident(c)));
        let placeholders: Vec<String> = (1..=keys.len()).map(|i| format!("?{i}")).collect();
        let statement = Statement {
            sql: format!(
                "SELECT {} FROM {} WHERE {} IN ({})",
                columns.join(", "),
                ident(&target.to_string()),
                ident(pk),
                placeholders.join(", ")
            ),
            params: keys.iter().map(|k| SqlValue::Integer(*k)).collect(),
        };
        for mut row in query_rows(conn, &statement)? {
            if let Some(id) = row.remove(pk).and_then(|v| v.as_i64()) {
                related.insert(id, row);
            }
        }
    }

    for row in rows.iter_mut() {
        let nested = row
            .get(fk)
            .and_then(Value::as_i64)
            .and_then(|k| related.get(&k).cloned())
            .map_or(Value::Null, Value::Object);
        row.insert(embed.alias().to_string(), nested);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctupoint_core::query::row;
    use serde_json::json;

    #[test]
    fn select_with_filters_order_and_limit() {
        let stmt = select(
            Table::Appointments,
            &["appointment_id".into(), "status".into()],
            &[
                Filter::eq("created_by", 4),
                Filter::is_in("status", ["Completed", "Cancelled"]),
            ],
            &[Order {
                column: "date".into(),
                direction: Direction::Desc,
            }],
            Some(20),
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT \"appointment_id\", \"status\" FROM \"appointments\" \
             WHERE \"created_by\" = ?1 AND \"status\" IN (?2, ?3) \
             ORDER BY \"date\" DESC LIMIT 20"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlValue::Integer(4),
                SqlValue::Text("Completed".into()),
                SqlValue::Text("Cancelled".into())
            ]
        );
    }

    #[test]
    fn or_filter_is_parenthesized() {
        let stmt = select(
            Table::Users,
            &["user_id".into()],
            &[Filter::or([
                Filter::eq("username", "ana"),
                Filter::eq("email", "ana@example.com"),
            ])],
            &[],
            None,
        )
        .unwrap();
        assert!(stmt.sql.ends_with("WHERE (\"username\" = ?1 OR \"email\" = ?2)"));
    }

    #[test]
    fn empty_membership_matches_nothing() {
        let stmt = delete(Table::Services, &[Filter::is_in::<i64>("service_id", [])]).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM \"services\" WHERE 0");
    }

    #[test]
    fn update_numbers_set_before_where() {
        let patch = row([("status", json!("Approved"))]);
        let stmt = update(Table::Appointments, &patch, &[Filter::eq("appointment_id", 9)]).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE \"appointments\" SET \"status\" = ?1 WHERE \"appointment_id\" = ?2"
        );
    }

    #[test]
    fn nested_values_are_rejected() {
        let patch = row([("notes", json!({"a": 1}))]);
        assert!(insert(Table::Appointments, &patch).is_err());
    }

    #[test]
    fn scalar_conversion() {
        assert_eq!(to_sql(&json!(true)).unwrap(), SqlValue::Integer(1));
        assert_eq!(to_sql(&json!(2.5)).unwrap(), SqlValue::Real(2.5));
        assert_eq!(from_sql(ValueRef::Real(100.0)), json!(100.0));
        assert_eq!(from_sql(ValueRef::Text(b"Mass")), json!("Mass"));
    }
}
