// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table-level query model understood by every [`DataAccessAdapter`].
//!
//! Queries are plain data: a table, an optional column projection,
//! conjunctive filters, ordering and relational embeds. Adapters translate
//! them into their backend's language after [`SelectQuery::validate`] has
//! checked every name against the table's column allow-list.
//!
//! [`DataAccessAdapter`]: crate::traits::DataAccessAdapter

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::error::SanctuError;

/// A single result row, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Tables exposed by the data service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Users,
    Services,
    Appointments,
    Payments,
    Donations,
}

impl Table {
    pub fn primary_key(self) -> &'static str {
        match self {
            Table::Users => "user_id",
            Table::Services => "service_id",
            Table::Appointments => "appointment_id",
            Table::Payments => "payment_id",
            Table::Donations => "donation_id",
        }
    }

    /// Column allow-list. The primary key is always first.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Users => &[
                "user_id",
                "username",
                "password_hash",
                "first_name",
                "last_name",
                "email",
                "phone_number",
                "role",
            ],
            Table::Services => &[
                "service_id",
                "service_name",
                "description",
                "price",
                "duration",
            ],
            Table::Appointments => &[
                "appointment_id",
                "date",
                "time",
                "service_id",
                "service_type",
                "status",
                "client_name",
                "notes",
                "created_by",
            ],
            Table::Payments => &[
                "payment_id",
                "appointment_id",
                "amount",
                "payment_method",
                "payment_date",
            ],
            Table::Donations => &[
                "donation_id",
                "donor_name",
                "amount",
                "description",
                "donation_date",
            ],
        }
    }

    /// Columns returned when a query does not project explicitly.
    ///
    /// Credential material never leaves the adapter through a wildcard select.
    pub fn default_columns(self) -> Vec<&'static str> {
        self.columns()
            .iter()
            .copied()
            .filter(|c| *c != "password_hash")
            .collect()
    }

    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Fails with a validation error naming the first unknown column.
    pub fn check_columns<'a>(
        self,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), SanctuError> {
        for column in columns {
            if !self.has_column(column) {
                return Err(SanctuError::validation(format!(
                    "unknown column '{column}' on table '{self}'"
                )));
            }
        }
        Ok(())
    }
}

/// Row predicate. A query's filter list is a conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq(String, Value),
    /// `column IN (values)`
    In(String, Vec<Value>),
    /// Any of the nested filters holds.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Every column named by this filter, including nested ones.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Filter::Eq(c, _) | Filter::In(c, _) => vec![c.as_str()],
            Filter::Or(inner) => inner.iter().flat_map(Filter::columns).collect(),
        }
    }

    /// Evaluates the predicate against an in-memory row.
    ///
    /// A missing column behaves like SQL `NULL`: it never compares equal.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq(c, v) => row.get(c).is_some_and(|actual| values_equal(actual, v)),
            Filter::In(c, vs) => row
                .get(c)
                .is_some_and(|actual| vs.iter().any(|v| values_equal(actual, v))),
            Filter::Or(inner) => inner.iter().any(|f| f.matches(row)),
        }
    }
}

/// Equality with SQL-like semantics: `NULL` never equals anything and
/// numbers compare by value regardless of integer/float representation.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

/// Total order over JSON scalars matching SQLite's ascending order:
/// nulls, then numbers, then text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) | Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Array(_) | Value::Object(_) => 3,
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Compares two rows by an ordering list, falling through on ties.
pub fn compare_rows(a: &Row, b: &Row, order: &[Order]) -> Ordering {
    for o in order {
        let null = Value::Null;
        let lhs = a.get(&o.column).unwrap_or(&null);
        let rhs = b.get(&o.column).unwrap_or(&null);
        let ord = compare_values(lhs, rhs);
        let ord = match o.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// A to-one relation resolved alongside the parent row.
///
/// The related record is attached to the parent row as a nested object
/// under [`Embed::alias`], or `null` when the foreign key dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Embed {
    /// `appointments.created_by -> users`
    Booker,
    /// `appointments.service_id -> services`
    BookedService,
    /// `payments.appointment_id -> appointments`
    PaidAppointment,
}

impl Embed {
    pub fn source_table(self) -> Table {
        match self {
            Embed::Booker | Embed::BookedService => Table::Appointments,
            Embed::PaidAppointment => Table::Payments,
        }
    }

    pub fn foreign_key(self) -> &'static str {
        match self {
            Embed::Booker => "created_by",
            Embed::BookedService => "service_id",
            Embed::PaidAppointment => "appointment_id",
        }
    }

    pub fn target_table(self) -> Table {
        match self {
            Embed::Booker => Table::Users,
            Embed::BookedService => Table::Services,
            Embed::PaidAppointment => Table::Appointments,
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            Embed::Booker => "users",
            Embed::BookedService => "services",
            Embed::PaidAppointment => "appointments",
        }
    }

    /// Columns copied from the related row.
    pub fn target_columns(self) -> &'static [&'static str] {
        match self {
            Embed::Booker => &["first_name", "last_name", "email"],
            Embed::BookedService => &["service_name", "price"],
            Embed::PaidAppointment => &["service_type", "date"],
        }
    }
}

/// A read against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: Table,
    /// Empty means [`Table::default_columns`].
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub embeds: Vec<Embed>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            embeds: Vec::new(),
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Effective projection.
    pub fn projection(&self) -> Vec<&str> {
        if self.columns.is_empty() {
            self.table.default_columns()
        } else {
            self.columns.iter().map(String::as_str).collect()
        }
    }

    /// Checks every column, filter, ordering and embed against the table.
    pub fn validate(&self) -> Result<(), SanctuError> {
        let table = self.table;
        table.check_columns(self.columns.iter().map(String::as_str))?;
        for filter in &self.filters {
            table.check_columns(filter.columns())?;
        }
        table.check_columns(self.order.iter().map(|o| o.column.as_str()))?;
        for embed in &self.embeds {
            if embed.source_table() != table {
                return Err(SanctuError::validation(format!(
                    "cannot embed '{}' into '{table}'",
                    embed.alias()
                )));
            }
        }
        Ok(())
    }
}

/// Decodes a row into a typed model.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, SanctuError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| SanctuError::Internal(format!(
        "failed to decode row: {e}"
    )))
}

/// Decodes every row, failing on the first malformed one.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, SanctuError> {
    rows.into_iter().map(decode_row).collect()
}

/// Builds a row from `(column, value)` pairs.
pub fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validate_rejects_unknown_columns() {
        let q = SelectQuery::new(Table::Services).columns(&["service_name", "colour"]);
        let err = q.validate().unwrap_err();
        assert!(err.to_string().contains("colour"));

        let q = SelectQuery::new(Table::Services).filter(Filter::eq("nope", 1));
        assert!(q.validate().is_err());

        let q = SelectQuery::new(Table::Services).order_by("nope", Direction::Asc);
        assert!(q.validate().is_err());
    }

    #[test]
    fn validate_rejects_foreign_embed() {
        let q = SelectQuery::new(Table::Services).embed(Embed::Booker);
        assert!(q.validate().is_err());
        let q = SelectQuery::new(Table::Appointments).embed(Embed::Booker);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn default_projection_hides_password_hash() {
        let q = SelectQuery::new(Table::Users);
        assert!(!q.projection().contains(&"password_hash"));
        assert!(q.projection().contains(&"role"));
    }

    #[test]
    fn filter_matching_follows_sql_null_semantics() {
        let r = row([("status", json!("Pending")), ("notes", Value::Null), ("price", json!(100))]);
        assert!(Filter::eq("status", "Pending").matches(&r));
        assert!(!Filter::eq("status", "pending").matches(&r));
        assert!(!Filter::eq("notes", Value::Null).matches(&r));
        assert!(!Filter::eq("missing", 1).matches(&r));
        assert!(Filter::eq("price", 100.0).matches(&r));
        assert!(Filter::is_in("status", ["Completed", "Pending"]).matches(&r));
        assert!(Filter::or([Filter::eq("status", "x"), Filter::eq("price", 100)]).matches(&r));
        assert!(!Filter::or([]).matches(&r));
    }

    #[test]
    fn rows_order_with_nulls_first_ascending() {
        let a = row([("price", Value::Null)]);
        let b = row([("price", json!(5))]);
        let asc = [Order { column: "price".into(), direction: Direction::Asc }];
        let desc = [Order { column: "price".into(), direction: Direction::Desc }];
        assert_eq!(compare_rows(&a, &b, &asc), Ordering::Less);
        assert_eq!(compare_rows(&a, &b, &desc), Ordering::Greater);
    }

    #[test]
    fn table_names_are_snake_case() {
        assert_eq!(Table::Appointments.to_string(), "appointments");
        assert_eq!("donations".parse::<Table>().unwrap(), Table::Donations);
    }

    #[test]
    fn decode_service_row() {
        let r = row([
            ("service_id", json!(3)),
            ("service_name", json!("Baptism")),
            ("description", json!("Rite")),
            ("price", Value::Null),
        ]);
        let s: crate::types::Service = decode_row(r).unwrap();
        assert_eq!(s.id, 3);
        assert_eq!(s.name, "Baptism");
        assert_eq!(s.price, None);
        assert_eq!(s.price_label(), "Free");
    }
}
