// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data access trait: generic CRUD and change subscriptions per table.

use async_trait::async_trait;

use crate::error::SanctuError;
use crate::feed::{ChangeSubscription, SubscriptionId};
use crate::query::{Filter, Row, SelectQuery, Table};
use crate::traits::adapter::PluginAdapter;

/// Generic table client backing every screen.
///
/// `update` and `delete` require a non-empty match filter; implementations
/// reject an empty one with [`SanctuError::Validation`] rather than touching
/// every row. Successful writes are announced to subscribers of the table.
#[async_trait]
pub trait DataAccessAdapter: PluginAdapter {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Row>, SanctuError>;

    /// Inserts rows and returns them as stored, including generated keys.
    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>, SanctuError>;

    /// Applies `patch` to every row matching all of `filters`.
    /// Returns the number of rows changed.
    async fn update(
        &self,
        table: Table,
        patch: Row,
        filters: Vec<Filter>,
    ) -> Result<usize, SanctuError>;

    /// Deletes every row matching all of `filters`.
    /// Returns the number of rows removed.
    async fn delete(&self, table: Table, filters: Vec<Filter>) -> Result<usize, SanctuError>;

    fn subscribe(&self, table: Table) -> ChangeSubscription;

    fn unsubscribe(&self, id: SubscriptionId);
}
