// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table change notifications.
//!
//! Adapters own a [`ChangeFeed`] and publish to it after each successful
//! write. Subscribers receive a payload-free [`ChangeEvent`] and decide for
//! themselves what to refetch.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::query::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification that a watched table changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
}

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Receiving end of a subscription.
///
/// Dropping it is enough to stop delivery; the feed prunes closed
/// subscribers on the next publish. Call
/// [`DataAccessAdapter::unsubscribe`](crate::traits::DataAccessAdapter::unsubscribe)
/// to release the slot eagerly.
#[derive(Debug)]
pub struct ChangeSubscription {
    pub id: SubscriptionId,
    pub table: Table,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChangeSubscription {
    /// Waits for the next event. Returns `None` once the feed has dropped
    /// this subscription.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Non-blocking poll, used to drain bursts.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }
}

/// Registry of table subscribers.
#[derive(Debug, Default)]
pub struct ChangeFeed {
    next_id: AtomicU64,
    subscribers: DashMap<SubscriptionId, (Table, mpsc::UnboundedSender<ChangeEvent>)>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, table: Table) -> ChangeSubscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, (table, tx));
        debug!(subscription = id.0, %table, "change subscription opened");
        ChangeSubscription { id, table, rx }
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(subscription = id.0, "change subscription closed");
        }
        removed
    }

    /// Delivers an event to every subscriber of `table`.
    pub fn publish(&self, table: Table, kind: ChangeKind) {
        let event = ChangeEvent { table, kind };
        let mut closed = Vec::new();
        for entry in self.subscribers.iter() {
            let (watched, tx) = entry.value();
            if *watched == table && tx.send(event).is_err() {
                closed.push(*entry.key());
            }
        }
        // Removal must happen after iteration releases the shard locks.
        for id in closed {
            self.subscribers.remove(&id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drops every subscriber, ending their streams.
    pub fn close_all(&self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_only_matching_table() {
        let feed = ChangeFeed::new();
        let mut appts = feed.subscribe(Table::Appointments);
        let mut services = feed.subscribe(Table::Services);

        feed.publish(Table::Appointments, ChangeKind::Insert);

        let event = appts.recv().await.unwrap();
        assert_eq!(event.table, Table::Appointments);
        assert_eq!(event.kind, ChangeKind::Insert);
        assert!(services.try_recv().is_none());
    }

    #[tokio::test]
    async fn unsubscribe_ends_stream() {
        let feed = ChangeFeed::new();
        let mut sub = feed.subscribe(Table::Donations);
        assert!(feed.unsubscribe(sub.id));
        assert!(!feed.unsubscribe(sub.id));
        assert!(sub.recv().await.is_none());
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn dropped_receivers_are_pruned_on_publish() {
        let feed = ChangeFeed::new();
        let sub = feed.subscribe(Table::Users);
        let _keep = feed.subscribe(Table::Users);
        drop(sub);
        assert_eq!(feed.subscriber_count(), 2);
        feed.publish(Table::Users, ChangeKind::Update);
        assert_eq!(feed.subscriber_count(), 1);
    }
}
