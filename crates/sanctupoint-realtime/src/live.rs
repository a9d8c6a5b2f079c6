// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background refetch task and its handle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sanctupoint_config::model::RealtimeConfig;
use sanctupoint_core::query::{decode_rows, SelectQuery, Table};
use sanctupoint_core::{ChangeSubscription, DataAccessAdapter, SanctuError};
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Timing knobs for a live table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveOptions {
    /// How long to wait after a change event for more events before refetching.
    pub coalesce_window: Duration,
    /// Upper bound on a single fetch.
    pub fetch_timeout: Duration,
}

impl LiveOptions {
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self {
            coalesce_window: config.coalesce_window(),
            fetch_timeout: config.fetch_timeout(),
        }
    }
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self::from_config(&RealtimeConfig::default())
    }
}

/// Latest state of a live table.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// Rows from the most recent successful fetch.
    pub rows: Vec<T>,
    /// Number of successful fetches so far.
    pub generation: u64,
    /// True once the first fetch has finished, successfully or not.
    pub loaded: bool,
    /// Message of the most recent failed fetch, cleared on success.
    pub last_error: Option<String>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            generation: 0,
            loaded: false,
            last_error: None,
        }
    }
}

/// Handle to a running live table.
///
/// Dropping the handle stops the background task, which then releases its
/// change subscription.
#[derive(Debug)]
pub struct LiveTable<T> {
    table: Table,
    snapshot: watch::Receiver<Snapshot<T>>,
    refresh_tx: mpsc::Sender<()>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl<T> LiveTable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Starts a live table over `table`, using `fetch` to load rows.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(
        store: Arc<dyn DataAccessAdapter>,
        table: Table,
        options: LiveOptions,
        fetch: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, SanctuError>> + Send + 'static,
    {
        let (tx, snapshot) = watch::channel(Snapshot::default());
        // One slot: a request already queued absorbs later ones.
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();

        let subscription = store.subscribe(table);
        debug!(%table, subscription = subscription.id.0, "live table started");

        let worker = Worker {
            store,
            table,
            options,
            fetch,
            tx,
            refresh_rx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(worker.run(subscription));

        Self {
            table,
            snapshot,
            refresh_tx,
            cancel,
            task: Some(task),
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    /// Clone of the latest snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    /// Clone of the latest rows.
    pub fn rows(&self) -> Vec<T> {
        self.snapshot.borrow().rows.clone()
    }

    /// A receiver for rendering loops that want change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.snapshot.clone()
    }

    /// Requests a refetch, for example when the screen regains focus.
    ///
    /// Requests made while one is already pending collapse into it.
    pub fn refresh(&self) {
        // Full means a refresh is already queued.
        let _ = self.refresh_tx.try_send(());
    }

    /// Waits until `predicate` holds for the current snapshot.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&Snapshot<T>) -> bool,
    ) -> Result<Snapshot<T>, SanctuError> {
        let mut rx = self.snapshot.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| SanctuError::Internal(format!("live {} table stopped", self.table)))?;
        Ok(snapshot.clone())
    }

    /// Waits for the first fetch to finish.
    pub async fn loaded(&self) -> Result<Snapshot<T>, SanctuError> {
        self.wait_for(|s| s.loaded).await
    }

    /// Stops the task and waits for it to release its subscription.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(table = %self.table, error = %e, "live table task ended abnormally");
        }
    }
}

impl<T> LiveTable<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Live table whose fetch is a single `select`, decoded into `T`.
    pub fn query(store: Arc<dyn DataAccessAdapter>, query: SelectQuery, options: LiveOptions) -> Self {
        let table = query.table;
        let fetch_store = Arc::clone(&store);
        Self::spawn(store, table, options, move || {
            let store = Arc::clone(&fetch_store);
            let query = query.clone();
            async move { decode_rows(store.select(query).await?) }
        })
    }
}

impl<T> Drop for LiveTable<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker<T, F> {
    store: Arc<dyn DataAccessAdapter>,
    table: Table,
    options: LiveOptions,
    fetch: F,
    tx: watch::Sender<Snapshot<T>>,
    refresh_rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
}

/// Why the worker woke up.
enum Wake {
    Changed,
    Refresh,
    Stop,
}

impl<T, F, Fut> Worker<T, F>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, SanctuError>> + Send + 'static,
{
    async fn run(mut self, mut subscription: ChangeSubscription) {
        let mut feed_open = true;

        if self.fetch_once().await {
            loop {
                let wake = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Wake::Stop,
                    event = subscription.recv(), if feed_open => match event {
                        Some(event) => {
                            trace!(table = %self.table, kind = ?event.kind, "change event");
                            Wake::Changed
                        }
                        None => {
                            debug!(table = %self.table, "change feed closed");
                            feed_open = false;
                            continue;
                        }
                    },
                    request = self.refresh_rx.recv() => match request {
                        Some(()) => Wake::Refresh,
                        None => Wake::Stop,
                    },
                };

                match wake {
                    Wake::Stop => break,
                    Wake::Changed if !self.options.coalesce_window.is_zero() => {
                        tokio::select! {
                            biased;
                            _ = self.cancel.cancelled() => break,
                            _ = tokio::time::sleep(self.options.coalesce_window) => {}
                        }
                    }
                    Wake::Changed | Wake::Refresh => {}
                }

                // Everything queued so far is answered by the fetch below.
                let mut drained = 0usize;
                while subscription.try_recv().is_some() {
                    drained += 1;
                }
                while self.refresh_rx.try_recv().is_ok() {
                    drained += 1;
                }
                if drained > 0 {
                    trace!(table = %self.table, drained, "coalesced pending refetches");
                }

                if !self.fetch_once().await {
                    break;
                }
            }
        }

        self.store.unsubscribe(subscription.id);
        debug!(table = %self.table, "live table stopped");
    }

    /// Runs one bounded fetch and publishes the outcome. Returns `false`
    /// if cancelled mid-fetch.
    async fn fetch_once(&self) -> bool {
        let timeout = self.options.fetch_timeout;
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return false,
            outcome = tokio::time::timeout(timeout, (self.fetch)()) => match outcome {
                Ok(result) => result,
                Err(_) => Err(SanctuError::Timeout { duration: timeout }),
            },
        };

        match result {
            Ok(rows) => {
                let count = rows.len();
                self.tx.send_modify(|s| {
                    s.rows = rows;
                    s.generation += 1;
                    s.loaded = true;
                    s.last_error = None;
                });
                debug!(table = %self.table, rows = count, "live table refreshed");
            }
            Err(e) => {
                warn!(table = %self.table, error = %e, "refetch failed; keeping previous rows");
                self.tx.send_modify(|s| {
                    s.loaded = true;
                    s.last_error = Some(e.to_string());
                });
            }
        }
        true
    }
}
