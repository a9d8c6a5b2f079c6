// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the whole app over a temporary SQLite database
//! (or a [`MockStore`]) with fast password hashing, and offers helpers to
//! seed accounts and services.

use std::sync::Arc;

use serde_json::{json, Value};

use sanctupoint_app::{App, AppContext};
use sanctupoint_auth::PasswordHasher;
use sanctupoint_config::model::{AuthConfig, RealtimeConfig, SanctuConfig, StorageConfig};
use sanctupoint_core::query::{decode_row, row, Table};
use sanctupoint_core::{DataAccessAdapter, Identity, Role, SanctuError, Service};
use sanctupoint_storage::SqliteStore;

use crate::mock_store::MockStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    in_memory: bool,
    coalesce_window_ms: u64,
    fetch_timeout_secs: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            in_memory: false,
            coalesce_window_ms: 10,
            fetch_timeout_secs: 5,
        }
    }

    /// Back the app with a [`MockStore`] instead of SQLite.
    pub fn with_mock_store(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn with_coalesce_window_ms(mut self, ms: u64) -> Self {
        self.coalesce_window_ms = ms;
        self
    }

    /// Build the harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SanctuError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SanctuError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let config = SanctuConfig {
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().into_owned(),
                wal_mode: true,
            },
            // Minimum accepted cost keeps tests fast.
            auth: AuthConfig {
                hash_memory_cost: 8192,
                hash_iterations: 1,
                hash_parallelism: 1,
                ..AuthConfig::default()
            },
            realtime: RealtimeConfig {
                coalesce_window_ms: self.coalesce_window_ms,
                fetch_timeout_secs: self.fetch_timeout_secs,
            },
            ..SanctuConfig::default()
        };

        let (store, mock): (Arc<dyn DataAccessAdapter>, Option<Arc<MockStore>>) = if self.in_memory {
            let mock = Arc::new(MockStore::new());
            (mock.clone(), Some(mock))
        } else {
            (Arc::new(SqliteStore::open(config.storage.clone()).await?), None)
        };

        let ctx = Arc::new(AppContext::with_store(store.clone(), config));
        Ok(TestHarness {
            ctx,
            store,
            mock,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment over temporary storage.
pub struct TestHarness {
    /// Shared controller context.
    pub ctx: Arc<AppContext>,
    /// The data store behind the context.
    pub store: Arc<dyn DataAccessAdapter>,
    /// Set when built with [`TestHarnessBuilder::with_mock_store`].
    pub mock: Option<Arc<MockStore>>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A fresh app (navigator included) over this harness's context.
    pub fn app(&self) -> App {
        App::new(self.ctx.clone())
    }

    /// Inserts an account with a real password hash, bypassing the
    /// registration rules so any role can be seeded.
    pub async fn seed_user(
        &self,
        username: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Identity, SanctuError> {
        let hasher = PasswordHasher::from_config(&self.ctx.config.auth);
        let password_hash = hasher.hash(password)?;
        let mut record = row([
            ("username", json!(username)),
            ("password_hash", json!(password_hash)),
            ("first_name", json!(capitalize(username))),
            ("last_name", json!("Tester")),
            ("email", json!(format!("{username}@example.com"))),
        ]);
        // Without a role the column default applies.
        if let Some(role) = role {
            record.insert("role".to_string(), json!(role.to_string()));
        }
        let stored = self.store.insert(Table::Users, vec![record]).await?;
        first(stored)
    }

    /// Inserts an account whose stored role is an arbitrary label.
    pub async fn seed_user_with_role_label(
        &self,
        username: &str,
        password: &str,
        label: &str,
    ) -> Result<Identity, SanctuError> {
        let identity = self.seed_user(username, password, None).await?;
        self.store
            .update(
                Table::Users,
                row([("role", json!(label))]),
                vec![sanctupoint_core::Filter::eq("user_id", identity.id)],
            )
            .await?;
        Ok(Identity {
            role: Some(label.to_string()),
            ..identity
        })
    }

    pub async fn seed_service(&self, name: &str, price: Option<f64>) -> Result<Service, SanctuError> {
        let stored = self
            .store
            .insert(
                Table::Services,
                vec![row([
                    ("service_name", json!(name)),
                    ("description", json!(format!("{name} service"))),
                    ("price", price.map_or(Value::Null, |p| json!(p))),
                ])],
            )
            .await?;
        first(stored)
    }

    /// Signs `identity` straight into the session, skipping credential checks.
    pub fn sign_in_as(&self, identity: Identity) {
        self.ctx.session.login(identity);
    }
}

fn first<T: serde::de::DeserializeOwned>(rows: Vec<sanctupoint_core::Row>) -> Result<T, SanctuError> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| SanctuError::Internal("insert returned no row".to_string()))?;
    decode_row(row)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
