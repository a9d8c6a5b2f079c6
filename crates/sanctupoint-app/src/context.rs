// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared dependencies of every controller.

use std::sync::Arc;

use sanctupoint_auth::{CredentialAuthenticator, PasswordHasher};
use sanctupoint_config::model::SanctuConfig;
use sanctupoint_core::{AuthAdapter, DataAccessAdapter, PluginAdapter, Role, SanctuError};
use sanctupoint_realtime::LiveOptions;
use sanctupoint_session::{Session, SessionAuthority};
use sanctupoint_storage::SqliteStore;
use tracing::info;

/// Data store, credential checker, session and configuration, injected
/// into every controller.
pub struct AppContext {
    pub store: Arc<dyn DataAccessAdapter>,
    pub auth: Arc<dyn AuthAdapter>,
    pub hasher: PasswordHasher,
    pub session: SessionAuthority,
    pub config: SanctuConfig,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn DataAccessAdapter>,
        auth: Arc<dyn AuthAdapter>,
        config: SanctuConfig,
    ) -> Self {
        Self {
            store,
            auth,
            hasher: PasswordHasher::from_config(&config.auth),
            session: SessionAuthority::new(),
            config,
        }
    }

    /// Context whose credential checks read the `users` table of `store`.
    pub fn with_store(store: Arc<dyn DataAccessAdapter>, config: SanctuConfig) -> Self {
        let hasher = PasswordHasher::from_config(&config.auth);
        let auth = Arc::new(CredentialAuthenticator::new(Arc::clone(&store), hasher));
        Self::new(store, auth, config)
    }

    /// Opens the configured SQLite database and builds a context over it.
    pub async fn open(config: SanctuConfig) -> Result<Self, SanctuError> {
        let store = SqliteStore::open(config.storage.clone()).await?;
        info!(path = %config.storage.database_path, "data store ready");
        Ok(Self::with_store(Arc::new(store), config))
    }

    pub fn live_options(&self) -> LiveOptions {
        LiveOptions::from_config(&self.config.realtime)
    }

    /// The signed-in session, or a validation error when nobody is signed in.
    pub fn require_session(&self) -> Result<Session, SanctuError> {
        self.session
            .current_session()
            .ok_or_else(|| SanctuError::validation("Please sign in first."))
    }

    /// The signed-in session, provided its role satisfies `allowed`.
    pub fn require_role(
        &self,
        allowed: impl Fn(Role) -> bool,
        action: &str,
    ) -> Result<Session, SanctuError> {
        let session = self.require_session()?;
        match session.role() {
            Some(role) if allowed(role) => Ok(session),
            _ => Err(SanctuError::Navigation(format!(
                "this account may not {action}"
            ))),
        }
    }

    pub async fn shutdown(&self) -> Result<(), SanctuError> {
        self.auth.shutdown().await?;
        self.store.shutdown().await
    }
}

/// Staff and admins: the back-office roles.
pub(crate) fn back_office(role: Role) -> bool {
    role.is_staff() || role.is_admin()
}
