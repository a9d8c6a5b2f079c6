// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`AuthAdapter`] backed by the `users` table.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use sanctupoint_core::query::{decode_row, Filter, SelectQuery, Table};
use sanctupoint_core::{
    AdapterType, AuthAdapter, DataAccessAdapter, HealthStatus, Identity, PluginAdapter,
    SanctuError,
};

use crate::hash::PasswordHasher;

const IDENTITY_COLUMNS: &[&str] = &[
    "user_id",
    "username",
    "password_hash",
    "first_name",
    "last_name",
    "email",
    "phone_number",
    "role",
];

/// Looks a user up by username and checks the password against the
/// stored Argon2id hash.
pub struct CredentialAuthenticator {
    store: Arc<dyn DataAccessAdapter>,
    hasher: PasswordHasher,
}

impl CredentialAuthenticator {
    pub fn new(store: Arc<dyn DataAccessAdapter>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Verify off the async runtime; Argon2 is deliberately slow.
    async fn verify(&self, password: &SecretString, stored: String) -> Result<bool, SanctuError> {
        let hasher = self.hasher.clone();
        let password = Zeroizing::new(password.expose_secret().to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| SanctuError::Internal(format!("verification task failed: {e}")))?
    }
}

#[async_trait]
impl PluginAdapter for CredentialAuthenticator {
    fn name(&self) -> &str {
        "argon2-credentials"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, SanctuError> {
        self.store.health_check().await
    }

    async fn shutdown(&self) -> Result<(), SanctuError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for CredentialAuthenticator {
    async fn authenticate_by_credentials(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Identity>, SanctuError> {
        let rows = self
            .store
            .select(
                SelectQuery::new(Table::Users)
                    .columns(IDENTITY_COLUMNS)
                    .filter(Filter::eq("username", username))
                    .limit(1),
            )
            .await?;

        let Some(mut row) = rows.into_iter().next() else {
            debug!(username, "no account for username");
            return Ok(None);
        };

        let stored = match row.remove("password_hash") {
            Some(Value::String(hash)) => hash,
            _ => {
                debug!(username, "account has no password set");
                return Ok(None);
            }
        };

        if !self.verify(password, stored).await? {
            debug!(username, "password mismatch");
            return Ok(None);
        }

        decode_row(row).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctupoint_config::model::StorageConfig;
    use sanctupoint_core::query::row;
    use sanctupoint_storage::SqliteStore;
    use serde_json::json;

    async fn setup() -> (CredentialAuthenticator, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(StorageConfig {
            database_path: dir.path().join("auth.db").to_string_lossy().into_owned(),
            wal_mode: false,
        })
        .await
        .unwrap();
        let hasher = PasswordHasher::new(8192, 1, 1);
        let hash = hasher.hash("letmein").unwrap();
        store
            .insert(
                Table::Users,
                vec![
                    row([
                        ("username", json!("priest1")),
                        ("password_hash", json!(hash)),
                        ("first_name", json!("Paul")),
                        ("role", json!("Priest")),
                    ]),
                    row([
                        ("username", json!("legacy")),
                        ("password_hash", json!("letmein")),
                    ]),
                ],
            )
            .await
            .unwrap();
        (CredentialAuthenticator::new(Arc::new(store), hasher), dir)
    }

    #[tokio::test]
    async fn correct_password_yields_identity_without_hash() {
        let (auth, _dir) = setup().await;
        let identity = auth
            .authenticate_by_credentials("priest1", &SecretString::from("letmein".to_string()))
            .await
            .unwrap()
            .expect("credentials should match");
        assert_eq!(identity.username.as_deref(), Some("priest1"));
        assert_eq!(identity.role(), Some(sanctupoint_core::Role::Priest));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_yield_none() {
        let (auth, _dir) = setup().await;
        let wrong = SecretString::from("nope".to_string());
        assert!(auth.authenticate_by_credentials("priest1", &wrong).await.unwrap().is_none());
        assert!(auth.authenticate_by_credentials("ghost", &wrong).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn plaintext_rows_are_rejected() {
        let (auth, _dir) = setup().await;
        let pw = SecretString::from("letmein".to_string());
        assert!(auth.authenticate_by_credentials("legacy", &pw).await.unwrap().is_none());
    }
}
