// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sanctupoint init`: create the database and the first admin account.

use std::io::IsTerminal;

use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::info;

use sanctupoint_auth::PasswordHasher;
use sanctupoint_config::model::SanctuConfig;
use sanctupoint_core::query::{decode_row, row, Filter, SelectQuery, Table};
use sanctupoint_core::{DataAccessAdapter, Identity, PluginAdapter, Role, SanctuError};
use sanctupoint_storage::SqliteStore;

/// Environment variable supplying the admin password non-interactively.
pub const ADMIN_PASSWORD_ENV_VAR: &str = "SANCTUPOINT_ADMIN_PASSWORD";

#[derive(Debug)]
pub enum AdminOutcome {
    Created(Identity),
    AlreadyExists,
}

pub async fn run_init(config: SanctuConfig, username: &str) -> Result<(), SanctuError> {
    let store = SqliteStore::open(config.storage.clone()).await?;
    println!(
        "{} {}",
        "database ready:".green(),
        config.storage.database_path
    );

    let password = admin_password(config.auth.min_password_length)?;
    let hasher = PasswordHasher::from_config(&config.auth);
    match create_admin(&store, &hasher, username, &password).await? {
        AdminOutcome::Created(identity) => {
            println!(
                "{} {} (user #{})",
                "admin account created:".green(),
                username,
                identity.id
            );
        }
        AdminOutcome::AlreadyExists => {
            println!("{}", format!("account `{username}` already exists").yellow());
        }
    }
    store.shutdown().await
}

/// Inserts an Admin account unless `username` is taken.
pub async fn create_admin(
    store: &dyn DataAccessAdapter,
    hasher: &PasswordHasher,
    username: &str,
    password: &SecretString,
) -> Result<AdminOutcome, SanctuError> {
    let existing = store
        .select(
            SelectQuery::new(Table::Users)
                .columns(&["user_id"])
                .filter(Filter::eq("username", username))
                .limit(1),
        )
        .await?;
    if !existing.is_empty() {
        return Ok(AdminOutcome::AlreadyExists);
    }

    let password_hash = hasher.hash(password.expose_secret())?;
    let stored = store
        .insert(
            Table::Users,
            vec![row([
                ("username", json!(username)),
                ("password_hash", json!(password_hash)),
                ("first_name", json!("Parish")),
                ("last_name", json!("Administrator")),
                ("role", json!(Role::Admin.to_string())),
            ])],
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SanctuError::Internal("insert returned no row".to_string()))?;
    let identity: Identity = decode_row(stored)?;
    info!(user_id = identity.id, "admin account created");
    Ok(AdminOutcome::Created(identity))
}

/// Password from the environment, or prompted twice on a terminal.
fn admin_password(min_length: usize) -> Result<SecretString, SanctuError> {
    let password = match std::env::var(ADMIN_PASSWORD_ENV_VAR) {
        Ok(value) if !value.is_empty() => value,
        _ if std::io::stdin().is_terminal() => {
            eprint!("Admin password: ");
            let first = rpassword::read_password()
                .map_err(|e| SanctuError::Internal(format!("failed to read password: {e}")))?;
            eprint!("Confirm admin password: ");
            let second = rpassword::read_password()
                .map_err(|e| SanctuError::Internal(format!("failed to read password: {e}")))?;
            if first != second {
                return Err(SanctuError::validation("passwords do not match"));
            }
            first
        }
        _ => {
            return Err(SanctuError::validation(format!(
                "no admin password provided; set {ADMIN_PASSWORD_ENV_VAR} or run interactively"
            )));
        }
    };
    if password.chars().count() < min_length {
        return Err(SanctuError::validation(format!(
            "password must be at least {min_length} characters"
        )));
    }
    Ok(SecretString::from(password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctupoint_config::model::StorageConfig;
    use serial_test::serial;

    async fn temp_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(StorageConfig {
            database_path: dir.path().join("init.db").to_string_lossy().into_owned(),
            wal_mode: true,
        })
        .await
        .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn creates_admin_once() {
        let (store, _dir) = temp_store().await;
        let hasher = PasswordHasher::new(8192, 1, 1);
        let password = SecretString::from("rectory-key".to_string());

        let outcome = create_admin(&store, &hasher, "admin", &password).await.unwrap();
        let AdminOutcome::Created(identity) = outcome else {
            panic!("expected a new account");
        };
        assert_eq!(identity.role(), Some(Role::Admin));

        let again = create_admin(&store, &hasher, "admin", &password).await.unwrap();
        assert!(matches!(again, AdminOutcome::AlreadyExists));
    }

    #[test]
    #[serial]
    fn password_comes_from_env() {
        // SAFETY: test-only env mutation. Tests using env vars must not run in parallel.
        unsafe { std::env::set_var(ADMIN_PASSWORD_ENV_VAR, "long-enough") };
        let result = admin_password(6);
        unsafe { std::env::remove_var(ADMIN_PASSWORD_ENV_VAR) };
        assert_eq!(result.unwrap().expose_secret(), "long-enough");
    }

    #[test]
    #[serial]
    fn short_env_password_is_rejected() {
        // SAFETY: test-only env mutation. Tests using env vars must not run in parallel.
        unsafe { std::env::set_var(ADMIN_PASSWORD_ENV_VAR, "abc") };
        let result = admin_password(6);
        unsafe { std::env::remove_var(ADMIN_PASSWORD_ENV_VAR) };
        assert!(result.is_err());
    }
}
