// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login, registration, profile and logout.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::info;
use zeroize::Zeroizing;

use sanctupoint_core::query::{decode_row, row, Filter, SelectQuery, Table};
use sanctupoint_core::{Identity, Role, SanctuError};
use sanctupoint_session::SessionPhase;

use crate::context::AppContext;
use crate::notice::Notice;

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Looks the credentials up and signs the matching user in.
///
/// The session sits in its loading phase for the duration of the lookup
/// and falls back to empty if nothing matches.
pub async fn login(ctx: &AppContext, form: &LoginForm) -> Result<Identity, SanctuError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.expose_secret().is_empty() {
        return Err(SanctuError::validation(
            "Please enter your username and password.",
        ));
    }

    if !ctx.session.begin_loading() {
        return Err(match ctx.session.phase() {
            SessionPhase::Authenticated(_) => {
                SanctuError::Navigation("already signed in".to_string())
            }
            _ => SanctuError::validation("A sign-in is already in progress."),
        });
    }

    match ctx.auth.authenticate_by_credentials(username, &form.password).await {
        Ok(Some(identity)) => {
            ctx.session.login(identity.clone());
            Ok(identity)
        }
        Ok(None) => {
            ctx.session.cancel_loading();
            info!(username, "login rejected");
            Err(SanctuError::not_found(
                "user",
                "Invalid username or password.",
            ))
        }
        Err(e) => {
            ctx.session.cancel_loading();
            Err(e)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub username: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Creates a customer account. Does not sign in.
pub async fn register(ctx: &AppContext, form: &RegistrationForm) -> Result<Identity, SanctuError> {
    let username = form.username.trim();
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = form.email.trim();
    let password = form.password.expose_secret();
    if [username, first_name, last_name, email, password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(SanctuError::validation(
            "Please fill in all required fields.",
        ));
    }

    let account = NewAccount {
        username,
        email,
        first_name,
        last_name,
        phone_number: form
            .phone_number
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty()),
        role: Role::User,
    };
    let identity = create_account(ctx, &account, password).await?;
    info!(user_id = identity.id, "account registered");
    Ok(identity)
}

/// Fields of a `users` row about to be inserted.
pub(crate) struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone_number: Option<&'a str>,
    pub role: Role,
}

/// Duplicate check, password policy, hashing and insert; shared by
/// registration and staff creation.
pub(crate) async fn create_account(
    ctx: &AppContext,
    account: &NewAccount<'_>,
    password: &str,
) -> Result<Identity, SanctuError> {
    let min = ctx.config.auth.min_password_length;
    if password.chars().count() < min {
        return Err(SanctuError::validation(format!(
            "Password must be at least {min} characters."
        )));
    }

    let existing = ctx
        .store
        .select(
            SelectQuery::new(Table::Users)
                .columns(&["username", "email"])
                .filter(Filter::or([
                    Filter::eq("username", account.username),
                    Filter::eq("email", account.email),
                ]))
                .limit(1),
        )
        .await?;
    if !existing.is_empty() {
        return Err(SanctuError::validation(
            "Username or email already exists.",
        ));
    }

    let hasher = ctx.hasher.clone();
    let secret = Zeroizing::new(password.to_owned());
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
        .await
        .map_err(|e| SanctuError::Internal(format!("hashing task failed: {e}")))??;

    let record = row([
        ("username", json!(account.username)),
        ("password_hash", json!(password_hash)),
        ("first_name", json!(account.first_name)),
        ("last_name", json!(account.last_name)),
        ("email", json!(account.email)),
        (
            "phone_number",
            account.phone_number.map_or(Value::Null, |p| json!(p)),
        ),
        ("role", json!(account.role.to_string())),
    ]);
    let inserted = ctx.store.insert(Table::Users, vec![record]).await?;
    let stored = inserted
        .into_iter()
        .next()
        .ok_or_else(|| SanctuError::Internal("insert returned no row".to_string()))?;
    decode_row(stored)
}

/// Identity shown on the profile tab.
pub fn profile(ctx: &AppContext) -> Result<Identity, SanctuError> {
    ctx.require_session().map(|s| s.identity().clone())
}

/// Clears the session. Safe to call when already signed out.
pub fn logout(ctx: &AppContext) -> Notice {
    ctx.session.logout();
    Notice::new("Logged Out", "You have been successfully logged out.")
}
