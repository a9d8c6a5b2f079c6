// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff account creation.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use sanctupoint_core::{Identity, Role, SanctuError};

use crate::auth::{create_account, NewAccount};
use crate::context::AppContext;

#[derive(Debug, Clone)]
pub struct AddStaffForm {
    /// "First Last"; everything after the first word is the last name.
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub role: String,
}

/// Creates a back-office account. Admin only.
pub async fn add_staff(ctx: &AppContext, form: &AddStaffForm) -> Result<Identity, SanctuError> {
    ctx.require_role(Role::is_admin, "add staff accounts")?;

    let full_name = form.full_name.trim();
    let username = form.username.trim();
    let email = form.email.trim();
    let password = form.password.expose_secret();
    let role_name = form.role.trim();
    if [full_name, username, email, password, role_name]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(SanctuError::validation("Please fill in all fields."));
    }

    let role = role_name
        .parse::<Role>()
        .ok()
        .filter(|r| r.is_staff())
        .ok_or_else(|| {
            SanctuError::validation("Role must be one of Secretary, Cashier or Priest.")
        })?;

    let (first_name, last_name) = split_full_name(full_name);
    let account = NewAccount {
        username,
        email,
        first_name,
        last_name,
        phone_number: None,
        role,
    };
    let identity = create_account(ctx, &account, password).await?;
    info!(user_id = identity.id, %role, "staff account added");
    Ok(identity)
}

fn split_full_name(full_name: &str) -> (&str, &str) {
    match full_name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (full_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_splits_on_first_space() {
        assert_eq!(split_full_name("Maria Clara Santos"), ("Maria", "Clara Santos"));
        assert_eq!(split_full_name("Cher"), ("Cher", ""));
        assert_eq!(split_full_name("Ana   Reyes"), ("Ana", "Reyes"));
    }
}
