// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential verification trait.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::SanctuError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Identity;

/// Resolves a username/password pair to an identity.
///
/// Kept separate from [`DataAccessAdapter`](crate::traits::DataAccessAdapter)
/// so the comparison strategy can change without touching screens.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Returns `Ok(None)` when no account matches; errors are reserved for
    /// the backend itself failing.
    async fn authenticate_by_credentials(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Identity>, SanctuError>;
}
