// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential hashing and verification.
//!
//! Passwords are stored as Argon2id PHC strings. [`CredentialAuthenticator`]
//! implements [`AuthAdapter`](sanctupoint_core::AuthAdapter) on top of any
//! data access adapter.

pub mod authenticator;
pub mod hash;

pub use authenticator::CredentialAuthenticator;
pub use hash::PasswordHasher;
