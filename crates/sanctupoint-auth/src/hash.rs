// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! verification reads its parameters from the stored hash and keeps working
//! after the configured cost changes.

use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use ring::rand::{SecureRandom, SystemRandom};
use sanctupoint_config::model::AuthConfig;
use sanctupoint_core::SanctuError;
use tracing::warn;

/// Produces and checks Argon2id password hashes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
}

impl PasswordHasher {
    pub fn new(memory_cost: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            iterations,
            parallelism,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.hash_memory_cost,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }

    fn argon2(&self) -> Result<Argon2<'static>, SanctuError> {
        let params = Params::new(self.memory_cost, self.iterations, self.parallelism, None)
            .map_err(|e| SanctuError::Config(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, SanctuError> {
        use argon2::password_hash::PasswordHasher as _;

        let salt = SaltString::encode_b64(&generate_salt()?)
            .map_err(|e| SanctuError::Internal(format!("failed to encode salt: {e}")))?;
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| SanctuError::Internal(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Check `password` against a stored PHC string.
    ///
    /// A stored value that is not a PHC string never verifies.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, SanctuError> {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "stored credential is not a PHC hash; rejecting");
                return Ok(false);
            }
        };
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(SanctuError::Internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

/// Random 16-byte salt from the system CSPRNG.
pub fn generate_salt() -> Result<[u8; 16], SanctuError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; 16];
    rng.fill(&mut salt)
        .map_err(|_| SanctuError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(8192, 1, 1)
    }

    #[test]
    fn hash_verifies_and_is_salted() {
        let hasher = fast();
        let a = hasher.hash("open sesame").unwrap();
        let b = hasher.hash("open sesame").unwrap();
        assert!(a.starts_with("$argon2id$v=19$m=8192,t=1,p=1$"));
        assert_ne!(a, b);
        assert!(hasher.verify("open sesame", &a).unwrap());
        assert!(!hasher.verify("open sesame!", &a).unwrap());
    }

    #[test]
    fn verification_uses_parameters_from_the_hash() {
        let stored = fast().hash("pw").unwrap();
        let stronger = PasswordHasher::new(16384, 2, 1);
        assert!(stronger.verify("pw", &stored).unwrap());
    }

    #[test]
    fn plaintext_stored_value_never_matches() {
        assert!(!fast().verify("hunter2", "hunter2").unwrap());
    }

    #[test]
    fn invalid_parameters_are_a_config_error() {
        let err = PasswordHasher::new(1, 1, 1).hash("pw").unwrap_err();
        assert!(matches!(err, SanctuError::Config(_)));
    }
}
