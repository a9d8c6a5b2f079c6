// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level SanctuPoint configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SanctuConfig {
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Password hashing and credential policy.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Live list refresh behaviour.
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Organization name shown in the shell banner.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "SanctuPoint".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sanctupoint").join("sanctupoint.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("sanctupoint.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Argon2id parameters for stored password hashes.
///
/// Defaults follow the OWASP minimum for Argon2id (19 MiB, 2 passes).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_hash_memory_cost")]
    pub hash_memory_cost: u32,

    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,

    /// Minimum accepted password length at registration.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_memory_cost: default_hash_memory_cost(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_hash_memory_cost() -> u32 {
    19456
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

fn default_min_password_length() -> usize {
    6
}

/// Live list refresh configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RealtimeConfig {
    /// Window in milliseconds over which bursts of change events collapse
    /// into one refetch.
    #[serde(default = "default_coalesce_window_ms")]
    pub coalesce_window_ms: u64,

    /// Upper bound on a single list fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            coalesce_window_ms: default_coalesce_window_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl RealtimeConfig {
    pub fn coalesce_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.coalesce_window_ms)
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_coalesce_window_ms() -> u64 {
    150
}

fn default_fetch_timeout_secs() -> u64 {
    10
}
