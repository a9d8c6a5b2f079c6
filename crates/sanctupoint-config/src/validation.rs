// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after extraction.

use crate::diagnostic::ConfigError;
use crate::model::SanctuConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const MIN_MEMORY_COST: u32 = 8192;
const MAX_COALESCE_MS: u64 = 10_000;

/// Check value ranges that serde cannot express.
///
/// Every broken rule is reported, not just the first.
pub fn validate_config(config: &SanctuConfig) -> Result<(), Vec<ConfigError>> {
    let app = &config.app;
    let auth = &config.auth;
    let realtime = &config.realtime;

    let level_ok = LOG_LEVELS.contains(&app.log_level.trim().to_ascii_lowercase().as_str());
    let rules = [
        (
            level_ok,
            format!("app.log_level `{}` must be one of {}", app.log_level, LOG_LEVELS.join(", ")),
        ),
        (
            !config.storage.database_path.trim().is_empty(),
            "storage.database_path must not be empty".to_string(),
        ),
        (
            auth.hash_memory_cost >= MIN_MEMORY_COST,
            format!(
                "auth.hash_memory_cost must be at least {MIN_MEMORY_COST} (8 MiB), got {}",
                auth.hash_memory_cost
            ),
        ),
        (
            auth.hash_iterations >= 1,
            format!("auth.hash_iterations must be at least 1, got {}", auth.hash_iterations),
        ),
        (
            auth.hash_parallelism >= 1,
            format!("auth.hash_parallelism must be at least 1, got {}", auth.hash_parallelism),
        ),
        (
            auth.min_password_length > 0,
            "auth.min_password_length must be at least 1".to_string(),
        ),
        (
            realtime.fetch_timeout_secs > 0,
            "realtime.fetch_timeout_secs must be greater than 0".to_string(),
        ),
        (
            realtime.coalesce_window_ms <= MAX_COALESCE_MS,
            format!(
                "realtime.coalesce_window_ms must be at most {MAX_COALESCE_MS}, got {}",
                realtime.coalesce_window_ms
            ),
        ),
    ];

    let errors: Vec<ConfigError> = rules
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, message)| ConfigError::Validation { message })
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
