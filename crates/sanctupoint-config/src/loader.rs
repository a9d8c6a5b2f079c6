// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config sources.
//!
//! Later layers win: compiled defaults, `/etc/sanctupoint`, the user config
//! dir, `./sanctupoint.toml`, then `SANCTUPOINT_*` variables.

#![allow(clippy::result_large_err)] // figment::Error is returned as-is

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SanctuConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/sanctupoint/sanctupoint.toml";
pub(crate) const LOCAL_CONFIG: &str = "sanctupoint.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sanctupoint/sanctupoint.toml"))
}

/// Extract the full layered configuration.
pub fn load_config() -> Result<SanctuConfig, figment::Error> {
    build_figment().extract()
}

/// Defaults plus the given TOML text. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<SanctuConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SanctuConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Defaults, one explicit file, then env overrides.
pub fn load_config_from_path(path: &Path) -> Result<SanctuConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SanctuConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The unextracted layer stack behind [`load_config`].
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SanctuConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

const SECTIONS: [&str; 4] = ["app", "storage", "auth", "realtime"];

/// `SANCTUPOINT_STORAGE_DATABASE_PATH` maps to `storage.database_path`.
///
/// Only the section prefix becomes a dot; underscores in key names survive.
fn env_provider() -> Env {
    Env::prefixed("SANCTUPOINT_").map(|key| {
        let key = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key.to_string())
            .into()
    })
}
