// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings for a SanctuPoint installation.
//!
//! Defaults are layered under `sanctupoint.toml` files and `SANCTUPOINT_*`
//! variables, then checked. Mistakes come back as diagnostics that name the
//! file and key at fault.
//!
//! ```no_run
//! let config = sanctupoint_config::load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SanctuConfig;

/// Run semantic checks on an extracted config, or turn the extraction
/// failure into diagnostics against whatever TOML `sources` yields.
fn checked(
    extracted: Result<SanctuConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<SanctuConfig, Vec<ConfigError>> {
    let config =
        extracted.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load from the system, user and working-directory files plus env overrides.
pub fn load_and_validate() -> Result<SanctuConfig, Vec<ConfigError>> {
    checked(loader::load_config(), collect_toml_sources)
}

/// Load from TOML text alone, with no files or env involved.
pub fn load_and_validate_str(toml_content: &str) -> Result<SanctuConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load from one explicit file, still honouring env overrides.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<SanctuConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    let system_path = std::path::Path::new(loader::SYSTEM_CONFIG);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

/// Serialize the effective configuration back to TOML.
pub fn to_toml_string(config: &SanctuConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::Other(e.to_string()))
}
