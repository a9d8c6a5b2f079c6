// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SanctuPoint - appointment scheduling for parishes.
//!
//! This is the binary entry point: an interactive shell over the headless
//! app, database initialization and configuration printing.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod init;
mod render;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use sanctupoint_config::model::SanctuConfig;

/// SanctuPoint - appointment scheduling for parishes.
#[derive(Parser, Debug)]
#[command(name = "sanctupoint", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive shell (default).
    Shell,
    /// Create the database and an admin account.
    Init {
        /// Username of the admin account.
        #[arg(long, default_value = "admin")]
        username: String,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sanctupoint_config::load_and_validate_path(path),
        None => sanctupoint_config::load_and_validate(),
    };
    let config: SanctuConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sanctupoint_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            init_tracing(&config.app.log_level);
            shell::run_shell(config).await
        }
        Commands::Init { username } => {
            init_tracing(&config.app.log_level);
            init::run_init(config, &username).await
        }
        Commands::Config => match sanctupoint_config::to_toml_string(&config) {
            Ok(toml) => {
                print!("{toml}");
                Ok(())
            }
            Err(e) => {
                sanctupoint_config::render_errors(&[e]);
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Installs the fmt subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sanctupoint={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn shell_is_the_default_command() {
        let cli = Cli::parse_from(["sanctupoint"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["sanctupoint", "init", "--username", "rector"]);
        assert!(matches!(cli.command, Some(Commands::Init { username }) if username == "rector"));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["sanctupoint", "config", "--config", "/tmp/s.toml"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/s.toml")));
    }
}
