// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for SanctuPoint.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and a generic table client that
//! implements [`DataAccessAdapter`](sanctupoint_core::DataAccessAdapter) with
//! change notifications.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod sql;

pub use adapter::SqliteStore;
pub use database::Database;
