// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for SanctuPoint integration tests.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory data store with change events and failure injection
//! - [`TestHarness`] - Full app stack over a temporary SQLite database or a `MockStore`

pub mod harness;
pub mod mock_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_store::MockStore;
