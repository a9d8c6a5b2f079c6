// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live table views for SanctuPoint screens.
//!
//! A [`LiveTable`] fetches once when created, then refetches whenever the
//! watched table changes or the owner asks for a refresh. Bursts of
//! change events are coalesced into a single fetch, fetches never overlap,
//! and every fetch is bounded by a timeout. The latest rows are published
//! through a `watch` channel so the owning screen can render on change.

pub mod live;

pub use live::{LiveOptions, LiveTable, Snapshot};
