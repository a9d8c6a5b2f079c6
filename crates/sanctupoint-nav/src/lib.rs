// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Navigation resolver.
//!
//! Computes which screens exist for the current session and mediates every
//! transition between them. The screen graph has two macro-states:
//!
//! * **Unauthenticated**: `Login` at the root, `Register` pushed on top.
//! * **Authenticated**: `MainTabs` at the root (tab set chosen by role tier)
//!   with typed stack screens pushed on top.
//!
//! A [`Navigator`] follows a [`SessionAuthority`](sanctupoint_session::SessionAuthority)
//! through its watch channel, so signing in replaces the stack with the
//! main tabs and signing out resets it to `Login`.

pub mod navigator;
pub mod screen;
pub mod tabs;

pub use navigator::{Navigator, ScreenSet, Transition};
pub use screen::{Route, RouteKey, Screen, ScreenKind};
pub use tabs::{RoleTier, Tab};
