// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for SanctuPoint.
//!
//! This crate provides the error taxonomy, domain types, the table query
//! model and the adapter traits shared by every other crate in the
//! workspace.

pub mod error;
pub mod feed;
pub mod query;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, SanctuError};
pub use feed::{ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription, SubscriptionId};
pub use query::{Direction, Embed, Filter, Order, Row, SelectQuery, Table};
pub use types::{
    AdapterType, Appointment, AppointmentStatus, Donation, HealthStatus, Identity, Payment, Role,
    Service,
};

pub use traits::{AuthAdapter, DataAccessAdapter, PluginAdapter};
