// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the SanctuPoint workspace.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    DataAccess,
    Auth,
}

/// Access tier of a signed-in user.
///
/// Parsing is exact: only the stored names below are recognized, so
/// `"admin"` or `" Admin"` is not a role at all.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Role {
    User,
    Client,
    Secretary,
    Cashier,
    Priest,
    Admin,
}

impl Role {
    pub fn is_customer(self) -> bool {
        matches!(self, Role::User | Role::Client)
    }

    pub fn is_staff(self) -> bool {
        matches!(self, Role::Secretary | Role::Cashier | Role::Priest)
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Roles allowed to create and edit services.
    pub fn can_manage_services(self) -> bool {
        matches!(self, Role::Admin | Role::Secretary | Role::Priest)
    }
}

/// A user record as returned by the data service.
///
/// `role` is kept as the raw stored string; [`Identity::role`] parses it.
/// Unrecognized values are preserved so the navigation layer can decide how
/// to treat them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "user_id")]
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Identity {
    /// Parsed role, or `None` when absent or unrecognized.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// "First Last", falling back to the username and then the id.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !parts.is_empty() {
            return parts.join(" ");
        }
        match self.username.as_deref() {
            Some(u) if !u.trim().is_empty() => u.trim().to_string(),
            _ => format!("user #{}", self.id),
        }
    }
}

/// Lifecycle state of an appointment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether a staff member may move an appointment from `self` to `next`.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Cancelled) | (Approved, Completed) | (Approved, Cancelled)
        )
    }

    pub fn is_closed(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

/// Booking user embedded into an appointment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookerRef {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Booked service embedded into an appointment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "appointment_id")]
    pub id: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub service_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default, rename = "users", skip_serializing_if = "Option::is_none")]
    pub booker: Option<BookerRef>,
    #[serde(default, rename = "services", skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceRef>,
}

impl Appointment {
    /// Parsed status, or `None` for values outside the known set.
    pub fn status(&self) -> Option<AppointmentStatus> {
        self.status.trim().parse().ok()
    }

    /// Service label: the embedded service name, else the stored service type.
    pub fn service_name(&self) -> Option<&str> {
        self.service
            .as_ref()
            .and_then(|s| s.service_name.as_deref())
            .or(self.service_type.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "service_id")]
    pub id: i64,
    #[serde(rename = "service_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl Service {
    /// Price used for ordering and aggregates; absent counts as zero.
    pub fn effective_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Price label shown on the detail screen.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(p) if p > 0.0 => format!("{p:.2}"),
            _ => "Free".to_string(),
        }
    }
}

/// Linked appointment embedded into a payment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAppointmentRef {
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "payment_id")]
    pub id: i64,
    #[serde(default)]
    pub appointment_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default, rename = "appointments", skip_serializing_if = "Option::is_none")]
    pub appointment: Option<PaymentAppointmentRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    #[serde(rename = "donation_id")]
    pub id: i64,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub donation_date: Option<NaiveDate>,
}
