// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tab sets per role tier.

use sanctupoint_core::Role;
use strum::{Display, EnumIter, EnumString};

/// A bottom tab inside `MainTabs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Tab {
    /// Customer appointment browser.
    Appointments,
    Services,
    /// Customer's closed appointments.
    History,
    Payments,
    Profile,
    ManageAppointments,
    Donations,
    Customers,
    /// Read-only list of every appointment with its booker.
    AppointmentRecords,
    Dashboard,
    AddStaff,
    ServiceDashboard,
}

impl Tab {
    /// Label shown on the tab bar.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Appointments | Tab::AppointmentRecords => "Appointments",
            Tab::Services | Tab::ServiceDashboard => "Services",
            Tab::History => "History",
            Tab::Payments => "Payments",
            Tab::Profile => "Profile",
            Tab::ManageAppointments => "Manage",
            Tab::Donations => "Donations",
            Tab::Customers => "Customers",
            Tab::Dashboard => "Dashboard",
            Tab::AddStaff => "Add Staff",
        }
    }
}

const CUSTOMER_TABS: &[Tab] = &[
    Tab::Appointments,
    Tab::Services,
    Tab::History,
    Tab::Payments,
    Tab::Profile,
];

const STAFF_TABS: &[Tab] = &[
    Tab::ManageAppointments,
    Tab::Payments,
    Tab::Donations,
    Tab::Customers,
    Tab::AppointmentRecords,
    Tab::Profile,
];

const ADMIN_TABS: &[Tab] = &[
    Tab::Dashboard,
    Tab::AddStaff,
    Tab::ManageAppointments,
    Tab::Donations,
    Tab::ServiceDashboard,
    Tab::Customers,
    Tab::AppointmentRecords,
    Tab::Profile,
];

/// Access tier that selects a tab set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RoleTier {
    Customer,
    Staff,
    Admin,
}

impl RoleTier {
    /// Tier for a role. A missing or unrecognized role falls back to the
    /// customer tier.
    pub fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::Admin) => RoleTier::Admin,
            Some(Role::Secretary | Role::Cashier | Role::Priest) => RoleTier::Staff,
            Some(Role::User | Role::Client) | None => RoleTier::Customer,
        }
    }

    /// Ordered tab set.
    pub fn tabs(self) -> &'static [Tab] {
        match self {
            RoleTier::Customer => CUSTOMER_TABS,
            RoleTier::Staff => STAFF_TABS,
            RoleTier::Admin => ADMIN_TABS,
        }
    }

    pub fn has_tab(self, tab: Tab) -> bool {
        self.tabs().contains(&tab)
    }

    pub fn default_tab(self) -> Tab {
        self.tabs()[0]
    }
}
