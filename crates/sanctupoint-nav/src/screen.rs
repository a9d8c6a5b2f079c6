// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screens and stack routes.

use sanctupoint_core::{Role, Service};
use strum::{Display, EnumIter, EnumString};

use crate::tabs::{RoleTier, Tab};

/// A screen together with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Register,
    MainTabs { active: Tab },
    /// Booking form, optionally with a service already chosen.
    BookAppointment { preselected: Option<Service> },
    ServiceDetails { service: Service },
    AddService,
    EditService { service: Service },
    ServiceDashboard,
}

/// Parameter-free screen identity, used for access checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ScreenKind {
    Login,
    Register,
    MainTabs,
    BookAppointment,
    ServiceDetails,
    AddService,
    EditService,
    ServiceDashboard,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Login => ScreenKind::Login,
            Screen::Register => ScreenKind::Register,
            Screen::MainTabs { .. } => ScreenKind::MainTabs,
            Screen::BookAppointment { .. } => ScreenKind::BookAppointment,
            Screen::ServiceDetails { .. } => ScreenKind::ServiceDetails,
            Screen::AddService => ScreenKind::AddService,
            Screen::EditService { .. } => ScreenKind::EditService,
            Screen::ServiceDashboard => ScreenKind::ServiceDashboard,
        }
    }
}

impl ScreenKind {
    /// Whether a signed-in user may push this screen.
    ///
    /// `role` is the parsed role; an unrecognized role is `None` and gets
    /// only what every signed-in user gets.
    pub fn allowed_for(self, role: Option<Role>) -> bool {
        match self {
            ScreenKind::Login | ScreenKind::Register | ScreenKind::MainTabs => false,
            ScreenKind::BookAppointment | ScreenKind::ServiceDetails => true,
            ScreenKind::AddService | ScreenKind::EditService => {
                role.is_some_and(Role::can_manage_services)
            }
            ScreenKind::ServiceDashboard => RoleTier::for_role(role) == RoleTier::Admin,
        }
    }
}

/// Identity of one pushed screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey(pub u64);

/// A screen instance on the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub key: RouteKey,
    pub screen: Screen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_editing_is_limited_to_managing_roles() {
        for role in [Role::Admin, Role::Secretary, Role::Priest] {
            assert!(ScreenKind::EditService.allowed_for(Some(role)));
            assert!(ScreenKind::AddService.allowed_for(Some(role)));
        }
        for role in [Some(Role::Cashier), Some(Role::User), Some(Role::Client), None] {
            assert!(!ScreenKind::EditService.allowed_for(role));
        }
    }

    #[test]
    fn service_dashboard_is_admin_only() {
        assert!(ScreenKind::ServiceDashboard.allowed_for(Some(Role::Admin)));
        assert!(!ScreenKind::ServiceDashboard.allowed_for(Some(Role::Priest)));
    }

    #[test]
    fn roots_are_never_pushable() {
        for role in [None, Some(Role::Admin)] {
            assert!(!ScreenKind::MainTabs.allowed_for(role));
            assert!(!ScreenKind::Login.allowed_for(role));
        }
    }

    #[test]
    fn kinds_parse() {
        assert_eq!(
            "book-appointment".parse::<ScreenKind>().unwrap(),
            ScreenKind::BookAppointment
        );
    }
}
