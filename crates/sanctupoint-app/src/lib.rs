// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headless screen controllers for SanctuPoint.
//!
//! Each module backs one screen (or a small family of them) and is a thin
//! composition of the data store, the session authority, the list engine
//! and live tables. [`App`] ties the controllers to a [`Navigator`] so a
//! front end (the interactive shell, or a test) only has to render.

pub mod appointments;
pub mod auth;
pub mod booking;
pub mod context;
pub mod customers;
pub mod dashboard;
pub mod donations;
pub mod notice;
pub mod payments;
pub mod services;
pub mod staff;

use std::sync::Arc;

use sanctupoint_core::{Appointment, Identity, SanctuError, Service};
use sanctupoint_nav::{Navigator, Screen, ScreenKind, ScreenSet, Tab};
use tracing::debug;

pub use context::AppContext;
pub use notice::Notice;

/// Controllers plus the navigation state for one signed-in-or-not user.
pub struct App {
    ctx: Arc<AppContext>,
    nav: Navigator,
}

impl App {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        let nav = Navigator::new(&ctx.session);
        Self { ctx, nav }
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    pub fn navigator(&mut self) -> &mut Navigator {
        &mut self.nav
    }

    /// Signs in; the navigator replaces `Login` with the main tabs.
    pub async fn login(&mut self, form: &auth::LoginForm) -> Result<Identity, SanctuError> {
        auth::login(&self.ctx, form).await
    }

    pub fn open_register(&mut self) -> Result<(), SanctuError> {
        self.nav.push(Screen::Register).map(|_| ())
    }

    /// Creates the account and returns to `Login`.
    pub async fn register(
        &mut self,
        form: &auth::RegistrationForm,
    ) -> Result<Identity, SanctuError> {
        let identity = auth::register(&self.ctx, form).await?;
        if self.nav.current().map(|r| r.screen.kind()) == Some(ScreenKind::Register) {
            self.nav.pop()?;
        }
        Ok(identity)
    }

    pub fn logout(&mut self) -> Notice {
        auth::logout(&self.ctx)
    }

    pub fn open_service(&mut self, service: Service) -> Result<(), SanctuError> {
        self.nav.push(Screen::ServiceDetails { service }).map(|_| ())
    }

    pub fn start_booking(&mut self, preselected: Option<Service>) -> Result<(), SanctuError> {
        self.nav
            .push(Screen::BookAppointment { preselected })
            .map(|_| ())
    }

    /// Books and lands on the appointment list with a fresh stack.
    pub async fn book(&mut self, form: &booking::BookingForm) -> Result<Appointment, SanctuError> {
        let appointment = booking::book(&self.ctx, form).await?;
        let tab = match self.nav.screen_set() {
            ScreenSet::Authenticated { tier } if !tier.has_tab(Tab::Appointments) => {
                Tab::AppointmentRecords
            }
            _ => Tab::Appointments,
        };
        self.nav.reset_to_tab(tab)?;
        debug!(appointment_id = appointment.id, tab = %tab, "returned to appointment list");
        Ok(appointment)
    }

    pub fn open_add_service(&mut self) -> Result<(), SanctuError> {
        self.nav.push(Screen::AddService).map(|_| ())
    }

    pub fn open_edit_service(&mut self, service: Service) -> Result<(), SanctuError> {
        self.nav.push(Screen::EditService { service }).map(|_| ())
    }

    pub fn open_service_dashboard(&mut self) -> Result<(), SanctuError> {
        self.nav.push(Screen::ServiceDashboard).map(|_| ())
    }

    /// Saves a new service and leaves the form.
    pub async fn save_new_service(
        &mut self,
        form: &services::ServiceForm,
    ) -> Result<Service, SanctuError> {
        let service = services::add_service(&self.ctx, form).await?;
        self.leave(ScreenKind::AddService)?;
        Ok(service)
    }

    /// Saves edits to an existing service and leaves the form.
    pub async fn save_service(
        &mut self,
        service_id: i64,
        form: &services::ServiceForm,
    ) -> Result<(), SanctuError> {
        services::update_service(&self.ctx, service_id, form).await?;
        self.leave(ScreenKind::EditService)
    }

    pub async fn remove_service(&mut self, service_id: i64) -> Result<(), SanctuError> {
        services::delete_service(&self.ctx, service_id).await?;
        self.leave(ScreenKind::EditService)
    }

    /// Pops `kind` if it is on top.
    fn leave(&mut self, kind: ScreenKind) -> Result<(), SanctuError> {
        if self.nav.current().map(|r| r.screen.kind()) == Some(kind) {
            self.nav.pop()?;
        }
        Ok(())
    }
}
