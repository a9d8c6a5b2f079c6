// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment browser, history, management and records.

use serde_json::json;
use strum::IntoEnumIterator;
use tracing::info;

use sanctupoint_core::query::{decode_row, decode_rows, row, Direction, Embed, Filter, SelectQuery, Table};
use sanctupoint_core::{Appointment, AppointmentStatus, SanctuError};
use sanctupoint_filter::{AppointmentFilter, FilterState};
use sanctupoint_realtime::LiveTable;

use crate::context::{back_office, AppContext};
use crate::notice::Notice;

/// Every appointment, earliest first.
pub fn upcoming_first() -> SelectQuery {
    SelectQuery::new(Table::Appointments)
        .embed(Embed::BookedService)
        .order_by("date", Direction::Asc)
        .order_by("time", Direction::Asc)
}

/// Live appointment list with the search box and filter chips applied.
pub struct AppointmentBrowser {
    live: LiveTable<Appointment>,
    pub filter: FilterState<AppointmentFilter>,
}

impl AppointmentBrowser {
    pub fn open(ctx: &AppContext) -> Self {
        Self {
            live: LiveTable::query(ctx.store.clone(), upcoming_first(), ctx.live_options()),
            filter: FilterState::default(),
        }
    }

    pub fn live(&self) -> &LiveTable<Appointment> {
        &self.live
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    /// Selects a filter chip by name; unknown names show everything.
    pub fn set_mode(&mut self, name: &str) {
        self.filter.mode = AppointmentFilter::parse_lenient(name);
    }

    /// What the list shows right now.
    pub fn visible(&self) -> Vec<Appointment> {
        self.filter.apply(&self.live.rows())
    }

    pub fn refresh(&self) {
        self.live.refresh();
    }
}

/// The signed-in user's completed and cancelled appointments, newest first.
pub async fn history(ctx: &AppContext) -> Result<Vec<Appointment>, SanctuError> {
    let session = ctx.require_session()?;
    let closed: Vec<String> = AppointmentStatus::iter()
        .filter(|status| status.is_closed())
        .map(|status| status.to_string())
        .collect();
    let rows = ctx
        .store
        .select(
            SelectQuery::new(Table::Appointments)
                .embed(Embed::BookedService)
                .filter(Filter::eq("created_by", session.user_id()))
                .filter(Filter::is_in("status", closed))
                .order_by("date", Direction::Desc),
        )
        .await?;
    decode_rows(rows)
}

/// Staff view: live list of all appointments with status actions.
pub struct ManageAppointments {
    live: LiveTable<Appointment>,
}

impl ManageAppointments {
    pub fn open(ctx: &AppContext) -> Result<Self, SanctuError> {
        ctx.require_role(back_office, "manage appointments")?;
        Ok(Self {
            live: LiveTable::query(ctx.store.clone(), upcoming_first(), ctx.live_options()),
        })
    }

    pub fn live(&self) -> &LiveTable<Appointment> {
        &self.live
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.live.rows()
    }
}

/// Moves an appointment to `next`, if its current status allows it.
pub async fn set_status(
    ctx: &AppContext,
    appointment_id: i64,
    next: AppointmentStatus,
) -> Result<Notice, SanctuError> {
    ctx.require_role(back_office, "manage appointments")?;

    let current: Appointment = ctx
        .store
        .select(
            SelectQuery::new(Table::Appointments)
                .filter(Filter::eq("appointment_id", appointment_id))
                .limit(1),
        )
        .await?
        .into_iter()
        .next()
        .map(decode_row)
        .transpose()?
        .ok_or_else(|| SanctuError::not_found("appointment", "Appointment not found."))?;

    let allowed = current
        .status()
        .is_some_and(|status| status.can_transition_to(next));
    if !allowed {
        return Err(SanctuError::validation(format!(
            "A {} appointment cannot be marked {next}.",
            current.status.trim()
        )));
    }

    let changed = ctx
        .store
        .update(
            Table::Appointments,
            row([("status", json!(next.to_string()))]),
            vec![Filter::eq("appointment_id", appointment_id)],
        )
        .await?;
    if changed == 0 {
        return Err(SanctuError::not_found("appointment", "Appointment not found."));
    }

    info!(appointment_id, status = %next, "appointment status changed");
    Ok(Notice::success(format!(
        "Appointment {}!",
        next.to_string().to_lowercase()
    )))
}

/// Admin view: every appointment with its booker, newest first.
pub async fn records(ctx: &AppContext) -> Result<Vec<Appointment>, SanctuError> {
    ctx.require_role(back_office, "view appointment records")?;
    let rows = ctx
        .store
        .select(
            SelectQuery::new(Table::Appointments)
                .embed(Embed::Booker)
                .embed(Embed::BookedService)
                .order_by("date", Direction::Desc),
        )
        .await?;
    decode_rows(rows)
}
