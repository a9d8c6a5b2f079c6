// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment booking.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tracing::info;

use sanctupoint_core::query::{decode_row, decode_rows, row, Direction, SelectQuery, Table};
use sanctupoint_core::{Appointment, AppointmentStatus, SanctuError, Service};

use crate::context::AppContext;

/// The booking form.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub service: Option<Service>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Defaults to the signed-in user's name when blank.
    pub client_name: Option<String>,
    pub notes: Option<String>,
}

impl BookingForm {
    pub fn new(preselected: Option<Service>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            service: preselected,
            date,
            time,
            client_name: None,
            notes: None,
        }
    }
}

/// Services offered in the booking picker, by name.
pub async fn bookable_services(ctx: &AppContext) -> Result<Vec<Service>, SanctuError> {
    let rows = ctx
        .store
        .select(SelectQuery::new(Table::Services).order_by("service_name", Direction::Asc))
        .await?;
    decode_rows(rows)
}

/// Books a pending appointment for the signed-in user.
pub async fn book(ctx: &AppContext, form: &BookingForm) -> Result<Appointment, SanctuError> {
    let session = ctx.require_session()?;
    let Some(service) = &form.service else {
        return Err(SanctuError::validation("Please select a service."));
    };

    let client_name = form
        .client_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| session.identity().display_name());
    let notes = form
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or(Value::Null, |n| json!(n));

    let record = row([
        ("date", json!(form.date.format("%Y-%m-%d").to_string())),
        ("time", json!(form.time.format("%H:%M:%S").to_string())),
        ("service_id", json!(service.id)),
        ("service_type", json!(service.name)),
        ("status", json!(AppointmentStatus::Pending.to_string())),
        ("client_name", json!(client_name)),
        ("notes", notes),
        ("created_by", json!(session.user_id())),
    ]);
    let stored = ctx
        .store
        .insert(Table::Appointments, vec![record])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SanctuError::Internal("insert returned no row".to_string()))?;
    let appointment: Appointment = decode_row(stored)?;

    info!(
        appointment_id = appointment.id,
        service = %service.name,
        date = %form.date,
        "appointment booked"
    );
    Ok(appointment)
}
