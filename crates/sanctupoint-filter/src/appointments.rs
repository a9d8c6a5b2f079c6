// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment list modes.

use chrono::{DateTime, NaiveTime, Utc};
use sanctupoint_core::Appointment;
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use crate::{ListMode, Searchable};

impl Searchable for Appointment {
    fn search_fields(&self) -> Vec<&str> {
        [
            self.client_name.as_deref(),
            self.service_name(),
            self.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Filter chips on the appointment browser.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AppointmentFilter {
    #[default]
    All,
    /// Dated today-or-later relative to "now".
    Upcoming,
    Past,
    Pending,
    Completed,
}

impl AppointmentFilter {
    /// Parse a mode name, treating anything unrecognized as [`AppointmentFilter::All`].
    pub fn parse_lenient(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            warn!(mode = name, "unknown appointment filter; showing all");
            AppointmentFilter::All
        })
    }
}

/// The instant an appointment's date starts: midnight UTC.
fn starts_at(appointment: &Appointment) -> Option<DateTime<Utc>> {
    appointment
        .date
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn status_is(appointment: &Appointment, wanted: &str) -> bool {
    appointment.status.trim().to_lowercase() == wanted
}

impl ListMode<Appointment> for AppointmentFilter {
    fn refine(self, items: &mut Vec<Appointment>, now: DateTime<Utc>) {
        match self {
            AppointmentFilter::All => {}
            // Undated appointments are neither upcoming nor past.
            AppointmentFilter::Upcoming => items.retain(|a| starts_at(a).is_some_and(|t| t >= now)),
            AppointmentFilter::Past => items.retain(|a| starts_at(a).is_some_and(|t| t < now)),
            AppointmentFilter::Pending => items.retain(|a| status_is(a, "pending")),
            AppointmentFilter::Completed => items.retain(|a| status_is(a, "completed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply_at;
    use chrono::{Duration, NaiveDate};
    use sanctupoint_core::types::ServiceRef;

    fn appt(id: i64, date: Option<NaiveDate>, status: &str) -> Appointment {
        Appointment {
            id,
            date,
            time: None,
            service_id: None,
            service_type: Some("Mass".into()),
            status: status.into(),
            client_name: Some(format!("Client {id}")),
            notes: None,
            created_by: None,
            booker: None,
            service: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn midnight(d: NaiveDate) -> DateTime<Utc> {
        d.and_time(NaiveTime::MIN).and_utc()
    }

    #[test]
    fn upcoming_includes_today_at_midnight() {
        let source = [
            appt(1, Some(today() - Duration::days(1)), "Pending"),
            appt(2, Some(today()), "Pending"),
            appt(3, Some(today() + Duration::days(1)), "Pending"),
        ];
        let now = midnight(today());

        let upcoming = apply_at(&source, "", AppointmentFilter::Upcoming, now);
        assert_eq!(upcoming.iter().map(|a| a.id).collect::<Vec<_>>(), [2, 3]);

        let past = apply_at(&source, "", AppointmentFilter::Past, now);
        assert_eq!(past.iter().map(|a| a.id).collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn later_today_makes_today_past() {
        let source = [appt(1, Some(today()), "Pending")];
        let now = midnight(today()) + Duration::hours(9);
        assert!(apply_at(&source, "", AppointmentFilter::Upcoming, now).is_empty());
        assert_eq!(apply_at(&source, "", AppointmentFilter::Past, now).len(), 1);
    }

    #[test]
    fn undated_is_neither_upcoming_nor_past() {
        let source = [appt(1, None, "Pending")];
        let now = midnight(today());
        assert!(apply_at(&source, "", AppointmentFilter::Upcoming, now).is_empty());
        assert!(apply_at(&source, "", AppointmentFilter::Past, now).is_empty());
        assert_eq!(apply_at(&source, "", AppointmentFilter::All, now).len(), 1);
    }

    #[test]
    fn status_modes_ignore_case() {
        let source = [
            appt(1, None, "pending"),
            appt(2, None, "Completed"),
            appt(3, None, "PENDING "),
            appt(4, None, "Cancelled"),
        ];
        let now = midnight(today());
        let pending = apply_at(&source, "", AppointmentFilter::Pending, now);
        assert_eq!(pending.iter().map(|a| a.id).collect::<Vec<_>>(), [1, 3]);
        let done = apply_at(&source, "", AppointmentFilter::Completed, now);
        assert_eq!(done.iter().map(|a| a.id).collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn query_matches_client_service_or_notes() {
        let mut wedding = appt(1, None, "Pending");
        wedding.service = Some(ServiceRef {
            service_name: Some("Wedding".into()),
            price: None,
        });
        let mut noted = appt(2, None, "Pending");
        noted.notes = Some("bring the wedding rings".into());
        let mut named = appt(3, None, "Pending");
        named.client_name = Some("Ana Wedderburn".into());
        let other = appt(4, None, "Pending");

        let source = [wedding, noted, named, other];
        let hits = apply_at(&source, "wedd", AppointmentFilter::All, midnight(today()));
        assert_eq!(hits.iter().map(|a| a.id).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn query_and_mode_compose() {
        let source = [appt(1, None, "Pending"), appt(2, None, "Completed")];
        let hits = apply_at(&source, "client 2", AppointmentFilter::Pending, midnight(today()));
        assert!(hits.is_empty());
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_mode_means_all() {
        assert_eq!(AppointmentFilter::parse_lenient("upcoming"), AppointmentFilter::Upcoming);
        assert_eq!(AppointmentFilter::parse_lenient("Tomorrow"), AppointmentFilter::All);
        assert!(logs_contain("unknown appointment filter"));
    }
}
