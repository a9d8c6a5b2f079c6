// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for the shell.

use colored::Colorize;
use sanctupoint_app::dashboard::DashboardStats;
use sanctupoint_app::donations::DonationTotals;
use sanctupoint_app::services::ServiceStats;
use sanctupoint_app::Notice;
use sanctupoint_core::{Appointment, AppointmentStatus, Donation, Identity, Payment, SanctuError, Service};
use sanctupoint_nav::{Navigator, Route, Screen, ScreenSet};

const DASH: &str = "-";

pub fn notice(notice: &Notice) {
    println!("{} {}", format!("{}:", notice.title).green().bold(), notice.message);
}

pub fn error(err: &SanctuError) {
    let notice = Notice::from_error(err);
    eprintln!("{} {}", format!("{}:", notice.title).red().bold(), notice.message);
}

pub fn heading(text: &str) {
    println!("{}", text.bold().underline());
}

fn empty(label: &str) {
    println!("  {}", format!("No {label} found.").dimmed());
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(DASH)
}

fn money(value: Option<f64>) -> String {
    format!("{:.2}", value.unwrap_or(0.0))
}

/// Current screen set, stack and tab bar.
pub fn location(nav: &mut Navigator) {
    match nav.screen_set() {
        ScreenSet::Blank => println!("{}", "(loading)".dimmed()),
        ScreenSet::Unauthenticated => {
            let top = nav.current().map(route_label).unwrap_or_default();
            println!("{} {}", "signed out:".yellow(), top);
        }
        ScreenSet::Authenticated { tier } => {
            let active = nav.active_tab();
            let bar: Vec<String> = nav
                .tabs()
                .iter()
                .map(|tab| {
                    if Some(*tab) == active {
                        format!("[{}]", tab.title()).cyan().bold().to_string()
                    } else {
                        tab.title().to_string()
                    }
                })
                .collect();
            println!("{} {}", format!("{tier}:").green(), bar.join("  "));
            let stack: Vec<String> = nav.stack().iter().map(route_label).collect();
            println!("  {} {}", "stack:".dimmed(), stack.join(" > "));
        }
    }
}

fn route_label(route: &Route) -> String {
    match &route.screen {
        Screen::MainTabs { active } => format!("main-tabs({active})"),
        Screen::ServiceDetails { service } | Screen::EditService { service } => {
            format!("{}({})", route.screen.kind(), service.name)
        }
        Screen::BookAppointment {
            preselected: Some(service),
        } => format!("{}({})", route.screen.kind(), service.name),
        other => other.kind().to_string(),
    }
}

pub fn services(rows: &[Service]) {
    if rows.is_empty() {
        return empty("services");
    }
    for service in rows {
        println!(
            "  #{:<4} {:<28} {:>10}  {}",
            service.id,
            service.name.bold(),
            service.price_label(),
            or_dash(service.description.as_deref()).dimmed()
        );
    }
}

pub fn service_details(service: &Service) {
    heading(&service.name);
    println!("  Price:       {}", service.price_label());
    println!("  Duration:    {}", or_dash(service.duration.as_deref()));
    println!("  Description: {}", or_dash(service.description.as_deref()));
}

fn status_label(appointment: &Appointment) -> String {
    let raw = appointment.status.as_str();
    match appointment.status() {
        Some(AppointmentStatus::Pending) => raw.yellow().to_string(),
        Some(AppointmentStatus::Approved) => raw.cyan().to_string(),
        Some(AppointmentStatus::Completed) => raw.green().to_string(),
        Some(AppointmentStatus::Cancelled) => raw.red().to_string(),
        None => raw.dimmed().to_string(),
    }
}

pub fn appointments(rows: &[Appointment]) {
    if rows.is_empty() {
        return empty("appointments");
    }
    for appointment in rows {
        let date = appointment
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| DASH.to_string());
        let time = appointment
            .time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| DASH.to_string());
        let booker = appointment
            .booker
            .as_ref()
            .map(|b| {
                [b.first_name.as_deref(), b.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|name| !name.is_empty());
        println!(
            "  #{:<4} {} {}  {:<22} {:<10} {}",
            appointment.id,
            date,
            time,
            or_dash(appointment.service_name()),
            status_label(appointment),
            or_dash(booker.as_deref().or(appointment.client_name.as_deref())).dimmed()
        );
    }
}

pub fn payments(rows: &[Payment]) {
    if rows.is_empty() {
        return empty("payments");
    }
    for payment in rows {
        let service = payment
            .appointment
            .as_ref()
            .and_then(|a| a.service_type.as_deref());
        println!(
            "  #{:<4} {} {:>10}  {:<12} {}",
            payment.id,
            payment
                .payment_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| DASH.to_string()),
            money(payment.amount),
            or_dash(payment.payment_method.as_deref()),
            or_dash(service).dimmed()
        );
    }
}

pub fn donations(rows: &[Donation], totals: &DonationTotals) {
    println!(
        "  {} {}   {} {}   {} {}",
        "Total:".bold(),
        format!("{:.2}", totals.total).green(),
        "Donations:".bold(),
        totals.count,
        "Donors:".bold(),
        totals.donors
    );
    if rows.is_empty() {
        return empty("donations");
    }
    for donation in rows {
        println!(
            "  #{:<4} {} {:>10}  {:<20} {}",
            donation.id,
            donation
                .donation_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| DASH.to_string()),
            money(donation.amount),
            or_dash(donation.donor_name.as_deref()),
            or_dash(donation.description.as_deref()).dimmed()
        );
    }
}

pub fn people(rows: &[Identity]) {
    if rows.is_empty() {
        return empty("customers");
    }
    for person in rows {
        println!(
            "  #{:<4} {:<24} {:<28} {}",
            person.id,
            person.display_name(),
            or_dash(person.email.as_deref()),
            or_dash(person.phone_number.as_deref()).dimmed()
        );
    }
}

pub fn profile(identity: &Identity) {
    heading(&identity.display_name());
    println!("  Username: {}", or_dash(identity.username.as_deref()));
    println!("  Email:    {}", or_dash(identity.email.as_deref()));
    println!("  Phone:    {}", or_dash(identity.phone_number.as_deref()));
    println!("  Role:     {}", or_dash(identity.role.as_deref()));
}

pub fn dashboard(stats: &DashboardStats) {
    heading("Dashboard");
    println!("  Pending appointments:   {}", stats.pending.to_string().yellow());
    println!("  Completed appointments: {}", stats.completed.to_string().green());
    println!("  Donations received:     {:.2}", stats.donation_total);
}

pub fn service_stats(stats: &ServiceStats) {
    println!(
        "  {} {}   {} {:.2}",
        "Services:".bold(),
        stats.total,
        "Average price:".bold(),
        stats.average_price
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_render_as_dash() {
        assert_eq!(or_dash(None), DASH);
        assert_eq!(or_dash(Some("  ")), DASH);
        assert_eq!(or_dash(Some("Mass")), "Mass");
    }

    #[test]
    fn missing_amount_is_zero() {
        assert_eq!(money(None), "0.00");
        assert_eq!(money(Some(12.5)), "12.50");
    }
}
