// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin dashboard counters.

use serde_json::Value;
use tracing::warn;

use sanctupoint_core::query::{Filter, SelectQuery, Table};
use sanctupoint_core::{AppointmentStatus, Role, SanctuError};

use crate::context::AppContext;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    pub pending: usize,
    pub completed: usize,
    pub donation_total: f64,
}

/// Loads the three counters concurrently. A failed read is logged and
/// shows as zero; it does not fail the dashboard.
pub async fn load(ctx: &AppContext) -> Result<DashboardStats, SanctuError> {
    ctx.require_role(Role::is_admin, "open the dashboard")?;

    let (pending, completed, donations) = tokio::join!(
        count_with_status(ctx, AppointmentStatus::Pending),
        count_with_status(ctx, AppointmentStatus::Completed),
        donation_total(ctx),
    );

    Ok(DashboardStats {
        pending: pending.unwrap_or_else(|e| {
            warn!(error = %e, "failed to count pending appointments");
            0
        }),
        completed: completed.unwrap_or_else(|e| {
            warn!(error = %e, "failed to count completed appointments");
            0
        }),
        donation_total: donations.unwrap_or_else(|e| {
            warn!(error = %e, "failed to total donations");
            0.0
        }),
    })
}

async fn count_with_status(
    ctx: &AppContext,
    status: AppointmentStatus,
) -> Result<usize, SanctuError> {
    let rows = ctx
        .store
        .select(
            SelectQuery::new(Table::Appointments)
                .columns(&["appointment_id"])
                .filter(Filter::eq("status", status.to_string())),
        )
        .await?;
    Ok(rows.len())
}

async fn donation_total(ctx: &AppContext) -> Result<f64, SanctuError> {
    let rows = ctx
        .store
        .select(SelectQuery::new(Table::Donations).columns(&["amount"]))
        .await?;
    Ok(rows
        .iter()
        .filter_map(|r| r.get("amount").and_then(Value::as_f64))
        .sum())
}
