// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment history.

use sanctupoint_core::query::{decode_rows, Direction, Embed, SelectQuery, Table};
use sanctupoint_core::{Payment, SanctuError};

use crate::context::AppContext;

/// Recorded payments, newest first, each with its appointment's service.
pub async fn payment_history(ctx: &AppContext) -> Result<Vec<Payment>, SanctuError> {
    ctx.require_session()?;
    let rows = ctx
        .store
        .select(
            SelectQuery::new(Table::Payments)
                .embed(Embed::PaidAppointment)
                .order_by("payment_date", Direction::Desc),
        )
        .await?;
    decode_rows(rows)
}
