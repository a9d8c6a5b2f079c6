// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer records.

use sanctupoint_core::query::{decode_rows, Direction, SelectQuery, Table};
use sanctupoint_core::{Identity, SanctuError};

use crate::context::{back_office, AppContext};

const CUSTOMER_COLUMNS: &[&str] = &[
    "user_id",
    "username",
    "first_name",
    "last_name",
    "email",
    "phone_number",
    "role",
];

/// Every account, ordered by first name.
pub async fn customers(ctx: &AppContext) -> Result<Vec<Identity>, SanctuError> {
    ctx.require_role(back_office, "view customer records")?;
    let rows = ctx
        .store
        .select(
            SelectQuery::new(Table::Users)
                .columns(CUSTOMER_COLUMNS)
                .order_by("first_name", Direction::Asc),
        )
        .await?;
    decode_rows(rows)
}
