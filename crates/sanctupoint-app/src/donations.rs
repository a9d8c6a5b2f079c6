// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Donation summary.

use std::collections::HashSet;

use sanctupoint_core::query::{Direction, SelectQuery, Table};
use sanctupoint_core::{Donation, SanctuError};
use sanctupoint_realtime::LiveTable;

use crate::context::{back_office, AppContext};

/// Totals shown above the donation list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationTotals {
    pub total: f64,
    pub count: usize,
    /// Distinct donor names, ignoring case; anonymous gifts are not counted.
    pub donors: usize,
}

impl DonationTotals {
    pub fn from_donations(donations: &[Donation]) -> Self {
        let total = donations.iter().filter_map(|d| d.amount).sum();
        let donors: HashSet<String> = donations
            .iter()
            .filter_map(|d| d.donor_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self {
            total,
            count: donations.len(),
            donors: donors.len(),
        }
    }
}

/// Live donation list, newest first.
pub struct DonationSummary {
    live: LiveTable<Donation>,
}

impl DonationSummary {
    pub fn open(ctx: &AppContext) -> Result<Self, SanctuError> {
        ctx.require_role(back_office, "view donations")?;
        let query =
            SelectQuery::new(Table::Donations).order_by("donation_date", Direction::Desc);
        Ok(Self {
            live: LiveTable::query(ctx.store.clone(), query, ctx.live_options()),
        })
    }

    pub fn live(&self) -> &LiveTable<Donation> {
        &self.live
    }

    pub fn donations(&self) -> Vec<Donation> {
        self.live.rows()
    }

    pub fn totals(&self) -> DonationTotals {
        DonationTotals::from_donations(&self.live.rows())
    }

    pub fn refresh(&self) {
        self.live.refresh();
    }
}
