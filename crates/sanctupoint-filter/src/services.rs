// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service list orderings.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use sanctupoint_core::Service;
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use crate::{ListMode, Searchable};

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

/// Sort options on the service browser.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ServiceSort {
    /// Source order.
    #[strum(to_string = "All")]
    All,
    #[default]
    #[strum(to_string = "A-Z", serialize = "AToZ", serialize = "a-to-z")]
    AToZ,
    #[strum(to_string = "Z-A", serialize = "ZToA", serialize = "z-to-a")]
    ZToA,
    #[strum(to_string = "Lowest Price", serialize = "LowestPrice", serialize = "lowest-price")]
    LowestPrice,
    #[strum(to_string = "Highest Price", serialize = "HighestPrice", serialize = "highest-price")]
    HighestPrice,
}

impl ServiceSort {
    /// Parse a sort name, treating anything unrecognized as [`ServiceSort::All`].
    pub fn parse_lenient(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            warn!(mode = name, "unknown service sort; keeping source order");
            ServiceSort::All
        })
    }
}

/// Sort key approximating a locale-aware comparison: letters compare
/// without regard to case first, and only exact case-insensitive ties are
/// broken with lowercase before uppercase.
pub fn collation_key(name: &str) -> (String, Vec<bool>) {
    (
        name.to_lowercase(),
        name.chars().map(char::is_uppercase).collect(),
    )
}

impl ListMode<Service> for ServiceSort {
    fn refine(self, items: &mut Vec<Service>, _now: DateTime<Utc>) {
        // All sorts below are stable.
        match self {
            ServiceSort::All => {}
            ServiceSort::AToZ => items.sort_by_cached_key(|s| collation_key(&s.name)),
            ServiceSort::ZToA => items.sort_by_cached_key(|s| Reverse(collation_key(&s.name))),
            ServiceSort::LowestPrice => {
                items.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()))
            }
            ServiceSort::HighestPrice => {
                items.sort_by(|a, b| b.effective_price().total_cmp(&a.effective_price()))
            }
        }
    }
}
