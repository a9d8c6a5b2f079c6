// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List query, filter and sort engine.
//!
//! One pure function, [`apply`], turns a fetched result set plus a
//! free-text query and a named mode into the list a screen displays:
//!
//! 1. A non-blank query keeps items whose searchable fields contain it,
//!    ignoring case.
//! 2. The mode then filters (appointments) or reorders (services).
//!
//! The source slice is never modified, and applying the same state to its
//! own output changes nothing.

pub mod appointments;
pub mod services;

use chrono::{DateTime, Utc};

pub use appointments::AppointmentFilter;
pub use services::ServiceSort;

/// Items the free-text query can match.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match; `needle` must already be lowercased.
    fn matches_needle(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A named refinement applied after the text query.
pub trait ListMode<T>: Copy {
    fn refine(self, items: &mut Vec<T>, now: DateTime<Utc>);
}

/// Apply `query` and `mode` to `source` as of the current instant.
pub fn apply<T, M>(source: &[T], query: &str, mode: M) -> Vec<T>
where
    T: Searchable + Clone,
    M: ListMode<T>,
{
    apply_at(source, query, mode, Utc::now())
}

/// [`apply`] with an explicit "now", for date-relative modes.
pub fn apply_at<T, M>(source: &[T], query: &str, mode: M, now: DateTime<Utc>) -> Vec<T>
where
    T: Searchable + Clone,
    M: ListMode<T>,
{
    let needle = query.trim().to_lowercase();
    let mut items: Vec<T> = if needle.is_empty() {
        source.to_vec()
    } else {
        source
            .iter()
            .filter(|item| item.matches_needle(&needle))
            .cloned()
            .collect()
    };
    mode.refine(&mut items, now);
    items
}

/// Query text plus mode, as held by a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState<M> {
    pub query: String,
    pub mode: M,
}

impl<M: Copy> FilterState<M> {
    pub fn new(query: impl Into<String>, mode: M) -> Self {
        Self {
            query: query.into(),
            mode,
        }
    }

    pub fn apply<T>(&self, source: &[T]) -> Vec<T>
    where
        T: Searchable + Clone,
        M: ListMode<T>,
    {
        apply(source, &self.query, self.mode)
    }

    pub fn apply_at<T>(&self, source: &[T], now: DateTime<Utc>) -> Vec<T>
    where
        T: Searchable + Clone,
        M: ListMode<T>,
    {
        apply_at(source, &self.query, self.mode, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note(&'static str);

    impl Searchable for Note {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.0]
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Keep;

    impl ListMode<Note> for Keep {
        fn refine(self, _items: &mut Vec<Note>, _now: DateTime<Utc>) {}
    }

    #[test]
    fn blank_query_is_identity() {
        let source = [Note("Mass"), Note("Vigil")];
        assert_eq!(apply(&source, "", Keep), source);
        assert_eq!(apply(&source, "   ", Keep), source);
    }

    #[test]
    fn query_is_trimmed_and_case_insensitive() {
        let source = [Note("Evening Mass"), Note("Vigil")];
        assert_eq!(apply(&source, "  MASS ", Keep), [Note("Evening Mass")]);
    }

    #[test]
    fn empty_source_gives_empty_output() {
        let source: [Note; 0] = [];
        assert!(apply(&source, "x", Keep).is_empty());
    }

    #[test]
    fn filter_state_reapplies_to_fresh_data() {
        let state = FilterState::new("vig", Keep);
        assert_eq!(state.apply(&[Note("Vigil"), Note("Mass")]), [Note("Vigil")]);
        assert_eq!(state.apply(&[Note("Vigil Mass")]), [Note("Vigil Mass")]);
    }
}
