// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the list engine: purity, idempotence and stability.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use proptest::prelude::*;
use sanctupoint_core::{Appointment, Service};
use sanctupoint_filter::{apply_at, AppointmentFilter, ServiceSort};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn now() -> DateTime<Utc> {
    base_date().and_time(NaiveTime::MIN).and_utc()
}

prop_compose! {
    fn arb_service()(
        id in 0i64..1000,
        name in "[a-cA-C ]{0,5}",
        description in proptest::option::of("[a-c]{0,6}"),
        price in proptest::option::of(0u16..5),
    ) -> Service {
        Service {
            id,
            name,
            description,
            price: price.map(f64::from),
            duration: None,
        }
    }
}

/// Services whose id is their position in the vector, so equal-looking
/// entries stay distinguishable after sorting.
fn indexed_services() -> impl Strategy<Value = Vec<Service>> {
    proptest::collection::vec(arb_service(), 0..12).prop_map(|mut services| {
        for (index, service) in services.iter_mut().enumerate() {
            service.id = index as i64;
        }
        services
    })
}

prop_compose! {
    fn arb_appointment()(
        id in 0i64..1000,
        offset in proptest::option::of(-3i64..3),
        status in prop_oneof![
            Just("Pending"), Just("pending"), Just("Approved"),
            Just("Completed"), Just("Cancelled"),
        ],
        client in proptest::option::of("[a-cA-C]{0,4}"),
        notes in proptest::option::of("[a-c ]{0,6}"),
    ) -> Appointment {
        Appointment {
            id,
            date: offset.map(|d| base_date() + Duration::days(d)),
            time: None,
            service_id: None,
            service_type: Some("Mass".to_string()),
            status: status.to_string(),
            client_name: client,
            notes,
            created_by: None,
            booker: None,
            service: None,
        }
    }
}

fn arb_sort() -> impl Strategy<Value = ServiceSort> {
    prop_oneof![
        Just(ServiceSort::All),
        Just(ServiceSort::AToZ),
        Just(ServiceSort::ZToA),
        Just(ServiceSort::LowestPrice),
        Just(ServiceSort::HighestPrice),
    ]
}

fn arb_filter() -> impl Strategy<Value = AppointmentFilter> {
    prop_oneof![
        Just(AppointmentFilter::All),
        Just(AppointmentFilter::Upcoming),
        Just(AppointmentFilter::Past),
        Just(AppointmentFilter::Pending),
        Just(AppointmentFilter::Completed),
    ]
}

proptest! {
    #[test]
    fn service_engine_is_idempotent(
        source in proptest::collection::vec(arb_service(), 0..12),
        query in "[a-cA-C ]{0,3}",
        sort in arb_sort(),
    ) {
        let once = apply_at(&source, &query, sort, now());
        let twice = apply_at(&once, &query, sort, now());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn service_engine_leaves_source_untouched(
        source in proptest::collection::vec(arb_service(), 0..12),
        query in "[a-c]{0,2}",
        sort in arb_sort(),
    ) {
        let snapshot = source.clone();
        let out = apply_at(&source, &query, sort, now());
        prop_assert_eq!(&source, &snapshot);
        prop_assert!(out.len() <= source.len());
        for item in &out {
            prop_assert!(source.contains(item));
        }
    }

    #[test]
    fn price_sort_is_stable(source in indexed_services()) {
        let out = apply_at(&source, "", ServiceSort::LowestPrice, now());
        prop_assert_eq!(out.len(), source.len());
        for pair in out.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.price.unwrap_or(0.0) <= b.price.unwrap_or(0.0));
            if a.price.unwrap_or(0.0) == b.price.unwrap_or(0.0) {
                // ids are source indices
                prop_assert!(a.id < b.id, "{} moved ahead of {}", b.id, a.id);
            }
        }
    }

    #[test]
    fn appointment_engine_is_idempotent_and_pure(
        source in proptest::collection::vec(arb_appointment(), 0..12),
        query in "[a-c]{0,2}",
        filter in arb_filter(),
    ) {
        let snapshot = source.clone();
        let once = apply_at(&source, &query, filter, now());
        let twice = apply_at(&once, &query, filter, now());
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&source, &snapshot);
    }

    #[test]
    fn upcoming_and_past_partition_dated_items(
        source in proptest::collection::vec(arb_appointment(), 0..12),
    ) {
        let upcoming = apply_at(&source, "", AppointmentFilter::Upcoming, now());
        let past = apply_at(&source, "", AppointmentFilter::Past, now());
        let dated = source.iter().filter(|a| a.date.is_some()).count();
        prop_assert_eq!(upcoming.len() + past.len(), dated);
    }
}
