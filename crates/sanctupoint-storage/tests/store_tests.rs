// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite table client.

use sanctupoint_config::model::StorageConfig;
use sanctupoint_core::query::{decode_rows, row, Direction, Embed, Filter, SelectQuery, Table};
use sanctupoint_core::{
    Appointment, ChangeKind, DataAccessAdapter, ErrorKind, Payment, Service,
};
use sanctupoint_storage::SqliteStore;
use serde_json::{json, Value};
use tempfile::TempDir;

async fn open_store() -> (SqliteStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let store = SqliteStore::open(StorageConfig {
        database_path: path.to_string_lossy().into_owned(),
        wal_mode: true,
    })
    .await
    .unwrap();
    (store, dir)
}

async fn seed_services(store: &SqliteStore) -> Vec<Service> {
    let rows = store
        .insert(
            Table::Services,
            vec![
                row([("service_name", json!("Wedding")), ("description", json!("Holy matrimony")), ("price", json!(500))]),
                row([("service_name", json!("Baptism")), ("description", json!("Rite of initiation")), ("price", Value::Null)]),
                row([("service_name", json!("Mass")), ("description", json!("Intention")), ("price", json!(100.0))]),
            ],
        )
        .await
        .unwrap();
    decode_rows(rows).unwrap()
}

#[tokio::test]
async fn insert_returns_generated_keys() {
    let (store, _dir) = open_store().await;
    let services = seed_services(&store).await;
    assert_eq!(services.len(), 3);
    assert!(services.iter().all(|s| s.id > 0));
    assert_eq!(services[0].price, Some(500.0));
    assert_eq!(services[1].price, None);
}

#[tokio::test]
async fn select_orders_and_filters() {
    let (store, _dir) = open_store().await;
    seed_services(&store).await;

    let rows = store
        .select(SelectQuery::new(Table::Services).order_by("service_name", Direction::Asc))
        .await
        .unwrap();
    let names: Vec<Service> = decode_rows(rows).unwrap();
    let names: Vec<&str> = names.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Baptism", "Mass", "Wedding"]);

    let rows = store
        .select(
            SelectQuery::new(Table::Services)
                .columns(&["service_name"])
                .filter(Filter::is_in("service_name", ["Mass", "Wedding"]))
                .order_by("price", Direction::Desc)
                .limit(1),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("service_name"), Some(&json!("Wedding")));
    assert_eq!(rows[0].len(), 1, "projection is honoured");
}

#[tokio::test]
async fn users_never_leak_password_hash_by_default() {
    let (store, _dir) = open_store().await;
    store
        .insert(
            Table::Users,
            vec![row([
                ("username", json!("ana")),
                ("password_hash", json!("$argon2id$stub")),
                ("role", json!("User")),
            ])],
        )
        .await
        .unwrap()
        .into_iter()
        .for_each(|r| assert!(!r.contains_key("password_hash")));

    let rows = store
        .select(SelectQuery::new(Table::Users).columns(&["password_hash"]))
        .await
        .unwrap();
    assert_eq!(rows[0].get("password_hash"), Some(&json!("$argon2id$stub")));
}

#[tokio::test]
async fn embeds_resolve_related_rows() {
    let (store, _dir) = open_store().await;
    let services = seed_services(&store).await;
    let user = store
        .insert(
            Table::Users,
            vec![row([
                ("username", json!("ben")),
                ("first_name", json!("Ben")),
                ("last_name", json!("Cruz")),
                ("email", json!("ben@example.com")),
            ])],
        )
        .await
        .unwrap();
    let user_id = user[0].get("user_id").cloned().unwrap();

    let appts = store
        .insert(
            Table::Appointments,
            vec![
                row([
                    ("date", json!("2026-11-02")),
                    ("time", json!("10:00:00")),
                    ("service_id", json!(services[0].id)),
                    ("service_type", json!("Wedding")),
                    ("status", json!("Pending")),
                    ("created_by", user_id.clone()),
                ]),
                row([("date", json!("2026-11-03")), ("status", json!("Pending"))]),
            ],
        )
        .await
        .unwrap();

    let rows = store
        .select(
            SelectQuery::new(Table::Appointments)
                .columns(&["appointment_id", "status"])
                .embed(Embed::Booker)
                .embed(Embed::BookedService)
                .order_by("date", Direction::Asc),
        )
        .await
        .unwrap();
    assert!(!rows[0].contains_key("created_by"), "helper keys are stripped");
    assert_eq!(rows[0]["users"]["first_name"], json!("Ben"));
    assert_eq!(rows[0]["services"]["service_name"], json!("Wedding"));
    assert_eq!(rows[1]["users"], Value::Null);

    store
        .insert(
            Table::Payments,
            vec![row([
                ("appointment_id", appts[0]["appointment_id"].clone()),
                ("amount", json!(250)),
                ("payment_method", json!("Cash")),
                ("payment_date", json!("2026-11-02")),
            ])],
        )
        .await
        .unwrap();
    let payments: Vec<Payment> = decode_rows(
        store
            .select(SelectQuery::new(Table::Payments).embed(Embed::PaidAppointment))
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        payments[0].appointment.as_ref().and_then(|a| a.service_type.as_deref()),
        Some("Wedding")
    );

    let full: Vec<Appointment> = decode_rows(
        store
            .select(SelectQuery::new(Table::Appointments).embed(Embed::BookedService))
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(full[0].service_name(), Some("Wedding"));
    assert_eq!(full[0].time.map(|t| t.to_string()).as_deref(), Some("10:00:00"));
}

#[tokio::test]
async fn update_and_delete_require_a_filter() {
    let (store, _dir) = open_store().await;
    seed_services(&store).await;

    let err = store
        .update(Table::Services, row([("price", json!(1))]), vec![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = store.delete(Table::Services, vec![]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let changed = store
        .update(
            Table::Services,
            row([("price", json!(120))]),
            vec![Filter::eq("service_name", "Mass")],
        )
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let removed = store
        .delete(Table::Services, vec![Filter::eq("service_name", "Nope")])
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn unknown_columns_are_rejected_before_sql() {
    let (store, _dir) = open_store().await;
    let err = store
        .insert(Table::Donations, vec![row([("donor", json!("X"))])])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = store
        .select(SelectQuery::new(Table::Donations).order_by("amount; DROP TABLE users", Direction::Asc))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn constraint_violations_surface_as_service_errors() {
    let (store, _dir) = open_store().await;
    let user = row([("username", json!("dup")), ("email", json!("d@example.com"))]);
    store.insert(Table::Users, vec![user.clone()]).await.unwrap();
    let err = store.insert(Table::Users, vec![user]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkOrService);
    assert!(err.to_string().contains("UNIQUE"));
}

#[tokio::test]
async fn writes_publish_change_events() {
    let (store, _dir) = open_store().await;
    let mut services = store.subscribe(Table::Services);
    let mut donations = store.subscribe(Table::Donations);

    seed_services(&store).await;
    assert_eq!(services.recv().await.unwrap().kind, ChangeKind::Insert);

    store
        .update(Table::Services, row([("price", json!(5))]), vec![Filter::eq("service_name", "Mass")])
        .await
        .unwrap();
    assert_eq!(services.recv().await.unwrap().kind, ChangeKind::Update);

    // A no-op write announces nothing.
    store
        .delete(Table::Services, vec![Filter::eq("service_name", "Nope")])
        .await
        .unwrap();
    store
        .delete(Table::Services, vec![Filter::eq("service_name", "Mass")])
        .await
        .unwrap();
    assert_eq!(services.recv().await.unwrap().kind, ChangeKind::Delete);

    assert!(donations.try_recv().is_none());

    store.unsubscribe(services.id);
    assert!(services.recv().await.is_none());
}
