//! tests/store_tests.rs
//! Persistencia SQLite de las listas generadas.

use super::{date, memory_pool};
use crate::models::outreach_model::{ListKind, ListStatus, OutreachEntry, ReconcileSummary};
use crate::services::list_store_service::ListStoreService;

fn entry(phone: &str) -> OutreachEntry {
    OutreachEntry {
        whatsapp: phone.to_string(),
        name: "Cliente".to_string(),
        status: "7-15".to_string(),
        campaign: "VOLTA".to_string(),
        message: "Oi".to_string(),
        link: format!("https://wa.me/55{}?text=Oi", phone),
        sent: false,
        priority: Some(3.0),
        days_inactive: None,
        total_orders: None,
    }
}

async fn store() -> ListStoreService {
    let store = ListStoreService::new(memory_pool().await);
    store.run_migrations().await.expect("migraciones");
    store
}

#[actix_rt::test]
async fn create_then_get_round_trips_entries() {
    let store = store().await;
    let created = store
        .create_list(
            ListKind::Daily,
            date(2026, 1, 23),
            vec![entry("85999990001"), entry("85999990002")],
        )
        .await
        .unwrap();
    assert_eq!(created.status, ListStatus::Generated);

    let loaded = store.get_list(&created.id).await.unwrap().expect("lista");
    assert_eq!(loaded.kind, ListKind::Daily);
    assert_eq!(loaded.generated_on, date(2026, 1, 23));
    assert_eq!(loaded.entries, created.entries);
    assert_eq!(loaded.entries[0].priority, Some(3.0));
}

#[actix_rt::test]
async fn unknown_id_is_none() {
    let store = store().await;
    assert!(store.get_list("no-existe").await.unwrap().is_none());
}

#[actix_rt::test]
async fn marks_are_saved_until_reconciled() {
    let store = store().await;
    let list = store
        .create_list(ListKind::Adhoc, date(2026, 1, 23), vec![entry("85999990001")])
        .await
        .unwrap();

    let mut entries = list.entries.clone();
    entries[0].sent = true;
    assert!(store.update_entries(&list.id, &entries).await.unwrap());
    assert!(store.get_list(&list.id).await.unwrap().unwrap().entries[0].sent);

    let summary = ReconcileSummary {
        updated_count: 1,
        logged_count: 1,
    };
    assert!(store.mark_reconciled(&list.id, &summary).await.unwrap());
    // estado terminal
    assert!(!store.mark_reconciled(&list.id, &summary).await.unwrap());

    entries[0].sent = false;
    assert!(!store.update_entries(&list.id, &entries).await.unwrap());
    let loaded = store.get_list(&list.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, ListStatus::Reconciled);
    assert!(loaded.entries[0].sent);
}

#[actix_rt::test]
async fn lists_survive_a_new_pool_on_disk() {
    use sqlx::sqlite::SqliteConnectOptions;
    use sqlx::{Pool, Sqlite};

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("outreach.db");
    let connect = || {
        Pool::<Sqlite>::connect_with(
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true),
        )
    };

    let first = ListStoreService::new(connect().await.unwrap());
    first.run_migrations().await.unwrap();
    let list = first
        .create_list(ListKind::Daily, date(2026, 1, 23), vec![entry("85999990001")])
        .await
        .unwrap();

    let second = ListStoreService::new(connect().await.unwrap());
    second.run_migrations().await.unwrap();
    let loaded = second.get_list(&list.id).await.unwrap().expect("lista persistida");
    assert_eq!(loaded.entries.len(), 1);
}
