//! Integration tests running the service over the SQLite store.

use std::sync::Arc;

use placard_core::config::LanguageConfig;
use placard_core::{FallbackStore, SimulatedRegisters};
use placard_storage::SqliteStore;
use placard_sync::NameSyncService;

use crate::common::{GROUP, catalog, gu, slot_address};

async fn service() -> (Arc<SimulatedRegisters>, Arc<SqliteStore>, NameSyncService) {
    let bank = Arc::new(SimulatedRegisters::new());
    let store = Arc::new(SqliteStore::in_memory().await.unwrap());
    store.init_schema().await.unwrap();
    let service = NameSyncService::new(
        catalog(),
        LanguageConfig::default(),
        bank.clone(),
        store.clone(),
        store.clone(),
    );
    (bank, store, service)
}

#[tokio::test]
async fn test_scenario_over_sqlite() {
    let (bank, _store, service) = service().await;
    bank.set_text(slot_address(1), "MAIN", 10).unwrap();
    bank.set_text(slot_address(3), "TIE", 10).unwrap();

    service.overlay().upsert("MAIN", Some("મુખ્ય")).await.unwrap();
    let names = service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap();
    assert_eq!(names, vec!["મુખ્ય", "", "TIE"]);

    let again = service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap();
    assert_eq!(again, names);
    assert!(service.overlay().duplicates().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_override_persists_fallback_row() {
    let (bank, store, service) = service().await;
    bank.set_text(slot_address(2), "BUS", 10).unwrap();

    service
        .set_localized_override(GROUP, 2, &gu(), "બસ")
        .await
        .unwrap();
    service
        .set_localized_override(GROUP, 2, &gu(), "બસ કપલર")
        .await
        .unwrap();

    let row = store.get_fallback(GROUP, 2, &gu()).await.unwrap().unwrap();
    assert_eq!(row.text, "બસ કપલર");

    let names = service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap();
    assert_eq!(names[1], "બસ કપલર");
}
