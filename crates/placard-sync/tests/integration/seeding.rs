//! Integration tests for overlay auto-seeding.

use std::sync::Arc;

use placard_core::NewTranslation;
use placard_core::TranslationStore;

use crate::common::{GROUP, TestHarness, gu};

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let harness = TestHarness::new();
    harness.preload(1, "MAIN");
    harness.preload(2, "main");
    harness.preload(3, "TIE");

    for _ in 0..2 {
        let names = harness
            .service
            .read_localized_names(GROUP, Some(&gu()))
            .await
            .unwrap();
        assert_eq!(names, vec!["MAIN", "main", "TIE"]);
    }

    assert_eq!(harness.keys(), vec!["MAIN", "TIE"]);
    assert_eq!(harness.store.batch_commits(), 1, "Second pass seeds nothing");
}

#[tokio::test]
async fn test_seed_failure_surfaces_as_persistence_error() {
    let harness = TestHarness::new();
    harness.preload(1, "MAIN");
    harness.store.fail_with(Some("database is locked"));

    let err = harness
        .service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), placard_core::ErrorKind::PersistenceFailed);
    assert!(harness.service.link().state().is_connected());
}

#[tokio::test]
async fn test_existing_duplicates_resolve_to_first() {
    let harness = TestHarness::new();
    harness.preload(1, "MAIN");
    harness
        .store
        .insert_batch(vec![
            NewTranslation {
                primary_text: "main".into(),
                secondary_text: "પહેલું".into(),
            },
            NewTranslation {
                primary_text: "MAIN".into(),
                secondary_text: "બીજું".into(),
            },
        ])
        .await
        .unwrap();

    let names = harness
        .service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap();
    assert_eq!(names[0], "પહેલું");

    let report = harness.service.overlay().duplicates().await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].entries.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_passes_agree() {
    let harness = Arc::new(TestHarness::new());
    harness.preload(1, "MAIN");
    harness.preload(2, "BUS");
    harness.preload(3, "TIE");

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let harness = harness.clone();
            tokio::spawn(async move {
                harness
                    .service
                    .read_localized_names(GROUP, Some(&gu()))
                    .await
                    .unwrap()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), vec!["MAIN", "BUS", "TIE"]);
    }

    // Overlapping passes may seed a key more than once, never zero times.
    let keys = harness.keys();
    for key in ["MAIN", "BUS", "TIE"] {
        assert!(keys.iter().any(|k| k == key), "{key} should be seeded");
    }

    harness.service.overlay().upsert("bus", Some("બસ")).await.unwrap();
    let names = harness
        .service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap();
    assert_eq!(names, vec!["MAIN", "બસ", "TIE"]);
}
