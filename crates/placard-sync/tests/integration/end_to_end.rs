//! Integration tests for the full read/localize/write cycle.

use placard_core::{FallbackStore, LinkState};

use crate::common::{GROUP, TestHarness, en, gu, slot_address};

#[tokio::test]
async fn test_primary_then_secondary_scenario() {
    let harness = TestHarness::new();
    harness.preload(1, "MAIN");
    harness.preload(3, "TIE");

    let english = harness
        .service
        .read_localized_names(GROUP, Some(&en()))
        .await
        .expect("English read should succeed");
    assert_eq!(english, vec!["MAIN", "", "TIE"]);
    assert!(harness.keys().is_empty(), "Primary reads never seed");

    harness
        .service
        .overlay()
        .upsert("MAIN", Some("મુખ્ય"))
        .await
        .unwrap();

    let gujarati = harness
        .service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .expect("Gujarati read should succeed");
    assert_eq!(gujarati, vec!["મુખ્ય", "", "TIE"]);
    assert_eq!(harness.keys(), vec!["MAIN", "TIE"]);
    assert_eq!(harness.store.translations()[1].secondary_text, "");
}

#[tokio::test]
async fn test_write_then_read_back() {
    let harness = TestHarness::new();
    harness.preload(2, "OLD FEEDER NAME");

    harness
        .service
        .write_slot_name(GROUP, 2, "BUS", Some("બસ"))
        .await
        .unwrap();

    let raw = harness.service.read_names(GROUP).await.unwrap();
    assert_eq!(raw, vec!["", "BUS", ""]);

    let localized = harness
        .service
        .read_named_values(GROUP, Some(&gu()))
        .await
        .unwrap();
    let pairs: Vec<_> = localized
        .iter()
        .map(|v| (v.field.as_str(), v.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Name1", ""), ("Name2", "બસ"), ("Name3", "")]);
}

#[tokio::test]
async fn test_override_then_localized_read() {
    let harness = TestHarness::new();
    harness.preload(3, "TIE");

    let slot = harness.service.slot_for_field(GROUP, "name3").unwrap();
    harness
        .service
        .set_localized_override(GROUP, slot, &gu(), "ટાઇ")
        .await
        .unwrap();

    let names = harness
        .service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap();
    assert_eq!(names[2], "ટાઇ");
}

#[tokio::test]
async fn test_failed_read_leaves_overlay_unseeded() {
    let harness = TestHarness::new();
    harness.preload(1, "MAIN");
    harness.bank.fail_reads(Some("no response"));

    let err = harness
        .service
        .read_localized_names(GROUP, Some(&gu()))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Register read failed at D4000: no response"
    );
    assert!(harness.keys().is_empty());
    assert_eq!(
        harness.service.link().state(),
        LinkState::Faulted("no response".to_string())
    );

    harness.bank.clear_faults();
    harness.service.read_names(GROUP).await.unwrap();
    assert!(harness.service.link().state().is_connected());
}

#[tokio::test]
async fn test_failed_override_read_touches_nothing() {
    let harness = TestHarness::new();
    harness.preload(1, "MAIN");
    harness.bank.fail_reads(Some("timeout"));

    let result = harness
        .service
        .set_localized_override(GROUP, 1, &gu(), "મુખ્ય")
        .await;
    assert!(result.is_err());
    assert!(harness.keys().is_empty());
    let fallback = harness.store.get_fallback(GROUP, 1, &gu()).await.unwrap();
    assert!(fallback.is_none());
}

#[tokio::test]
async fn test_link_starts_disconnected() {
    let harness = TestHarness::new();
    assert_eq!(harness.service.link().state(), LinkState::Disconnected);

    harness
        .service
        .write_slot_name(GROUP, 1, "MAIN", None)
        .await
        .unwrap();
    assert!(harness.service.link().state().is_connected());
    assert_eq!(harness.bank.text(slot_address(1), 10), "MAIN");
}
