//! Integration tests for the clear-then-write protocol.

use placard_core::{Error, SimulatedRegisters, codec};
use placard_sync::write::clear_then_write;
use proptest::prelude::*;

use crate::common::{GROUP, TestHarness, addr, slot_address};

#[tokio::test]
async fn test_shorter_name_replaces_longer() {
    let harness = TestHarness::new();
    harness
        .service
        .write_slot_name(GROUP, 1, "INCOMER FEEDER ONE", None)
        .await
        .unwrap();
    harness
        .service
        .write_slot_name(GROUP, 1, "TIE", None)
        .await
        .unwrap();

    assert_eq!(
        harness.bank.words(slot_address(1), 10),
        codec::encode("TIE", 10).unwrap()
    );
    assert_eq!(harness.keys(), vec!["INCOMER FEEDER ONE", "TIE"]);
}

#[tokio::test]
async fn test_writes_stay_inside_their_slot() {
    let harness = TestHarness::new();
    harness.preload(1, "LEFT");
    harness.preload(3, "RIGHT");

    harness
        .service
        .write_slot_name(GROUP, 2, "12345678901234567890", None)
        .await
        .unwrap();

    let names = harness.service.read_names(GROUP).await.unwrap();
    assert_eq!(names, vec!["LEFT", "12345678901234567890", "RIGHT"]);

    let journal = harness.bank.journal();
    assert_eq!(journal.len(), 2);
    assert!(journal.iter().all(|w| w.address == addr("D4010")));
}

#[tokio::test]
async fn test_step_one_failure_skips_step_two() {
    let bank = SimulatedRegisters::new();
    bank.fail_writes_after(0, "write rejected");
    let harness = TestHarness::with_bank(bank);
    harness.preload(1, "MAIN");

    let err = harness
        .service
        .write_slot_name(GROUP, 1, "NEW", Some("નવું"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RegisterWriteFailed { .. }));
    assert!(harness.bank.journal().is_empty());
    assert_eq!(harness.bank.text(slot_address(1), 10), "MAIN");
    assert!(harness.keys().is_empty());
}

#[tokio::test]
async fn test_non_ascii_name_is_rejected_without_io() {
    let harness = TestHarness::new();
    let err = harness
        .service
        .write_slot_name(GROUP, 1, "મુખ્ય", None)
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(harness.bank.journal().is_empty());
}

proptest! {
    #[test]
    fn prop_last_write_wins(first in "[ -~]{0,20}", second in "[!-~]{1,20}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let bank = SimulatedRegisters::new();
        let at = addr("D4000");

        runtime.block_on(async {
            clear_then_write(&bank, at, 10, &first).await.unwrap();
            clear_then_write(&bank, at, 10, &second).await.unwrap();
        });

        prop_assert_eq!(bank.words(at, 10), codec::encode(&second, 10).unwrap());
        prop_assert_eq!(bank.text(at, 10), second);
    }
}
