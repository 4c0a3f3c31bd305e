//! Common test utilities and harness for Placard sync integration tests.

use std::sync::Arc;

use placard_core::config::LanguageConfig;
use placard_core::{DeviceAddress, LanguageCode, SimulatedRegisters, SlotCatalog, SlotGroup};
use placard_storage::MemoryStore;
use placard_sync::NameSyncService;

/// Group used by most tests: 3 slots of 10 words at D4000.
pub const GROUP: &str = "breakers";

/// Test harness for integration tests.
///
/// Wires a simulated register bank and an in-memory store into a service.
pub struct TestHarness {
    /// Simulated controller
    pub bank: Arc<SimulatedRegisters>,
    /// Translation and fallback tables
    pub store: Arc<MemoryStore>,
    /// Service under test
    pub service: NameSyncService,
}

impl TestHarness {
    /// Creates a harness with an all-zero bank and empty tables.
    pub fn new() -> Self {
        Self::with_bank(SimulatedRegisters::new())
    }

    /// Creates a harness around a pre-configured bank.
    pub fn with_bank(bank: SimulatedRegisters) -> Self {
        let bank = Arc::new(bank);
        let store = Arc::new(MemoryStore::new());
        let service = NameSyncService::new(
            catalog(),
            LanguageConfig::default(),
            bank.clone(),
            store.clone(),
            store.clone(),
        );
        Self {
            bank,
            store,
            service,
        }
    }

    /// Puts `text` into slot `slot_index` (1-based) without journaling.
    pub fn preload(&self, slot_index: usize, text: &str) {
        self.bank.set_text(slot_address(slot_index), text, 10).unwrap();
    }

    /// Primary texts of the translation table in id order.
    pub fn keys(&self) -> Vec<String> {
        self.store
            .translations()
            .into_iter()
            .map(|e| e.primary_text)
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The catalog holding [`GROUP`].
pub fn catalog() -> SlotCatalog {
    let group = SlotGroup::new(GROUP, "Name", addr("D4000"), 3, 10).unwrap();
    SlotCatalog::new(vec![group]).unwrap()
}

/// Parses an address literal.
pub fn addr(text: &str) -> DeviceAddress {
    text.parse().unwrap()
}

/// Address of slot `slot_index` of [`GROUP`].
pub fn slot_address(slot_index: usize) -> DeviceAddress {
    addr("D4000").checked_add((slot_index - 1) * 10).unwrap()
}

/// Primary language code.
pub fn en() -> LanguageCode {
    LanguageCode::new("en").unwrap()
}

/// Secondary language code.
pub fn gu() -> LanguageCode {
    LanguageCode::new("gu").unwrap()
}
