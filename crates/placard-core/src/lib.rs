#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Placard Core Library
//!
//! Codec, addressing, ports and configuration for the name
//! synchronization engine.

pub mod address;
pub mod codec;
pub mod config;
pub mod error;
pub mod link;
pub mod model;
pub mod ports;
pub mod simulated;
pub mod slot;

mod proptests;

// Re-exports for convenience
pub use address::{Device, DeviceAddress};
pub use config::PlacardConfig;
pub use error::{Error, ErrorKind, Result};
pub use link::{LinkHandle, LinkState};
pub use model::{FallbackEntry, LanguageCode, NewTranslation, TranslationEntry};
pub use ports::{FallbackStore, RegisterFault, RegisterPort, TranslationStore};
pub use simulated::SimulatedRegisters;
pub use slot::{SlotCatalog, SlotGroup};
