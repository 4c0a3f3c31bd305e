#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Placard Sync Library
//!
//! Orchestrates the register codec, the controller and the translation
//! store.

pub mod overlay;
pub mod service;
pub mod write;

// Re-export core types
pub use overlay::{DuplicateGroup, LocalizationOverlay, UpsertOutcome};
pub use placard_core::{Error, Result};
pub use service::{NameSyncService, NamedValue};
