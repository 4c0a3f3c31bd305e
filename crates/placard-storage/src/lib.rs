//! # placard-storage
//!
//! Persistence port implementations for Placard:
//! - [`SqliteStore`]: translation and fallback tables in SQLite via `sqlx`
//! - [`MemoryStore`]: in-process tables for tests and the simulated server
//!
//! Both implement [`TranslationStore`](placard_core::TranslationStore) and
//! [`FallbackStore`](placard_core::FallbackStore).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
