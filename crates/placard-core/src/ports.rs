//! Traits for the engine's external collaborators.
//!
//! The controller transport and the relational store live outside this
//! workspace's engine; the engine talks to them only through these ports.
//! Every method is a suspension point and may be slow.

use async_trait::async_trait;

use crate::address::DeviceAddress;
use crate::error::Result;
use crate::model::{FallbackEntry, LanguageCode, NewTranslation, TranslationEntry};

/// Failure reported by a register port, with the transport's message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RegisterFault {
    /// Human-readable description from the transport.
    pub message: String,
}

impl RegisterFault {
    /// Creates a fault with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Word-level access to controller memory.
///
/// Implementations own retries and reconnection; the engine never retries.
#[async_trait]
pub trait RegisterPort: Send + Sync {
    /// Reads `count` consecutive words starting at `address`.
    async fn read_words(
        &self,
        address: DeviceAddress,
        count: usize,
    ) -> std::result::Result<Vec<u16>, RegisterFault>;

    /// Writes `words` starting at `address`.
    async fn write_words(
        &self,
        address: DeviceAddress,
        words: &[u16],
    ) -> std::result::Result<(), RegisterFault>;
}

/// Storage for [`TranslationEntry`] rows.
///
/// No uniqueness constraint on `primary_text` is assumed; readers resolve
/// duplicates by taking the lowest id.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Every stored entry, ordered by ascending id.
    async fn list_all(&self) -> Result<Vec<TranslationEntry>>;

    /// Stores one entry and returns it with its assigned id.
    async fn insert(&self, entry: NewTranslation) -> Result<TranslationEntry>;

    /// Stores all `entries` in a single commit.
    async fn insert_batch(&self, entries: Vec<NewTranslation>) -> Result<()>;

    /// Replaces the secondary text of entry `id`.
    async fn update_secondary(&self, id: i64, secondary_text: &str) -> Result<()>;
}

/// Write-only sink for legacy positional text.
#[async_trait]
pub trait FallbackStore: Send + Sync {
    /// Inserts or replaces the text for `(group, slot_index, language)`.
    async fn put_fallback(&self, entry: FallbackEntry) -> Result<()>;

    /// Reads a stored fallback row. Not used when resolving display text.
    async fn get_fallback(
        &self,
        group: &str,
        slot_index: usize,
        language: &LanguageCode,
    ) -> Result<Option<FallbackEntry>>;
}
