//! In-memory stores.
//!
//! Behaves like the SQLite tables (ascending ids, duplicates allowed,
//! fallback rows replaced per key) and adds hooks tests need: injected
//! failures and a count of committed batches.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use placard_core::{
    Error, FallbackEntry, FallbackStore, LanguageCode, NewTranslation, Result, TranslationEntry,
    TranslationStore,
};

type FallbackKey = (String, usize, String);

#[derive(Debug, Default)]
struct Tables {
    translations: Vec<TranslationEntry>,
    next_id: i64,
    fallbacks: BTreeMap<FallbackKey, FallbackEntry>,
    batch_commits: usize,
    failure: Option<String>,
}

impl Tables {
    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::persistence(message.clone())),
            None => Ok(()),
        }
    }

    fn push(&mut self, entry: NewTranslation) -> TranslationEntry {
        self.next_id += 1;
        let stored = TranslationEntry {
            id: self.next_id,
            primary_text: entry.primary_text,
            secondary_text: entry.secondary_text,
        };
        self.translations.push(stored.clone());
        stored
    }
}

/// Translation and fallback tables held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every operation fail with `message`; `None` clears the failure.
    pub fn fail_with(&self, message: Option<&str>) {
        self.tables().failure = message.map(str::to_string);
    }

    /// Number of non-empty batches committed via `insert_batch`.
    pub fn batch_commits(&self) -> usize {
        self.tables().batch_commits
    }

    /// Snapshot of the translation table, ignoring injected failures.
    pub fn translations(&self) -> Vec<TranslationEntry> {
        self.tables().translations.clone()
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<TranslationEntry>> {
        let tables = self.tables();
        tables.check()?;
        Ok(tables.translations.clone())
    }

    async fn insert(&self, entry: NewTranslation) -> Result<TranslationEntry> {
        let mut tables = self.tables();
        tables.check()?;
        Ok(tables.push(entry))
    }

    async fn insert_batch(&self, entries: Vec<NewTranslation>) -> Result<()> {
        let mut tables = self.tables();
        tables.check()?;
        if entries.is_empty() {
            return Ok(());
        }
        log::debug!("Committing {} seeded translations", entries.len());
        for entry in entries {
            tables.push(entry);
        }
        tables.batch_commits += 1;
        Ok(())
    }

    async fn update_secondary(&self, id: i64, secondary_text: &str) -> Result<()> {
        let mut tables = self.tables();
        tables.check()?;
        let entry = tables
            .translations
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::persistence(format!("no translation with id {id}")))?;
        entry.secondary_text = secondary_text.to_string();
        Ok(())
    }
}

#[async_trait]
impl FallbackStore for MemoryStore {
    async fn put_fallback(&self, entry: FallbackEntry) -> Result<()> {
        let mut tables = self.tables();
        tables.check()?;
        let key = (
            entry.group.clone(),
            entry.slot_index,
            entry.language.as_str().to_string(),
        );
        tables.fallbacks.insert(key, entry);
        Ok(())
    }

    async fn get_fallback(
        &self,
        group: &str,
        slot_index: usize,
        language: &LanguageCode,
    ) -> Result<Option<FallbackEntry>> {
        let tables = self.tables();
        tables.check()?;
        let key = (group.to_string(), slot_index, language.as_str().to_string());
        Ok(tables.fallbacks.get(&key).cloned())
    }
}
