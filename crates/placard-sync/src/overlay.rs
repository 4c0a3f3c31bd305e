//! Localization overlay.
//!
//! Maps controller (primary) text to secondary-language text stored in a
//! [`TranslationStore`]. Keys compare case-insensitively after trimming,
//! and when several rows share a key the lowest id wins.
//!
//! Resolution is read-mostly: unknown keys are seeded with an empty
//! secondary value so an operator can fill them in later, and every seed
//! of one pass is committed in a single batch.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use placard_core::model::fold_key;
use placard_core::{NewTranslation, Result, TranslationEntry, TranslationStore};
use serde::Serialize;

/// What [`LocalizationOverlay::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The primary text was blank.
    Skipped,
    /// A new row was inserted.
    Inserted,
    /// The matching row's secondary text was replaced.
    Updated,
    /// A row matched and no secondary text was given.
    Unchanged,
}

/// Rows sharing one case-insensitive key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// The folded key.
    pub key: String,
    /// Matching rows, lowest id first.
    pub entries: Vec<TranslationEntry>,
}

/// Primary-to-secondary text resolution over a translation store.
#[derive(Clone)]
pub struct LocalizationOverlay {
    store: Arc<dyn TranslationStore>,
}

impl LocalizationOverlay {
    /// Creates an overlay over `store`.
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store }
    }

    /// Resolves each primary value to its display text.
    ///
    /// Values are trimmed. Blank values stay blank. A value with a
    /// non-blank secondary text is replaced by it; any other value is
    /// returned as-is. Values the store has never seen are seeded, and a
    /// key repeated within one call is seeded once.
    pub async fn resolve_all(&self, primary_values: &[String]) -> Result<Vec<String>> {
        let rows = self.store.list_all().await?;

        // First row per key; `list_all` is ordered by id.
        let mut known: HashMap<String, Option<String>> = HashMap::with_capacity(rows.len());
        for row in rows {
            if let Entry::Vacant(slot) = known.entry(fold_key(&row.primary_text)) {
                slot.insert(row.secondary().map(str::to_string));
            }
        }

        let mut seeds = Vec::new();
        let resolved = primary_values
            .iter()
            .map(|value| {
                let value = value.trim();
                if value.is_empty() {
                    return String::new();
                }
                match known.entry(fold_key(value)) {
                    Entry::Occupied(hit) => hit.get().clone().unwrap_or_else(|| value.to_string()),
                    Entry::Vacant(miss) => {
                        miss.insert(None);
                        seeds.push(NewTranslation::seed(value));
                        value.to_string()
                    }
                }
            })
            .collect();

        if !seeds.is_empty() {
            tracing::debug!(count = seeds.len(), "Seeding unseen primary text");
            self.store.insert_batch(seeds).await?;
        }
        Ok(resolved)
    }

    /// Records `secondary` as the rendering of `primary`.
    ///
    /// Both texts are trimmed. An absent or blank `secondary` never
    /// clears an existing value; for an unknown key it still creates an
    /// empty row.
    pub async fn upsert(&self, primary: &str, secondary: Option<&str>) -> Result<UpsertOutcome> {
        let primary = primary.trim();
        if primary.is_empty() {
            return Ok(UpsertOutcome::Skipped);
        }
        let secondary = secondary.map(str::trim).unwrap_or_default();

        let rows = self.store.list_all().await?;
        let outcome = match rows.iter().find(|row| row.matches(primary)) {
            None => {
                self.store
                    .insert(NewTranslation {
                        primary_text: primary.to_string(),
                        secondary_text: secondary.to_string(),
                    })
                    .await?;
                UpsertOutcome::Inserted
            }
            Some(_) if secondary.is_empty() => UpsertOutcome::Unchanged,
            Some(row) => {
                self.store.update_secondary(row.id, secondary).await?;
                UpsertOutcome::Updated
            }
        };

        tracing::debug!(primary, ?outcome, "Translation upserted");
        Ok(outcome)
    }

    /// Lists keys held by more than one row.
    pub async fn duplicates(&self) -> Result<Vec<DuplicateGroup>> {
        let rows = self.store.list_all().await?;

        let mut order: Vec<String> = Vec::new();
        let mut by_key: HashMap<String, Vec<TranslationEntry>> = HashMap::new();
        for row in rows {
            let key = fold_key(&row.primary_text);
            by_key
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(row);
        }

        Ok(order
            .into_iter()
            .filter_map(|key| {
                let entries = by_key.remove(&key)?;
                (entries.len() > 1).then_some(DuplicateGroup { key, entries })
            })
            .collect())
    }
}

impl std::fmt::Debug for LocalizationOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationOverlay").finish_non_exhaustive()
    }
}
