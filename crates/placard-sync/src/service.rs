//! Name synchronization service.
//!
//! [`NameSyncService`] ties the register port, the localization overlay
//! and the fallback sink together. It holds no mutable state of its own
//! apart from the controller [`LinkHandle`], so one instance is shared by
//! every request.

use std::sync::Arc;

use placard_core::address::slot_blocks;
use placard_core::config::LanguageConfig;
use placard_core::{
    DeviceAddress, Error, FallbackEntry, FallbackStore, LanguageCode, LinkHandle, LinkState,
    RegisterPort, Result, SlotCatalog, SlotGroup, TranslationStore, codec,
};
use serde::Serialize;

use crate::overlay::LocalizationOverlay;
use crate::write::clear_then_write;

/// A slot value paired with its field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    /// Field name, e.g. `BrakerName3`.
    pub field: String,
    /// Display text.
    pub value: String,
}

/// Reads and writes named slots on the controller.
pub struct NameSyncService {
    catalog: SlotCatalog,
    languages: LanguageConfig,
    registers: Arc<dyn RegisterPort>,
    overlay: LocalizationOverlay,
    fallback: Arc<dyn FallbackStore>,
    link: LinkHandle,
}

impl NameSyncService {
    /// Creates a service over the given ports.
    pub fn new(
        catalog: SlotCatalog,
        languages: LanguageConfig,
        registers: Arc<dyn RegisterPort>,
        translations: Arc<dyn TranslationStore>,
        fallback: Arc<dyn FallbackStore>,
    ) -> Self {
        Self {
            catalog,
            languages,
            registers,
            overlay: LocalizationOverlay::new(translations),
            fallback,
            link: LinkHandle::new("controller"),
        }
    }

    /// Controller link state.
    pub fn link(&self) -> &LinkHandle {
        &self.link
    }

    /// The slot catalog.
    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Language roles.
    pub fn languages(&self) -> &LanguageConfig {
        &self.languages
    }

    /// The translation overlay.
    pub fn overlay(&self) -> &LocalizationOverlay {
        &self.overlay
    }

    /// The language a request is served in: `lang`, or the default.
    pub fn resolve_language(&self, lang: Option<&LanguageCode>) -> LanguageCode {
        lang.unwrap_or(&self.languages.default).clone()
    }

    /// Resolves a field name to its 1-based slot index.
    pub fn slot_for_field(&self, group: &str, field: &str) -> Result<usize> {
        self.catalog.group(group)?.slot_for_field(field)
    }

    /// Reads and decodes every slot of `group` as held by the controller.
    #[tracing::instrument(skip(self))]
    pub async fn read_names(&self, group: &str) -> Result<Vec<String>> {
        let group = self.catalog.group(group)?;
        self.read_group(group).await
    }

    /// Reads every slot of `group` in the requested language.
    ///
    /// The secondary language goes through the overlay; any other
    /// language gets the controller text.
    #[tracing::instrument(skip(self))]
    pub async fn read_localized_names(
        &self,
        group: &str,
        lang: Option<&LanguageCode>,
    ) -> Result<Vec<String>> {
        let group = self.catalog.group(group)?;
        let names = self.read_group(group).await?;
        if self.resolve_language(lang) == self.languages.secondary {
            self.overlay.resolve_all(&names).await
        } else {
            Ok(names)
        }
    }

    /// Same as [`read_localized_names`](Self::read_localized_names), with
    /// each value paired with its field name.
    pub async fn read_named_values(
        &self,
        group: &str,
        lang: Option<&LanguageCode>,
    ) -> Result<Vec<NamedValue>> {
        let names = self.read_localized_names(group, lang).await?;
        let group = self.catalog.group(group)?;
        Ok(group
            .fields()
            .iter()
            .zip(names)
            .map(|(field, value)| NamedValue {
                field: field.clone(),
                value,
            })
            .collect())
    }

    /// Writes `new_value` to slot `slot_index` of `group` and records it in
    /// the overlay, together with `secondary` when given.
    ///
    /// The controller is written before the store; a persistence failure
    /// after a successful write is reported but the slot keeps the new
    /// value.
    #[tracing::instrument(skip(self, secondary))]
    pub async fn write_slot_name(
        &self,
        group: &str,
        slot_index: usize,
        new_value: &str,
        secondary: Option<&str>,
    ) -> Result<()> {
        let group = self.catalog.group(group)?;
        let len = new_value.chars().count();
        if len > group.max_chars() {
            return Err(Error::ValueTooLong {
                len,
                max: group.max_chars(),
            });
        }
        if let Some(text) = secondary {
            self.check_secondary_len(text)?;
        }
        let address = group.address_for(slot_index)?;

        let written = clear_then_write(
            self.registers.as_ref(),
            address,
            group.words_per_slot(),
            new_value,
        )
        .await;
        self.track(written)?;

        self.overlay.upsert(new_value, secondary).await?;
        tracing::info!(address = %address, "Slot name written");
        Ok(())
    }

    /// Links `text` to whatever the controller currently holds in slot
    /// `slot_index`, and records it in the fallback table.
    ///
    /// Only the configured secondary language accepts overrides. The slot
    /// is read before either table is touched.
    #[tracing::instrument(skip(self, text))]
    pub async fn set_localized_override(
        &self,
        group: &str,
        slot_index: usize,
        lang: &LanguageCode,
        text: &str,
    ) -> Result<()> {
        let group = self.catalog.group(group)?;
        if *lang != self.languages.secondary {
            return Err(Error::invalid_field(
                "lang",
                format!(
                    "overrides are kept for '{}' only, not '{lang}'",
                    self.languages.secondary
                ),
            ));
        }
        self.check_secondary_len(text)?;
        let address = group.address_for(slot_index)?;

        let words = self.read_words(address, group.words_per_slot()).await?;
        let current = codec::decode(&words);

        self.fallback
            .put_fallback(FallbackEntry {
                group: group.name().to_string(),
                slot_index,
                language: lang.clone(),
                text: text.to_string(),
            })
            .await?;

        if current.is_empty() {
            tracing::warn!(address = %address, "Slot is blank; override kept in fallback table only");
            return Ok(());
        }
        self.overlay.upsert(&current, Some(text)).await?;
        tracing::info!(address = %address, primary = %current, "Localized override stored");
        Ok(())
    }

    fn check_secondary_len(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        let max = self.languages.max_secondary_chars;
        if len > max {
            return Err(Error::invalid_field(
                "value",
                format!("secondary text is {len} characters, limit is {max}"),
            ));
        }
        Ok(())
    }

    async fn read_group(&self, group: &SlotGroup) -> Result<Vec<String>> {
        let words = self.read_words(group.base(), group.block_len()).await?;
        let names = slot_blocks(&words, group.slot_count(), group.words_per_slot())?
            .into_iter()
            .map(codec::decode)
            .collect();
        tracing::debug!(group = %group.name(), base = %group.base(), "Group read");
        Ok(names)
    }

    async fn read_words(&self, address: DeviceAddress, count: usize) -> Result<Vec<u16>> {
        let read = match self.registers.read_words(address, count).await {
            Ok(words) if words.len() == count => Ok(words),
            Ok(words) => Err(Error::RegisterReadFailed {
                address,
                message: format!("expected {count} words, got {}", words.len()),
            }),
            Err(fault) => Err(Error::RegisterReadFailed {
                address,
                message: fault.message,
            }),
        };
        self.track(read)
    }

    /// Moves the link state according to the outcome of a register call.
    fn track<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.link.set_state(LinkState::Connected),
            Err(Error::RegisterReadFailed { message, .. })
            | Err(Error::RegisterWriteFailed { message, .. }) => {
                tracing::warn!(error = %message, "Controller I/O failed");
                self.link.set_state(LinkState::Faulted(message.clone()));
            }
            Err(_) => {}
        }
        result
    }
}

impl std::fmt::Debug for NameSyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameSyncService")
            .field("catalog", &self.catalog)
            .field("languages", &self.languages)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}
