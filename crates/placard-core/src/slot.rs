//! Slot groups and the catalog of groups known to the process.
//!
//! A group is a run of equally sized text slots starting at a base
//! address. Its field names (`BrakerName1` .. `BrakerName20`) form an
//! explicit ordered table built once when the group is created.

use std::sync::Arc;

use crate::address::{DeviceAddress, address_for};
use crate::error::{Error, Result};

/// A named run of fixed-width text slots on the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup {
    name: String,
    field_prefix: String,
    base: DeviceAddress,
    slot_count: usize,
    words_per_slot: usize,
    fields: Vec<String>,
}

impl SlotGroup {
    /// Creates a group, validating its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty name, zero sizes, or a group
    /// whose last word lies outside the address space.
    pub fn new(
        name: impl Into<String>,
        field_prefix: impl Into<String>,
        base: DeviceAddress,
        slot_count: usize,
        words_per_slot: usize,
    ) -> Result<Self> {
        let name = name.into();
        let field_prefix = field_prefix.into();
        if name.trim().is_empty() {
            return Err(Error::config("slot group name must not be empty"));
        }
        if slot_count == 0 || words_per_slot == 0 {
            return Err(Error::config(format!(
                "slot group '{name}' needs at least one slot of at least one word"
            )));
        }
        if address_for(base, slot_count + 1, words_per_slot).is_none() {
            return Err(Error::config(format!(
                "slot group '{name}' runs past the end of device {}",
                base
            )));
        }

        let fields = (1..=slot_count)
            .map(|i| format!("{field_prefix}{i}"))
            .collect();

        Ok(Self {
            name,
            field_prefix,
            base,
            slot_count,
            words_per_slot,
            fields,
        })
    }

    /// Group name used in requests (`breaker-names`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix of the group's field names (`BrakerName`).
    pub fn field_prefix(&self) -> &str {
        &self.field_prefix
    }

    /// Address of the first word of slot 1.
    pub fn base(&self) -> DeviceAddress {
        self.base
    }

    /// Number of slots in the group.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Words occupied by each slot.
    pub fn words_per_slot(&self) -> usize {
        self.words_per_slot
    }

    /// Maximum characters a slot holds (two per word).
    pub fn max_chars(&self) -> usize {
        self.words_per_slot * 2
    }

    /// Length of the word block covering every slot.
    pub fn block_len(&self) -> usize {
        self.slot_count * self.words_per_slot
    }

    /// Checks that `slot_index` is within `1..=slot_count`.
    pub fn check_index(&self, slot_index: usize) -> Result<()> {
        if (1..=self.slot_count).contains(&slot_index) {
            Ok(())
        } else {
            Err(Error::SlotIndexOutOfRange {
                index: slot_index,
                max: self.slot_count,
            })
        }
    }

    /// Base address of slot `slot_index` (1-based).
    pub fn address_for(&self, slot_index: usize) -> Result<DeviceAddress> {
        self.check_index(slot_index)?;
        address_for(self.base, slot_index, self.words_per_slot).ok_or(
            Error::SlotIndexOutOfRange {
                index: slot_index,
                max: self.slot_count,
            },
        )
    }

    /// Field names in slot order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Resolves a field name such as `BrakerName7` to its slot index.
    pub fn slot_for_field(&self, field: &str) -> Result<usize> {
        let field = field.trim();
        self.fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case(field))
            .map(|i| i + 1)
            .ok_or_else(|| {
                Error::invalid_field(
                    "name",
                    format!("'{field}' is not a field of group '{}'", self.name),
                )
            })
    }
}

/// Field name in the lower camel case used by JSON payloads.
pub fn json_key(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Immutable set of slot groups, shared by every request.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    groups: Arc<[SlotGroup]>,
}

impl SlotCatalog {
    /// Builds a catalog, rejecting duplicate group names.
    pub fn new(groups: Vec<SlotGroup>) -> Result<Self> {
        for (i, group) in groups.iter().enumerate() {
            if groups[..i].iter().any(|g| g.name == group.name) {
                return Err(Error::config(format!(
                    "slot group '{}' is defined twice",
                    group.name
                )));
            }
        }
        Ok(Self {
            groups: groups.into(),
        })
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Result<&SlotGroup> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| Error::invalid_field("group", format!("unknown slot group '{name}'")))
    }

    /// All groups in configuration order.
    pub fn groups(&self) -> &[SlotGroup] {
        &self.groups
    }
}
