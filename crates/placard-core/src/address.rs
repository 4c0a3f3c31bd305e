//! Controller word addresses and slot-to-address mapping.
//!
//! Addresses are written the way the controller's programming tools show
//! them: a device letter followed by a decimal word offset (`D4000`).
//! Slot `i` of a group starts `(i - 1) * words_per_slot` words after the
//! group base.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Word device families the engine can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Device {
    /// Data registers (`D`).
    D,
    /// File registers (`R`).
    R,
    /// Link registers (`W`).
    W,
}

impl Device {
    fn prefix(self) -> &'static str {
        match self {
            Device::D => "D",
            Device::R => "R",
            Device::W => "W",
        }
    }
}

/// A single 16-bit word address on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceAddress {
    device: Device,
    offset: u32,
}

impl DeviceAddress {
    /// Creates an address from its parts.
    pub fn new(device: Device, offset: u32) -> Self {
        Self { device, offset }
    }

    /// Returns the device family.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the word offset within the device.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the address `words` words further on, or `None` on overflow.
    pub fn checked_add(self, words: usize) -> Option<Self> {
        let words = u32::try_from(words).ok()?;
        Some(Self {
            device: self.device,
            offset: self.offset.checked_add(words)?,
        })
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.device.prefix(), self.offset)
    }
}

impl FromStr for DeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::invalid_input(format!("address '{s}' has no word offset")))?;
        let (prefix, digits) = s.split_at(split);
        let device = match prefix.to_ascii_uppercase().as_str() {
            "D" => Device::D,
            "R" => Device::R,
            "W" => Device::W,
            other => {
                return Err(Error::invalid_input(format!(
                    "unsupported device '{other}' in address '{s}'"
                )));
            }
        };
        let offset = digits
            .parse::<u32>()
            .map_err(|e| Error::invalid_input(format!("bad word offset in '{s}': {e}")))?;
        Ok(Self { device, offset })
    }
}

impl TryFrom<String> for DeviceAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DeviceAddress> for String {
    fn from(address: DeviceAddress) -> Self {
        address.to_string()
    }
}

/// Base address of slot `slot_index` (1-based) in a group.
///
/// Computes `group_base + (slot_index - 1) * words_per_slot`. Returns
/// `None` for index 0 or when the result leaves the address space; upper
/// bounds are checked by [`SlotGroup::address_for`](crate::slot::SlotGroup::address_for).
pub fn address_for(
    group_base: DeviceAddress,
    slot_index: usize,
    words_per_slot: usize,
) -> Option<DeviceAddress> {
    let step = slot_index.checked_sub(1)?.checked_mul(words_per_slot)?;
    group_base.checked_add(step)
}

/// Splits a group's word block into one sub-block per slot.
///
/// Fails if the block length is not `slot_count * words_per_slot`.
pub fn slot_blocks(
    words: &[u16],
    slot_count: usize,
    words_per_slot: usize,
) -> Result<Vec<&[u16]>> {
    if words_per_slot == 0 || words.len() != slot_count * words_per_slot {
        return Err(Error::invalid_input(format!(
            "register block of {} words does not hold {slot_count} slots of {words_per_slot} words",
            words.len()
        )));
    }
    Ok(words.chunks_exact(words_per_slot).collect())
}
