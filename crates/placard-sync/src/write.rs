//! Clear-then-write update of a single slot.
//!
//! A slot is first filled with NUL words, then (for non-empty text) the
//! encoded value is written over it. A shorter value can therefore never
//! leave characters of a longer predecessor behind. Readers that land
//! between the two writes see a blank slot.

use placard_core::{DeviceAddress, Error, RegisterPort, Result, codec};

/// Replaces the text of the slot at `address`.
///
/// The value is encoded before anything is written, so rejected input
/// leaves the slot untouched. If the clearing write fails the second
/// write is not attempted.
///
/// # Errors
///
/// [`Error::ValueTooLong`] or [`Error::InvalidInput`] for values that do
/// not encode, [`Error::RegisterWriteFailed`] when either write fails.
pub async fn clear_then_write(
    port: &dyn RegisterPort,
    address: DeviceAddress,
    words_per_slot: usize,
    value: &str,
) -> Result<()> {
    let encoded = if value.is_empty() {
        None
    } else {
        Some(codec::encode(value, words_per_slot)?)
    };

    let write_failed = |fault: placard_core::RegisterFault| Error::RegisterWriteFailed {
        address,
        message: fault.message,
    };

    port.write_words(address, &codec::clear_block(words_per_slot))
        .await
        .map_err(write_failed)?;

    if let Some(words) = encoded {
        port.write_words(address, &words)
            .await
            .map_err(write_failed)?;
    }

    tracing::debug!(address = %address, len = value.len(), "Slot rewritten");
    Ok(())
}
