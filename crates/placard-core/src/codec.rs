//! ASCII text <-> 16-bit register words.
//!
//! Each word carries two characters, low byte first: the word
//! `0x4241` holds `"AB"`. Text is padded with NUL bytes to the full block
//! width on encode, and trailing NULs and spaces are dropped on decode.

use crate::error::{Error, Result};

/// Decodes a block of words into text.
///
/// Bytes above `0x7F` are not ASCII and decode as `?`. Trailing NUL and
/// space characters are trimmed; interior ones are kept.
pub fn decode(words: &[u16]) -> String {
    let text: String = words
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .map(|b| if b.is_ascii() { char::from(b) } else { '?' })
        .collect();
    text.trim_end_matches(['\0', ' ']).to_string()
}

/// Encodes `value` into exactly `word_count` words.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `value` contains non-ASCII
/// characters, and [`Error::ValueTooLong`] if it has more than
/// `word_count * 2` characters.
pub fn encode(value: &str, word_count: usize) -> Result<Vec<u16>> {
    if !value.is_ascii() {
        return Err(Error::invalid_input(format!(
            "'{value}' contains non-ASCII characters"
        )));
    }
    let max = word_count * 2;
    if value.len() > max {
        return Err(Error::ValueTooLong {
            len: value.len(),
            max,
        });
    }

    let mut bytes = value.as_bytes().to_vec();
    bytes.resize(max, 0);
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// A block of `word_count` NUL words, used to blank a slot.
pub fn clear_block(word_count: usize) -> Vec<u16> {
    vec![0; word_count]
}
