//! Persistent records and language codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A stored primary-to-secondary text link.
///
/// `primary_text` is the controller-observed value and the natural key
/// under case-insensitive comparison. An empty `secondary_text` means no
/// override has been entered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Store-assigned id; ascending in insertion order.
    pub id: i64,
    /// Text as held by the controller.
    pub primary_text: String,
    /// Secondary-language rendering, possibly empty.
    pub secondary_text: String,
}

impl TranslationEntry {
    /// Returns whether this entry's key matches `primary`, ignoring case
    /// and surrounding whitespace.
    pub fn matches(&self, primary: &str) -> bool {
        fold_key(&self.primary_text) == fold_key(primary)
    }

    /// Returns the override text, if one has been entered.
    pub fn secondary(&self) -> Option<&str> {
        let text = self.secondary_text.trim();
        (!text.is_empty()).then_some(self.secondary_text.as_str())
    }
}

/// A translation row that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    /// Text as held by the controller.
    pub primary_text: String,
    /// Secondary-language rendering, possibly empty.
    pub secondary_text: String,
}

impl NewTranslation {
    /// An auto-seeded row: known primary text, no override yet.
    pub fn seed(primary_text: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            secondary_text: String::new(),
        }
    }
}

/// Case-insensitive comparison key for primary text.
pub fn fold_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Legacy positional text, kept as a write-only compatibility record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEntry {
    /// Slot group the text belongs to.
    pub group: String,
    /// 1-based slot index within the group.
    pub slot_index: usize,
    /// Language of `text`.
    pub language: LanguageCode,
    /// Raw text as entered.
    pub text: String,
}

/// A normalized (trimmed, lower-case) language tag such as `en` or `gu`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Creates a language code, normalizing case and whitespace.
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim().to_ascii_lowercase();
        let valid = !code.is_empty()
            && code.len() <= 16
            && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(Error::invalid_field(
                "lang",
                format!("'{code}' is not a language code"),
            ));
        }
        Ok(Self(code))
    }

    /// Wraps a code already known to be normalized.
    pub(crate) fn from_normalized(code: &str) -> Self {
        Self(code.to_string())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
