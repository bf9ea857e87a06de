//! Entry definitions
//!
//! A single lexicon record as accepted by the container encoder.

use crate::error::{DictError, Result};

use super::text::utf16_len;

/// Order assigned when the source has no usable weight
pub const DEFAULT_ORDER: u8 = 1;

/// Largest UTF-16 byte length allowed for `code` or `word`.
///
/// The per-entry length field stores `code_bytes + 18` in a u16.
pub const MAX_TEXT_BYTES: usize = u16::MAX as usize - 18;

/// One lexicon record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Input key sequence (e.g. a romanization)
    pub code: String,

    /// Displayed text
    pub word: String,

    /// Sort/priority weight
    pub order: u8,
}

impl Entry {
    pub fn new(code: impl Into<String>, word: impl Into<String>, order: u8) -> Self {
        Self {
            code: code.into(),
            word: word.into(),
            order,
        }
    }

    /// Build an entry from an order of unknown range.
    ///
    /// Values outside 0-255 are rejected, never wrapped or clamped.
    pub fn with_order(code: impl Into<String>, word: impl Into<String>, order: i64) -> Result<Self> {
        let order = u8::try_from(order).map_err(|_| DictError::OrderOutOfRange(order))?;
        Ok(Self::new(code, word, order))
    }

    /// Check that this entry can be written to a container
    pub fn validate(&self) -> Result<()> {
        check_text("code", &self.code)?;
        check_text("word", &self.word)
    }

    /// UTF-16LE byte length of `code`, terminator excluded
    pub fn code_bytes(&self) -> usize {
        utf16_len(&self.code)
    }

    /// UTF-16LE byte length of `word`, terminator excluded
    pub fn word_bytes(&self) -> usize {
        utf16_len(&self.word)
    }
}

fn check_text(field: &'static str, text: &str) -> Result<()> {
    if text.contains('\0') {
        return Err(DictError::InvalidText {
            field,
            reason: "contains U+0000, which terminates text in the container".to_string(),
        });
    }
    let bytes = utf16_len(text);
    if bytes > MAX_TEXT_BYTES {
        return Err(DictError::EntryTooLarge {
            field,
            bytes,
            max: MAX_TEXT_BYTES,
        });
    }
    Ok(())
}
