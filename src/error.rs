//! Error types for mschxudp
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DictError
pub type Result<T> = std::result::Result<T, DictError>;

/// Unified error type for mschxudp operations
#[derive(Debug, Error)]
pub enum DictError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Input Validation Errors
    // -------------------------------------------------------------------------
    #[error("Entry {field} too large: {bytes} UTF-16 bytes (max {max})")]
    EntryTooLarge {
        field: &'static str,
        bytes: usize,
        max: usize,
    },

    #[error("Order out of range: {0} (expected 0-255)")]
    OrderOutOfRange(i64),

    #[error("Invalid entry {field}: {reason}")]
    InvalidText {
        field: &'static str,
        reason: String,
    },

    #[error("Container too large: {0} bytes does not fit a 32-bit length field")]
    ContainerTooLarge(usize),

    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: Box<DictError>,
    },

    // -------------------------------------------------------------------------
    // Malformed Container Errors
    // -------------------------------------------------------------------------
    #[error("Truncated container at offset {offset:#x}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Magic mismatch: found {}", hex(.found))]
    MagicMismatch { found: Vec<u8> },

    #[error("Bad header field {field} at offset {offset:#x}: expected {expected:#x}, found {found:#x}")]
    HeaderField {
        field: &'static str,
        offset: usize,
        expected: u32,
        found: u32,
    },

    #[error("Length mismatch: header declares {declared} bytes, buffer has {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("Offset table slot {index} at offset {offset:#x}: {reason}")]
    OffsetTable {
        index: usize,
        offset: usize,
        reason: String,
    },

    #[error("Malformed entry {index} at offset {offset:#x}: {reason}")]
    MalformedEntry {
        index: usize,
        offset: usize,
        reason: String,
    },

    #[error("Entry {index}: missing UTF-16 terminator at offset {offset:#x}")]
    MissingTerminator { index: usize, offset: usize },

    #[error("Entry {index}: invalid UTF-16 text at offset {offset:#x}")]
    InvalidUtf16 { index: usize, offset: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DictError {
    /// The underlying error for line-level failures, `self` otherwise
    pub fn root(&self) -> &DictError {
        match self {
            DictError::Parse { source, .. } => source.root(),
            other => other,
        }
    }

    /// True for errors raised while decoding a corrupt or foreign container
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DictError::Truncated { .. }
                | DictError::MagicMismatch { .. }
                | DictError::HeaderField { .. }
                | DictError::LengthMismatch { .. }
                | DictError::OffsetTable { .. }
                | DictError::MalformedEntry { .. }
                | DictError::MissingTerminator { .. }
                | DictError::InvalidUtf16 { .. }
        )
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
