//! Container Encoder
//!
//! Assembles entries into a complete container buffer.

use bytes::{BufMut, BytesMut};
use tracing::debug;

use crate::entry::{encode_utf16le, Entry};
use crate::error::{DictError, Result};

use super::{
    body_region_start, entry_body_length, ContainerHeader, CODE_LEN_BIAS, ENTRY_FLAG,
    ENTRY_MARKER, OFFSET_SLOT_SIZE, TERMINATOR, TOTAL_LENGTH_FIELD,
};

/// An accepted entry with its text already transcoded
struct EncodedEntry {
    code: Vec<u8>,
    word: Vec<u8>,
    order: u8,
}

impl EncodedEntry {
    fn body_length(&self) -> usize {
        entry_body_length(self.code.len(), self.word.len())
    }
}

/// Builder for containers
///
/// Entries are validated as they are added; nothing is assembled until
/// `finish()`, so a rejected entry never leaves a partial buffer behind.
pub struct ContainerEncoder {
    /// Build timestamp written to the header and every body
    timestamp: u32,
    /// Accepted entries in input order
    entries: Vec<EncodedEntry>,
    /// Sum of body lengths so far
    body_bytes: usize,
}

impl ContainerEncoder {
    pub fn new(timestamp: u32) -> Self {
        Self {
            timestamp,
            entries: Vec::new(),
            body_bytes: 0,
        }
    }

    /// Validate and queue an entry
    pub fn add(&mut self, entry: &Entry) -> Result<()> {
        entry.validate()?;

        let encoded = EncodedEntry {
            code: encode_utf16le(&entry.code),
            word: encode_utf16le(&entry.word),
            order: entry.order,
        };
        self.body_bytes += encoded.body_length();
        self.entries.push(encoded);

        Ok(())
    }

    /// Number of entries queued
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the container `finish()` will produce
    pub fn encoded_len(&self) -> usize {
        body_region_start(self.entries.len()) + self.body_bytes
    }

    /// Assemble the container: header, offset table, bodies, then patch the total length
    pub fn finish(self) -> Result<Vec<u8>> {
        let total_len = self.encoded_len();
        if u32::try_from(total_len).is_err() {
            return Err(DictError::ContainerTooLarge(total_len));
        }

        let count = self.entries.len();
        let mut buf = BytesMut::with_capacity(total_len);

        // Header with total length placeholder
        ContainerHeader::new(count as u32, self.timestamp).write_to(&mut buf);

        // Reserved word, then cumulative lengths of every body but the last
        if count > 0 {
            buf.put_bytes(0, OFFSET_SLOT_SIZE);
        }
        let mut offset = 0usize;
        for entry in self.entries.iter().take(count.saturating_sub(1)) {
            offset += entry.body_length();
            buf.put_u32_le(offset as u32);
        }

        for entry in &self.entries {
            buf.put_slice(&ENTRY_MARKER);
            buf.put_u16_le((entry.code.len() + CODE_LEN_BIAS) as u16);
            buf.put_u8(entry.order);
            buf.put_u8(ENTRY_FLAG);
            buf.put_bytes(0, 4);
            buf.put_u32_le(self.timestamp);
            buf.put_slice(&entry.code);
            buf.put_slice(&TERMINATOR);
            buf.put_slice(&entry.word);
            buf.put_slice(&TERMINATOR);
        }

        debug_assert_eq!(buf.len(), total_len);

        // Backpatch total length
        let written = buf.len() as u32;
        buf[TOTAL_LENGTH_FIELD..TOTAL_LENGTH_FIELD + 4].copy_from_slice(&written.to_le_bytes());

        debug!(entries = count, bytes = written, "encoded container");

        Ok(buf.into())
    }
}

/// Encode `entries` into a container stamped with `timestamp`
pub fn encode(entries: &[Entry], timestamp: u32) -> Result<Vec<u8>> {
    let mut encoder = ContainerEncoder::new(timestamp);
    for entry in entries {
        encoder.add(entry)?;
    }
    encoder.finish()
}
