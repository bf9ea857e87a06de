//! Container header
//!
//! The 16-byte magic block plus the 48-byte metadata block.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{DictError, Result};

use super::{
    body_region_start, offset_table_end, ENTRY_COUNT_FIELD, ENTRY_OVERHEAD, HEADER_SIZE, MAGIC,
    OFFSET_TABLE_END_FIELD, OFFSET_TABLE_START_FIELD, RESERVED_SIZE,
};

/// Parsed header + metadata of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Number of entries
    pub entry_count: u32,

    /// Build timestamp (seconds since epoch)
    pub timestamp: u32,

    /// Stored offset-table-end field (`0x40 + 4 * entry_count`)
    pub offset_table_end: u32,

    /// Stored total container length
    pub total_length: u32,
}

impl ContainerHeader {
    /// Header for a container under construction; total length is patched later
    pub(crate) fn new(entry_count: u32, timestamp: u32) -> Self {
        Self {
            entry_count,
            timestamp,
            offset_table_end: offset_table_end(entry_count as usize) as u32,
            total_length: 0,
        }
    }

    /// Append the 64 header bytes to `buf`
    pub(crate) fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(MAGIC);
        buf.put_u32_le(HEADER_SIZE as u32);
        buf.put_u32_le(self.offset_table_end);
        buf.put_u32_le(self.total_length);
        buf.put_u32_le(self.entry_count);
        buf.put_u32_le(self.timestamp);
        buf.put_bytes(0, RESERVED_SIZE);
    }

    /// Parse and validate the header of a complete container.
    ///
    /// Checks, in order: magic, minimum size, offset-table start, total
    /// length against `container.len()`, that the entry count is plausible
    /// for the buffer size, and the offset-table end field.
    pub fn parse(container: &[u8]) -> Result<Self> {
        let magic_len = container.len().min(MAGIC.len());
        if container[..magic_len] != MAGIC[..magic_len] {
            return Err(DictError::MagicMismatch {
                found: container[..magic_len].to_vec(),
            });
        }

        if container.len() < HEADER_SIZE {
            return Err(DictError::Truncated {
                offset: 0,
                needed: HEADER_SIZE,
                available: container.len(),
            });
        }

        let mut fields = &container[MAGIC.len()..HEADER_SIZE];
        let table_start = fields.get_u32_le();
        let table_end = fields.get_u32_le();
        let total_length = fields.get_u32_le();
        let entry_count = fields.get_u32_le();
        let timestamp = fields.get_u32_le();

        if table_start as usize != HEADER_SIZE {
            return Err(DictError::HeaderField {
                field: "offset_table_start",
                offset: OFFSET_TABLE_START_FIELD,
                expected: HEADER_SIZE as u32,
                found: table_start,
            });
        }

        if total_length as usize != container.len() {
            return Err(DictError::LengthMismatch {
                declared: total_length,
                actual: container.len(),
            });
        }

        // Every entry needs at least its fixed overhead
        let count = entry_count as u64;
        let min_len = body_region_start(entry_count as usize) as u64 + count * ENTRY_OVERHEAD as u64;
        if min_len > container.len() as u64 {
            return Err(DictError::Truncated {
                offset: ENTRY_COUNT_FIELD,
                needed: min_len as usize,
                available: container.len(),
            });
        }

        let expected_end = offset_table_end(entry_count as usize) as u32;
        if table_end != expected_end {
            return Err(DictError::HeaderField {
                field: "offset_table_end",
                offset: OFFSET_TABLE_END_FIELD,
                expected: expected_end,
                found: table_end,
            });
        }

        Ok(Self {
            entry_count,
            timestamp,
            offset_table_end: table_end,
            total_length,
        })
    }
}
