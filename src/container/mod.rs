//! Container Module
//!
//! The `mschxudp` user-defined phrase container.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Magic (16 bytes)                                             │
//! │   "mschxudp" | 02 00 60 00 | 01 00 00 00                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Metadata (48 bytes, little-endian u32 fields)                │
//! │   0x10 OffsetTableStart = 0x40                               │
//! │   0x14 OffsetTableEnd   = 0x40 + 4 * count                   │
//! │   0x18 TotalLength      (patched after assembly)             │
//! │   0x1C EntryCount                                            │
//! │   0x20 Timestamp                                             │
//! │   0x24 Reserved (28 zero bytes)                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Reserved (4 zero bytes at 0x40, only when count > 0)         │
//! │   stands in for entry 0's offset, which is always 0          │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Offset Table at 0x44 (4 * (count - 1) bytes)                 │
//! │   cumulative body offsets relative to the body region;       │
//! │   the last entry has no slot                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Body region starts at OffsetTableEnd                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Entry Bodies                                                 │
//! │   Marker 10 00 10 00 (4) | CodeLen+18: u16 (2)               │
//! │   Order: u8 (1) | Flag 0x06 (1) | Reserved (4)               │
//! │   Timestamp: u32 (4)                                         │
//! │   Code UTF-16LE | 00 00 | Word UTF-16LE | 00 00              │
//! │   ... repeated for each entry ...                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod header;
mod encoder;
mod decoder;

pub use header::ContainerHeader;
pub use encoder::{encode, ContainerEncoder};
pub use decoder::{decode, decode_with_header, inspect, ContainerDecoder};

// =============================================================================
// Shared Constants (used by header, encoder, decoder)
// =============================================================================

/// Signature and version block that opens every container
pub const MAGIC: &[u8; 16] = b"mschxudp\x02\x00\x60\x00\x01\x00\x00\x00";

/// Header + metadata size; also where the offset table starts
pub const HEADER_SIZE: usize = 0x40;

/// Absolute positions of the metadata fields
pub(crate) const OFFSET_TABLE_START_FIELD: usize = 0x10;
pub(crate) const OFFSET_TABLE_END_FIELD: usize = 0x14;
pub const TOTAL_LENGTH_FIELD: usize = 0x18;
pub(crate) const ENTRY_COUNT_FIELD: usize = 0x1C;

/// Zero padding after the timestamp field
pub(crate) const RESERVED_SIZE: usize = 28;

/// Width of one offset table slot
pub(crate) const OFFSET_SLOT_SIZE: usize = 4;

/// First stored offset; the slot at `HEADER_SIZE` is the reserved word
pub(crate) const FIRST_OFFSET_SLOT: usize = HEADER_SIZE + OFFSET_SLOT_SIZE;

/// Marker opening every entry body
pub(crate) const ENTRY_MARKER: [u8; 4] = [0x10, 0x00, 0x10, 0x00];

/// Fixed byte following the order byte
pub(crate) const ENTRY_FLAG: u8 = 0x06;

/// Marker (4) + length (2) + order (1) + flag (1) + reserved (4) + timestamp (4)
pub(crate) const ENTRY_HEADER_SIZE: usize = 16;

/// Fixed header plus the two text terminators
pub const ENTRY_OVERHEAD: usize = ENTRY_HEADER_SIZE + 2 * TERMINATOR.len();

/// Added to the code byte length in the per-entry u16 length field
pub(crate) const CODE_LEN_BIAS: usize = ENTRY_HEADER_SIZE + TERMINATOR.len();

/// UTF-16 NUL ending each text run
pub(crate) const TERMINATOR: [u8; 2] = [0x00, 0x00];

// =============================================================================
// Layout Arithmetic
// =============================================================================

/// Value stored in the offset-table-end header field for `count` entries
pub fn offset_table_end(count: usize) -> usize {
    HEADER_SIZE + OFFSET_SLOT_SIZE * count
}

/// Bytes occupied by stored offsets (no slot for the last entry)
pub fn offset_table_len(count: usize) -> usize {
    OFFSET_SLOT_SIZE * count.saturating_sub(1)
}

/// Absolute position where entry bodies begin.
///
/// Equal to `offset_table_end(count)`: for `count > 0` the reserved word
/// plus the stored offsets fill exactly `4 * count` bytes after the header.
pub fn body_region_start(count: usize) -> usize {
    offset_table_end(count)
}

/// Total body size of one entry, given its UTF-16 text lengths
pub fn entry_body_length(code_bytes: usize, word_bytes: usize) -> usize {
    code_bytes + word_bytes + ENTRY_OVERHEAD
}
