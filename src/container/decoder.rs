//! Container Decoder
//!
//! Validates a container and reconstructs its entries.

use crate::entry::{decode_utf16le, Entry};
use crate::error::{DictError, Result};

use super::{
    ContainerHeader, CODE_LEN_BIAS, ENTRY_FLAG, ENTRY_HEADER_SIZE, ENTRY_MARKER, ENTRY_OVERHEAD,
    FIRST_OFFSET_SLOT, HEADER_SIZE, OFFSET_SLOT_SIZE, TERMINATOR,
};

/// Reader over an in-memory container
///
/// `new()` validates the header and the offset table up front; entry
/// bodies are parsed on demand.
pub struct ContainerDecoder<'a> {
    bytes: &'a [u8],
    header: ContainerHeader,
    /// Absolute body boundaries: entry `i` spans `bounds[i]..bounds[i + 1]`
    bounds: Vec<usize>,
}

impl<'a> ContainerDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let header = ContainerHeader::parse(bytes)?;
        let count = header.entry_count as usize;

        if count == 0 {
            if bytes.len() != HEADER_SIZE {
                return Err(DictError::MalformedEntry {
                    index: 0,
                    offset: HEADER_SIZE,
                    reason: format!(
                        "{} trailing bytes in a container with no entries",
                        bytes.len() - HEADER_SIZE
                    ),
                });
            }
            return Ok(Self {
                bytes,
                header,
                bounds: Vec::new(),
            });
        }

        // Bodies start at the validated offset-table end; the reserved word
        // at HEADER_SIZE is not interpreted
        let region_start = header.offset_table_end as usize;
        let region_len = bytes.len() - region_start;

        let mut bounds = Vec::with_capacity(count + 1);
        bounds.push(region_start);

        let mut previous = 0usize;
        for index in 0..count - 1 {
            let at = FIRST_OFFSET_SLOT + index * OFFSET_SLOT_SIZE;
            let offset = read_u32(bytes, at) as usize;

            if offset < previous {
                return Err(DictError::OffsetTable {
                    index,
                    offset: at,
                    reason: format!("offset {} decreases from {}", offset, previous),
                });
            }
            if offset >= region_len {
                return Err(DictError::OffsetTable {
                    index,
                    offset: at,
                    reason: format!(
                        "offset {} is not inside the {}-byte body region",
                        offset, region_len
                    ),
                });
            }

            bounds.push(region_start + offset);
            previous = offset;
        }

        // The last entry runs to the end of the container
        bounds.push(bytes.len());

        Ok(Self {
            bytes,
            header,
            bounds,
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.header.entry_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse entry `index`
    pub fn entry(&self, index: usize) -> Result<Entry> {
        if index >= self.len() {
            return Err(DictError::MalformedEntry {
                index,
                offset: self.bytes.len(),
                reason: format!("index out of range for {} entries", self.len()),
            });
        }
        self.parse_body(index, self.bounds[index], self.bounds[index + 1])
    }

    /// Iterate over all entries in container order
    pub fn iter(&self) -> impl Iterator<Item = Result<Entry>> + '_ {
        (0..self.len()).map(move |index| self.entry(index))
    }

    /// Parse every entry; fails on the first malformed body
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.iter().collect()
    }

    fn parse_body(&self, index: usize, start: usize, end: usize) -> Result<Entry> {
        let body = &self.bytes[start..end];

        if body.len() < ENTRY_OVERHEAD {
            return Err(DictError::Truncated {
                offset: start,
                needed: ENTRY_OVERHEAD,
                available: body.len(),
            });
        }

        if body[0..4] != ENTRY_MARKER {
            return Err(DictError::MalformedEntry {
                index,
                offset: start,
                reason: format!("bad entry marker {:02x?}", &body[0..4]),
            });
        }

        let code_field = u16::from_le_bytes([body[4], body[5]]) as usize;
        let order = body[6];

        if body[7] != ENTRY_FLAG {
            return Err(DictError::MalformedEntry {
                index,
                offset: start + 7,
                reason: format!("unexpected flag byte 0x{:02x}", body[7]),
            });
        }

        if code_field < CODE_LEN_BIAS {
            return Err(DictError::MalformedEntry {
                index,
                offset: start + 4,
                reason: format!("code length field {} below minimum {}", code_field, CODE_LEN_BIAS),
            });
        }

        // Code run: from the fixed header to its terminator
        let code_end = find_terminator(body, ENTRY_HEADER_SIZE).ok_or(
            DictError::MissingTerminator {
                index,
                offset: start + ENTRY_HEADER_SIZE,
            },
        )?;
        if code_end + TERMINATOR.len() != code_field {
            return Err(DictError::MalformedEntry {
                index,
                offset: start + 4,
                reason: format!(
                    "code length field {} disagrees with terminator at body offset {}",
                    code_field, code_end
                ),
            });
        }
        let code = decode_utf16le(&body[ENTRY_HEADER_SIZE..code_end]).ok_or(
            DictError::InvalidUtf16 {
                index,
                offset: start + ENTRY_HEADER_SIZE,
            },
        )?;

        // Word run: must end exactly at the body boundary
        let word_start = code_end + TERMINATOR.len();
        let word_end = find_terminator(body, word_start).ok_or(DictError::MissingTerminator {
            index,
            offset: start + word_start,
        })?;
        let trailing = body.len() - (word_end + TERMINATOR.len());
        if trailing != 0 {
            return Err(DictError::MalformedEntry {
                index,
                offset: start + word_end + TERMINATOR.len(),
                reason: format!("{} trailing bytes after word terminator", trailing),
            });
        }
        let word = decode_utf16le(&body[word_start..word_end]).ok_or(DictError::InvalidUtf16 {
            index,
            offset: start + word_start,
        })?;

        Ok(Entry { code, word, order })
    }
}

/// Position of the first aligned UTF-16 NUL at or after `from`
fn find_terminator(body: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while pos + TERMINATOR.len() <= body.len() {
        if body[pos..pos + TERMINATOR.len()] == TERMINATOR {
            return Some(pos);
        }
        pos += TERMINATOR.len();
    }
    None
}

/// Caller guarantees `at + 4 <= bytes.len()`
fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Decode every entry of a container
pub fn decode(bytes: &[u8]) -> Result<Vec<Entry>> {
    ContainerDecoder::new(bytes)?.entries()
}

/// Decode a container, returning its header alongside the entries
pub fn decode_with_header(bytes: &[u8]) -> Result<(ContainerHeader, Vec<Entry>)> {
    let decoder = ContainerDecoder::new(bytes)?;
    let entries = decoder.entries()?;
    Ok((decoder.header, entries))
}

/// Validate header and offset table without parsing bodies
pub fn inspect(bytes: &[u8]) -> Result<ContainerHeader> {
    ContainerDecoder::new(bytes).map(|decoder| decoder.header)
}
