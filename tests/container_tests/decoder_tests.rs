//! Tests for the container decoder
//!
//! These tests verify:
//! - decode(encode(x)) == x
//! - Header inspection
//! - Rejection of foreign, truncated and corrupted containers, with offsets

use mschxudp::container::{
    decode, decode_with_header, encode, inspect, ContainerDecoder, HEADER_SIZE, MAGIC,
    TOTAL_LENGTH_FIELD,
};
use mschxudp::{DictError, Entry};

const TS: u32 = 1_700_000_000;

// =============================================================================
// Helper Functions
// =============================================================================

fn set_u32(bytes: &mut [u8], at: usize, value: u32) {
    bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Append bytes and keep the total length field consistent
fn append_patched(bytes: &mut Vec<u8>, extra: &[u8]) {
    bytes.extend_from_slice(extra);
    let len = bytes.len() as u32;
    set_u32(bytes, TOTAL_LENGTH_FIELD, len);
}

/// Start of the first body in a one-entry container (after the reserved word)
const SINGLE_BODY: usize = HEADER_SIZE + 4;

/// Hand-assembled body for `code`/`word` (ASCII code, BMP word)
fn raw_body(code: &str, word: &str, order: u8) -> Vec<u8> {
    let code: Vec<u8> = code.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let word: Vec<u8> = word.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let mut body = vec![0x10, 0x00, 0x10, 0x00];
    body.extend_from_slice(&((code.len() + 18) as u16).to_le_bytes());
    body.extend_from_slice(&[order, 0x06, 0, 0, 0, 0]);
    body.extend_from_slice(&TS.to_le_bytes());
    body.extend_from_slice(&code);
    body.extend_from_slice(&[0, 0]);
    body.extend_from_slice(&word);
    body.extend_from_slice(&[0, 0]);
    body
}

fn sample_entries() -> Vec<Entry> {
    vec![
        Entry::new("ai", "爱", 1),
        Entry::new("nihao", "你好", 2),
        Entry::new("rlzdzy", "C)劳动 创造 价值", 1),
        Entry::new("smile", "😀", 0),
        Entry::new("", "", 255),
    ]
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_sample() {
    let entries = sample_entries();
    let bytes = encode(&entries, TS).unwrap();
    assert_eq!(decode(&bytes).unwrap(), entries);
}

#[test]
fn test_round_trip_small_counts() {
    let entries = sample_entries();
    for count in 0..=entries.len() {
        let slice = &entries[..count];
        let bytes = encode(slice, TS).unwrap();
        assert_eq!(decode(&bytes).unwrap(), slice, "count {}", count);
    }
}

#[test]
fn test_round_trip_many_entries() {
    let entries: Vec<Entry> = (0..500)
        .map(|i| Entry::new(format!("k{}", i), "字".repeat(i % 7), (i % 256) as u8))
        .collect();
    let bytes = encode(&entries, TS).unwrap();
    assert_eq!(decode(&bytes).unwrap(), entries);
}

#[test]
fn test_empty_container_decodes_to_nothing() {
    let bytes = encode(&[], TS).unwrap();
    assert_eq!(bytes.len(), 64);
    assert!(decode(&bytes).unwrap().is_empty());
}

#[test]
fn test_decode_with_header_returns_timestamp() {
    let bytes = encode(&sample_entries(), TS).unwrap();
    let (header, entries) = decode_with_header(&bytes).unwrap();

    assert_eq!(header.timestamp, TS);
    assert_eq!(header.entry_count, 5);
    assert_eq!(header.offset_table_end, 0x40 + 4 * 5);
    assert_eq!(header.total_length as usize, bytes.len());
    assert_eq!(entries.len(), 5);
}

#[test]
fn test_random_access() {
    let entries = sample_entries();
    let bytes = encode(&entries, TS).unwrap();
    let decoder = ContainerDecoder::new(&bytes).unwrap();

    assert_eq!(decoder.len(), 5);
    assert_eq!(decoder.entry(3).unwrap(), entries[3]);
    assert_eq!(decoder.entry(0).unwrap(), entries[0]);
    assert!(decoder.entry(5).is_err());
}

#[test]
fn test_decode_hand_assembled_container() {
    let first = raw_body("abc", "你好", 1);
    let second = raw_body("ai", "爱", 2);

    let mut bytes = MAGIC.to_vec();
    for field in [0x40u32, 0x48, 0, 2, TS] {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    bytes.extend_from_slice(&[0u8; 28]);
    bytes.extend_from_slice(&[0u8; 4]);
    bytes.extend_from_slice(&(first.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&first);
    append_patched(&mut bytes, &second);

    assert_eq!(bytes.len(), 128);
    assert_eq!(
        decode(&bytes).unwrap(),
        vec![Entry::new("abc", "你好", 1), Entry::new("ai", "爱", 2)]
    );
}

#[test]
fn test_reserved_word_is_not_interpreted() {
    let entries = sample_entries();
    let mut bytes = encode(&entries, TS).unwrap();
    set_u32(&mut bytes, 0x40, 0xDEAD_BEEF);
    assert_eq!(decode(&bytes).unwrap(), entries);
}

#[test]
fn test_inspect_skips_bodies() {
    let mut bytes = encode(&sample_entries(), TS).unwrap();
    // Corrupt the last body's marker; header and offsets stay valid
    let last = bytes.len() - 20;
    bytes[last] = 0xFF;

    assert_eq!(inspect(&bytes).unwrap().entry_count, 5);
    assert!(decode(&bytes).is_err());
}

// =============================================================================
// Header Validation Tests
// =============================================================================

#[test]
fn test_magic_mismatch() {
    let mut bytes = encode(&sample_entries(), TS).unwrap();
    bytes[0] = b'M';

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, DictError::MagicMismatch { .. }));
    assert!(err.is_malformed());
}

#[test]
fn test_version_bytes_are_part_of_magic() {
    let mut bytes = encode(&[], TS).unwrap();
    bytes[8] = 0x03;
    assert!(matches!(decode(&bytes), Err(DictError::MagicMismatch { .. })));
}

#[test]
fn test_foreign_data_is_magic_mismatch() {
    let zeros = vec![0u8; 128];
    assert!(matches!(decode(&zeros), Err(DictError::MagicMismatch { .. })));
}

#[test]
fn test_short_buffer_is_truncated() {
    let bytes = MAGIC.to_vec();
    assert!(matches!(
        decode(&bytes),
        Err(DictError::Truncated { available: 16, .. })
    ));
}

#[test]
fn test_cut_container_is_length_mismatch() {
    let bytes = encode(&sample_entries(), TS).unwrap();
    let cut = &bytes[..bytes.len() - 3];
    assert!(matches!(
        decode(cut),
        Err(DictError::LengthMismatch { .. })
    ));
}

#[test]
fn test_bad_offset_table_start() {
    let mut bytes = encode(&sample_entries(), TS).unwrap();
    set_u32(&mut bytes, 0x10, 0x44);
    assert!(matches!(
        decode(&bytes),
        Err(DictError::HeaderField { field: "offset_table_start", offset: 0x10, .. })
    ));
}

#[test]
fn test_bad_offset_table_end() {
    let mut bytes = encode(&sample_entries(), TS).unwrap();
    set_u32(&mut bytes, 0x14, 0x40);
    assert!(matches!(
        decode(&bytes),
        Err(DictError::HeaderField { field: "offset_table_end", offset: 0x14, .. })
    ));
}

#[test]
fn test_inflated_entry_count_is_truncated() {
    let mut bytes = encode(&sample_entries(), TS).unwrap();
    set_u32(&mut bytes, 0x1C, 1000);
    set_u32(&mut bytes, 0x14, 0x40 + 4 * 1000);
    assert!(matches!(decode(&bytes), Err(DictError::Truncated { .. })));
}

// =============================================================================
// Offset Table Validation Tests
// =============================================================================

#[test]
fn test_decreasing_offset() {
    let mut bytes = encode(&sample_entries(), TS).unwrap();
    // slot 1 below slot 0; stored slots start after the reserved word
    set_u32(&mut bytes, 0x48, 4);

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, DictError::OffsetTable { index: 1, offset: 0x48, .. }));
    assert!(err.to_string().contains("0x48"));
}

#[test]
fn test_offset_past_body_region() {
    let entries = vec![Entry::new("abc", "你好", 1), Entry::new("ai", "爱", 2)];
    let mut bytes = encode(&entries, TS).unwrap();
    // body region is 56 bytes; an offset of 56 leaves nothing for the last entry
    set_u32(&mut bytes, 0x44, 56);

    assert!(matches!(
        decode(&bytes),
        Err(DictError::OffsetTable { index: 0, .. })
    ));
}

#[test]
fn test_shifted_offset_breaks_body() {
    let entries = vec![Entry::new("abc", "你好", 1), Entry::new("ai", "爱", 2)];
    let mut bytes = encode(&entries, TS).unwrap();
    set_u32(&mut bytes, 0x44, 28);

    let err = decode(&bytes).unwrap_err();
    assert!(err.is_malformed());
}

// =============================================================================
// Entry Body Validation Tests
// =============================================================================

#[test]
fn test_bad_entry_marker() {
    let mut bytes = encode(&[Entry::new("ai", "爱", 1)], TS).unwrap();
    bytes[SINGLE_BODY] = 0x11;
    assert!(matches!(
        decode(&bytes),
        Err(DictError::MalformedEntry { index: 0, offset: 0x44, .. })
    ));
}

#[test]
fn test_bad_flag_byte() {
    let mut bytes = encode(&[Entry::new("ai", "爱", 1)], TS).unwrap();
    bytes[SINGLE_BODY + 7] = 0x07;

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, DictError::MalformedEntry { index: 0, offset: 0x4b, .. }));
    assert!(err.to_string().contains("0x4b"));
}

#[test]
fn test_code_length_field_disagrees() {
    let mut bytes = encode(&[Entry::new("ai", "爱", 1)], TS).unwrap();
    // 22 -> 20
    bytes[SINGLE_BODY + 4] = 20;
    assert!(matches!(
        decode(&bytes),
        Err(DictError::MalformedEntry { index: 0, .. })
    ));
}

#[test]
fn test_missing_word_terminator() {
    let mut bytes = encode(&[Entry::new("ai", "爱", 1)], TS).unwrap();
    let len = bytes.len();
    bytes[len - 2] = 0x41;

    assert!(matches!(
        decode(&bytes),
        Err(DictError::MissingTerminator { index: 0, .. })
    ));
}

#[test]
fn test_trailing_bytes_after_word() {
    let mut bytes = encode(&[Entry::new("ai", "爱", 1)], TS).unwrap();
    append_patched(&mut bytes, &[0x41, 0x00]);

    assert!(matches!(
        decode(&bytes),
        Err(DictError::MalformedEntry { index: 0, offset: 94, .. })
    ));
}

#[test]
fn test_trailing_bytes_after_empty_container() {
    let mut bytes = encode(&[], TS).unwrap();
    append_patched(&mut bytes, &[0, 0, 0, 0]);
    assert!(decode(&bytes).unwrap_err().is_malformed());
}

#[test]
fn test_unpaired_surrogate() {
    let mut bytes = encode(&[Entry::new("ai", "爱", 1)], TS).unwrap();
    // code starts after the 16-byte fixed body header
    bytes[SINGLE_BODY + 16] = 0x00;
    bytes[SINGLE_BODY + 17] = 0xD8;

    assert!(matches!(
        decode(&bytes),
        Err(DictError::InvalidUtf16 { index: 0, offset: 0x54 })
    ));
}

#[test]
fn test_error_in_later_entry_reports_its_index() {
    let entries = sample_entries();
    let mut bytes = encode(&entries, TS).unwrap();
    let len = bytes.len();
    // last entry is ("", "", 255): its body is the final 20 bytes
    bytes[len - 20 + 7] = 0x00;

    assert!(matches!(
        decode(&bytes),
        Err(DictError::MalformedEntry { index: 4, .. })
    ));
}
