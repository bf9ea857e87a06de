//! UTF-16LE transcoding
//!
//! The container stores all text as UTF-16 little-endian without a BOM.

/// Number of bytes `text` occupies as UTF-16LE (terminator excluded)
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count() * 2
}

/// Transcode to UTF-16LE bytes, no BOM, no terminator
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(utf16_len(text));
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decode UTF-16LE bytes. Returns `None` on odd length or unpaired surrogates.
pub fn decode_utf16le(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
