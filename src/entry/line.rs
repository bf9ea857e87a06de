//! Line format
//!
//! The intermediate text form produced by upstream extraction tools:
//!
//! ```text
//! <code> <order> <word, may contain spaces>
//! rlzdzy 1 C)劳动
//! ```
//!
//! Fields are split on single spaces, at most twice. Blank lines and lines
//! with fewer than three fields are skipped. A non-integer order falls back
//! to the configured default; an integer outside 0-255 is an error.

use std::io::BufRead;
use std::num::IntErrorKind;

use tracing::debug;

use crate::error::{DictError, Result};

use super::Entry;

/// Outcome of reading a whole line source
#[derive(Debug, Default)]
pub struct ParsedLines {
    /// Entries in source order
    pub entries: Vec<Entry>,

    /// Blank or short lines that carried no record
    pub skipped: usize,

    /// Lines that looked like records but could not be accepted
    pub errors: Vec<DictError>,
}

/// Parse one line.
///
/// Returns `Ok(None)` for lines that carry no record.
pub fn parse_line(line: &str, default_order: u8) -> Result<Option<Entry>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.splitn(3, ' ');
    let (code, order, word) = match (parts.next(), parts.next(), parts.next()) {
        (Some(code), Some(order), Some(word)) => (code, order, word),
        _ => return Ok(None),
    };

    let order = match order.parse::<i64>() {
        Ok(value) => value,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
        Err(_) => i64::from(default_order),
    };

    Entry::with_order(code, word, order).map(Some)
}

/// Parse every line of `reader`.
///
/// Per-line failures are collected as `DictError::Parse` so the caller can
/// decide whether to abort or skip; I/O errors abort immediately.
pub fn parse_lines<R: BufRead>(reader: R, default_order: u8) -> Result<ParsedLines> {
    let mut parsed = ParsedLines::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        match parse_line(&line, default_order) {
            Ok(Some(entry)) => parsed.entries.push(entry),
            Ok(None) => {
                if !line.trim().is_empty() {
                    debug!(line = line_no, "skipping line with fewer than 3 fields");
                }
                parsed.skipped += 1;
            }
            Err(e) => parsed.errors.push(DictError::Parse {
                line: line_no,
                source: Box::new(e),
            }),
        }
    }

    Ok(parsed)
}

/// Render an entry back into the line format
pub fn format_line(entry: &Entry) -> String {
    format!("{} {} {}", entry.code, entry.order, entry.word)
}
