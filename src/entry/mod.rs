//! Entry Module
//!
//! Lexicon records and the text forms they travel in.
//!
//! ## Responsibilities
//! - `Entry` value type with size and content validation
//! - UTF-16LE transcoding used by the container
//! - The line-oriented intermediate format: `<code> <order> <word>`

mod record;
mod text;
pub mod line;

pub use record::{Entry, DEFAULT_ORDER, MAX_TEXT_BYTES};
pub use text::{decode_utf16le, encode_utf16le, utf16_len};
pub use line::{format_line, parse_line, parse_lines, ParsedLines};
