//! # mschxudp
//!
//! Builds and reads `mschxudp` user-defined phrase dictionaries:
//! - Bit-exact binary container encoder with backpatched length
//! - Validating decoder, the inverse of the encoder
//! - Line-format entry builder (`<code> <order> <word>`)
//! - File and batch compilation for the command-line tools
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              mschxudp-build / mschxudp-dump                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Compiler                                │
//! │        (line source → entries → container → sink)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Entry    │          │  Container  │
//!   │ (line, text)│─────────▶│ (enc / dec) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod entry;
pub mod container;
pub mod compiler;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DictError, Result};
pub use config::Config;
pub use entry::Entry;
pub use container::{decode, encode, ContainerDecoder, ContainerEncoder, ContainerHeader};
pub use compiler::{BuildReport, Compiler};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mschxudp
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
