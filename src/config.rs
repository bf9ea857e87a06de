//! Configuration for mschxudp
//!
//! Centralized configuration with sensible defaults.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::entry::DEFAULT_ORDER;
use crate::error::{DictError, Result};

/// Main configuration for a dictionary build
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Container Configuration
    // -------------------------------------------------------------------------
    /// Where the build timestamp comes from
    pub timestamp: TimestampSource,

    // -------------------------------------------------------------------------
    // Entry Builder Configuration
    // -------------------------------------------------------------------------
    /// Order used when a line's order field is not an integer
    pub default_order: u8,

    /// What to do with entries that fail validation
    pub invalid_entries: InvalidEntryPolicy,
}

/// Source of the 32-bit build timestamp written to the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Seconds since the Unix epoch at build time
    Now,

    /// A fixed value (reproducible builds, tests)
    Fixed(u32),
}

impl TimestampSource {
    /// Resolve to the value written into the header and every entry body
    pub fn resolve(&self) -> Result<u32> {
        match self {
            TimestampSource::Fixed(secs) => Ok(*secs),
            TimestampSource::Now => {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_err(|e| DictError::Config(format!("System clock before epoch: {}", e)))?
                    .as_secs();
                u32::try_from(secs).map_err(|_| {
                    DictError::Config(format!("Timestamp {} does not fit 32 bits", secs))
                })
            }
        }
    }
}

/// Handling of entries that fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEntryPolicy {
    /// Abort the whole build on the first invalid entry
    Reject,

    /// Drop invalid entries and keep going
    Skip,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp: TimestampSource::Now,
            default_order: DEFAULT_ORDER,
            invalid_entries: InvalidEntryPolicy::Reject,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the timestamp source
    pub fn timestamp(mut self, source: TimestampSource) -> Self {
        self.config.timestamp = source;
        self
    }

    /// Use a fixed timestamp (seconds since epoch)
    pub fn fixed_timestamp(mut self, secs: u32) -> Self {
        self.config.timestamp = TimestampSource::Fixed(secs);
        self
    }

    /// Set the fallback order for lines with a non-integer order field
    pub fn default_order(mut self, order: u8) -> Self {
        self.config.default_order = order;
        self
    }

    /// Set the invalid entry policy
    pub fn invalid_entries(mut self, policy: InvalidEntryPolicy) -> Self {
        self.config.invalid_entries = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
