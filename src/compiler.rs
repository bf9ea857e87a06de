//! Compiler Module
//!
//! Turns line-format sources into containers and writes them out.
//!
//! ## Responsibilities
//! - Read the line format and build entries
//! - Apply the invalid entry policy (reject the build, or skip the entry)
//! - Encode and write the container, only once it is complete
//! - Compile independent jobs in parallel

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::{Config, InvalidEntryPolicy};
use crate::container::ContainerEncoder;
use crate::entry::{parse_lines, Entry, ParsedLines};
use crate::error::{DictError, Result};

/// Summary of one finished build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Entries stored in the container
    pub entries_written: usize,

    /// Entries or lines dropped under `InvalidEntryPolicy::Skip`
    pub entries_skipped: usize,

    /// Container size in bytes
    pub bytes_written: usize,

    /// Timestamp stamped into the container
    pub timestamp: u32,

    /// CRC32 of the container bytes
    pub checksum: u32,
}

/// One input/output pair for batch compilation
#[derive(Debug, Clone)]
pub struct BuildJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl BuildJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Job writing next to the input, see `default_output_path`
    pub fn with_default_output(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = default_output_path(&input);
        Self { input, output }
    }
}

/// `dir/name.txt` → `dir/output_name.txt.dat`
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.is_empty() {
        return input.join("output.dat");
    }
    input.with_file_name(format!("output_{}.dat", name))
}

/// Write `bytes` to a sibling temp file, then rename it over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Drives entry building and container encoding
pub struct Compiler {
    config: Config,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encode `entries` under the configured policy and timestamp
    pub fn compile_entries(&self, entries: &[Entry]) -> Result<(Vec<u8>, BuildReport)> {
        let timestamp = self.config.timestamp.resolve()?;
        let mut encoder = ContainerEncoder::new(timestamp);
        let mut skipped = 0;

        for (index, entry) in entries.iter().enumerate() {
            match encoder.add(entry) {
                Ok(()) => {}
                Err(e) if self.skips(&e) => {
                    warn!(index, code = %entry.code, error = %e, "skipping invalid entry");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let bytes = encoder.finish()?;
        let report = BuildReport {
            entries_written: entries.len() - skipped,
            entries_skipped: skipped,
            bytes_written: bytes.len(),
            timestamp,
            checksum: crc32fast::hash(&bytes),
        };

        Ok((bytes, report))
    }

    /// Read the line format from `reader`, write the container to `writer`
    pub fn compile_reader<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<BuildReport> {
        let parsed = parse_lines(reader, self.config.default_order)?;
        let (bytes, report) = self.compile_parsed(parsed)?;

        writer.write_all(&bytes)?;
        writer.flush()?;

        Ok(report)
    }

    /// Compile `input` into `output`.
    ///
    /// The container is written to a temporary file next to `output` and
    /// renamed into place, so `output` is either untouched or complete.
    pub fn compile_file(&self, input: &Path, output: &Path) -> Result<BuildReport> {
        debug!(input = %input.display(), "reading entries");
        let reader = BufReader::new(File::open(input)?);
        let parsed = parse_lines(reader, self.config.default_order)?;
        let (bytes, report) = self.compile_parsed(parsed)?;

        write_atomic(output, &bytes)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            entries = report.entries_written,
            skipped = report.entries_skipped,
            bytes = report.bytes_written,
            checksum = %format!("{:08x}", report.checksum),
            "dictionary written"
        );

        Ok(report)
    }

    /// Compile independent jobs on scoped threads.
    ///
    /// Results are returned in job order.
    pub fn compile_batch(&self, jobs: &[BuildJob]) -> Vec<Result<BuildReport>> {
        let results: Mutex<Vec<Option<Result<BuildReport>>>> =
            Mutex::new((0..jobs.len()).map(|_| None).collect());

        let scope_result = crossbeam::thread::scope(|s| {
            for (index, job) in jobs.iter().enumerate() {
                let results = &results;
                s.spawn(move |_| {
                    let result = self.compile_file(&job.input, &job.output);
                    if let Err(e) = &result {
                        warn!(input = %job.input.display(), error = %e, "build failed");
                    }
                    results.lock()[index] = Some(result);
                });
            }
        });
        if scope_result.is_err() {
            warn!("a batch worker panicked");
        }

        results
            .into_inner()
            .into_iter()
            .zip(jobs)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| {
                    Err(DictError::Io(io::Error::new(
                        io::ErrorKind::Other,
                        format!("build of {} did not complete", job.input.display()),
                    )))
                })
            })
            .collect()
    }

    fn compile_parsed(&self, parsed: ParsedLines) -> Result<(Vec<u8>, BuildReport)> {
        let ParsedLines {
            entries,
            skipped,
            errors,
        } = parsed;

        debug!(entries = entries.len(), blank_or_short = skipped, "parsed line source");

        let rejected = errors.len();
        for error in errors {
            match self.config.invalid_entries {
                InvalidEntryPolicy::Reject => return Err(error),
                InvalidEntryPolicy::Skip => warn!(error = %error, "skipping line"),
            }
        }

        let (bytes, mut report) = self.compile_entries(&entries)?;
        report.entries_skipped += rejected;
        Ok((bytes, report))
    }

    fn skips(&self, error: &DictError) -> bool {
        self.config.invalid_entries == InvalidEntryPolicy::Skip
            && matches!(
                error,
                DictError::EntryTooLarge { .. }
                    | DictError::InvalidText { .. }
                    | DictError::OrderOutOfRange(_)
            )
    }
}
