//! mschxudp-build
//!
//! Compiles line-format word lists into mschxudp dictionaries.

use std::path::PathBuf;

use clap::Parser;
use mschxudp::compiler::{default_output_path, BuildJob};
use mschxudp::config::{InvalidEntryPolicy, TimestampSource};
use mschxudp::{Compiler, Config};
use tracing_subscriber::{fmt, EnvFilter};

/// mschxudp dictionary builder
#[derive(Parser, Debug)]
#[command(name = "mschxudp-build")]
#[command(about = "Compile `<code> <order> <word>` lines into a mschxudp dictionary")]
#[command(version)]
struct Args {
    /// Input files in line format
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input only; default: output_<input>.dat)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fixed build timestamp in seconds since epoch (default: now)
    #[arg(short, long)]
    timestamp: Option<u32>,

    /// Order used when a line's order field is not an integer
    #[arg(short = 'd', long, default_value = "1")]
    default_order: u8,

    /// Skip invalid lines and entries instead of failing the build
    #[arg(short, long)]
    skip_invalid: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mschxudp=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if args.output.is_some() && args.inputs.len() > 1 {
        tracing::error!("--output can only be used with a single input");
        std::process::exit(2);
    }

    let config = Config::builder()
        .timestamp(match args.timestamp {
            Some(secs) => TimestampSource::Fixed(secs),
            None => TimestampSource::Now,
        })
        .default_order(args.default_order)
        .invalid_entries(if args.skip_invalid {
            InvalidEntryPolicy::Skip
        } else {
            InvalidEntryPolicy::Reject
        })
        .build();

    tracing::info!("mschxudp-build v{}", mschxudp::VERSION);

    let compiler = Compiler::new(config);

    let jobs: Vec<BuildJob> = match args.output {
        Some(output) => vec![BuildJob::new(args.inputs[0].clone(), output)],
        None => args
            .inputs
            .iter()
            .map(|input| BuildJob::new(input.clone(), default_output_path(input)))
            .collect(),
    };

    let results = if jobs.len() == 1 {
        vec![compiler.compile_file(&jobs[0].input, &jobs[0].output)]
    } else {
        compiler.compile_batch(&jobs)
    };

    let mut failed = 0;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(report) => println!(
                "{} -> {}: {} entries ({} skipped), {} bytes, crc32 {:08x}",
                job.input.display(),
                job.output.display(),
                report.entries_written,
                report.entries_skipped,
                report.bytes_written,
                report.checksum
            ),
            Err(e) => {
                tracing::error!("Failed to build {}: {}", job.input.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
