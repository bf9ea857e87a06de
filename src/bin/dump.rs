//! mschxudp-dump
//!
//! Prints the header and entries of a mschxudp dictionary.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use mschxudp::container::{self, ContainerHeader};
use mschxudp::entry::format_line;
use tracing_subscriber::{fmt, EnvFilter};

/// mschxudp dictionary inspector
#[derive(Parser, Debug)]
#[command(name = "mschxudp-dump")]
#[command(about = "Print a mschxudp dictionary as `<code> <order> <word>` lines")]
#[command(version)]
struct Args {
    /// Dictionary file
    file: PathBuf,

    /// Only validate and print the header
    #[arg(long)]
    header_only: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let bytes = match fs::read(&args.file) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to read {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    let result = if args.header_only {
        container::inspect(&bytes).map(|header| (header, Vec::new()))
    } else {
        container::decode_with_header(&bytes)
    };

    let (header, entries) = match result {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::error!("{}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    print_header(&header);
    for entry in &entries {
        println!("{}", format_line(entry));
    }
}

fn print_header(header: &ContainerHeader) {
    println!("# entries:          {}", header.entry_count);
    println!("# timestamp:        {}", header.timestamp);
    println!("# offset table end: {:#x}", header.offset_table_end);
    println!("# total length:     {}", header.total_length);
}
