//! assay-map: Derive a column mapping for a selected shape
//!
//! Usage:
//!   # Array of records
//!   assay-map capture.json --url https://site/api/feed --mode array --select users
//!
//!   # ID-keyed dictionary, appended to a mapping store
//!   assay-map capture.json --url https://site/api/feed --mode numeric --select users \
//!       --append mappings.jsonl
//!
//!   # Named object inside a pasted response
//!   pbpaste | assay-map --raw --mode object --select owner

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use assay::capture::PASTED_LABEL;
use assay::logging::init_tracing;
use assay::{CaptureLog, InspectConfig, InspectSession, MappingMode, MappingRecord, MappingWriter};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Array of objects
    Array,
    /// Object keyed by numeric ids
    Numeric,
    /// Named object anywhere in the document
    Object,
}

impl From<Mode> for MappingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Array => MappingMode::Array,
            Mode::Numeric => MappingMode::NumericId,
            Mode::Object => MappingMode::NamedObject,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "assay-map")]
#[command(about = "Derive a reusable column mapping from captured JSON", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Treat the input as one pasted response instead of a capture log
    #[arg(long)]
    raw: bool,

    /// Captured url to map; with --raw, the label stored for the response
    #[arg(long)]
    url: Option<String>,

    /// How the selection is located
    #[arg(long, value_enum)]
    mode: Mode,

    /// Array or object name, as listed by assay-catalog
    #[arg(long)]
    select: String,

    /// Append the mapping record to this JSON Lines file
    #[arg(long)]
    append: Option<String>,

    /// Maximum nesting depth to traverse (default: 128)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Size limit in bytes for --raw input (default: 1 MiB)
    #[arg(long)]
    max_input_bytes: Option<usize>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = InspectConfig::default();
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if let Some(limit) = args.max_input_bytes {
        config.max_input_bytes = limit;
    }

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?,
        ))
    } else {
        Box::new(std::io::stdin())
    };
    let pasted_label = args.raw.then(|| args.url.as_deref().unwrap_or(PASTED_LABEL));
    let log = CaptureLog::read_input(reader, pasted_label, &config)?;

    let url = match (&args.url, args.raw) {
        (Some(url), false) => url.clone(),
        _ => log
            .default_url(args.raw)
            .map(str::to_string)
            .context("No captured response carries a body")?,
    };

    let session = InspectSession::new(log, config);
    let saved = session
        .map(&url, args.mode.into(), &args.select)
        .with_context(|| format!("Cannot map '{}' from {}", args.select, url))?;
    let record = MappingRecord::new(url, saved);

    if let Some(path) = &args.append {
        let mut writer = MappingWriter::append_to(path)?;
        writer.write_record(&record)?;
        writer.flush()?;
        info!(path = %path, "appended mapping record");
    }

    let rendered = if args.compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{}", rendered);

    Ok(())
}
