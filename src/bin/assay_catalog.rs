//! assay-catalog: List the selectable shapes in a captured response
//!
//! Usage:
//!   # Catalogs for one url in a capture log
//!   assay-catalog capture.json --url https://site/api/feed
//!
//!   # A single response pasted from the browser's network tab
//!   pbpaste | assay-catalog --raw --kind numeric
//!
//!   # Only list captured urls that carry a body
//!   assay-catalog capture.json --list

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use assay::capture::PASTED_LABEL;
use assay::logging::init_tracing;
use assay::{CaptureLog, InspectConfig, InspectSession};
use clap::{Parser, ValueEnum};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Arrays,
    Numeric,
    Objects,
    All,
}

#[derive(Parser, Debug)]
#[command(name = "assay-catalog")]
#[command(about = "List arrays, ID-keyed objects and named objects in captured JSON", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Treat the input as one pasted response instead of a capture log
    #[arg(long)]
    raw: bool,

    /// Captured url to inspect (defaults to the first one with a body)
    #[arg(long)]
    url: Option<String>,

    /// Which catalog to print
    #[arg(long, value_enum, default_value = "all")]
    kind: Kind,

    /// Print the captured urls that carry a body and exit
    #[arg(long)]
    list: bool,

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
    info!(responses = log.len(), "loaded capture");

    if args.list {
        for record in log.with_data() {
            println!("{} {} {}", record.status, record.method, record.url);
        }
        return Ok(());
    }

    let url = match (&args.url, args.raw) {
        (Some(url), false) => url.clone(),
        _ => log
            .default_url(args.raw)
            .map(str::to_string)
            .context("No captured response carries a body")?,
    };

    let session = InspectSession::new(log, config);
    let mut output = Map::new();
    output.insert("url".to_string(), json!(url));
    if matches!(args.kind, Kind::Arrays | Kind::All) {
        output.insert("arrays".to_string(), serde_json::to_value(session.arrays(&url)?)?);
    }
    if matches!(args.kind, Kind::Numeric | Kind::All) {
        output.insert(
            "numeric_objects".to_string(),
            serde_json::to_value(session.numeric_objects(&url)?)?,
        );
    }
    if matches!(args.kind, Kind::Objects | Kind::All) {
        output.insert(
            "named_objects".to_string(),
            serde_json::to_value(session.named_objects(&url)?)?,
        );
    }

    let output = Value::Object(output);
    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);

    Ok(())
}
