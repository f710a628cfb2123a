use crate::types::{ColumnMapping, MappingMode, SavedMapping};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::Path;

/// A saved mapping tied to the API url it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub api: String,
    pub mode: MappingMode,
    pub keys: Vec<String>,
    pub mapping: ColumnMapping,
}

impl MappingRecord {
    pub fn new(api: impl Into<String>, saved: SavedMapping) -> Self {
        MappingRecord {
            api: api.into(),
            mode: saved.mode,
            keys: saved.keys,
            mapping: saved.mapping,
        }
    }
}

/// Writes mapping records as JSON Lines
pub struct MappingWriter<W: Write> {
    writer: W,
}

impl MappingWriter<std::fs::File> {
    /// Append to the file at `path`, creating it if needed
    pub fn append_to<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        Ok(MappingWriter { writer: file })
    }
}

impl<W: Write> MappingWriter<W> {
    pub fn new(writer: W) -> Self {
        MappingWriter { writer }
    }

    pub fn write_record(&mut self, record: &MappingRecord) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to serialize mapping")?;
        writeln!(self.writer, "{}", json).context("Failed to write mapping")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

/// Read mapping records back, skipping blank lines
pub fn read_mappings<R: BufRead>(reader: R) -> Result<Vec<MappingRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line)
            .with_context(|| format!("Invalid mapping record on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}
