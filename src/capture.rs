//! Captured network responses, the input to every inspection.
//!
//! The capture itself (driving a browser and listening for JSON responses)
//! happens elsewhere; anything implementing [`CaptureSource`] can feed a
//! [`CaptureLog`].

use crate::error::{Result, ShapeError, Target};
use crate::types::InspectConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, warn};

/// Label used for pasted responses when none is supplied
pub const PASTED_LABEL: &str = "pasted-input";

/// One JSON response observed while a page loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedResponse {
    pub url: String,
    pub status: u16,
    pub method: String,
    /// Parsed body; absent when the body was not valid JSON
    #[serde(default)]
    pub data: Option<Value>,
}

impl CapturedResponse {
    /// Whether the body carries anything worth inspecting
    pub fn has_data(&self) -> bool {
        match &self.data {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
        }
    }
}

/// Produces captured responses for a page url
pub trait CaptureSource {
    fn capture(&self, url: &str) -> anyhow::Result<Vec<CapturedResponse>>;
}

/// Responses captured for one page, unique by url
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureLog {
    records: Vec<CapturedResponse>,
}

impl CaptureLog {
    /// Keep the first record seen for each url
    pub fn from_records(records: impl IntoIterator<Item = CapturedResponse>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut dropped = 0usize;

        for record in records {
            if seen.insert(record.url.clone()) {
                kept.push(record);
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            debug!(dropped, "dropped duplicate captured urls");
        }
        CaptureLog { records: kept }
    }

    /// Read a JSON array of captured records
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<CapturedResponse> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    /// Read either a capture log or, when `pasted_label` is given, one raw
    /// response subject to the paste size limit
    pub fn read_input<R: Read>(
        mut reader: R,
        pasted_label: Option<&str>,
        config: &InspectConfig,
    ) -> anyhow::Result<Self> {
        match pasted_label {
            Some(label) => {
                let mut text = String::new();
                reader
                    .read_to_string(&mut text)
                    .context("Failed to read pasted response")?;
                Ok(Self::from_pasted(label, &text, config)?)
            }
            None => Self::from_reader(reader).context("Failed to parse capture log"),
        }
    }

    /// Capture `url` through `source`
    pub fn capture<S: CaptureSource>(source: &S, url: &str) -> anyhow::Result<Self> {
        let target = normalize_target_url(url)?;
        let records = source.capture(&target)?;
        debug!(url = %target, responses = records.len(), "captured page");
        Ok(Self::from_records(records))
    }

    /// Wrap a response pasted by hand.
    ///
    /// The size limit is checked before any parsing happens.
    pub fn from_pasted(label: &str, text: &str, config: &InspectConfig) -> Result<Self> {
        if text.len() > config.max_input_bytes {
            warn!(size = text.len(), limit = config.max_input_bytes, "rejected oversized paste");
            return Err(ShapeError::InputTooLarge {
                size: text.len(),
                limit: config.max_input_bytes,
            });
        }

        let data: Value = serde_json::from_str(text)?;
        let label = label.trim();
        let url = if label.is_empty() { PASTED_LABEL } else { label };

        Ok(Self::from_records([CapturedResponse {
            url: url.to_string(),
            status: 200,
            method: String::from("PASTE"),
            data: Some(data),
        }]))
    }

    pub fn records(&self) -> &[CapturedResponse] {
        &self.records
    }

    pub fn urls(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.url.as_str()).collect()
    }

    /// Records whose body is present and non-empty
    pub fn with_data(&self) -> impl Iterator<Item = &CapturedResponse> {
        self.records.iter().filter(|r| r.has_data())
    }

    /// Url to inspect when the caller names none.
    ///
    /// A pasted log holds exactly the response the user supplied, so its url
    /// is returned even when the body is empty (`{}`, `[]`, `0`). A capture
    /// log falls back to the first record that carries a body.
    pub fn default_url(&self, pasted: bool) -> Option<&str> {
        let record = if pasted {
            self.records.first()
        } else {
            self.with_data().next()
        };
        record.map(|r| r.url.as_str())
    }

    /// Body of the first record captured for `url`
    pub fn response_for(&self, url: &str) -> Result<&Value> {
        self.records
            .iter()
            .find(|r| r.url == url)
            .and_then(|r| r.data.as_ref())
            .ok_or_else(|| ShapeError::not_found(Target::Response, url))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trim `url` and default its scheme to https
pub fn normalize_target_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ShapeError::EmptyUrl);
    }
    if url.starts_with("http") {
        Ok(url.to_string())
    } else {
        Ok(format!("https://{}", url))
    }
}
