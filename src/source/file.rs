//! Trade records from a local JSON dump.
//!
//! Accepts a JSON array, a `{"data": [...]}` wrapper, or newline-delimited
//! JSON. Files ending in `.gz` are decompressed transparently.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde_json::Value;

use crate::error::{Result, TrackerError};
use crate::models::TradeRecord;
use crate::source::TradeSource;

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(TrackerError::NotFound(format!(
                "Trade file {} does not exist",
                self.path.display()
            )));
        }

        let mut contents = String::new();
        if self.path.extension().and_then(|e| e.to_str()) == Some("gz") {
            let file = fs::File::open(&self.path)?;
            let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
            reader.read_to_string(&mut contents)?;
        } else {
            contents = fs::read_to_string(&self.path)?;
        }
        Ok(contents)
    }
}

impl TradeSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    fn fetch(&self) -> Result<Vec<TradeRecord>> {
        let contents = self.read_contents()?;
        let trimmed = contents.trim_start();

        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        if trimmed.starts_with('[') {
            return Ok(serde_json::from_str(trimmed)?);
        }

        // A whole-file object is either a `{"data": [...]}` wrapper or a
        // single record; anything else is read line by line.
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(mut map)) => match map.remove("data") {
                Some(data) => Ok(serde_json::from_value(data)?),
                None => Ok(vec![serde_json::from_value(Value::Object(map))?]),
            },
            _ => Ok(parse_ndjson(trimmed, &self.path)),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse newline-delimited records, skipping lines that do not parse.
fn parse_ndjson(contents: &str, path: &Path) -> Vec<TradeRecord> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(n, line)| match serde_json::from_str::<TradeRecord>(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    line = n + 1,
                    error = %e,
                    "skipping malformed trade record"
                );
                None
            }
        })
        .collect()
}
