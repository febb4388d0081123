//! Loading the latest-readings snapshot.
//!
//! A snapshot is always the full set of latest readings; it is replaced
//! wholesale on every load. Sources:
//!
//! - `http://` / `https://` URL returning a JSON array
//! - `.csv` file with a header row using the same field names
//! - any other path, read as a JSON array

use super::SensorReading;
use crate::constants::snapshot::{CONNECT_TIMEOUT_SECS, FETCH_TIMEOUT_SECS};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Load a snapshot from a file path or URL.
pub async fn load_snapshot(source: &str) -> Result<Vec<SensorReading>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return fetch_snapshot(source).await;
    }

    let path = Path::new(source);
    let body = tokio::fs::read(path).await.map_err(|e| Error::SnapshotRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        parse_csv_snapshot(path, &body)
    } else {
        let body = String::from_utf8_lossy(&body);
        parse_snapshot_json(&body)
    }
}

/// Parse a JSON array of reading objects.
///
/// Elements that are not objects or lack a module id are skipped with a
/// warning; the rest of the snapshot is still usable.
pub fn parse_snapshot_json(body: &str) -> Result<Vec<SensorReading>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| Error::SnapshotJson { source: e })?;

    let Value::Array(items) = value else {
        return Err(Error::UnexpectedSnapshotFormat {
            found: json_kind(&value).to_string(),
        });
    };

    let readings: Vec<SensorReading> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(fields) => reading_from_fields(index, fields),
            other => {
                warn!("Skipping snapshot entry {index}: expected object, got {}", json_kind(&other));
                None
            }
        })
        .collect();

    debug!("Parsed {} sensor reading(s) from JSON", readings.len());
    Ok(readings)
}

/// Parse a CSV snapshot read from `path`. Every cell is coerced like a JSON string would be.
fn parse_csv_snapshot(path: &Path, body: &[u8]) -> Result<Vec<SensorReading>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body);

    let mut readings = Vec::new();
    for (index, row) in reader.deserialize::<HashMap<String, String>>().enumerate() {
        let row = row.map_err(|e| Error::SnapshotCsv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let fields: Map<String, Value> = row
            .into_iter()
            .map(|(key, cell)| (key.trim_start_matches('\u{feff}').to_string(), Value::String(cell)))
            .collect();
        if let Some(reading) = reading_from_fields(index, fields) {
            readings.push(reading);
        }
    }

    debug!("Parsed {} sensor reading(s) from {}", readings.len(), path.display());
    Ok(readings)
}

async fn fetch_snapshot(url: &str) -> Result<Vec<SensorReading>> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Internal {
            message: format!("Failed to create HTTP client: {e}"),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::SnapshotFetch {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    if !response.status().is_success() {
        return Err(Error::SnapshotFetch {
            url: url.to_string(),
            source: format!("HTTP {}", response.status()).into(),
        });
    }

    let body = response.text().await.map_err(|e| Error::SnapshotFetch {
        url: url.to_string(),
        source: Box::new(e),
    })?;

    parse_snapshot_json(&body)
}

fn reading_from_fields(index: usize, fields: Map<String, Value>) -> Option<SensorReading> {
    match SensorReading::try_from(fields) {
        Ok(reading) => Some(reading),
        Err(e) => {
            warn!("Skipping snapshot entry {index}: {e}");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
