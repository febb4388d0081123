//! Sensor reading record and field coercion.
//!
//! Readings arrive as loosely typed objects: numbers may be strings,
//! fields may be null or missing, and new sensor types add fields the
//! schema does not know about. Coercion rules:
//!
//! - measurements default to `0.0` when missing, null, or non-numeric
//! - coordinates stay `None` rather than defaulting
//! - unknown numeric fields are kept in [`SensorReading::extra`]

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field names recognised as the module identifier.
const MODULE_ID_KEYS: &[&str] = &["moduleid", "moduleId", "module_id"];

/// Field names recognised as the location display name.
const LOCATION_KEYS: &[&str] = &["ecohub_location", "location"];

/// Latest snapshot of one monitoring module.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct SensorReading {
    /// Stable module identifier.
    #[serde(rename = "moduleid")]
    pub module_id: String,
    /// Location display name.
    #[serde(rename = "ecohub_location")]
    pub location: Option<String>,
    /// Longitude in degrees, `None` without a GPS fix.
    pub lon: Option<f64>,
    /// Latitude in degrees, `None` without a GPS fix.
    pub lat: Option<f64>,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub relative_humidity: f64,
    /// VOC index.
    pub voc: f64,
    /// NOx index.
    pub nox: f64,
    /// PM1.0 concentration in µg/m³.
    pub pm1: f64,
    /// PM2.5 concentration in µg/m³.
    pub pm25: f64,
    /// PM4.0 concentration in µg/m³.
    pub pm4: f64,
    /// PM10 concentration in µg/m³.
    pub pm10: f64,
    /// Time of the reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Additional numeric measurements not covered by the fixed fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

/// Reasons a raw object cannot become a [`SensorReading`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadingError {
    /// No module identifier field was present.
    #[error("reading has no module id")]
    MissingModuleId,
}

impl SensorReading {
    /// Create a reading with the given id and coordinates and zeroed measurements.
    pub fn new(module_id: impl Into<String>, lon: Option<f64>, lat: Option<f64>) -> Self {
        Self {
            module_id: module_id.into(),
            location: None,
            lon,
            lat,
            temperature: 0.0,
            relative_humidity: 0.0,
            voc: 0.0,
            nox: 0.0,
            pm1: 0.0,
            pm25: 0.0,
            pm4: 0.0,
            pm10: 0.0,
            timestamp: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the location name.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Both coordinates, when present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Some((lon, lat)),
            _ => None,
        }
    }

    /// Look up a measurement by field name, including extension fields.
    pub fn measurement(&self, name: &str) -> Option<f64> {
        match name {
            "temperature" => Some(self.temperature),
            "relative_humidity" => Some(self.relative_humidity),
            "voc" => Some(self.voc),
            "nox" => Some(self.nox),
            "pm1" => Some(self.pm1),
            "pm25" => Some(self.pm25),
            "pm4" => Some(self.pm4),
            "pm10" => Some(self.pm10),
            other => self.extra.get(other).copied(),
        }
    }
}

impl TryFrom<Map<String, Value>> for SensorReading {
    type Error = ReadingError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let module_id = take_first(&mut fields, MODULE_ID_KEYS)
            .and_then(|v| coerce_string(&v))
            .ok_or(ReadingError::MissingModuleId)?;
        let location = take_first(&mut fields, LOCATION_KEYS).and_then(|v| coerce_string(&v));

        let mut measurement = |key: &str| {
            fields
                .remove(key)
                .and_then(|v| coerce_f64(&v))
                .unwrap_or(0.0)
        };

        let mut reading = Self {
            module_id,
            location,
            lon: None,
            lat: None,
            temperature: measurement("temperature"),
            relative_humidity: measurement("relative_humidity"),
            voc: measurement("voc"),
            nox: measurement("nox"),
            pm1: measurement("pm1"),
            pm25: measurement("pm25"),
            pm4: measurement("pm4"),
            pm10: measurement("pm10"),
            timestamp: None,
            extra: BTreeMap::new(),
        };

        reading.lon = fields.remove("lon").and_then(|v| coerce_f64(&v));
        reading.lat = fields.remove("lat").and_then(|v| coerce_f64(&v));
        reading.timestamp = fields.remove("timestamp").and_then(|v| coerce_timestamp(&v));

        for (key, value) in fields {
            if let Some(number) = coerce_f64(&value) {
                reading.extra.insert(key, number);
            }
        }

        Ok(reading)
    }
}

fn take_first(fields: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for key in keys {
        if let Some(value) = fields.remove(*key)
            && found.is_none()
            && !value.is_null()
        {
            found = Some(value);
        }
    }
    found
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value to a finite number.
///
/// Numeric strings are parsed, booleans map to 1/0, and everything else
/// (including NaN and infinities) yields `None`.
fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> SensorReading {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_measurements_default_to_zero() {
        let reading = parse(json!({ "moduleid": "m-1", "temperature": null, "voc": "n/a" }));
        assert_eq!(reading.temperature, 0.0);
        assert_eq!(reading.voc, 0.0);
        assert_eq!(reading.pm25, 0.0);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let reading = parse(json!({
            "moduleid": "m-1",
            "temperature": "21.5",
            "lat": "42.34",
            "lon": -71.09
        }));
        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.coordinates(), Some((-71.09, 42.34)));
    }

    #[test]
    fn test_null_coordinates_stay_none() {
        let reading = parse(json!({ "moduleid": "m-1", "lat": null, "lon": "east" }));
        assert_eq!(reading.lat, None);
        assert_eq!(reading.lon, None);
        assert_eq!(reading.coordinates(), None);
    }

    #[test]
    fn test_zero_coordinate_is_valid() {
        let reading = parse(json!({ "moduleid": "m-1", "lat": 0, "lon": 0 }));
        assert_eq!(reading.coordinates(), Some((0.0, 0.0)));
    }

    #[test]
    fn test_location_and_id_aliases() {
        let reading = parse(json!({ "moduleId": 17, "location": "ISEC Terrace" }));
        assert_eq!(reading.module_id, "17");
        assert_eq!(reading.location.as_deref(), Some("ISEC Terrace"));
    }

    #[test]
    fn test_missing_module_id_is_rejected() {
        let result = serde_json::from_value::<SensorReading>(json!({ "lat": 1.0 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_numeric_fields_go_to_extra() {
        let reading = parse(json!({
            "moduleid": "m-1",
            "co2": "415",
            "firmware": "v1.2.3"
        }));
        assert_eq!(reading.extra.get("co2"), Some(&415.0));
        assert!(!reading.extra.contains_key("firmware"));
        assert_eq!(reading.measurement("co2"), Some(415.0));
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = parse(json!({ "moduleid": "a", "timestamp": "2024-05-01T12:00:00Z" }));
        let millis = parse(json!({ "moduleid": "b", "timestamp": "1714564800000" }));
        let sql = parse(json!({ "moduleid": "c", "timestamp": "2024-05-01 12:00:00" }));
        let junk = parse(json!({ "moduleid": "d", "timestamp": "yesterday" }));

        assert_eq!(rfc.timestamp, millis.timestamp);
        assert_eq!(rfc.timestamp, sql.timestamp);
        assert!(junk.timestamp.is_none());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let reading = SensorReading::new("m-1", Some(1.0), Some(2.0)).with_location("Quad");
        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(value["moduleid"], "m-1");
        assert_eq!(value["ecohub_location"], "Quad");
    }
}
