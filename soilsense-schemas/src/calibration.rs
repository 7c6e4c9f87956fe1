//! Calibration persistence
//!
//! Tables are stored per channel as ordered `(expected, measured)` lists.
//! JSON is the storage format:
//!
//! ```json
//! { "version": 1, "tables": { "ph": [ { "expected": 4.01, "measured": 4.2 } ] } }
//! ```
//!
//! CSV is the exchange format for spreadsheets, one point per line under
//! the header `sensor_type,raw_value,reference_value`, where `raw_value` is
//! what the probe reported and `reference_value` the standard's value.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use soilsense_core::{
    calibration::{CalibrationPoint, CalibrationSet, CalibrationTable},
    Measurement,
};

use crate::SchemaError;

/// CSV header line
pub const CSV_HEADER: &str = "sensor_type,raw_value,reference_value";

/// Current document format
pub const FORMAT_VERSION: u32 = 1;

fn format_version() -> u32 {
    FORMAT_VERSION
}

/// Calibration tables of one probe, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationDocument {
    /// Document format
    #[serde(default = "format_version")]
    pub version: u32,
    /// Points per channel in `measured` order; missing channels are uncalibrated
    #[serde(default)]
    pub tables: BTreeMap<Measurement, Vec<CalibrationPoint>>,
}

impl Default for CalibrationDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationDocument {
    /// Document without tables
    pub fn new() -> Self {
        Self { version: FORMAT_VERSION, tables: BTreeMap::new() }
    }

    /// Append a point to a channel
    pub fn push(&mut self, measurement: Measurement, point: CalibrationPoint) {
        self.tables.entry(measurement).or_default().push(point);
    }

    /// Points stored for a channel
    pub fn points(&self, measurement: Measurement) -> &[CalibrationPoint] {
        self.tables.get(&measurement).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no channel has points
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }

    /// Document holding every non-empty table of a set
    pub fn from_set(set: &CalibrationSet) -> Self {
        let mut doc = Self::new();
        for m in Measurement::ALL {
            let points = set.get(m).points();
            if !points.is_empty() {
                doc.tables.insert(m, points.to_vec());
            }
        }
        doc
    }

    /// Validate every table and build the set the pipeline uses
    ///
    /// Each channel goes through
    /// [`CalibrationTable::for_measurement`], so point limits, reference
    /// ranges and ordering are enforced exactly as on the device. The
    /// first rejected channel fails the whole document.
    pub fn to_set(&self) -> Result<CalibrationSet, SchemaError> {
        let mut set = CalibrationSet::new();
        for (&measurement, points) in &self.tables {
            let table = CalibrationTable::for_measurement(measurement, points)
                .map_err(|source| SchemaError::Calibration { measurement, source })?;
            set.set(measurement, table);
        }
        Ok(set)
    }

    /// Parse a stored document
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for storage
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import from CSV
    ///
    /// The header is required. Blank lines are skipped; anything else that
    /// is not `name,number,number` is an error naming the line.
    pub fn from_csv(csv: &str) -> Result<Self, SchemaError> {
        let mut lines = csv.lines().enumerate();

        match lines.next() {
            Some((_, header)) if header.trim() == CSV_HEADER => {}
            _ => return Err(SchemaError::Csv { line: 1, reason: "missing header" }),
        }

        let mut doc = Self::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(',').map(str::trim);
            let (Some(name), Some(raw), Some(reference), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(SchemaError::Csv { line: line_no, reason: "expected three fields" });
            };

            let measurement = Measurement::from_name(name).ok_or_else(|| SchemaError::UnknownName {
                kind: "measurement",
                name: name.to_string(),
            })?;
            let measured = parse_number(raw, line_no)?;
            let expected = parse_number(reference, line_no)?;

            doc.push(measurement, CalibrationPoint::new(expected, measured));
        }
        Ok(doc)
    }

    /// Export to CSV in channel order
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for (measurement, points) in &self.tables {
            for p in points {
                // writing to a String cannot fail
                let _ = writeln!(csv, "{},{},{}", measurement, p.measured, p.expected);
            }
        }
        csv
    }
}

fn parse_number(field: &str, line: usize) -> Result<f32, SchemaError> {
    match field.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SchemaError::Csv { line, reason: "invalid number" }),
    }
}
