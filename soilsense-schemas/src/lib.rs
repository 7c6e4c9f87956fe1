//! Documents Exchanged With the Outside World
//!
//! ## Overview
//!
//! `soilsense-core` works on fixed-size, allocation-free types. Everything
//! that leaves the device or comes back from an operator goes through this
//! crate instead, as plain JSON or CSV:
//!
//! - [`ResultRecord`]: the JSON view of one
//!   [`ResultBundle`](soilsense_core::ResultBundle). Unavailable values are
//!   `null`, never `0`.
//! - [`CalibrationDocument`]: the persisted calibration tables, loaded and
//!   saved as JSON and imported/exported as CSV.
//! - [`ContextDocument`]: the processing context written with names
//!   (`"loam"`, `"greenhouse"`) instead of table ids.
//! - [`MeasurementInfo`]: name, unit and sensor range of each channel, for
//!   display layers.
//!
//! ## Validation
//!
//! Documents are only shapes. Converting them into core types goes through
//! the same constructors the pipeline uses, so a calibration document that
//! loads is a calibration set the pipeline accepts:
//!
//! ```rust
//! use soilsense_schemas::CalibrationDocument;
//!
//! let csv = "sensor_type,raw_value,reference_value\n\
//!            ph,4.20,4.01\n\
//!            ph,7.00,6.86\n";
//! let doc = CalibrationDocument::from_csv(csv)?;
//! let set = doc.to_set()?;
//! assert_eq!(set.get(soilsense_core::Measurement::Ph).len(), 2);
//! # Ok::<(), soilsense_schemas::SchemaError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod calibration;
pub mod context;
pub mod measurement;
pub mod record;

pub use calibration::CalibrationDocument;
pub use context::ContextDocument;
pub use measurement::MeasurementInfo;
pub use record::{MeasurementValues, ResultRecord};

use soilsense_core::{Measurement, ProcessingError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Document errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum SchemaError {
    /// Malformed JSON or a JSON shape that does not match the document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV line
    #[error("CSV line {line}: {reason}")]
    Csv {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Name that does not match any known entry
    #[error("Unknown {kind} name {name:?}")]
    UnknownName {
        /// Kind of entry looked up ("soil", "season", ...)
        kind: &'static str,
        /// Name as given
        name: String,
    },

    /// Table id that does not match any known entry
    #[error("Unknown {kind} id {id}")]
    UnknownId {
        /// Kind of entry looked up
        kind: &'static str,
        /// Id as given
        id: u8,
    },

    /// Calibration table rejected by the core validation
    #[error("Calibration for {measurement} rejected: {source}")]
    Calibration {
        /// Channel whose table was rejected
        measurement: Measurement,
        /// Reason from the core
        source: ProcessingError,
    },
}
