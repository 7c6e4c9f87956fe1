//! Error Types for Soil Processing Failures
//!
//! ## Design Philosophy
//!
//! The pipeline's external contract is "every cycle produces a bundle", so
//! these errors are never thrown at the caller. Each stage recovers locally
//! and records what happened as an alert inside the
//! [`ResultBundle`](crate::pipeline::ResultBundle):
//!
//! 1. **Small Size**: variants carry only scalars and `&'static str` so the
//!    enum is `Copy` and fits in a fixed-capacity alert buffer.
//!
//! 2. **No Heap Allocation**: nothing in here allocates, which keeps the
//!    alert list usable without `std`.
//!
//! 3. **Actionable Information**: each variant names the measurement or the
//!    configuration id that triggered it.
//!
//! ## Error Categories
//!
//! ### Reading Problems
//! - `InvalidReading`: the sensor driver flagged the sample (or it contained NaN)
//! - `OutOfPhysicalRange`: a value lies outside the sensor's documented range
//!
//! ### Configuration Problems
//! - `UnknownSoilType`, `UnknownCropId`, `UnknownSeason`, `UnknownEnvironment`
//!
//! Each has a neutral fallback: LOAM soil, no crop guidance, identity
//! environment and season factors.
//!
//! ### Capability and Calibration
//! - `IncompatibleMeasurement`: the growing environment cannot support a field
//! - `CalibrationTableEmpty`: informational, the value passes through uncalibrated
//! - `InvalidCalibration`, `TooManyCalibrationPoints`, `CalibrationOutOfRange`:
//!   rejected calibration tables, reported to the calibration workflow
//!
//! ## Handling Strategy
//!
//! ```rust
//! use soilsense_core::{ProcessingError, soil};
//!
//! let profile = match soil::lookup(42) {
//!     Ok(profile) => profile,
//!     Err(ProcessingError::UnknownSoilType { .. }) => soil::SoilType::Loam.profile(),
//!     Err(_) => unreachable!(),
//! };
//! assert_eq!(profile.soil, soil::SoilType::Loam);
//! ```

use thiserror_no_std::Error;

use crate::environment::GrowingEnvironment;
use crate::reading::Measurement;

/// Result type for processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Processing errors - kept small so alert lists stay fixed-size
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ProcessingError {
    /// Reading flagged invalid by the sensor driver
    #[error("Reading flagged invalid by the sensor driver")]
    InvalidReading,

    /// Value outside the sensor's documented physical range
    #[error("{measurement} value {value} outside sensor range [{min}, {max}]")]
    OutOfPhysicalRange {
        /// Offending measurement
        measurement: Measurement,
        /// Raw value as reported
        value: f32,
        /// Lower sensor limit
        min: f32,
        /// Upper sensor limit
        max: f32,
    },

    /// Soil profile id outside 0..=12
    #[error("Unknown soil type id {id}, using loam")]
    UnknownSoilType {
        /// Requested id
        id: u8,
    },

    /// Crop identifier not present in the crop table
    #[error("Unknown crop identifier, crop guidance disabled")]
    UnknownCropId,

    /// Season id outside 0..=3
    #[error("Unknown season id {id}, seasonal factors disabled")]
    UnknownSeason {
        /// Requested id
        id: u8,
    },

    /// Growing environment id outside 0..=4
    #[error("Unknown growing environment id {id}, using soil")]
    UnknownEnvironment {
        /// Requested id
        id: u8,
    },

    /// Environment does not support this measurement
    #[error("{measurement} unavailable in {environment} environment")]
    IncompatibleMeasurement {
        /// Measurement marked unavailable
        measurement: Measurement,
        /// Environment that cannot support it
        environment: GrowingEnvironment,
    },

    /// No calibration points for a measurement
    #[error("No calibration points for {measurement}")]
    CalibrationTableEmpty {
        /// Uncalibrated measurement
        measurement: Measurement,
    },

    /// Calibration table structurally invalid
    #[error("Invalid calibration table: {reason}")]
    InvalidCalibration {
        /// What is wrong with the table
        reason: &'static str,
    },

    /// More points than the measurement supports
    #[error("{count} calibration points for {measurement}, at most {max} allowed")]
    TooManyCalibrationPoints {
        /// Measurement being calibrated
        measurement: Measurement,
        /// Points supplied
        count: usize,
        /// Points allowed
        max: usize,
    },

    /// Reference value outside what a calibration standard can provide
    #[error("Calibration reference {value} out of range for {measurement}")]
    CalibrationOutOfRange {
        /// Measurement being calibrated
        measurement: Measurement,
        /// Offending reference value
        value: f32,
    },
}

impl ProcessingError {
    /// True for errors raised by bad configuration ids
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownSoilType { .. }
                | Self::UnknownCropId
                | Self::UnknownSeason { .. }
                | Self::UnknownEnvironment { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(ProcessingError::UnknownSoilType { id: 20 }.is_configuration());
        assert!(ProcessingError::UnknownCropId.is_configuration());
        assert!(!ProcessingError::InvalidReading.is_configuration());
    }

    #[cfg(feature = "std")]
    #[test]
    fn messages_name_the_measurement() {
        let err = ProcessingError::OutOfPhysicalRange {
            measurement: Measurement::Ph,
            value: 11.0,
            min: 3.0,
            max: 9.0,
        };
        assert_eq!(err.to_string(), "ph value 11 outside sensor range [3, 9]");

        let err = ProcessingError::IncompatibleMeasurement {
            measurement: Measurement::Nitrogen,
            environment: GrowingEnvironment::Hydroponics,
        };
        assert_eq!(err.to_string(), "nitrogen unavailable in hydroponics environment");

        let err = ProcessingError::InvalidCalibration { reason: "duplicate measured value" };
        assert_eq!(err.to_string(), "Invalid calibration table: duplicate measured value");
    }
}
