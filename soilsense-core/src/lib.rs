//! Core processing pipeline for SoilSense
//!
//! Turns raw samples from a 7-in-1 soil probe (temperature, moisture, EC,
//! pH, N, P, K) into calibrated, physically compensated values with
//! agronomic guidance.
//!
//! Key constraints:
//! - Runs on microcontrollers (`no_std`, no heap in the hot path)
//! - Every cycle produces a result, configuration mistakes degrade gracefully
//! - Coefficient tables are compiled-in statics
//!
//! ```
//! use soilsense_core::{
//!     CalibrationSet, GrowingEnvironment, ProcessingContext, Season, SensorReading,
//!     SoilPipeline, SoilType,
//! };
//!
//! let pipeline = SoilPipeline::new();
//! let reading = SensorReading::new(24.0, 40.0, 1800.0, 6.2, 180.0, 70.0, 260.0, 1_000);
//! let context = ProcessingContext::new(
//!     SoilType::Loam,
//!     GrowingEnvironment::Greenhouse,
//!     Season::Summer,
//!     "tomato",
//! );
//!
//! let bundle = pipeline.process(&reading, &CalibrationSet::new(), &context);
//! assert!(!bundle.is_degraded());
//! assert!(!bundle.crop_recommendations.is_empty());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod calibration;
pub mod compensation;
pub mod constants;
pub mod context;
pub mod crop;
pub mod environment;
pub mod errors;
pub mod interaction;
pub mod pipeline;
pub mod reading;
pub mod rules;
pub mod season;
pub mod soil;
pub mod traits;

// Public API
pub use calibration::{
    CalibrationEngine, CalibrationPoint, CalibrationSet, CalibrationStatus, CalibrationTable,
};
#[cfg(feature = "std")]
pub use calibration::CalibrationStore;
pub use compensation::CompensationEngine;
pub use context::{ContextAdjustmentEngine, ProcessingContext};
pub use crop::{Crop, CropProfile, CropRecommendationEngine, HealthGrade, SoilHealth};
pub use environment::GrowingEnvironment;
pub use errors::{ProcessingError, ProcessingResult};
pub use interaction::NutrientInteractionAnalyzer;
pub use pipeline::{BundleStatus, PipelineConfig, ResultBundle, SensorLimits, SoilPipeline};
pub use reading::{CompensatedReading, Measurement, MeasurementSet, SensorReading};
pub use rules::Guidance;
pub use season::Season;
pub use soil::{SoilProfile, SoilType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
