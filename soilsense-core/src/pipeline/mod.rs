//! Soil Processing Pipeline
//!
//! ## Overview
//!
//! One call to [`SoilPipeline::process`] runs a full sampling cycle:
//!
//! ```text
//! SensorReading
//!      │  validity + range check ──────────────► alerts
//!      ▼
//! CalibrationEngine      (per-channel tables)
//!      ▼
//! CompensationEngine     (soil profile: EC, pH, NPK models)
//!      ▼
//! ContextAdjustmentEngine (environment offsets, season factors)
//!      ├──► NutrientInteractionAnalyzer ──► interactions
//!      └──► CropRecommendationEngine ─────► crop_recommendations, health
//!      ▼
//! ResultBundle
//! ```
//!
//! ## Contract
//!
//! `process` always returns a bundle. Nothing in a cycle is fatal:
//!
//! - An invalid reading (driver flag or NaN) yields a degraded bundle with
//!   only the raw values and an `InvalidReading` alert.
//! - Out-of-range raw values raise alerts and processing continues.
//! - Unknown soil, environment, season or crop ids fall back to neutral
//!   defaults, each with an alert and a status flag.
//! - Measurements the environment cannot support are marked unavailable,
//!   never zeroed.
//!
//! The engines are stateless. The calibration set is the only mutable input;
//! with `std` it can live in a [`CalibrationStore`] and
//! [`SoilPipeline::process_with_store`] takes one snapshot per cycle.
//!
//! ## Module Organization
//!
//! - `config` - stage switches and sensor limits
//! - `builder` - chained construction
//! - `bundle` - the cycle result and its status flags

mod builder;
mod bundle;
mod config;

pub use builder::PipelineBuilder;
pub use bundle::{BundleStatus, ResultBundle};
pub use config::{Limit, PipelineConfig, SensorLimits};

#[cfg(feature = "std")]
use crate::calibration::CalibrationStore;
use crate::{
    calibration::{CalibrationEngine, CalibrationSet},
    compensation::CompensationEngine,
    context::{ContextAdjustmentEngine, ProcessingContext},
    crop::CropRecommendationEngine,
    errors::ProcessingError,
    interaction::NutrientInteractionAnalyzer,
    reading::{CompensatedReading, Measurement, MeasurementSet, SensorReading, StageFlags},
    rules::Guidance,
    soil,
    traits::Stage,
};

/// Runs the processing stages in order
#[derive(Debug, Clone, Default)]
pub struct SoilPipeline {
    config: PipelineConfig,
    calibration: CalibrationEngine,
    compensation: CompensationEngine,
    context: ContextAdjustmentEngine,
    interactions: NutrientInteractionAnalyzer,
    crops: CropRecommendationEngine,
}

impl SoilPipeline {
    /// Pipeline with every stage enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with the given configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Start a [`PipelineBuilder`]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one reading
    pub fn process(
        &self,
        reading: &SensorReading,
        calibration: &CalibrationSet,
        context: &ProcessingContext<'_>,
    ) -> ResultBundle {
        let mut bundle = ResultBundle::new(*reading);

        if !reading.is_usable() {
            log_warn!("reading at {} invalid, returning raw values only", reading.timestamp);
            bundle.alert(ProcessingError::InvalidReading);
            return bundle;
        }

        if self.config.range_check {
            for m in Measurement::ALL {
                if let Some(err) = self.config.limits.check(m, reading.get(m)) {
                    log_warn!("{}", err);
                    bundle.alert(err);
                }
            }
        }

        let (resolved, fallbacks) = context.resolve();
        for err in fallbacks {
            bundle.alert(err);
        }

        let calibrated = if self.config.calibration {
            let (calibrated, uncalibrated) = self.calibration.calibrate(reading, calibration);
            bundle.uncalibrated = uncalibrated;
            calibrated
        } else {
            *reading
        };
        if !bundle.uncalibrated.is_empty() {
            bundle.status.set(BundleStatus::UNCALIBRATED);
            if self.config.alert_uncalibrated {
                for measurement in bundle.uncalibrated.iter() {
                    bundle.alert(ProcessingError::CalibrationTableEmpty { measurement });
                }
            }
        }

        let mut current = if self.config.compensation {
            self.compensation.compensate(&calibrated, resolved.soil)
        } else {
            CompensatedReading::from_reading(&calibrated)
        };
        if bundle.uncalibrated != MeasurementSet::all() {
            current.stages.set(StageFlags::CALIBRATED);
        }

        if self.config.context_adjustment {
            current = self.context.adjust_with(&current, resolved.environment, resolved.season);
            for measurement in current.unavailable.iter() {
                bundle.alert(ProcessingError::IncompatibleMeasurement {
                    measurement,
                    environment: resolved.environment.environment,
                });
            }
        }

        let soil_type = resolved.soil.soil;
        if self.config.interactions {
            bundle.interactions = self.interactions.analyze(&current, soil_type);
            bundle.effective_uptake = self.interactions.uptake(&current);
            note_truncation(&mut bundle.status, &bundle.interactions);
        }

        if self.config.crop_guidance {
            bundle.crop_recommendations = self.crops.recommend(&current, resolved.crop, soil_type);
            note_truncation(&mut bundle.status, &bundle.crop_recommendations);
            if !current.available().is_empty() {
                bundle.health = resolved.crop.map(|crop| self.crops.health(&current, crop, soil_type));
            }
        }

        bundle.available_moisture = current
            .get(Measurement::Humidity)
            .map(|vwc| soil::vwc_to_asm(vwc, resolved.soil));
        bundle.compensated = current;

        log_debug!(
            "cycle {} done: {} alert(s), stages {:#05b}, status {:#06x} ({} {} {} {} {})",
            reading.timestamp,
            bundle.alerts.len(),
            bundle.compensated.stages.bits(),
            bundle.status.bits(),
            self.calibration.name(),
            self.compensation.name(),
            self.context.name(),
            self.interactions.name(),
            self.crops.name()
        );
        bundle
    }

    /// Process one reading against a snapshot of the store
    #[cfg(feature = "std")]
    pub fn process_with_store(
        &self,
        reading: &SensorReading,
        store: &CalibrationStore,
        context: &ProcessingContext<'_>,
    ) -> ResultBundle {
        let snapshot = store.snapshot();
        self.process(reading, &snapshot, context)
    }
}

fn note_truncation(status: &mut BundleStatus, guidance: &Guidance) {
    if guidance.is_truncated() {
        status.set(BundleStatus::GUIDANCE_TRUNCATED);
    }
}
