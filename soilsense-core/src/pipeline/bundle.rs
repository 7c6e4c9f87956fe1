//! Result bundle produced by every cycle

use heapless::Vec;

use crate::{
    constants::buffers::MAX_ALERTS,
    crop::SoilHealth,
    errors::ProcessingError,
    reading::{CompensatedReading, MeasurementSet, Npk, SensorReading},
    rules::Guidance,
};

/// Summary flags for a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleStatus(u16);

impl BundleStatus {
    /// Reading invalid, only `raw` is meaningful
    pub const DEGRADED: u16 = 1 << 0;
    /// At least one channel had no calibration table
    pub const UNCALIBRATED: u16 = 1 << 1;
    /// At least one raw value outside the sensor limits
    pub const OUT_OF_RANGE: u16 = 1 << 2;
    /// Unknown soil id, loam used
    pub const SOIL_FALLBACK: u16 = 1 << 3;
    /// Unknown environment id, open soil used
    pub const ENVIRONMENT_FALLBACK: u16 = 1 << 4;
    /// Unknown season id, identity factors used
    pub const SEASON_FALLBACK: u16 = 1 << 5;
    /// Unknown crop id, no crop guidance
    pub const CROP_UNKNOWN: u16 = 1 << 6;
    /// Environment could not support some measurements
    pub const MEASUREMENTS_UNAVAILABLE: u16 = 1 << 7;
    /// A guidance list ran out of capacity
    pub const GUIDANCE_TRUNCATED: u16 = 1 << 8;
    /// The alert list ran out of capacity
    pub const ALERTS_TRUNCATED: u16 = 1 << 9;

    /// Every flag with its name, in bit order
    pub const NAMES: [(u16, &'static str); 10] = [
        (Self::DEGRADED, "degraded"),
        (Self::UNCALIBRATED, "uncalibrated"),
        (Self::OUT_OF_RANGE, "out_of_range"),
        (Self::SOIL_FALLBACK, "soil_fallback"),
        (Self::ENVIRONMENT_FALLBACK, "environment_fallback"),
        (Self::SEASON_FALLBACK, "season_fallback"),
        (Self::CROP_UNKNOWN, "crop_unknown"),
        (Self::MEASUREMENTS_UNAVAILABLE, "measurements_unavailable"),
        (Self::GUIDANCE_TRUNCATED, "guidance_truncated"),
        (Self::ALERTS_TRUNCATED, "alerts_truncated"),
    ];

    /// No flag set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set a flag
    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }

    /// Check a flag
    pub const fn contains(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    /// True when nothing was flagged
    pub const fn is_clean(&self) -> bool {
        self.0 == 0
    }

    /// Raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Names of the set flags
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }

    /// Flag implied by an alert
    pub(crate) fn for_error(err: &ProcessingError) -> u16 {
        match err {
            ProcessingError::InvalidReading => Self::DEGRADED,
            ProcessingError::OutOfPhysicalRange { .. } => Self::OUT_OF_RANGE,
            ProcessingError::UnknownSoilType { .. } => Self::SOIL_FALLBACK,
            ProcessingError::UnknownEnvironment { .. } => Self::ENVIRONMENT_FALLBACK,
            ProcessingError::UnknownSeason { .. } => Self::SEASON_FALLBACK,
            ProcessingError::UnknownCropId => Self::CROP_UNKNOWN,
            ProcessingError::IncompatibleMeasurement { .. } => Self::MEASUREMENTS_UNAVAILABLE,
            ProcessingError::CalibrationTableEmpty { .. } => Self::UNCALIBRATED,
            ProcessingError::InvalidCalibration { .. }
            | ProcessingError::TooManyCalibrationPoints { .. }
            | ProcessingError::CalibrationOutOfRange { .. } => 0,
        }
    }
}

/// Everything one cycle produced
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResultBundle {
    /// Reading as received
    pub raw: SensorReading,
    /// Final values after every enabled stage
    pub compensated: CompensatedReading,
    /// Nutrient antagonism guidance
    pub interactions: Guidance,
    /// NPK left for uptake after antagonism losses, when pH and NPK are known
    pub effective_uptake: Option<Npk>,
    /// Crop guidance, empty without a crop
    pub crop_recommendations: Guidance,
    /// Problems met during the cycle, in the order they occurred
    pub alerts: Vec<ProcessingError, MAX_ALERTS>,
    /// Summary flags
    pub status: BundleStatus,
    /// Channels that passed through calibration unchanged
    pub uncalibrated: MeasurementSet,
    /// Soil health against the crop optimum
    pub health: Option<SoilHealth>,
    /// Available soil moisture, % of field capacity
    pub available_moisture: Option<f32>,
}

impl ResultBundle {
    /// Bundle holding only the raw reading
    pub fn new(raw: SensorReading) -> Self {
        Self {
            raw,
            compensated: CompensatedReading::from_reading(&raw),
            interactions: Guidance::new(),
            effective_uptake: None,
            crop_recommendations: Guidance::new(),
            alerts: Vec::new(),
            status: BundleStatus::empty(),
            uncalibrated: MeasurementSet::all(),
            health: None,
            available_moisture: None,
        }
    }

    /// Record an alert and the status flag it implies
    pub fn alert(&mut self, err: ProcessingError) {
        self.status.set(BundleStatus::for_error(&err));
        if self.alerts.push(err).is_err() {
            if !self.status.contains(BundleStatus::ALERTS_TRUNCATED) {
                log_warn!("alert list full, dropping: {}", err);
            }
            self.status.set(BundleStatus::ALERTS_TRUNCATED);
        }
    }

    /// True when the reading was rejected
    pub fn is_degraded(&self) -> bool {
        self.status.contains(BundleStatus::DEGRADED)
    }

    /// True if an alert of the same kind was recorded
    pub fn has_alert(&self, err: &ProcessingError) -> bool {
        self.alerts
            .iter()
            .any(|a| core::mem::discriminant(a) == core::mem::discriminant(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Measurement;

    #[test]
    fn status_names_in_bit_order() {
        let mut status = BundleStatus::empty();
        assert!(status.is_clean());
        status.set(BundleStatus::CROP_UNKNOWN);
        status.set(BundleStatus::DEGRADED);
        let names: Vec<&str, 10> = status.names().collect();
        assert_eq!(names.as_slice(), &["degraded", "crop_unknown"]);
    }

    #[test]
    fn alerts_set_flags() {
        let mut bundle = ResultBundle::new(SensorReading::default());
        bundle.alert(ProcessingError::UnknownSeason { id: 7 });
        bundle.alert(ProcessingError::IncompatibleMeasurement {
            measurement: Measurement::Nitrogen,
            environment: crate::environment::GrowingEnvironment::Hydroponics,
        });
        assert!(bundle.status.contains(BundleStatus::SEASON_FALLBACK));
        assert!(bundle.status.contains(BundleStatus::MEASUREMENTS_UNAVAILABLE));
        assert!(bundle.has_alert(&ProcessingError::UnknownSeason { id: 0 }));
        assert!(!bundle.is_degraded());
    }

    #[test]
    fn alert_overflow_is_flagged() {
        let mut bundle = ResultBundle::new(SensorReading::default());
        for _ in 0..MAX_ALERTS + 3 {
            bundle.alert(ProcessingError::UnknownCropId);
        }
        assert_eq!(bundle.alerts.len(), MAX_ALERTS);
        assert!(bundle.status.contains(BundleStatus::ALERTS_TRUNCATED));
    }
}
