//! Pipeline configuration
//!
//! Which stages run, and the sensor limits the raw range check uses.

use crate::{
    constants::sensors::{
        EC_SENSOR_MAX_US_CM, EC_SENSOR_MIN_US_CM, MOISTURE_SENSOR_MAX_PCT,
        MOISTURE_SENSOR_MIN_PCT, NPK_SENSOR_MAX_MG_KG, NPK_SENSOR_MIN_MG_KG, PH_SENSOR_MAX,
        PH_SENSOR_MIN, TEMP_SENSOR_MAX_C, TEMP_SENSOR_MIN_C,
    },
    errors::ProcessingError,
    reading::Measurement,
};

/// Closed interval for one measurement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limit {
    /// Lowest accepted value
    pub min: f32,
    /// Highest accepted value
    pub max: f32,
}

impl Limit {
    /// Interval from two bounds, swapped if given in the wrong order
    pub fn new(min: f32, max: f32) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// True when `value` lies inside the interval
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Raw-value limits of the probe
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorLimits {
    /// Soil temperature, °C
    pub temperature: Limit,
    /// Volumetric moisture, %
    pub humidity: Limit,
    /// Conductivity, µS/cm
    pub ec: Limit,
    /// pH
    pub ph: Limit,
    /// Shared by N, P and K, mg/kg
    pub nutrients: Limit,
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            temperature: Limit::new(TEMP_SENSOR_MIN_C, TEMP_SENSOR_MAX_C),
            humidity: Limit::new(MOISTURE_SENSOR_MIN_PCT, MOISTURE_SENSOR_MAX_PCT),
            ec: Limit::new(EC_SENSOR_MIN_US_CM, EC_SENSOR_MAX_US_CM),
            ph: Limit::new(PH_SENSOR_MIN, PH_SENSOR_MAX),
            nutrients: Limit::new(NPK_SENSOR_MIN_MG_KG, NPK_SENSOR_MAX_MG_KG),
        }
    }
}

impl SensorLimits {
    /// Limit for one measurement
    pub fn limit(&self, measurement: Measurement) -> Limit {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Humidity => self.humidity,
            Measurement::Ec => self.ec,
            Measurement::Ph => self.ph,
            Measurement::Nitrogen | Measurement::Phosphorus | Measurement::Potassium => {
                self.nutrients
            }
        }
    }

    /// `OutOfPhysicalRange` if the value lies outside its limit
    pub fn check(&self, measurement: Measurement, value: f32) -> Option<ProcessingError> {
        let limit = self.limit(measurement);
        if limit.contains(value) {
            None
        } else {
            Some(ProcessingError::OutOfPhysicalRange {
                measurement,
                value,
                min: limit.min,
                max: limit.max,
            })
        }
    }
}

/// Stage switches and limits for [`SoilPipeline`](super::SoilPipeline)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Check raw values against `limits`
    pub range_check: bool,
    /// Apply calibration tables
    pub calibration: bool,
    /// Raise a `CalibrationTableEmpty` alert per uncalibrated channel
    pub alert_uncalibrated: bool,
    /// Apply the EC, pH and NPK physical models
    pub compensation: bool,
    /// Apply environment and season factors
    pub context_adjustment: bool,
    /// Run the nutrient interaction analysis
    pub interactions: bool,
    /// Produce crop guidance and soil health
    pub crop_guidance: bool,
    /// Raw-value limits
    pub limits: SensorLimits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            range_check: true,
            calibration: true,
            alert_uncalibrated: false,
            compensation: true,
            context_adjustment: true,
            interactions: true,
            crop_guidance: true,
            limits: SensorLimits::default(),
        }
    }
}

impl PipelineConfig {
    /// Calibration and compensation only, no context or guidance
    pub fn minimal() -> Self {
        Self {
            context_adjustment: false,
            interactions: false,
            crop_guidance: false,
            ..Self::default()
        }
    }

    /// Raw values straight through; only the validity check remains
    pub fn passthrough() -> Self {
        Self {
            range_check: false,
            calibration: false,
            alert_uncalibrated: false,
            compensation: false,
            context_adjustment: false,
            interactions: false,
            crop_guidance: false,
            limits: SensorLimits::default(),
        }
    }
}
