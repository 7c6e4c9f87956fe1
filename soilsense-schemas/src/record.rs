//! JSON view of a result bundle
//!
//! A [`ResultRecord`] carries everything a
//! [`ResultBundle`] holds, with the fixed-size buffers turned into plain
//! lists and the bit sets into names. Values the growing environment could
//! not support, and every value of a rejected reading, are `null`:
//!
//! ```json
//! {
//!   "timestamp": 1000,
//!   "values": { "temperature": 22.0, "nitrogen": null, ... },
//!   "status": ["measurements_unavailable"],
//!   "crop_recommendations": ["NPK readings unavailable ..."],
//!   ...
//! }
//! ```

use serde::{Deserialize, Serialize};
use soilsense_core::{
    reading::{Npk, StageFlags, Timestamp},
    CompensatedReading, Measurement, ResultBundle, SensorReading, SoilHealth,
};

use crate::SchemaError;

/// One optional value per channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementValues {
    /// °C
    pub temperature: Option<f32>,
    /// %
    pub humidity: Option<f32>,
    /// µS/cm
    pub ec: Option<f32>,
    /// pH
    pub ph: Option<f32>,
    /// mg/kg
    pub nitrogen: Option<f32>,
    /// mg/kg
    pub phosphorus: Option<f32>,
    /// mg/kg
    pub potassium: Option<f32>,
}

impl MeasurementValues {
    /// Every channel of a raw reading
    pub fn from_reading(reading: &SensorReading) -> Self {
        let mut values = Self::default();
        for m in Measurement::ALL {
            values.set(m, Some(reading.get(m)));
        }
        values
    }

    /// Available channels of a processed reading
    pub fn from_compensated(reading: &CompensatedReading) -> Self {
        let mut values = Self::default();
        for m in Measurement::ALL {
            values.set(m, reading.get(m));
        }
        values
    }

    /// Value of a channel
    pub fn get(&self, measurement: Measurement) -> Option<f32> {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Humidity => self.humidity,
            Measurement::Ec => self.ec,
            Measurement::Ph => self.ph,
            Measurement::Nitrogen => self.nitrogen,
            Measurement::Phosphorus => self.phosphorus,
            Measurement::Potassium => self.potassium,
        }
    }

    fn set(&mut self, measurement: Measurement, value: Option<f32>) {
        let slot = match measurement {
            Measurement::Temperature => &mut self.temperature,
            Measurement::Humidity => &mut self.humidity,
            Measurement::Ec => &mut self.ec,
            Measurement::Ph => &mut self.ph,
            Measurement::Nitrogen => &mut self.nitrogen,
            Measurement::Phosphorus => &mut self.phosphorus,
            Measurement::Potassium => &mut self.potassium,
        };
        *slot = value;
    }
}

const STAGE_NAMES: [(u8, &str); 3] = [
    (StageFlags::CALIBRATED, "calibrated"),
    (StageFlags::COMPENSATED, "compensated"),
    (StageFlags::CONTEXT_ADJUSTED, "context_adjusted"),
];

/// Serializable form of one processing cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Sample time of the raw reading
    pub timestamp: Timestamp,
    /// Whether the driver accepted the sample
    pub valid: bool,
    /// Values as received
    pub raw: MeasurementValues,
    /// Values after processing, `null` where unavailable
    pub values: MeasurementValues,
    /// Stages applied to `values`
    pub stages: Vec<String>,
    /// Channels without a calibration table
    pub uncalibrated: Vec<String>,
    /// Names of the status flags set
    pub status: Vec<String>,
    /// Alert messages in the order they were raised
    pub alerts: Vec<String>,
    /// Nutrient antagonism guidance
    pub interactions: Vec<String>,
    /// NPK left for uptake after antagonism losses
    pub effective_uptake: Option<Npk>,
    /// Crop guidance
    pub crop_recommendations: Vec<String>,
    /// Soil health against the crop optimum
    pub health: Option<SoilHealth>,
    /// Available soil moisture, % of field capacity
    pub available_moisture: Option<f32>,
}

impl ResultRecord {
    /// Flatten a bundle
    pub fn from_bundle(bundle: &ResultBundle) -> Self {
        let values = if bundle.is_degraded() {
            MeasurementValues::default()
        } else {
            MeasurementValues::from_compensated(&bundle.compensated)
        };
        let stages = bundle.compensated.stages;

        Self {
            timestamp: bundle.raw.timestamp,
            valid: bundle.raw.valid,
            raw: MeasurementValues::from_reading(&bundle.raw),
            values,
            stages: STAGE_NAMES
                .iter()
                .filter(|(flag, _)| stages.contains(*flag))
                .map(|(_, name)| name.to_string())
                .collect(),
            uncalibrated: bundle.uncalibrated.iter().map(|m| m.name().to_string()).collect(),
            status: bundle.status.names().map(str::to_string).collect(),
            alerts: bundle.alerts.iter().map(|a| a.to_string()).collect(),
            interactions: bundle.interactions.iter().map(|l| l.to_string()).collect(),
            effective_uptake: bundle.effective_uptake,
            crop_recommendations: bundle.crop_recommendations.iter().map(|l| l.to_string()).collect(),
            health: bundle.health,
            available_moisture: bundle.available_moisture,
        }
    }

    /// Parse a record
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact JSON for transport
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }

    /// True when the status carries the named flag
    pub fn has_status(&self, name: &str) -> bool {
        self.status.iter().any(|s| s == name)
    }
}

impl From<&ResultBundle> for ResultRecord {
    fn from(bundle: &ResultBundle) -> Self {
        Self::from_bundle(bundle)
    }
}
