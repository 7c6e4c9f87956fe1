//! Measurement metadata for display layers

use serde::Serialize;
use soilsense_core::{calibration, pipeline::SensorLimits, Measurement};

/// Name, unit and sensor range of one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementInfo {
    /// Canonical name, also the CSV `sensor_type`
    pub name: &'static str,
    /// Display unit
    pub unit: &'static str,
    /// Lowest value the probe reports
    pub min: f32,
    /// Highest value the probe reports
    pub max: f32,
    /// Calibration points the channel accepts
    pub max_calibration_points: usize,
}

impl MeasurementInfo {
    /// Metadata with the default sensor limits
    pub fn of(measurement: Measurement) -> Self {
        Self::with_limits(measurement, &SensorLimits::default())
    }

    /// Metadata with configured limits
    pub fn with_limits(measurement: Measurement, limits: &SensorLimits) -> Self {
        let limit = limits.limit(measurement);
        Self {
            name: measurement.name(),
            unit: measurement.unit(),
            min: limit.min,
            max: limit.max,
            max_calibration_points: calibration::max_points(measurement),
        }
    }

    /// All seven channels in channel order
    pub fn all() -> [Self; 7] {
        Measurement::ALL.map(Self::of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ranges() {
        let ph = MeasurementInfo::of(Measurement::Ph);
        assert_eq!((ph.min, ph.max), (3.0, 9.0));
        assert_eq!(ph.max_calibration_points, 3);

        let ec = MeasurementInfo::of(Measurement::Ec);
        assert_eq!(ec.unit, "µS/cm");
        assert_eq!(ec.max_calibration_points, 2);

        let k = MeasurementInfo::of(Measurement::Potassium);
        assert_eq!((k.min, k.max), (0.0, 1999.0));
    }

    #[test]
    fn all_follows_channel_order() {
        let names: Vec<_> = MeasurementInfo::all().iter().map(|i| i.name).collect();
        assert_eq!(
            names,
            ["temperature", "humidity", "ec", "ph", "nitrogen", "phosphorus", "potassium"]
        );
    }

    #[test]
    fn serializes_as_object() {
        let json = serde_json::to_value(MeasurementInfo::of(Measurement::Temperature)).unwrap();
        assert_eq!(json["name"], "temperature");
        assert_eq!(json["min"], -45.0);
        assert_eq!(json["max"], 115.0);
    }
}
