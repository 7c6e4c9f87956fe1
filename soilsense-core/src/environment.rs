//! Growing Environment Adjustment Table
//!
//! The same probe is used in open soil, greenhouses, hydroponic and
//! aeroponic systems and certified-organic beds. Each environment shifts
//! what a "normal" reading looks like and limits what the probe can measure
//! at all:
//!
//! | Environment | T offset | Moisture offset | EC offset | N / P / K factors | Unavailable |
//! |---|---|---|---|---|---|
//! | Soil | 0 | 0 | 0 | 1.00 / 1.00 / 1.00 | none |
//! | Greenhouse | +3 °C | +10 % | +300 | 1.25 / 1.20 / 1.22 | none |
//! | Hydroponics | 0 | 0 | +500 | 1.40 / 1.30 / 1.35 | N, P, K |
//! | Aeroponics | 0 | 0 | +400 | 1.35 / 1.25 / 1.30 | all |
//! | Organic | 0 | 0 | −200 | 0.85 / 0.90 / 0.88 | none |
//!
//! Hydroponic solutions carry nutrients as ions the NPK electrodes are not
//! built for, so N/P/K are marked unavailable while EC, pH, temperature and
//! moisture stay usable. Aeroponics has no medium for the probe at all.
//! Unavailable values are never replaced by zeros; downstream rules skip
//! them.

use core::fmt;

use crate::errors::{ProcessingError, ProcessingResult};
use crate::reading::{Measurement, MeasurementSet};

/// Where the crop grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum GrowingEnvironment {
    /// Open field soil
    Soil = 0,
    /// Protected cultivation
    Greenhouse = 1,
    /// Nutrient solution
    Hydroponics = 2,
    /// Root mist, no medium
    Aeroponics = 3,
    /// Certified-organic soil management
    Organic = 4,
}

impl GrowingEnvironment {
    /// All environments in id order
    pub const ALL: [GrowingEnvironment; 5] = [
        GrowingEnvironment::Soil,
        GrowingEnvironment::Greenhouse,
        GrowingEnvironment::Hydroponics,
        GrowingEnvironment::Aeroponics,
        GrowingEnvironment::Organic,
    ];

    /// Environment for a stored id
    pub fn from_id(id: u8) -> ProcessingResult<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(ProcessingError::UnknownEnvironment { id })
    }

    /// Stored id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soil => "soil",
            Self::Greenhouse => "greenhouse",
            Self::Hydroponics => "hydroponics",
            Self::Aeroponics => "aeroponics",
            Self::Organic => "organic",
        }
    }

    /// Parse a name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|env| env.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Offsets and factors for this environment
    pub fn profile(self) -> &'static EnvironmentProfile {
        &ENVIRONMENT_PROFILES[self as usize]
    }
}

impl fmt::Display for GrowingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Adjustment row for one environment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnvironmentProfile {
    /// Environment this row describes
    pub environment: GrowingEnvironment,
    /// Added to temperature, °C
    pub temperature_offset: f32,
    /// Added to moisture, %
    pub humidity_offset: f32,
    /// Added to EC, µS/cm
    pub ec_offset: f32,
    /// Multiplies nitrogen
    pub nitrogen_factor: f32,
    /// Multiplies phosphorus
    pub phosphorus_factor: f32,
    /// Multiplies potassium
    pub potassium_factor: f32,
    /// False when the probe cannot be used at all
    pub sensor_compatible: bool,
    /// Measurements the probe cannot provide here
    pub unavailable: MeasurementSet,
}

impl EnvironmentProfile {
    /// True if the measurement can be taken in this environment
    pub fn supports(&self, measurement: Measurement) -> bool {
        self.sensor_compatible && !self.unavailable.contains(measurement)
    }

    /// N, P and K factors in that order
    pub const fn nutrient_factors(&self) -> [f32; 3] {
        [self.nitrogen_factor, self.phosphorus_factor, self.potassium_factor]
    }
}

/// Environment table, indexed by [`GrowingEnvironment::id`]
pub static ENVIRONMENT_PROFILES: [EnvironmentProfile; 5] = [
    EnvironmentProfile {
        environment: GrowingEnvironment::Soil,
        temperature_offset: 0.0,
        humidity_offset: 0.0,
        ec_offset: 0.0,
        nitrogen_factor: 1.0,
        phosphorus_factor: 1.0,
        potassium_factor: 1.0,
        sensor_compatible: true,
        unavailable: MeasurementSet::empty(),
    },
    EnvironmentProfile {
        environment: GrowingEnvironment::Greenhouse,
        temperature_offset: 3.0,
        humidity_offset: 10.0,
        ec_offset: 300.0,
        nitrogen_factor: 1.25,
        phosphorus_factor: 1.20,
        potassium_factor: 1.22,
        sensor_compatible: true,
        unavailable: MeasurementSet::empty(),
    },
    EnvironmentProfile {
        environment: GrowingEnvironment::Hydroponics,
        temperature_offset: 0.0,
        humidity_offset: 0.0,
        ec_offset: 500.0,
        nitrogen_factor: 1.40,
        phosphorus_factor: 1.30,
        potassium_factor: 1.35,
        sensor_compatible: true,
        unavailable: MeasurementSet::npk(),
    },
    EnvironmentProfile {
        environment: GrowingEnvironment::Aeroponics,
        temperature_offset: 0.0,
        humidity_offset: 0.0,
        ec_offset: 400.0,
        nitrogen_factor: 1.35,
        phosphorus_factor: 1.25,
        potassium_factor: 1.30,
        sensor_compatible: false,
        unavailable: MeasurementSet::all(),
    },
    EnvironmentProfile {
        environment: GrowingEnvironment::Organic,
        temperature_offset: 0.0,
        humidity_offset: 0.0,
        ec_offset: -200.0,
        nitrogen_factor: 0.85,
        phosphorus_factor: 0.90,
        potassium_factor: 0.88,
        sensor_compatible: true,
        unavailable: MeasurementSet::empty(),
    },
];

/// Profile for a stored id, falling back to open soil (identity)
pub fn lookup_or_soil(id: u8) -> (&'static EnvironmentProfile, Option<ProcessingError>) {
    match GrowingEnvironment::from_id(id) {
        Ok(env) => (env.profile(), None),
        Err(err) => {
            log_warn!("environment id {} unknown, using soil", id);
            (GrowingEnvironment::Soil.profile(), Some(err))
        }
    }
}
