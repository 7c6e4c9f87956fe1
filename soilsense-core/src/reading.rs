//! Sensor Readings and Measurement Sets
//!
//! ## Overview
//!
//! The soil probe reports seven values per sampling cycle. This module holds
//! the two reading shapes that flow through the pipeline:
//!
//! - [`SensorReading`] is what the driver produced. It is never modified;
//!   every stage returns a new value.
//! - [`CompensatedReading`] has the same fields plus provenance
//!   ([`StageFlags`]) and the set of measurements the growing environment
//!   cannot support. Unavailable fields are read through
//!   [`CompensatedReading::get`], which returns `None` rather than a number
//!   that looks like a real deficiency.
//!
//! ## Measurement Identity
//!
//! [`Measurement`] is a closed enum. It indexes calibration tables, names
//! fields in alerts and rules, and maps to the canonical names used by the
//! calibration CSV format (`temperature`, `humidity`, `ec`, `ph`,
//! `nitrogen`, `phosphorus`, `potassium`).

use core::fmt;

use crate::traits::Validatable;

/// Timestamp in milliseconds (wall clock or device uptime)
pub type Timestamp = u64;

/// One of the seven probe channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Measurement {
    /// Soil temperature, °C
    Temperature,
    /// Volumetric soil moisture, %
    Humidity,
    /// Electrical conductivity, µS/cm
    Ec,
    /// Soil pH
    Ph,
    /// Nitrogen, mg/kg
    Nitrogen,
    /// Phosphorus, mg/kg
    Phosphorus,
    /// Potassium, mg/kg
    Potassium,
}

impl Measurement {
    /// All measurements in channel order
    pub const ALL: [Measurement; 7] = [
        Measurement::Temperature,
        Measurement::Humidity,
        Measurement::Ec,
        Measurement::Ph,
        Measurement::Nitrogen,
        Measurement::Phosphorus,
        Measurement::Potassium,
    ];

    /// The three macro-nutrients
    pub const NPK: [Measurement; 3] = [
        Measurement::Nitrogen,
        Measurement::Phosphorus,
        Measurement::Potassium,
    ];

    /// Channel index, 0..7
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Ec => "ec",
            Self::Ph => "ph",
            Self::Nitrogen => "nitrogen",
            Self::Phosphorus => "phosphorus",
            Self::Potassium => "potassium",
        }
    }

    /// Display unit
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Ec => "µS/cm",
            Self::Ph => "pH",
            Self::Nitrogen | Self::Phosphorus | Self::Potassium => "mg/kg",
        }
    }

    /// Parse a canonical name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }

    /// True for N, P and K
    pub const fn is_nutrient(self) -> bool {
        matches!(self, Self::Nitrogen | Self::Phosphorus | Self::Potassium)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compact set of measurements (one bit per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementSet(u8);

impl MeasurementSet {
    /// No measurements
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All seven measurements
    pub const fn all() -> Self {
        Self(0b0111_1111)
    }

    /// Nitrogen, phosphorus and potassium
    pub const fn npk() -> Self {
        Self(
            Measurement::Nitrogen.bit()
                | Measurement::Phosphorus.bit()
                | Measurement::Potassium.bit(),
        )
    }

    /// Single-measurement set
    pub const fn only(measurement: Measurement) -> Self {
        Self(measurement.bit())
    }

    /// Membership test
    pub const fn contains(&self, measurement: Measurement) -> bool {
        self.0 & measurement.bit() != 0
    }

    /// True if every member of `other` is in `self`
    pub const fn contains_all(&self, other: MeasurementSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Add a measurement
    pub fn insert(&mut self, measurement: Measurement) {
        self.0 |= measurement.bit();
    }

    /// Remove a measurement
    pub fn remove(&mut self, measurement: Measurement) {
        self.0 &= !measurement.bit();
    }

    /// Set union
    pub const fn union(self, other: MeasurementSet) -> Self {
        Self(self.0 | other.0)
    }

    /// True when no measurement is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of members
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in channel order
    pub fn iter(self) -> impl Iterator<Item = Measurement> {
        Measurement::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

/// Macro-nutrient triple (mg/kg)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npk {
    /// Nitrogen
    pub nitrogen: f32,
    /// Phosphorus
    pub phosphorus: f32,
    /// Potassium
    pub potassium: f32,
}

impl Npk {
    /// Build from the three concentrations
    pub const fn new(nitrogen: f32, phosphorus: f32, potassium: f32) -> Self {
        Self { nitrogen, phosphorus, potassium }
    }
}

/// One raw probe sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Soil temperature (°C)
    pub temperature: f32,
    /// Volumetric moisture (%)
    pub humidity: f32,
    /// Electrical conductivity (µS/cm)
    pub ec: f32,
    /// pH
    pub ph: f32,
    /// Nitrogen (mg/kg)
    pub nitrogen: f32,
    /// Phosphorus (mg/kg)
    pub phosphorus: f32,
    /// Potassium (mg/kg)
    pub potassium: f32,
    /// Driver-level validity (CRC ok, probe answered)
    pub valid: bool,
    /// Sample time
    pub timestamp: Timestamp,
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            humidity: 0.0,
            ec: 0.0,
            ph: 0.0,
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
            valid: false,
            timestamp: 0,
        }
    }
}

impl SensorReading {
    /// Valid reading with all seven values
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        temperature: f32,
        humidity: f32,
        ec: f32,
        ph: f32,
        nitrogen: f32,
        phosphorus: f32,
        potassium: f32,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            temperature,
            humidity,
            ec,
            ph,
            nitrogen,
            phosphorus,
            potassium,
            valid: true,
            timestamp,
        }
    }

    /// Reading the driver could not obtain
    pub fn invalid(timestamp: Timestamp) -> Self {
        Self { valid: false, timestamp, ..Self::default() }
    }

    /// Value of one channel
    pub const fn get(&self, measurement: Measurement) -> f32 {
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

    /// Copy with one channel replaced
    pub fn with(mut self, measurement: Measurement, value: f32) -> Self {
        self.set(measurement, value);
        self
    }

    pub(crate) fn set(&mut self, measurement: Measurement, value: f32) {
        match measurement {
            Measurement::Temperature => self.temperature = value,
            Measurement::Humidity => self.humidity = value,
            Measurement::Ec => self.ec = value,
            Measurement::Ph => self.ph = value,
            Measurement::Nitrogen => self.nitrogen = value,
            Measurement::Phosphorus => self.phosphorus = value,
            Measurement::Potassium => self.potassium = value,
        }
    }

    /// Nutrient triple
    pub const fn npk(&self) -> Npk {
        Npk::new(self.nitrogen, self.phosphorus, self.potassium)
    }

    /// Valid flag set and every value finite
    pub fn is_usable(&self) -> bool {
        self.valid && Measurement::ALL.iter().all(|m| self.get(*m).is_valid())
    }
}

/// Provenance: which stages touched a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageFlags(u8);

impl StageFlags {
    /// At least one channel went through a calibration table
    pub const CALIBRATED: u8 = 1 << 0;
    /// EC, pH and NPK compensated for temperature and moisture
    pub const COMPENSATED: u8 = 1 << 1;
    /// Environment and season factors applied
    pub const CONTEXT_ADJUSTED: u8 = 1 << 2;

    /// No stage applied
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mark a stage as applied
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Check a stage
    pub const fn contains(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

/// Reading after compensation and context adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompensatedReading {
    values: SensorReading,
    /// Stages applied, in any order
    pub stages: StageFlags,
    /// Measurements the environment cannot support
    pub unavailable: MeasurementSet,
}

impl CompensatedReading {
    /// Wrap a reading, no stages applied yet
    pub fn from_reading(reading: &SensorReading) -> Self {
        Self {
            values: *reading,
            stages: StageFlags::empty(),
            unavailable: MeasurementSet::empty(),
        }
    }

    /// Value if the measurement is available
    pub fn get(&self, measurement: Measurement) -> Option<f32> {
        if self.unavailable.contains(measurement) {
            None
        } else {
            Some(self.values.get(measurement))
        }
    }

    /// True when the channel carries a usable value
    pub fn is_available(&self, measurement: Measurement) -> bool {
        !self.unavailable.contains(measurement)
    }

    /// Underlying values, including unavailable ones
    pub fn values(&self) -> &SensorReading {
        &self.values
    }

    /// Sample time
    pub fn timestamp(&self) -> Timestamp {
        self.values.timestamp
    }

    /// Available measurements
    pub fn available(&self) -> MeasurementSet {
        let mut set = MeasurementSet::all();
        for m in self.unavailable.iter() {
            set.remove(m);
        }
        set
    }

    pub(crate) fn values_mut(&mut self) -> &mut SensorReading {
        &mut self.values
    }
}
