//! Crop Profiles and Recommendations
//!
//! ## Overview
//!
//! Each [`Crop`] has an [`OptimalRange`] for all seven measurements, a list
//! of secondary nutrients it is sensitive to and a static rule list
//! (see [`table`]). [`CropRecommendationEngine`] turns a final reading into
//! ordered guidance:
//!
//! 1. Capability warning, when the growing environment hides measurements
//! 2. Deviations from the crop optimum
//! 3. Crop-specific rules
//! 4. Soil-texture rules
//!
//! If the probe is not usable at all (every measurement unavailable) the
//! capability warning is the only line.
//!
//! ## Soil Health
//!
//! [`CropRecommendationEngine::health`] scores the same reading 0 to 100 by
//! deducting points for each deviation from the optimum, and grades the
//! score:
//!
//! | Score | Grade |
//! |---|---|
//! | ≥ 80 | Excellent |
//! | ≥ 60 | Good |
//! | ≥ 40 | Satisfactory |
//! | < 40 | Needs attention |

pub mod table;

use core::fmt;

use crate::{
    errors::{ProcessingError, ProcessingResult},
    reading::{CompensatedReading, Measurement, MeasurementSet},
    rules::{self, Guidance, Rule, RuleContext},
    soil::SoilType,
    traits::Stage,
};

pub use table::{CROP_PROFILES, DEVIATION_RULES, SOIL_RULES, SOIL_TARGET_ADJUSTMENTS};

/// Crops with a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[allow(missing_docs)]
pub enum Crop {
    Generic,
    Tomato,
    Cucumber,
    Pepper,
    Lettuce,
    Blueberry,
    Lawn,
    Grape,
    Conifer,
    Strawberry,
    Apple,
    Pear,
    Cherry,
    Raspberry,
    Currant,
    Spinach,
    Basil,
    Cannabis,
    Wheat,
    Potato,
    Kale,
    Blackberry,
    Soybean,
    Carrot,
}

impl Crop {
    /// All crops in table order
    pub const ALL: [Crop; 24] = [
        Crop::Generic,
        Crop::Tomato,
        Crop::Cucumber,
        Crop::Pepper,
        Crop::Lettuce,
        Crop::Blueberry,
        Crop::Lawn,
        Crop::Grape,
        Crop::Conifer,
        Crop::Strawberry,
        Crop::Apple,
        Crop::Pear,
        Crop::Cherry,
        Crop::Raspberry,
        Crop::Currant,
        Crop::Spinach,
        Crop::Basil,
        Crop::Cannabis,
        Crop::Wheat,
        Crop::Potato,
        Crop::Kale,
        Crop::Blackberry,
        Crop::Soybean,
        Crop::Carrot,
    ];

    /// Identifier used in stored configuration
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Tomato => "tomato",
            Self::Cucumber => "cucumber",
            Self::Pepper => "pepper",
            Self::Lettuce => "lettuce",
            Self::Blueberry => "blueberry",
            Self::Lawn => "lawn",
            Self::Grape => "grape",
            Self::Conifer => "conifer",
            Self::Strawberry => "strawberry",
            Self::Apple => "apple",
            Self::Pear => "pear",
            Self::Cherry => "cherry",
            Self::Raspberry => "raspberry",
            Self::Currant => "currant",
            Self::Spinach => "spinach",
            Self::Basil => "basil",
            Self::Cannabis => "cannabis",
            Self::Wheat => "wheat",
            Self::Potato => "potato",
            Self::Kale => "kale",
            Self::Blackberry => "blackberry",
            Self::Soybean => "soybean",
            Self::Carrot => "carrot",
        }
    }

    /// Parse a crop identifier
    ///
    /// `"none"` and the empty string mean no crop guidance and yield
    /// `Ok(None)`. Matching is case-insensitive.
    pub fn from_id(id: &str) -> ProcessingResult<Option<Self>> {
        let id = id.trim();
        if id.is_empty() || id.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|crop| crop.name().eq_ignore_ascii_case(id))
            .map(Some)
            .ok_or(ProcessingError::UnknownCropId)
    }

    /// Static profile for this crop
    pub fn profile(self) -> &'static CropProfile {
        &CROP_PROFILES[self as usize]
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Secondary and micro-nutrients a crop is sensitive to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum SecondaryNutrient {
    Ca,
    Mg,
    Fe,
    B,
    Zn,
    S,
    Mo,
    Mn,
}

impl SecondaryNutrient {
    /// Element name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ca => "calcium",
            Self::Mg => "magnesium",
            Self::Fe => "iron",
            Self::B => "boron",
            Self::Zn => "zinc",
            Self::S => "sulfur",
            Self::Mo => "molybdenum",
            Self::Mn => "manganese",
        }
    }
}

/// Optimum value for every measurement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptimalRange {
    /// °C
    pub temperature: f32,
    /// %
    pub humidity: f32,
    /// µS/cm
    pub ec: f32,
    /// pH
    pub ph: f32,
    /// mg/kg
    pub nitrogen: f32,
    /// mg/kg
    pub phosphorus: f32,
    /// mg/kg
    pub potassium: f32,
}

impl OptimalRange {
    /// Optimum for one measurement
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

    /// Targets shifted for a soil's retention and fixation
    pub fn adjusted_for(&self, soil: SoilType) -> Self {
        let adj = &SOIL_TARGET_ADJUSTMENTS[soil as usize];
        Self {
            temperature: self.temperature,
            humidity: self.humidity + adj.humidity,
            ec: self.ec + adj.ec,
            ph: self.ph + adj.ph,
            nitrogen: self.nitrogen * adj.nitrogen,
            phosphorus: self.phosphorus * adj.phosphorus,
            potassium: self.potassium * adj.potassium,
        }
    }
}

/// How a soil shifts crop targets
///
/// Offsets are added to moisture (%), EC (µS/cm) and pH; nutrient targets
/// are multiplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilTargetAdjustment {
    /// Soil this row describes
    pub soil: SoilType,
    /// Moisture offset
    pub humidity: f32,
    /// EC offset
    pub ec: f32,
    /// pH offset
    pub ph: f32,
    /// Nitrogen factor
    pub nitrogen: f32,
    /// Phosphorus factor
    pub phosphorus: f32,
    /// Potassium factor
    pub potassium: f32,
}

/// Everything known about one crop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CropProfile {
    /// Crop this row describes
    pub crop: Crop,
    /// Target values
    pub optimal: OptimalRange,
    /// Secondary nutrients to watch
    pub critical_nutrients: &'static [SecondaryNutrient],
    /// Crop-specific guidance rules
    #[cfg_attr(feature = "serde", serde(skip))]
    pub rules: &'static [Rule],
}

/// First line when the probe cannot measure anything here
pub const SENSOR_INCOMPATIBLE: &str =
    "Sensor is not compatible with this growing environment: no measurement-based guidance";

/// First line when N, P or K cannot be measured here
pub const NPK_UNAVAILABLE: &str =
    "NPK readings unavailable in this growing environment: nutrient guidance limited to EC and pH";

/// Qualitative soil health grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HealthGrade {
    /// Score below 40
    NeedsAttention,
    /// Score 40 to 59
    Satisfactory,
    /// Score 60 to 79
    Good,
    /// Score 80 and above
    Excellent,
}

impl HealthGrade {
    /// Grade for a 0..=100 score
    pub const fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Satisfactory,
            _ => Self::NeedsAttention,
        }
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Satisfactory => "satisfactory",
            Self::NeedsAttention => "needs attention",
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Soil health against a crop optimum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoilHealth {
    /// 0..=100
    pub score: u8,
    /// Grade for the score
    pub grade: HealthGrade,
}

impl SoilHealth {
    /// Health from a score, clamped to 100
    pub const fn from_score(score: u8) -> Self {
        let score = if score > 100 { 100 } else { score };
        Self { score, grade: HealthGrade::from_score(score) }
    }
}

// (measurement, far threshold, far penalty, near threshold, near penalty)
const DEVIATION_PENALTIES: [(Measurement, f32, u8, f32, u8); 4] = [
    (Measurement::Temperature, 10.0, 30, 5.0, 15),
    (Measurement::Humidity, 20.0, 25, 10.0, 10),
    (Measurement::Ec, 1000.0, 20, 500.0, 10),
    (Measurement::Ph, 1.0, 15, 0.5, 5),
];

// (nutrient, shortfall below optimum, penalty)
const DEFICIT_PENALTIES: [(Measurement, f32, u8); 3] = [
    (Measurement::Nitrogen, 30.0, 10),
    (Measurement::Phosphorus, 20.0, 10),
    (Measurement::Potassium, 30.0, 10),
];

/// Produces crop guidance and soil health
#[derive(Debug, Clone, Copy, Default)]
pub struct CropRecommendationEngine;

impl CropRecommendationEngine {
    /// Create the engine
    pub const fn new() -> Self {
        Self
    }

    /// Ordered guidance for a crop, empty without one
    pub fn recommend(
        &self,
        reading: &CompensatedReading,
        crop: Option<&CropProfile>,
        soil: SoilType,
    ) -> Guidance {
        let mut out = Guidance::new();
        let Some(profile) = crop else {
            return out;
        };

        if reading.unavailable == MeasurementSet::all() {
            out.push(SENSOR_INCOMPATIBLE);
            log_debug!("{}: sensor incompatible, no guidance", profile.crop);
            return out;
        }
        if Measurement::NPK.iter().any(|m| !reading.is_available(*m)) {
            out.push(NPK_UNAVAILABLE);
        }

        let optimal = profile.optimal.adjusted_for(soil);
        let ctx = RuleContext::new(reading, soil).with_optimal(&optimal);
        for group in [&DEVIATION_RULES[..], profile.rules, &SOIL_RULES[..]] {
            rules::evaluate(group, &ctx, &mut out);
        }

        log_debug!("{}: {} recommendation(s)", profile.crop, out.len());
        out
    }

    /// Score the reading against the crop optimum for this soil
    ///
    /// Only available measurements are scored.
    pub fn health(&self, reading: &CompensatedReading, crop: &CropProfile, soil: SoilType) -> SoilHealth {
        let optimal = crop.optimal.adjusted_for(soil);
        let mut deduction: u8 = 0;

        for (m, far, far_penalty, near, near_penalty) in DEVIATION_PENALTIES {
            if let Some(value) = reading.get(m) {
                let diff = libm::fabsf(value - optimal.get(m));
                if diff > far {
                    deduction = deduction.saturating_add(far_penalty);
                } else if diff > near {
                    deduction = deduction.saturating_add(near_penalty);
                }
            }
        }

        for (m, shortfall, penalty) in DEFICIT_PENALTIES {
            if let Some(value) = reading.get(m) {
                if value < optimal.get(m) - shortfall {
                    deduction = deduction.saturating_add(penalty);
                }
            }
        }

        SoilHealth::from_score(100u8.saturating_sub(deduction))
    }
}

impl Stage for CropRecommendationEngine {
    fn name(&self) -> &'static str {
        "crop"
    }
}
