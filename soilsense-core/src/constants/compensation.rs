//! Reference Conditions for Physical Compensation
//!
//! Each model normalises a measurement back to fixed reference conditions.
//! At the reference point every model is the identity.

// ===== EC (ARCHIE-STYLE POWER MODEL) =====

/// Reference temperature for conductivity (°C).
///
/// Conductivity is conventionally reported at 25 °C.
pub const EC_REFERENCE_TEMP_C: f32 = 25.0;

// ===== pH (LINEAR TEMPERATURE CORRECTION) =====

/// Reference temperature for pH (°C).
pub const PH_REFERENCE_TEMP_C: f32 = 25.0;

/// pH change per °C away from the reference.
///
/// Source: Nernst slope drift of glass electrodes, ~0.003 pH/°C
pub const PH_TEMP_COEFFICIENT: f32 = 0.003;

// ===== NPK (EXPONENTIAL TEMPERATURE / LINEAR MOISTURE) =====

/// Reference temperature for nutrient readings (°C).
pub const NPK_REFERENCE_TEMP_C: f32 = 20.0;

/// Reference volumetric moisture for nutrient readings (%).
pub const NPK_REFERENCE_MOISTURE_PCT: f32 = 30.0;

// ===== VALID INPUT WINDOW =====
//
// Outside this window the models are not trusted and the values pass
// through unchanged.

/// Lowest temperature accepted for compensation (°C).
pub const COMPENSATION_TEMP_MIN_C: f32 = -50.0;

/// Highest temperature accepted for compensation (°C).
pub const COMPENSATION_TEMP_MAX_C: f32 = 100.0;

/// Lowest moisture accepted for compensation (%).
pub const COMPENSATION_MOISTURE_MIN_PCT: f32 = 0.0;

/// Highest moisture accepted for compensation (%).
pub const COMPENSATION_MOISTURE_MAX_PCT: f32 = 100.0;
