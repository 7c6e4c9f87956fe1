//! Sensor Specifications and Limits
//!
//! Operating limits of the RS485 7-in-1 soil probe (temperature, moisture,
//! EC, pH, N, P, K). Values outside these ranges are still processed but the
//! cycle raises an `OutOfPhysicalRange` alert.

// ===== OPERATING RANGES =====

/// Minimum soil temperature the probe reports (°C).
///
/// Source: probe datasheet, thermistor range
pub const TEMP_SENSOR_MIN_C: f32 = -45.0;

/// Maximum soil temperature the probe reports (°C).
///
/// Source: probe datasheet
pub const TEMP_SENSOR_MAX_C: f32 = 115.0;

/// Minimum volumetric moisture (%).
///
/// Oven-dry soil.
pub const MOISTURE_SENSOR_MIN_PCT: f32 = 0.0;

/// Maximum volumetric moisture (%).
///
/// Saturated medium or free water.
pub const MOISTURE_SENSOR_MAX_PCT: f32 = 100.0;

/// Minimum electrical conductivity (µS/cm).
pub const EC_SENSOR_MIN_US_CM: f32 = 0.0;

/// Maximum electrical conductivity (µS/cm).
///
/// Upper limit of the probe's electrode pair. Saline soils can exceed it.
///
/// Source: probe datasheet
pub const EC_SENSOR_MAX_US_CM: f32 = 10_000.0;

/// Minimum pH the electrode resolves.
///
/// Source: probe datasheet
pub const PH_SENSOR_MIN: f32 = 3.0;

/// Maximum pH the electrode resolves.
///
/// Source: probe datasheet
pub const PH_SENSOR_MAX: f32 = 9.0;

/// Minimum nutrient concentration (mg/kg), shared by N, P and K.
pub const NPK_SENSOR_MIN_MG_KG: f32 = 0.0;

/// Maximum nutrient concentration (mg/kg), shared by N, P and K.
///
/// The probe saturates at 1999 mg/kg.
pub const NPK_SENSOR_MAX_MG_KG: f32 = 1999.0;

// ===== CALIBRATION REFERENCE LIMITS =====
//
// Reference (expected) values a calibration standard can realistically
// provide. Tables with references outside these limits are rejected.

/// Temperature reference range for calibration (°C).
pub const CAL_TEMP_MIN_C: f32 = -40.0;
/// Upper temperature reference (°C).
pub const CAL_TEMP_MAX_C: f32 = 80.0;

/// Moisture reference range for calibration (%).
pub const CAL_MOISTURE_MIN_PCT: f32 = 0.0;
/// Upper moisture reference (%).
pub const CAL_MOISTURE_MAX_PCT: f32 = 100.0;

/// EC reference range for calibration (µS/cm).
///
/// Wider than the probe range: conductivity standards go to 20 mS/cm.
pub const CAL_EC_MIN_US_CM: f32 = 0.0;
/// Upper EC reference (µS/cm).
pub const CAL_EC_MAX_US_CM: f32 = 20_000.0;

/// pH buffer range for calibration.
pub const CAL_PH_MIN: f32 = 0.0;
/// Upper pH buffer.
pub const CAL_PH_MAX: f32 = 14.0;

/// Nutrient reference range for calibration (mg/kg).
pub const CAL_NPK_MIN_MG_KG: f32 = 0.0;
/// Upper nutrient reference (mg/kg).
pub const CAL_NPK_MAX_MG_KG: f32 = 2000.0;

// ===== CALIBRATION POINT LIMITS =====

/// EC uses two-point calibration (low and high conductivity standard).
pub const EC_MAX_CALIBRATION_POINTS: usize = 2;

/// pH uses up to three buffers (4.01, 6.86, 9.18).
pub const PH_MAX_CALIBRATION_POINTS: usize = 3;
