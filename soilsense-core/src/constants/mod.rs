//! Constants for SoilSense Core
//!
//! Centralized, documented constants used throughout the pipeline. Every
//! numeric value carries its unit in the name and a note on where it comes
//! from.
//!
//! ## Organization
//!
//! - **Sensors**: operating range of the 7-in-1 soil probe, calibration reference limits
//! - **Compensation**: reference conditions and coefficients of the physical models
//! - **Buffers**: fixed capacities of calibration tables, guidance and alert lists
//!
//! Soil, environment, season and crop coefficients are *tables*, not scalar
//! constants, and live next to the code that owns them
//! ([`soil`](crate::soil), [`environment`](crate::environment),
//! [`season`](crate::season), [`crop`](crate::crop)).

/// Sensor operating ranges and calibration reference limits.
pub mod sensors;

/// Reference conditions for EC, pH and NPK compensation.
pub mod compensation;

/// Capacities of fixed-size buffers.
pub mod buffers;

pub use sensors::{
    TEMP_SENSOR_MIN_C, TEMP_SENSOR_MAX_C,
    MOISTURE_SENSOR_MIN_PCT, MOISTURE_SENSOR_MAX_PCT,
    EC_SENSOR_MIN_US_CM, EC_SENSOR_MAX_US_CM,
    PH_SENSOR_MIN, PH_SENSOR_MAX,
    NPK_SENSOR_MIN_MG_KG, NPK_SENSOR_MAX_MG_KG,
};

pub use compensation::{
    EC_REFERENCE_TEMP_C, PH_REFERENCE_TEMP_C, PH_TEMP_COEFFICIENT,
    NPK_REFERENCE_TEMP_C, NPK_REFERENCE_MOISTURE_PCT,
};

pub use buffers::{MAX_CALIBRATION_POINTS, MAX_GUIDANCE_LINES, MAX_ALERTS};
