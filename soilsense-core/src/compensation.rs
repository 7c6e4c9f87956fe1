//! Physical Compensation of EC, pH and NPK
//!
//! ## Physics Background
//!
//! Probe electrodes measure the *solution* in the pore space, so what they
//! report depends on how much water there is and how warm it is. The
//! compensation stage normalises each value back to reference conditions.
//!
//! ### Electrical Conductivity (Archie-style power model)
//!
//! ```text
//! EC_comp = EC × (θ / θ_fc)^m × (T / 25)^n
//!
//! θ    = volumetric moisture (%)
//! θ_fc = field capacity of the soil (%)
//! m, n = soil-specific moisture and temperature exponents
//! ```
//!
//! At field capacity and 25 °C the factor is exactly 1.
//!
//! ### pH (linear temperature correction)
//!
//! ```text
//! pH_comp = pH − 0.003 × (T − 25)
//! ```
//!
//! ### NPK (exponential temperature, linear moisture)
//!
//! ```text
//! X_comp = X × exp(δ_X × (T − 20)) × (1 + ε_X × (θ − 30))
//! ```
//!
//! δ and ε come from the soil profile, one pair per nutrient.
//!
//! ## Contract
//!
//! - Temperature and moisture pass through unchanged. They are the inputs
//!   of the models, not outputs.
//! - A reading flagged invalid passes through untouched and without the
//!   `COMPENSATED` stage flag.
//! - Outside −50..=100 °C or 0..=100 % moisture the models are not trusted;
//!   values pass through the same way.
//! - Results are never negative. Below 0 °C the EC temperature ratio is
//!   taken as zero (frozen pore water barely conducts).
//!
//! ## Example
//!
//! ```rust
//! use soilsense_core::compensation::compensate_ec;
//! use soilsense_core::soil::SoilType;
//!
//! let loam = SoilType::Loam.profile();
//! let ec = compensate_ec(1200.0, 30.0, 25.0, loam);
//! assert!((ec - 2414.0).abs() < 24.0);
//! ```

use crate::{
    constants::compensation::{
        COMPENSATION_MOISTURE_MAX_PCT, COMPENSATION_MOISTURE_MIN_PCT, COMPENSATION_TEMP_MAX_C,
        COMPENSATION_TEMP_MIN_C, EC_REFERENCE_TEMP_C, NPK_REFERENCE_MOISTURE_PCT,
        NPK_REFERENCE_TEMP_C, PH_REFERENCE_TEMP_C, PH_TEMP_COEFFICIENT,
    },
    errors::ProcessingError,
    reading::{CompensatedReading, Npk, SensorReading, StageFlags},
    soil::{self, SoilProfile},
    traits::Stage,
};

/// EC normalised to field capacity and 25 °C
pub fn compensate_ec(ec: f32, temperature: f32, moisture: f32, soil: &SoilProfile) -> f32 {
    let fc = soil.field_capacity_pct();
    if fc <= 0.0 {
        return ec.max(0.0);
    }

    let moisture_ratio = (moisture / fc).max(0.0);
    let temp_ratio = (temperature / EC_REFERENCE_TEMP_C).max(0.0);

    let factor = libm::powf(moisture_ratio, soil.archie_m) * libm::powf(temp_ratio, soil.archie_n);
    (ec * factor).max(0.0)
}

/// pH normalised to 25 °C
pub fn compensate_ph(ph: f32, temperature: f32) -> f32 {
    (ph - PH_TEMP_COEFFICIENT * (temperature - PH_REFERENCE_TEMP_C)).max(0.0)
}

/// One nutrient normalised to 20 °C and 30 % moisture
pub fn compensate_nutrient(value: f32, temperature: f32, moisture: f32, delta: f32, epsilon: f32) -> f32 {
    let temp_factor = libm::expf(delta * (temperature - NPK_REFERENCE_TEMP_C));
    let moisture_factor = 1.0 + epsilon * (moisture - NPK_REFERENCE_MOISTURE_PCT);
    (value * temp_factor * moisture_factor).max(0.0)
}

/// All three nutrients with the soil's δ and ε
pub fn compensate_npk(npk: Npk, temperature: f32, moisture: f32, soil: &SoilProfile) -> Npk {
    let d = &soil.npk_temperature;
    let e = &soil.npk_moisture;
    Npk {
        nitrogen: compensate_nutrient(npk.nitrogen, temperature, moisture, d.nitrogen, e.nitrogen),
        phosphorus: compensate_nutrient(npk.phosphorus, temperature, moisture, d.phosphorus, e.phosphorus),
        potassium: compensate_nutrient(npk.potassium, temperature, moisture, d.potassium, e.potassium),
    }
}

/// True when temperature and moisture are inside the models' trusted window
pub fn within_model_range(temperature: f32, moisture: f32) -> bool {
    (COMPENSATION_TEMP_MIN_C..=COMPENSATION_TEMP_MAX_C).contains(&temperature)
        && (COMPENSATION_MOISTURE_MIN_PCT..=COMPENSATION_MOISTURE_MAX_PCT).contains(&moisture)
}

/// Applies the compensation models to a calibrated reading
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensationEngine;

impl CompensationEngine {
    /// Create the engine
    pub const fn new() -> Self {
        Self
    }

    /// Compensate EC, pH and NPK for the given soil
    pub fn compensate(&self, calibrated: &SensorReading, soil: &SoilProfile) -> CompensatedReading {
        let mut out = CompensatedReading::from_reading(calibrated);

        if !calibrated.valid {
            log_debug!("compensation skipped: reading invalid");
            return out;
        }

        let t = calibrated.temperature;
        let theta = calibrated.humidity;
        if !within_model_range(t, theta) {
            log_warn!("compensation skipped: T={} θ={} outside model range", t, theta);
            return out;
        }

        let npk = compensate_npk(calibrated.npk(), t, theta, soil);
        out.stages.set(StageFlags::COMPENSATED);
        let values = out.values_mut();
        values.ec = compensate_ec(calibrated.ec, t, theta, soil);
        values.ph = compensate_ph(calibrated.ph, t);
        values.nitrogen = npk.nitrogen;
        values.phosphorus = npk.phosphorus;
        values.potassium = npk.potassium;

        log_debug!(
            "compensated for {}: EC {}→{} pH {}→{} N {}→{}",
            soil.soil, calibrated.ec, values.ec, calibrated.ph, values.ph,
            calibrated.nitrogen, values.nitrogen
        );
        out
    }

    /// Compensate using a stored soil id, falling back to loam
    pub fn compensate_for(
        &self,
        calibrated: &SensorReading,
        soil_id: u8,
    ) -> (CompensatedReading, Option<ProcessingError>) {
        let (profile, err) = soil::lookup_or_loam(soil_id);
        (self.compensate(calibrated, profile), err)
    }
}

impl Stage for CompensationEngine {
    fn name(&self) -> &'static str {
        "compensation"
    }
}
