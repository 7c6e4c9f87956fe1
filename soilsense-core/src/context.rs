//! Context Adjustment
//!
//! Applies growing-environment offsets and factors plus the seasonal
//! nutrient factors to a compensated reading:
//!
//! ```text
//! T'  = T + env.temperature_offset
//! θ'  = clamp(θ + env.humidity_offset, 0, 100)
//! EC' = max(EC + env.ec_offset, 0)
//! X'  = X × env.X_factor × season.X_factor      for X in N, P, K
//! ```
//!
//! Measurements the environment cannot support are added to the reading's
//! `unavailable` set. Their stored values are left as they were and never
//! read back as numbers.
//!
//! This module also resolves the per-cycle [`ProcessingContext`] (numeric
//! ids and a crop string) into table references, applying the neutral
//! fallbacks for unknown ids.

use heapless::Vec;

use crate::{
    crop::{Crop, CropProfile},
    environment::{self, EnvironmentProfile, GrowingEnvironment},
    errors::ProcessingError,
    reading::{CompensatedReading, Measurement, StageFlags},
    season::{self, Season, SeasonalFactors},
    soil::{self, SoilProfile, SoilType},
    traits::Stage,
};

/// Applies environment and season factors
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAdjustmentEngine;

impl ContextAdjustmentEngine {
    /// Create the engine
    pub const fn new() -> Self {
        Self
    }

    /// Adjust for a known environment and season
    pub fn adjust(
        &self,
        compensated: &CompensatedReading,
        environment: GrowingEnvironment,
        season: Season,
    ) -> CompensatedReading {
        self.adjust_with(compensated, environment.profile(), season.factors())
    }

    /// Adjust with resolved profiles (identity fallbacks included)
    pub fn adjust_with(
        &self,
        compensated: &CompensatedReading,
        environment: &EnvironmentProfile,
        season: &SeasonalFactors,
    ) -> CompensatedReading {
        let mut out = *compensated;

        for m in Measurement::ALL {
            if !environment.supports(m) {
                out.unavailable.insert(m);
            }
        }
        out.stages.set(StageFlags::CONTEXT_ADJUSTED);
        let unavailable = out.unavailable.len();

        let values = out.values_mut();
        values.temperature += environment.temperature_offset;
        values.humidity = (values.humidity + environment.humidity_offset).clamp(0.0, 100.0);
        values.ec = (values.ec + environment.ec_offset).max(0.0);
        values.nitrogen *= environment.nitrogen_factor * season.nitrogen;
        values.phosphorus *= environment.phosphorus_factor * season.phosphorus;
        values.potassium *= environment.potassium_factor * season.potassium;

        log_debug!(
            "context {}: N {} P {} K {}, {} unavailable",
            environment.environment, values.nitrogen, values.phosphorus, values.potassium,
            unavailable
        );
        out
    }
}

impl Stage for ContextAdjustmentEngine {
    fn name(&self) -> &'static str {
        "context"
    }
}

/// Configuration of one sampling cycle, as stored on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingContext<'a> {
    /// Soil profile id, 0..=12
    pub soil_id: u8,
    /// Growing environment id, 0..=4
    pub environment_id: u8,
    /// Season id, 0..=3
    pub season_id: u8,
    /// Crop identifier, `"none"` for no crop guidance
    pub crop_id: &'a str,
}

impl Default for ProcessingContext<'_> {
    fn default() -> Self {
        Self {
            soil_id: SoilType::Loam.id(),
            environment_id: GrowingEnvironment::Soil.id(),
            season_id: Season::Spring.id(),
            crop_id: "none",
        }
    }
}

impl<'a> ProcessingContext<'a> {
    /// Context from typed values
    pub fn new(soil: SoilType, environment: GrowingEnvironment, season: Season, crop_id: &'a str) -> Self {
        Self {
            soil_id: soil.id(),
            environment_id: environment.id(),
            season_id: season.id(),
            crop_id,
        }
    }

    /// Resolve ids to tables, applying fallbacks
    ///
    /// Every fallback taken is returned as a configuration error so the
    /// pipeline can raise an alert; resolution itself never fails.
    pub fn resolve(&self) -> (ResolvedContext, Vec<ProcessingError, 4>) {
        let mut errors = Vec::new();

        let (soil, soil_err) = soil::lookup_or_loam(self.soil_id);
        let (environment, env_err) = environment::lookup_or_soil(self.environment_id);
        let (season, season_err) = season::lookup_or_identity(self.season_id);
        let crop = match Crop::from_id(self.crop_id) {
            Ok(crop) => crop.map(Crop::profile),
            Err(err) => {
                log_warn!("crop '{}' unknown, crop guidance disabled", self.crop_id);
                // capacity 4 matches the four sources below
                let _ = errors.push(err);
                None
            }
        };

        for err in [soil_err, env_err, season_err].into_iter().flatten() {
            let _ = errors.push(err);
        }

        (ResolvedContext { soil, environment, season, crop }, errors)
    }
}

/// Table references for one cycle
#[derive(Debug, Clone, Copy)]
pub struct ResolvedContext {
    /// Soil coefficients
    pub soil: &'static SoilProfile,
    /// Environment offsets and capabilities
    pub environment: &'static EnvironmentProfile,
    /// Seasonal nutrient factors
    pub season: &'static SeasonalFactors,
    /// Crop profile, `None` for no crop guidance
    pub crop: Option<&'static CropProfile>,
}
