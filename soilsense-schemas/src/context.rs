//! Processing context written with names

use serde::{Deserialize, Serialize};
use soilsense_core::{GrowingEnvironment, ProcessingContext, Season, SoilType};

use crate::SchemaError;

/// `{"soil": "loam", "environment": "greenhouse", "season": "summer", "crop": "tomato"}`
///
/// Every field has a default, so `{}` is open loam soil in spring without a
/// crop. The crop id is not checked here; the pipeline reports an unknown
/// crop as an alert like any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextDocument {
    /// Soil profile name
    pub soil: String,
    /// Growing environment name
    pub environment: String,
    /// Season name
    pub season: String,
    /// Crop identifier, `"none"` for no crop guidance
    pub crop: String,
}

impl Default for ContextDocument {
    fn default() -> Self {
        Self {
            soil: SoilType::Loam.name().to_string(),
            environment: GrowingEnvironment::Soil.name().to_string(),
            season: Season::Spring.name().to_string(),
            crop: "none".to_string(),
        }
    }
}

impl ContextDocument {
    /// Parse a document
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize a document
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Resolve names to table ids
    pub fn to_context(&self) -> Result<ProcessingContext<'_>, SchemaError> {
        let soil = SoilType::from_name(&self.soil).ok_or_else(|| unknown("soil", &self.soil))?;
        let environment = GrowingEnvironment::from_name(&self.environment)
            .ok_or_else(|| unknown("environment", &self.environment))?;
        let season = Season::from_name(&self.season).ok_or_else(|| unknown("season", &self.season))?;

        Ok(ProcessingContext::new(soil, environment, season, &self.crop))
    }

    /// Name a context, failing on ids outside the tables
    pub fn from_context(ctx: &ProcessingContext<'_>) -> Result<Self, SchemaError> {
        let soil = SoilType::from_id(ctx.soil_id)
            .map_err(|_| SchemaError::UnknownId { kind: "soil", id: ctx.soil_id })?;
        let environment = GrowingEnvironment::from_id(ctx.environment_id)
            .map_err(|_| SchemaError::UnknownId { kind: "environment", id: ctx.environment_id })?;
        let season = Season::from_id(ctx.season_id)
            .map_err(|_| SchemaError::UnknownId { kind: "season", id: ctx.season_id })?;

        Ok(Self {
            soil: soil.name().to_string(),
            environment: environment.name().to_string(),
            season: season.name().to_string(),
            crop: ctx.crop_id.to_string(),
        })
    }
}

fn unknown(kind: &'static str, name: &str) -> SchemaError {
    SchemaError::UnknownName { kind, name: name.to_string() }
}
