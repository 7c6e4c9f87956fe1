//! Pipeline builder
//!
//! ```rust
//! use soilsense_core::pipeline::{SoilPipeline, SensorLimits};
//!
//! let pipeline = SoilPipeline::builder()
//!     .with_limits(SensorLimits::default())
//!     .without_interactions()
//!     .build();
//! assert!(!pipeline.config().interactions);
//! ```

use super::{PipelineConfig, SensorLimits, SoilPipeline};

/// Chained construction of a [`SoilPipeline`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Builder with every stage enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use custom sensor limits for the range check
    pub fn with_limits(mut self, limits: SensorLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Raise an alert for every channel without a calibration table
    pub fn with_uncalibrated_alerts(mut self) -> Self {
        self.config.alert_uncalibrated = true;
        self
    }

    /// Skip the raw range check
    pub fn without_range_check(mut self) -> Self {
        self.config.range_check = false;
        self
    }

    /// Ignore calibration tables
    pub fn without_calibration(mut self) -> Self {
        self.config.calibration = false;
        self
    }

    /// Skip the physical models
    pub fn without_compensation(mut self) -> Self {
        self.config.compensation = false;
        self
    }

    /// Skip environment and season factors
    pub fn without_context_adjustment(mut self) -> Self {
        self.config.context_adjustment = false;
        self
    }

    /// Skip nutrient interaction analysis
    pub fn without_interactions(mut self) -> Self {
        self.config.interactions = false;
        self
    }

    /// Skip crop guidance and soil health
    pub fn without_crop_guidance(mut self) -> Self {
        self.config.crop_guidance = false;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> SoilPipeline {
        SoilPipeline::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builder_enables_everything() {
        let pipeline = SoilPipeline::builder().build();
        assert_eq!(*pipeline.config(), PipelineConfig::default());
    }

    #[test]
    fn switches() {
        let pipeline = SoilPipeline::builder()
            .without_calibration()
            .without_compensation()
            .without_context_adjustment()
            .without_interactions()
            .without_crop_guidance()
            .without_range_check()
            .build();
        let config = pipeline.config();
        assert!(!config.calibration && !config.compensation && !config.context_adjustment);
        assert!(!config.interactions && !config.crop_guidance && !config.range_check);
    }

    #[test]
    fn starts_from_preset() {
        let pipeline = SoilPipeline::builder()
            .with_config(PipelineConfig::minimal())
            .with_uncalibrated_alerts()
            .build();
        assert!(pipeline.config().alert_uncalibrated);
        assert!(!pipeline.config().crop_guidance);
    }
}
