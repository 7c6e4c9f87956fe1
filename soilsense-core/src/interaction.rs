//! Nutrient Interaction Analysis
//!
//! Macro-nutrients compete at the root surface. Excess nitrogen suppresses
//! potassium uptake, alkaline soil locks up phosphorus and a high P/K ratio
//! pushes potassium out further. This module flags those antagonisms with a
//! fixed rule table and models their effect on uptake.
//!
//! The nitrogen/potassium rule fires when the N uptake factor
//! `1 − 0.3 × (N/200 − 1.5)` drops below 0.8, i.e. above
//! [`NK_ANTAGONISM_NITROGEN_MG_KG`].

use crate::{
    reading::{CompensatedReading, Measurement, Npk},
    rules::{self, Condition, Guidance, Rule, RuleContext},
    soil::SoilType,
    traits::Stage,
};

/// Nitrogen reference for the N/K antagonism model, mg/kg
pub const NK_REFERENCE_NITROGEN_MG_KG: f32 = 200.0;

/// N/200 ratio above which nitrogen starts to suppress potassium
pub const NK_ANTAGONISM_ONSET_RATIO: f32 = 1.5;

/// Uptake loss per unit of ratio above onset
pub const ANTAGONISM_SLOPE: f32 = 0.3;

/// Nitrogen at which the N/K uptake factor reaches 0.8
pub const NK_ANTAGONISM_NITROGEN_MG_KG: f32 =
    NK_REFERENCE_NITROGEN_MG_KG * (NK_ANTAGONISM_ONSET_RATIO + 0.2 / ANTAGONISM_SLOPE);

/// pH above which phosphorus fixation begins
pub const ALKALINE_PH_THRESHOLD: f32 = 7.5;

/// P/K ratio above which phosphorus competes with potassium
pub const PK_RATIO_THRESHOLD: f32 = 0.8;

/// P/K loss per unit of ratio above threshold
pub const PK_ANTAGONISM_SLOPE: f32 = 0.15;

/// Returned when the rules could be checked and none fired
pub const NO_ANTAGONISM: &str = "No nutrient antagonisms detected";

/// Interaction rules, in reporting order
pub static INTERACTION_RULES: [Rule; 7] = [
    Rule::new(
        Condition::Above(Measurement::Nitrogen, NK_ANTAGONISM_NITROGEN_MG_KG),
        "High nitrogen suppresses potassium uptake: reduce N, increase K",
    ),
    Rule::new(
        Condition::Above(Measurement::Ph, ALKALINE_PH_THRESHOLD),
        "Alkaline soil locks up phosphorus: acidify",
    ),
    Rule::new(
        Condition::RatioAbove(Measurement::Phosphorus, Measurement::Potassium, PK_RATIO_THRESHOLD),
        "High P/K ratio: reduce P, increase K",
    ),
    Rule::new(
        Condition::Above(Measurement::Potassium, 400.0),
        "High potassium competes with magnesium: apply MgSO4",
    ),
    Rule::new(
        Condition::Above(Measurement::Nitrogen, 300.0),
        "High nitrogen raises sulfur demand: apply sulfur",
    ),
    Rule::new(
        Condition::Above(Measurement::Phosphorus, 200.0),
        "High phosphorus blocks zinc: apply zinc",
    ),
    Rule::new(
        Condition::Below(Measurement::Ph, 6.0),
        "Acidic soil limits calcium and boron: apply lime and boron",
    ),
];

/// Detects nutrient antagonisms in a final reading
#[derive(Debug, Clone, Copy, Default)]
pub struct NutrientInteractionAnalyzer;

impl NutrientInteractionAnalyzer {
    /// Create the analyzer
    pub const fn new() -> Self {
        Self
    }

    /// Every matching interaction message in table order
    ///
    /// Rules over unavailable measurements are skipped. When at least one
    /// rule could be checked and none fired, the result holds the single
    /// [`NO_ANTAGONISM`] line; when none could be checked it is empty.
    pub fn analyze(&self, reading: &CompensatedReading, soil: SoilType) -> Guidance {
        let mut out = Guidance::new();
        let ctx = RuleContext::new(reading, soil);
        let fired = rules::evaluate(&INTERACTION_RULES, &ctx, &mut out);
        if fired == 0 && INTERACTION_RULES.iter().any(|r| r.when.evaluate(&ctx).is_some()) {
            out.push(NO_ANTAGONISM);
        }
        log_debug!("interaction analysis: {} rule(s) fired", fired);
        out
    }

    /// [`effective_uptake`] of a reading, `None` unless pH and NPK are available
    pub fn uptake(&self, reading: &CompensatedReading) -> Option<Npk> {
        let ph = reading.get(Measurement::Ph)?;
        let npk = Npk::new(
            reading.get(Measurement::Nitrogen)?,
            reading.get(Measurement::Phosphorus)?,
            reading.get(Measurement::Potassium)?,
        );
        Some(effective_uptake(npk, ph))
    }
}

impl Stage for NutrientInteractionAnalyzer {
    fn name(&self) -> &'static str {
        "interaction"
    }
}

/// Uptake-effective NPK after antagonism losses
///
/// Applied in order: the N/K factor on potassium, the alkaline factor on
/// phosphorus, then the P/K factor on potassium. Every factor is taken from
/// the input values, not from the partly reduced ones. No value goes below
/// zero.
pub fn effective_uptake(npk: Npk, ph: f32) -> Npk {
    let mut out = npk;

    let n_ratio = npk.nitrogen / NK_REFERENCE_NITROGEN_MG_KG;
    if n_ratio > NK_ANTAGONISM_ONSET_RATIO {
        out.potassium *= 1.0 - ANTAGONISM_SLOPE * (n_ratio - NK_ANTAGONISM_ONSET_RATIO);
    }

    if ph > ALKALINE_PH_THRESHOLD {
        out.phosphorus *= 1.0 - ANTAGONISM_SLOPE * (ph - ALKALINE_PH_THRESHOLD);
    }

    if npk.potassium > 0.0 {
        let pk = npk.phosphorus / npk.potassium;
        if pk > PK_RATIO_THRESHOLD {
            out.potassium *= 1.0 - PK_ANTAGONISM_SLOPE * (pk - PK_RATIO_THRESHOLD);
        }
    }

    out.nitrogen = out.nitrogen.max(0.0);
    out.phosphorus = out.phosphorus.max(0.0);
    out.potassium = out.potassium.max(0.0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{MeasurementSet, SensorReading};

    fn reading(ph: f32, n: f32, p: f32, k: f32) -> CompensatedReading {
        CompensatedReading::from_reading(&SensorReading::new(20.0, 30.0, 1200.0, ph, n, p, k, 0))
    }

    #[test]
    fn balanced_soil_has_no_antagonisms() {
        let out = NutrientInteractionAnalyzer::new().analyze(&reading(6.5, 150.0, 60.0, 200.0), SoilType::Loam);
        assert_eq!(out.as_slice(), &[NO_ANTAGONISM]);
    }

    #[test]
    fn nk_threshold() {
        assert!((NK_ANTAGONISM_NITROGEN_MG_KG - 433.33).abs() < 0.01);
        let analyzer = NutrientInteractionAnalyzer::new();
        let below = analyzer.analyze(&reading(6.5, 430.0, 60.0, 200.0), SoilType::Loam);
        assert!(!below.contains(INTERACTION_RULES[0].message));
        let above = analyzer.analyze(&reading(6.5, 440.0, 60.0, 200.0), SoilType::Loam);
        assert!(above.contains(INTERACTION_RULES[0].message));
    }

    #[test]
    fn all_matches_in_declaration_order() {
        // N 450, pH 7.8, P/K 250/300, K 300, P 250
        let out = NutrientInteractionAnalyzer::new().analyze(&reading(7.8, 450.0, 250.0, 300.0), SoilType::Loam);
        assert_eq!(
            out.as_slice(),
            &[
                INTERACTION_RULES[0].message,
                INTERACTION_RULES[1].message,
                INTERACTION_RULES[2].message,
                INTERACTION_RULES[4].message,
                INTERACTION_RULES[5].message,
            ]
        );
    }

    #[test]
    fn acidic_soil() {
        let out = NutrientInteractionAnalyzer::new().analyze(&reading(5.4, 150.0, 60.0, 200.0), SoilType::Peat);
        assert_eq!(out.as_slice(), &[INTERACTION_RULES[6].message]);
    }

    #[test]
    fn unavailable_nutrients_are_skipped() {
        let mut r = reading(6.5, 500.0, 300.0, 100.0);
        r.unavailable = MeasurementSet::npk();
        let out = NutrientInteractionAnalyzer::new().analyze(&r, SoilType::Loam);
        assert_eq!(out.as_slice(), &[NO_ANTAGONISM]);
    }

    #[test]
    fn nothing_measurable_gives_no_lines() {
        let mut r = reading(6.5, 150.0, 60.0, 200.0);
        r.unavailable = MeasurementSet::all();
        let analyzer = NutrientInteractionAnalyzer::new();
        assert!(analyzer.analyze(&r, SoilType::Clay).is_empty());
        assert_eq!(analyzer.uptake(&r), None);

        // pH gone too: only the NPK rules remain and none can be checked
        r.unavailable = MeasurementSet::npk();
        r.unavailable.insert(Measurement::Ph);
        assert!(analyzer.analyze(&r, SoilType::Loam).is_empty());
    }

    #[test]
    fn uptake_needs_ph_and_npk() {
        let analyzer = NutrientInteractionAnalyzer::new();
        let r = reading(8.0, 100.0, 100.0, 400.0);
        let out = analyzer.uptake(&r).unwrap();
        assert!((out.phosphorus - 85.0).abs() < 1e-3);

        let mut r = r;
        r.unavailable = MeasurementSet::npk();
        assert_eq!(analyzer.uptake(&r), None);
    }

    #[test]
    fn uptake_unchanged_without_antagonism() {
        let npk = Npk::new(150.0, 60.0, 200.0);
        assert_eq!(effective_uptake(npk, 6.5), npk);
    }

    #[test]
    fn uptake_losses() {
        // N/200 = 2.0 → K × 0.85
        let out = effective_uptake(Npk::new(400.0, 50.0, 200.0), 6.5);
        assert!((out.potassium - 170.0).abs() < 1e-3);
        assert_eq!(out.nitrogen, 400.0);

        // pH 8.0 → P × 0.85
        let out = effective_uptake(Npk::new(100.0, 100.0, 400.0), 8.0);
        assert!((out.phosphorus - 85.0).abs() < 1e-3);

        // P/K = 1.0 → K × 0.97
        let out = effective_uptake(Npk::new(100.0, 200.0, 200.0), 6.5);
        assert!((out.potassium - 194.0).abs() < 1e-3);
    }

    #[test]
    fn pk_ratio_uses_input_values() {
        // N/200 = 2.0 → K × 0.85 = 170; P/K from the input 180/200 = 0.9 → × 0.985
        let out = effective_uptake(Npk::new(400.0, 180.0, 200.0), 6.5);
        assert!((out.potassium - 167.45).abs() < 1e-2, "k = {}", out.potassium);

        // alkaline loss on P must not lower the P/K ratio: 200/200 → × 0.97
        let out = effective_uptake(Npk::new(100.0, 200.0, 200.0), 8.0);
        assert!((out.phosphorus - 170.0).abs() < 1e-3);
        assert!((out.potassium - 194.0).abs() < 1e-3);
    }

    #[test]
    fn uptake_never_negative() {
        let out = effective_uptake(Npk::new(1999.0, 1999.0, 10.0), 9.0);
        assert!(out.nitrogen >= 0.0 && out.phosphorus >= 0.0 && out.potassium >= 0.0);

        let out = effective_uptake(Npk::new(100.0, 50.0, 0.0), 6.5);
        assert_eq!(out.potassium, 0.0);
    }
}
