//! Crop Tables
//!
//! Optimum values and rule lists for every [`Crop`], plus the deviation and
//! soil-texture rules shared by all crops. `CROP_PROFILES` is indexed by the
//! `Crop` discriminant, `SOIL_TARGET_ADJUSTMENTS` by the `SoilType` id.

use super::{Crop, CropProfile, OptimalRange, SecondaryNutrient, SoilTargetAdjustment};
use crate::{
    reading::Measurement::{Ec, Humidity, Nitrogen, Ph, Phosphorus, Potassium, Temperature},
    rules::{Condition::*, Rule},
    soil::SoilType,
};

use SecondaryNutrient::{Ca, Fe, Mg, Mn, Mo, Zn, B, S};

/// Deviations from the crop optimum, checked for every crop
pub static DEVIATION_RULES: [Rule; 11] = [
    Rule::new(BelowOptimal(Temperature, 5.0), "Temperature below optimum: add heating or mulch"),
    Rule::new(AboveOptimal(Temperature, 5.0), "Temperature above optimum: ventilate, shade and irrigate"),
    Rule::new(BelowOptimal(Humidity, 10.0), "Moisture low: increase irrigation, mulch the soil"),
    Rule::new(AboveOptimal(Humidity, 10.0), "Moisture high: improve drainage, reduce irrigation"),
    Rule::new(BelowOptimal(Ec, 500.0), "EC low: apply a complete fertilizer"),
    Rule::new(AboveOptimal(Ec, 500.0), "EC high, salinity risk: leach the soil, reduce fertilizer"),
    Rule::new(BelowOptimal(Ph, 0.5), "pH too acidic: apply lime or dolomite"),
    Rule::new(AboveOptimal(Ph, 0.5), "pH too alkaline: apply sulfur or acidifying fertilizer"),
    Rule::new(BelowOptimal(Nitrogen, 20.0), "Nitrogen deficient: apply nitrogen fertilizer"),
    Rule::new(BelowOptimal(Phosphorus, 15.0), "Phosphorus deficient: apply superphosphate"),
    Rule::new(BelowOptimal(Potassium, 20.0), "Potassium deficient: apply potassium sulfate"),
];

/// Soil-texture rules, checked last for every crop
pub static SOIL_RULES: [Rule; 3] = [
    Rule::new(SoilIs(SoilType::CLAY_FAMILY), "Clay soil: use chelated micronutrients"),
    Rule::new(SoilIs(SoilType::SAND_FAMILY), "Sandy soil: fertilize in frequent small doses"),
    Rule::new(
        All(&[SoilIs(&[SoilType::Peat]), Below(Phosphorus, 30.0)]),
        "Peat soil with phosphorus deficiency: apply phosphate fertilizer",
    ),
];

static TOMATO: [Rule; 4] = [
    Rule::new(Below(Ph, 6.5), "Tomato: apply calcium nitrate against calcium deficiency"),
    Rule::new(All(&[Above(Nitrogen, 150.0), Below(Phosphorus, 100.0)]), "Tomato: balance N/P for fruiting"),
    Rule::new(Any(&[Above(Ph, 7.0), Above(Potassium, 300.0)]), "Tomato: apply boron"),
    Rule::new(Above(Ec, 2500.0), "Tomato: blossom-end rot risk, apply calcium and reduce EC"),
];

static CUCUMBER: [Rule; 2] = [
    Rule::new(Below(Potassium, 200.0), "Cucumber: apply potassium nitrate"),
    Rule::new(Above(Ph, 7.0), "Cucumber: apply boron"),
];

static PEPPER: [Rule; 3] = [
    Rule::new(Above(Phosphorus, 100.0), "Pepper: apply Zn-EDTA against zinc lock-up"),
    Rule::new(Below(Ph, 6.5), "Pepper: apply calcium"),
    Rule::new(Any(&[Above(Ph, 7.0), Above(Potassium, 300.0)]), "Pepper: apply boron"),
];

static LETTUCE: [Rule; 2] = [
    Rule::new(Above(Nitrogen, 250.0), "Lettuce: nitrate accumulation risk, switch to ammonium sulfate"),
    Rule::new(Above(Ph, 7.0), "Lettuce: apply Fe-EDTA against chlorosis"),
];

static BLUEBERRY: [Rule; 3] = [
    Rule::new(Above(Ph, 5.5), "Blueberry: acidify the soil"),
    Rule::new(Above(Ph, 5.0), "Blueberry: apply Fe-EDTA"),
    Rule::new(All(&[Below(Ph, 5.5), Above(Nitrogen, 100.0)]), "Blueberry: apply manganese sulfate"),
];

static GRAPE: [Rule; 2] = [
    Rule::new(Below(Potassium, 200.0), "Grape: apply potassium sulfate"),
    Rule::new(Above(Ph, 7.0), "Grape: apply boron"),
];

static STRAWBERRY: [Rule; 3] = [
    Rule::new(Below(Ph, 6.0), "Strawberry: apply calcium nitrate"),
    Rule::new(Any(&[Above(Ph, 6.5), Above(Potassium, 200.0)]), "Strawberry: apply boron"),
    Rule::new(Above(Phosphorus, 80.0), "Strawberry: apply zinc"),
];

static POME: [Rule; 3] = [
    Rule::new(Any(&[Below(Ph, 6.5), Above(Potassium, 250.0)]), "Pome fruit: apply calcium against bitter pit"),
    Rule::new(Above(Ph, 7.0), "Pome fruit: apply boron"),
    Rule::new(Any(&[Above(Ph, 7.0), Above(Phosphorus, 60.0)]), "Pome fruit: apply zinc sulfate"),
];

static RASPBERRY: [Rule; 3] = [
    Rule::new(Above(Ph, 6.5), "Raspberry: apply iron chelate"),
    Rule::new(All(&[Below(Ph, 5.5), Above(Nitrogen, 150.0)]), "Raspberry: apply manganese"),
    Rule::new(Above(Phosphorus, 70.0), "Raspberry: apply zinc"),
];

static SPINACH: [Rule; 3] = [
    Rule::new(Any(&[Above(Ph, 7.0), Below(Nitrogen, 200.0)]), "Spinach: apply iron chelate"),
    Rule::new(Above(Potassium, 400.0), "Spinach: apply magnesium sulfate"),
    Rule::new(Below(Nitrogen, 200.0), "Spinach: increase nitrogen"),
];

static BASIL: [Rule; 3] = [
    Rule::new(Below(Potassium, 200.0), "Basil: apply potassium nitrate"),
    Rule::new(Any(&[Above(Potassium, 300.0), Above(Ph, 6.5)]), "Basil: apply magnesium sulfate"),
    Rule::new(Above(Ph, 6.5), "Basil: apply boron"),
];

static CANNABIS: [Rule; 5] = [
    Rule::new(Below(Nitrogen, 160.0), "Cannabis: increase nitrogen for vegetative growth"),
    Rule::new(Below(Phosphorus, 40.0), "Cannabis: increase phosphorus for flowering"),
    Rule::new(Below(Potassium, 200.0), "Cannabis: increase potassium"),
    Rule::new(Below(Ph, 6.0), "Cannabis: apply calcium"),
    Rule::new(Above(Potassium, 300.0), "Cannabis: apply magnesium sulfate"),
];

static WHEAT: [Rule; 4] = [
    Rule::new(Below(Nitrogen, 200.0), "Wheat: top-dress with nitrogen"),
    Rule::new(Below(Phosphorus, 50.0), "Wheat: apply phosphorus"),
    Rule::new(All(&[Above(Nitrogen, 250.0), Above(Ph, 7.0)]), "Wheat: apply sulfur"),
    Rule::new(Below(Potassium, 150.0), "Wheat: apply potassium chloride"),
];

static POTATO: [Rule; 5] = [
    Rule::new(Below(Potassium, 250.0), "Potato: apply potassium nitrate"),
    Rule::new(Any(&[Above(Potassium, 400.0), Below(Ph, 6.0)]), "Potato: apply magnesium sulfate"),
    Rule::new(Below(Ph, 5.8), "Potato: apply calcium"),
    Rule::new(All(&[Above(Nitrogen, 200.0), Below(Phosphorus, 50.0)]), "Potato: balance N/P for tuber set"),
    Rule::new(Above(Nitrogen, 250.0), "Potato: excess nitrogen delays tuber formation"),
];

static KALE: [Rule; 3] = [
    Rule::new(Below(Ph, 6.0), "Kale: apply calcium"),
    Rule::new(All(&[Above(Nitrogen, 200.0), Above(Ph, 6.5)]), "Kale: apply sulfur"),
    Rule::new(Any(&[Above(Ph, 7.0), Above(Potassium, 350.0)]), "Kale: apply boron"),
];

static BLACKBERRY: [Rule; 3] = [
    Rule::new(Above(Ph, 7.0), "Blackberry: apply iron chelate"),
    Rule::new(Below(Ph, 5.8), "Blackberry: apply manganese"),
    Rule::new(Any(&[Above(Ph, 6.8), Above(Potassium, 300.0)]), "Blackberry: apply boron"),
];

static SOYBEAN: [Rule; 4] = [
    Rule::new(Below(Phosphorus, 40.0), "Soybean: apply phosphorus"),
    Rule::new(Below(Potassium, 200.0), "Soybean: apply potassium chloride"),
    Rule::new(All(&[Below(Nitrogen, 80.0), Below(Ph, 6.0)]), "Soybean: apply molybdenum for nodulation"),
    Rule::new(Above(Nitrogen, 120.0), "Soybean: excess nitrogen suppresses nodulation"),
];

static CARROT: [Rule; 4] = [
    Rule::new(Any(&[Above(Ph, 7.0), Above(Potassium, 300.0)]), "Carrot: apply boron"),
    Rule::new(Below(Ph, 6.0), "Carrot: apply calcium"),
    Rule::new(Below(Potassium, 200.0), "Carrot: apply potassium nitrate"),
    Rule::new(Above(Nitrogen, 180.0), "Carrot: excess nitrogen causes forked roots"),
];

macro_rules! crop {
    ($crop:ident, $t:expr, $hum:expr, $ec:expr, $ph:expr, $n:expr, $p:expr, $k:expr, [$($nut:ident),*], $rules:expr) => {
        CropProfile {
            crop: Crop::$crop,
            optimal: OptimalRange {
                temperature: $t,
                humidity: $hum,
                ec: $ec,
                ph: $ph,
                nitrogen: $n,
                phosphorus: $p,
                potassium: $k,
            },
            critical_nutrients: &[$($nut),*],
            rules: $rules,
        }
    };
}

/// Profiles indexed by `Crop as usize`
pub static CROP_PROFILES: [CropProfile; 24] = [
    //     crop        T     hum   EC      pH   N      P     K
    crop!(Generic,    22.0, 70.0, 1500.0, 6.5, 150.0, 60.0, 200.0, [], &[]),
    crop!(Tomato,     24.0, 75.0, 2000.0, 6.5, 200.0, 80.0, 300.0, [Ca, Mg, B], &TOMATO),
    crop!(Cucumber,   26.0, 80.0, 1800.0, 6.5, 160.0, 60.0, 225.0, [Mg, B], &CUCUMBER),
    crop!(Pepper,     27.0, 75.0, 2100.0, 6.5, 140.0, 50.0, 250.0, [Ca, Zn, B], &PEPPER),
    crop!(Lettuce,    18.0, 85.0, 1500.0, 6.5, 115.0, 35.0, 175.0, [Ca, Fe], &LETTUCE),
    crop!(Blueberry,  20.0, 75.0, 1200.0, 5.0,  75.0, 30.0,  60.0, [Fe, Mn, S], &BLUEBERRY),
    crop!(Lawn,       20.0, 60.0, 1000.0, 6.5, 100.0, 40.0,  80.0, [Fe, S], &[]),
    crop!(Grape,      24.0, 65.0, 1500.0, 6.5, 120.0, 50.0, 150.0, [Mg, B, Zn], &GRAPE),
    crop!(Conifer,    18.0, 65.0, 1000.0, 5.8,  60.0, 25.0,  50.0, [Mg, Fe], &[]),
    crop!(Strawberry, 22.0, 80.0, 1600.0, 6.0, 130.0, 55.0, 150.0, [Ca, B, Zn], &STRAWBERRY),
    crop!(Apple,      20.0, 70.0, 1200.0, 6.5, 110.0, 45.0, 130.0, [Ca, B, Zn], &POME),
    crop!(Pear,       20.0, 70.0, 1200.0, 6.5, 110.0, 45.0, 130.0, [Ca, B, Zn], &POME),
    crop!(Cherry,     22.0, 70.0, 1300.0, 6.5, 120.0, 50.0, 140.0, [Ca, B], &[]),
    crop!(Raspberry,  20.0, 75.0, 1100.0, 6.0, 100.0, 40.0, 120.0, [Fe, Mn, Zn], &RASPBERRY),
    crop!(Currant,    18.0, 75.0, 1000.0, 6.0,  80.0, 35.0, 100.0, [Mg], &[]),
    crop!(Spinach,    18.0, 80.0, 1600.0, 6.5, 200.0, 60.0, 250.0, [Fe, Mg], &SPINACH),
    crop!(Basil,      24.0, 75.0, 1400.0, 6.2, 160.0, 50.0, 220.0, [Mg, B], &BASIL),
    crop!(Cannabis,   25.0, 65.0, 1800.0, 6.3, 180.0, 60.0, 250.0, [Ca, Mg], &CANNABIS),
    crop!(Wheat,      18.0, 60.0, 1500.0, 6.5, 220.0, 55.0, 170.0, [S, Zn], &WHEAT),
    crop!(Potato,     18.0, 70.0, 1300.0, 5.8, 180.0, 60.0, 300.0, [Mg, Ca], &POTATO),
    crop!(Kale,       18.0, 75.0, 1500.0, 6.5, 180.0, 55.0, 220.0, [Ca, S, B], &KALE),
    crop!(Blackberry, 21.0, 70.0, 1200.0, 6.2, 110.0, 45.0, 140.0, [Fe, Mn, B], &BLACKBERRY),
    crop!(Soybean,    24.0, 70.0, 1200.0, 6.5,  90.0, 50.0, 220.0, [Mo, Fe], &SOYBEAN),
    crop!(Carrot,     18.0, 75.0, 1200.0, 6.5, 140.0, 55.0, 220.0, [B, Ca], &CARROT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optima_are_physical() {
        for profile in &CROP_PROFILES {
            let o = &profile.optimal;
            assert!((3.0..=9.0).contains(&o.ph), "{}", profile.crop);
            assert!((0.0..=100.0).contains(&o.humidity), "{}", profile.crop);
            assert!(o.ec > 0.0 && o.nitrogen > 0.0 && o.phosphorus > 0.0 && o.potassium > 0.0);
        }
    }

    #[test]
    fn acid_lovers() {
        assert_eq!(CROP_PROFILES[Crop::Blueberry as usize].optimal.ph, 5.0);
        assert!(CROP_PROFILES[Crop::Conifer as usize].optimal.ph < 6.0);
    }

    #[test]
    fn rule_messages_are_unique_per_crop() {
        for profile in &CROP_PROFILES {
            for (i, a) in profile.rules.iter().enumerate() {
                for b in &profile.rules[i + 1..] {
                    assert_ne!(a.message, b.message, "{}", profile.crop);
                }
            }
        }
    }
}

macro_rules! soil_targets {
    ($soil:ident, $hum:expr, $ec:expr, $ph:expr, $n:expr, $p:expr, $k:expr) => {
        SoilTargetAdjustment {
            soil: SoilType::$soil,
            humidity: $hum,
            ec: $ec,
            ph: $ph,
            nitrogen: $n,
            phosphorus: $p,
            potassium: $k,
        }
    };
}

/// Crop target shifts indexed by `SoilType as usize`
///
/// Light soils leach, so nutrient targets go up and moisture targets down;
/// heavy soils hold water and fix phosphorus.
pub static SOIL_TARGET_ADJUSTMENTS: [SoilTargetAdjustment; 13] = [
    //            soil        hum    EC      pH    N     P     K
    soil_targets!(Sand,       -5.0, -200.0,  0.0, 1.25, 1.15, 1.20),
    soil_targets!(Loam,        0.0,    0.0,  0.0, 1.00, 1.00, 1.00),
    soil_targets!(Peat,       10.0, -100.0, -0.5, 1.15, 1.10, 1.05),
    soil_targets!(Clay,       10.0, -400.0,  0.0, 0.90, 0.85, 0.92),
    soil_targets!(SandPeat,    2.0,  -50.0, -0.2, 1.10, 1.05, 1.02),
    soil_targets!(Silt,        5.0, -150.0,  0.0, 1.05, 1.08, 1.03),
    soil_targets!(ClayLoam,    8.0, -300.0,  0.0, 0.95, 0.90, 0.96),
    soil_targets!(Organic,    15.0, -200.0, -0.8, 1.20, 1.15, 1.10),
    soil_targets!(SandyLoam,  -3.0, -250.0,  0.0, 1.18, 1.12, 1.15),
    soil_targets!(SiltyLoam,   6.0, -180.0,  0.0, 1.02, 1.06, 1.04),
    soil_targets!(LoamyClay,   7.0, -350.0,  0.0, 0.92, 0.88, 0.94),
    soil_targets!(Saline,     -5.0,  800.0,  0.5, 0.85, 0.90, 0.80),
    soil_targets!(Alkaline,    2.0, -100.0,  1.0, 0.90, 0.75, 0.95),
];
