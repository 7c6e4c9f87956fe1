//! Soil Profile Table
//!
//! ## Overview
//!
//! Thirteen soil types with the coefficients the compensation models need.
//! The table is compiled-in and indexed by the soil id the device stores in
//! its configuration (0..=12), so lookups are a bounds check and an array
//! index.
//!
//! ## Coefficients
//!
//! | Field | Meaning | Range |
//! |---|---|---|
//! | `ec_coefficient` | relative conductivity contribution of the matrix | 0–1 |
//! | `ph_buffer_capacity` | resistance to pH change (clay, alkaline soils high) | 0–1 |
//! | `water_holding_capacity` | field capacity as a volume fraction (θ_fc) | 0–1 |
//! | `bulk_density` | dry bulk density, g/cm³ | > 0 |
//! | `archie_m` | moisture exponent of the EC model | > 0 |
//! | `archie_n` | temperature exponent of the EC model | > 0 |
//! | `npk_temperature` | δ per nutrient, 1/°C | ~0.002–0.006 |
//! | `npk_moisture` | ε per nutrient, 1/% | ~0.006–0.015 |
//!
//! Sandy soils drain fast (low θ_fc, low m); clays hold water and buffer pH
//! (high θ_fc, high m, n); peat and organic media hold the most water at the
//! lowest density.
//!
//! ## Fallback
//!
//! [`lookup`] fails with `UnknownSoilType` for ids past the end of the
//! table. The pipeline then uses [`SoilType::Loam`], the neutral default.

use core::fmt;

use crate::errors::{ProcessingError, ProcessingResult};

/// Soil texture classes known to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum SoilType {
    /// Coarse sand
    Sand = 0,
    /// Loam, the neutral default
    Loam = 1,
    /// Peat
    Peat = 2,
    /// Clay
    Clay = 3,
    /// Sand and peat mix (potting substrate)
    SandPeat = 4,
    /// Silt
    Silt = 5,
    /// Clay loam
    ClayLoam = 6,
    /// Organic-rich substrate
    Organic = 7,
    /// Sandy loam
    SandyLoam = 8,
    /// Silty loam
    SiltyLoam = 9,
    /// Loamy clay
    LoamyClay = 10,
    /// Saline soil
    Saline = 11,
    /// Alkaline (calcareous) soil
    Alkaline = 12,
}

impl SoilType {
    /// All soil types in id order
    pub const ALL: [SoilType; 13] = [
        SoilType::Sand,
        SoilType::Loam,
        SoilType::Peat,
        SoilType::Clay,
        SoilType::SandPeat,
        SoilType::Silt,
        SoilType::ClayLoam,
        SoilType::Organic,
        SoilType::SandyLoam,
        SoilType::SiltyLoam,
        SoilType::LoamyClay,
        SoilType::Saline,
        SoilType::Alkaline,
    ];

    /// Soil for a stored id
    pub fn from_id(id: u8) -> ProcessingResult<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(ProcessingError::UnknownSoilType { id })
    }

    /// Stored id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Canonical snake_case name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sand => "sand",
            Self::Loam => "loam",
            Self::Peat => "peat",
            Self::Clay => "clay",
            Self::SandPeat => "sand_peat",
            Self::Silt => "silt",
            Self::ClayLoam => "clay_loam",
            Self::Organic => "organic",
            Self::SandyLoam => "sandy_loam",
            Self::SiltyLoam => "silty_loam",
            Self::LoamyClay => "loamy_clay",
            Self::Saline => "saline",
            Self::Alkaline => "alkaline",
        }
    }

    /// Parse a name; accepts `clay_loam`, `CLAY_LOAM` and `clay-loam`,
    /// plus the legacy key `sandpeat`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("sandpeat") {
            return Some(Self::SandPeat);
        }
        Self::ALL.iter().copied().find(|soil| {
            let canonical = soil.name();
            canonical.len() == name.len()
                && canonical.bytes().zip(name.bytes()).all(|(c, n)| {
                    c == n.to_ascii_lowercase() || (c == b'_' && n == b'-')
                })
        })
    }

    /// Coefficients for this soil
    pub fn profile(self) -> &'static SoilProfile {
        &SOIL_PROFILES[self as usize]
    }

    /// Clay-family soils (slow drainage, micronutrient fixation)
    pub const CLAY_FAMILY: &'static [SoilType] =
        &[SoilType::Clay, SoilType::ClayLoam, SoilType::LoamyClay];

    /// Sand-family soils (fast leaching)
    pub const SAND_FAMILY: &'static [SoilType] = &[SoilType::Sand, SoilType::SandyLoam];

    /// Peat-based media
    pub const PEAT_FAMILY: &'static [SoilType] = &[SoilType::Peat, SoilType::SandPeat];
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per macro-nutrient
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NutrientCoefficients {
    /// Nitrogen
    pub nitrogen: f32,
    /// Phosphorus
    pub phosphorus: f32,
    /// Potassium
    pub potassium: f32,
}

impl NutrientCoefficients {
    const fn new(nitrogen: f32, phosphorus: f32, potassium: f32) -> Self {
        Self { nitrogen, phosphorus, potassium }
    }
}

/// Compensation coefficients for one soil type
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SoilProfile {
    /// Soil this row describes
    pub soil: SoilType,
    /// Relative matrix conductivity, 0–1
    pub ec_coefficient: f32,
    /// pH buffering, 0–1
    pub ph_buffer_capacity: f32,
    /// Field capacity as a volume fraction, 0–1
    pub water_holding_capacity: f32,
    /// Dry bulk density, g/cm³
    pub bulk_density: f32,
    /// EC moisture exponent
    pub archie_m: f32,
    /// EC temperature exponent
    pub archie_n: f32,
    /// NPK temperature coefficients δ, 1/°C
    pub npk_temperature: NutrientCoefficients,
    /// NPK moisture coefficients ε, 1/%
    pub npk_moisture: NutrientCoefficients,
}

impl SoilProfile {
    /// Field capacity in percent (θ_fc of the EC model)
    pub fn field_capacity_pct(&self) -> f32 {
        self.water_holding_capacity * 100.0
    }
}

macro_rules! soil {
    ($soil:ident, ec: $ec:expr, buffer: $buf:expr, fc: $fc:expr, density: $rho:expr,
     m: $m:expr, n: $n:expr, delta: ($dn:expr, $dp:expr, $dk:expr),
     eps: ($en:expr, $ep:expr, $ek:expr)) => {
        SoilProfile {
            soil: SoilType::$soil,
            ec_coefficient: $ec,
            ph_buffer_capacity: $buf,
            water_holding_capacity: $fc,
            bulk_density: $rho,
            archie_m: $m,
            archie_n: $n,
            npk_temperature: NutrientCoefficients::new($dn, $dp, $dk),
            npk_moisture: NutrientCoefficients::new($en, $ep, $ek),
        }
    };
}

/// Soil coefficient table, indexed by [`SoilType::id`]
pub static SOIL_PROFILES: [SoilProfile; 13] = [
    soil!(Sand, ec: 0.15, buffer: 0.30, fc: 0.10, density: 1.60, m: 1.3, n: 2.0,
          delta: (0.0041, 0.0053, 0.0032), eps: (0.010, 0.008, 0.012)),
    soil!(Loam, ec: 0.30, buffer: 0.60, fc: 0.20, density: 1.40, m: 1.5, n: 2.0,
          delta: (0.0038, 0.0049, 0.0029), eps: (0.009, 0.007, 0.011)),
    soil!(Peat, ec: 0.10, buffer: 0.20, fc: 0.45, density: 0.30, m: 1.8, n: 2.2,
          delta: (0.0028, 0.0035, 0.0018), eps: (0.012, 0.009, 0.015)),
    soil!(Clay, ec: 0.45, buffer: 0.80, fc: 0.35, density: 1.20, m: 2.0, n: 2.5,
          delta: (0.0032, 0.0042, 0.0024), eps: (0.008, 0.006, 0.010)),
    soil!(SandPeat, ec: 0.18, buffer: 0.40, fc: 0.30, density: 0.80, m: 1.6, n: 2.1,
          delta: (0.0040, 0.0051, 0.0031), eps: (0.010, 0.008, 0.012)),
    soil!(Silt, ec: 0.25, buffer: 0.50, fc: 0.32, density: 1.30, m: 1.6, n: 2.0,
          delta: (0.0037, 0.0048, 0.0028), eps: (0.009, 0.007, 0.011)),
    soil!(ClayLoam, ec: 0.38, buffer: 0.70, fc: 0.35, density: 1.25, m: 1.8, n: 2.3,
          delta: (0.0035, 0.0045, 0.0026), eps: (0.0085, 0.0065, 0.0105)),
    soil!(Organic, ec: 0.08, buffer: 0.25, fc: 0.50, density: 0.25, m: 1.9, n: 2.2,
          delta: (0.0030, 0.0038, 0.0020), eps: (0.011, 0.0085, 0.014)),
    soil!(SandyLoam, ec: 0.22, buffer: 0.45, fc: 0.18, density: 1.50, m: 1.4, n: 2.0,
          delta: (0.0040, 0.0051, 0.0031), eps: (0.0095, 0.0075, 0.0115)),
    soil!(SiltyLoam, ec: 0.28, buffer: 0.55, fc: 0.30, density: 1.35, m: 1.55, n: 2.0,
          delta: (0.0038, 0.0049, 0.0029), eps: (0.009, 0.007, 0.011)),
    soil!(LoamyClay, ec: 0.42, buffer: 0.75, fc: 0.38, density: 1.15, m: 1.9, n: 2.4,
          delta: (0.0034, 0.0044, 0.0025), eps: (0.0082, 0.0062, 0.0102)),
    soil!(Saline, ec: 0.60, buffer: 0.40, fc: 0.22, density: 1.45, m: 1.5, n: 2.0,
          delta: (0.0038, 0.0049, 0.0029), eps: (0.009, 0.007, 0.011)),
    soil!(Alkaline, ec: 0.35, buffer: 0.90, fc: 0.25, density: 1.30, m: 1.6, n: 2.1,
          delta: (0.0036, 0.0047, 0.0027), eps: (0.009, 0.007, 0.011)),
];

/// Profile for a stored soil id
pub fn lookup(id: u8) -> ProcessingResult<&'static SoilProfile> {
    SoilType::from_id(id).map(SoilType::profile)
}

/// Profile for a stored soil id, falling back to loam
///
/// The error is returned alongside so the caller can raise an alert.
pub fn lookup_or_loam(id: u8) -> (&'static SoilProfile, Option<ProcessingError>) {
    match lookup(id) {
        Ok(profile) => (profile, None),
        Err(err) => {
            log_warn!("soil id {} unknown, falling back to loam", id);
            (SoilType::Loam.profile(), Some(err))
        }
    }
}

/// Volumetric water content (%) to available soil moisture (% of field capacity)
pub fn vwc_to_asm(vwc_pct: f32, profile: &SoilProfile) -> f32 {
    let fc = profile.field_capacity_pct();
    if fc <= 0.0 {
        return 0.0;
    }
    (vwc_pct / fc * 100.0).max(0.0)
}

/// Available soil moisture (% of field capacity) to volumetric water content (%)
pub fn asm_to_vwc(asm_pct: f32, profile: &SoilProfile) -> f32 {
    (asm_pct * profile.field_capacity_pct() / 100.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_id() {
        for (idx, profile) in SOIL_PROFILES.iter().enumerate() {
            assert_eq!(profile.soil.id() as usize, idx);
            assert_eq!(SoilType::from_id(idx as u8), Ok(profile.soil));
        }
    }

    #[test]
    fn normalised_coefficients_in_unit_interval() {
        for p in &SOIL_PROFILES {
            for value in [p.ec_coefficient, p.ph_buffer_capacity, p.water_holding_capacity] {
                assert!((0.0..=1.0).contains(&value), "{}: {}", p.soil, value);
            }
            assert!(p.bulk_density > 0.0);
            assert!(p.archie_m > 0.0 && p.archie_n > 0.0);
        }
    }

    #[test]
    fn nutrient_coefficients_are_small_and_positive() {
        for p in &SOIL_PROFILES {
            for d in [p.npk_temperature.nitrogen, p.npk_temperature.phosphorus, p.npk_temperature.potassium] {
                assert!(d > 0.0 && d < 0.01, "{}: delta {}", p.soil, d);
            }
            for e in [p.npk_moisture.nitrogen, p.npk_moisture.phosphorus, p.npk_moisture.potassium] {
                assert!(e > 0.0 && e < 0.02, "{}: epsilon {}", p.soil, e);
            }
        }
    }

    #[test]
    fn loam_matches_reference_parameters() {
        let loam = SoilType::Loam.profile();
        assert_eq!(loam.field_capacity_pct(), 20.0);
        assert_eq!(loam.archie_m, 1.5);
        assert_eq!(loam.archie_n, 2.0);
        assert_eq!(loam.npk_temperature.nitrogen, 0.0038);
        assert_eq!(loam.npk_moisture.nitrogen, 0.009);
    }

    #[test]
    fn unknown_id_falls_back_to_loam() {
        assert_eq!(lookup(13), Err(ProcessingError::UnknownSoilType { id: 13 }));

        let (profile, err) = lookup_or_loam(200);
        assert_eq!(profile.soil, SoilType::Loam);
        assert_eq!(err, Some(ProcessingError::UnknownSoilType { id: 200 }));

        let (profile, err) = lookup_or_loam(3);
        assert_eq!(profile.soil, SoilType::Clay);
        assert!(err.is_none());
    }

    #[test]
    fn names_parse_in_several_spellings() {
        assert_eq!(SoilType::from_name("clay_loam"), Some(SoilType::ClayLoam));
        assert_eq!(SoilType::from_name("CLAY_LOAM"), Some(SoilType::ClayLoam));
        assert_eq!(SoilType::from_name("clay-loam"), Some(SoilType::ClayLoam));
        assert_eq!(SoilType::from_name("gravel"), None);
        assert_eq!(SoilType::from_name("sandpeat"), Some(SoilType::SandPeat));
        assert_eq!(SoilType::from_name("SANDPEAT"), Some(SoilType::SandPeat));
        assert_eq!(SoilType::from_name("sand_peat"), Some(SoilType::SandPeat));
        for soil in SoilType::ALL {
            assert_eq!(SoilType::from_name(soil.name()), Some(soil));
        }
    }

    #[test]
    fn moisture_conversions() {
        let loam = SoilType::Loam.profile();
        assert!((vwc_to_asm(15.0, loam) - 75.0).abs() < 1e-4);
        assert!((asm_to_vwc(75.0, loam) - 15.0).abs() < 1e-4);
        assert_eq!(vwc_to_asm(-3.0, loam), 0.0);
    }
}
