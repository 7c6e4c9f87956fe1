//! Seasonal Adjustment Table
//!
//! Nutrient demand and mineralisation follow the season: spring flushes
//! nitrogen, summer draws potassium for fruiting, autumn favours phosphorus
//! for root growth, winter slows nitrogen turnover.
//!
//! | Season | N | P | K |
//! |---|---|---|---|
//! | Spring | 1.15 | 1.10 | 1.12 |
//! | Summer | 1.08 | 1.05 | 1.18 |
//! | Autumn | 1.02 | 1.12 | 1.15 |
//! | Winter | 0.85 | 1.08 | 1.10 |
//!
//! An unknown season id resolves to [`SeasonalFactors::IDENTITY`].

use core::fmt;

use crate::errors::{ProcessingError, ProcessingResult};

/// Calendar season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Season {
    /// March to May
    Spring = 0,
    /// June to August
    Summer = 1,
    /// September to November
    Autumn = 2,
    /// December to February
    Winter = 3,
}

impl Season {
    /// All seasons in id order
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Season for a stored id
    pub fn from_id(id: u8) -> ProcessingResult<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(ProcessingError::UnknownSeason { id })
    }

    /// Stored id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Parse a name; `fall` is accepted for autumn
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("fall") {
            return Some(Self::Autumn);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|season| season.name().eq_ignore_ascii_case(name))
    }

    /// Northern-hemisphere season for a month (1 = January)
    pub fn from_month(month: u8) -> Option<Self> {
        match month {
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Autumn),
            12 | 1 | 2 => Some(Self::Winter),
            _ => None,
        }
    }

    /// Nutrient factors for this season
    pub fn factors(self) -> &'static SeasonalFactors {
        &SEASONAL_FACTORS[self as usize]
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-season nutrient multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeasonalFactors {
    /// Multiplies nitrogen
    pub nitrogen: f32,
    /// Multiplies phosphorus
    pub phosphorus: f32,
    /// Multiplies potassium
    pub potassium: f32,
}

impl SeasonalFactors {
    /// No seasonal effect
    pub const IDENTITY: SeasonalFactors = SeasonalFactors::new(1.0, 1.0, 1.0);

    const fn new(nitrogen: f32, phosphorus: f32, potassium: f32) -> Self {
        Self { nitrogen, phosphorus, potassium }
    }
}

/// Season table, indexed by [`Season::id`]
pub static SEASONAL_FACTORS: [SeasonalFactors; 4] = [
    SeasonalFactors::new(1.15, 1.10, 1.12),
    SeasonalFactors::new(1.08, 1.05, 1.18),
    SeasonalFactors::new(1.02, 1.12, 1.15),
    SeasonalFactors::new(0.85, 1.08, 1.10),
];

/// Factors for a stored id, identity when unknown
pub fn lookup_or_identity(id: u8) -> (&'static SeasonalFactors, Option<ProcessingError>) {
    match Season::from_id(id) {
        Ok(season) => (season.factors(), None),
        Err(err) => {
            log_warn!("season id {} unknown, seasonal factors disabled", id);
            (&SeasonalFactors::IDENTITY, Some(err))
        }
    }
}
