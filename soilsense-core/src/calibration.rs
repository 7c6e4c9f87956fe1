//! Multi-Point Calibration
//!
//! ## Overview
//!
//! Each probe channel can carry a calibration table: pairs of
//! `(expected, measured)` values recorded against reference standards.
//! Applying a table maps a raw reading onto the reference scale with
//! piecewise-linear interpolation.
//!
//! ```text
//! expected
//!    ^            /
//!    |     *-----*        * = calibration point
//!    |    /               - = interpolated segment
//!    |   *                / = extrapolated with nearest slope
//!    |  /
//!    +-------------------> measured
//! ```
//!
//! ## Rules
//!
//! - Empty table: the value passes through with status
//!   [`CalibrationStatus::Uncalibrated`]. Not an error.
//! - One point: constant offset `raw + (expected - measured)`.
//! - Raw value equal to a point's `measured`: that point's `expected`,
//!   bit-for-bit.
//! - Between points: linear interpolation, bounded by the segment's expected
//!   values so a monotonic table gives a monotonic mapping.
//! - Outside the table: linear extrapolation with the nearest segment's
//!   slope. No clamping, probes legitimately read beyond the bracket.
//!
//! ## Table Invariants
//!
//! Points are sorted strictly ascending by `measured` and contain only
//! finite values. Tables are built through [`CalibrationTable::from_points`]
//! or [`CalibrationTable::for_measurement`], which reject anything else
//! with a [`ProcessingError`] instead of panicking later.
//!
//! ## Updates
//!
//! Tables are replaced by an operator-driven workflow while cycles are
//! running. With `std`, [`CalibrationStore`] holds the whole
//! [`CalibrationSet`] behind an `Arc` and swaps it atomically, so a cycle
//! that took a snapshot never sees a half-written table.

use heapless::Vec;

use crate::{
    constants::{
        buffers::MAX_CALIBRATION_POINTS,
        sensors::{
            CAL_EC_MAX_US_CM, CAL_EC_MIN_US_CM, CAL_MOISTURE_MAX_PCT, CAL_MOISTURE_MIN_PCT,
            CAL_NPK_MAX_MG_KG, CAL_NPK_MIN_MG_KG, CAL_PH_MAX, CAL_PH_MIN, CAL_TEMP_MAX_C,
            CAL_TEMP_MIN_C, EC_MAX_CALIBRATION_POINTS, PH_MAX_CALIBRATION_POINTS,
        },
    },
    errors::{ProcessingError, ProcessingResult},
    reading::{Measurement, MeasurementSet, SensorReading},
    traits::{Stage, Validatable},
};

/// One reference pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationPoint {
    /// Value of the reference standard
    pub expected: f32,
    /// Value the probe reported for it
    pub measured: f32,
}

impl CalibrationPoint {
    /// Build a pair
    pub const fn new(expected: f32, measured: f32) -> Self {
        Self { expected, measured }
    }
}

/// Whether a value went through a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationStatus {
    /// Mapped through at least one point
    Calibrated,
    /// Table empty, raw value returned
    Uncalibrated,
}

/// Result of calibrating one value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibrated {
    /// Calibrated (or raw) value
    pub value: f32,
    /// How it was produced
    pub status: CalibrationStatus,
}

/// Ordered calibration points for one channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalibrationTable {
    points: Vec<CalibrationPoint, MAX_CALIBRATION_POINTS>,
}

impl CalibrationTable {
    /// Empty table, values pass through
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a table, checking order and finiteness
    ///
    /// Points must already be sorted by `measured`; sorting silently would
    /// hide a swapped pair in the operator's input.
    pub fn from_points(points: &[CalibrationPoint]) -> ProcessingResult<Self> {
        if points.len() > MAX_CALIBRATION_POINTS {
            return Err(ProcessingError::InvalidCalibration {
                reason: "too many calibration points",
            });
        }

        let mut table = Self::new();
        for point in points {
            if !point.expected.is_valid() || !point.measured.is_valid() {
                return Err(ProcessingError::InvalidCalibration {
                    reason: "non-finite calibration value",
                });
            }
            if let Some(last) = table.points.last() {
                if point.measured == last.measured {
                    return Err(ProcessingError::InvalidCalibration {
                        reason: "duplicate measured value",
                    });
                }
                if point.measured < last.measured {
                    return Err(ProcessingError::InvalidCalibration {
                        reason: "points not sorted by measured value",
                    });
                }
            }
            table.points.push(*point).map_err(|_| ProcessingError::InvalidCalibration {
                reason: "too many calibration points",
            })?;
        }
        Ok(table)
    }

    /// Build a table for a specific channel
    ///
    /// On top of [`from_points`](Self::from_points) this enforces the
    /// channel's point limit (EC 2, pH 3) and the reference range of its
    /// calibration standards.
    pub fn for_measurement(
        measurement: Measurement,
        points: &[CalibrationPoint],
    ) -> ProcessingResult<Self> {
        let max = max_points(measurement);
        if points.len() > max {
            return Err(ProcessingError::TooManyCalibrationPoints {
                measurement,
                count: points.len(),
                max,
            });
        }

        let (min_ref, max_ref) = reference_range(measurement);
        if let Some(bad) = points
            .iter()
            .find(|p| p.expected.is_valid() && (p.expected < min_ref || p.expected > max_ref))
        {
            return Err(ProcessingError::CalibrationOutOfRange {
                measurement,
                value: bad.expected,
            });
        }

        Self::from_points(points)
    }

    /// Points in ascending `measured` order
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the table holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Map a raw value onto the reference scale
    pub fn apply(&self, raw: f32) -> Calibrated {
        let points = self.points.as_slice();
        let value = match points {
            [] => {
                return Calibrated { value: raw, status: CalibrationStatus::Uncalibrated };
            }
            [only] => {
                if raw == only.measured {
                    only.expected
                } else {
                    raw + (only.expected - only.measured)
                }
            }
            _ => interpolate(points, raw),
        };
        Calibrated { value, status: CalibrationStatus::Calibrated }
    }
}

/// Piecewise-linear mapping over at least two sorted points
fn interpolate(points: &[CalibrationPoint], raw: f32) -> f32 {
    // index of the first point with measured > raw
    let upper = points.partition_point(|p| p.measured <= raw);

    if upper > 0 && points[upper - 1].measured == raw {
        return points[upper - 1].expected;
    }

    let last = points.len() - 1;
    if upper == 0 {
        return extrapolate(&points[0], &points[1], &points[0], raw);
    }
    if upper > last {
        return extrapolate(&points[last - 1], &points[last], &points[last], raw);
    }

    let lo = &points[upper - 1];
    let hi = &points[upper];
    let slope = (hi.expected - lo.expected) / (hi.measured - lo.measured);
    let value = lo.expected + (raw - lo.measured) * slope;

    let (min, max) = if lo.expected <= hi.expected {
        (lo.expected, hi.expected)
    } else {
        (hi.expected, lo.expected)
    };
    value.clamp(min, max)
}

/// Extend the segment `a..b` linearly from `anchor`
fn extrapolate(
    a: &CalibrationPoint,
    b: &CalibrationPoint,
    anchor: &CalibrationPoint,
    raw: f32,
) -> f32 {
    let slope = (b.expected - a.expected) / (b.measured - a.measured);
    anchor.expected + (raw - anchor.measured) * slope
}

/// Point limit for a channel
pub const fn max_points(measurement: Measurement) -> usize {
    match measurement {
        Measurement::Ec => EC_MAX_CALIBRATION_POINTS,
        Measurement::Ph => PH_MAX_CALIBRATION_POINTS,
        _ => MAX_CALIBRATION_POINTS,
    }
}

/// Range of reference values a standard can provide for a channel
pub const fn reference_range(measurement: Measurement) -> (f32, f32) {
    match measurement {
        Measurement::Temperature => (CAL_TEMP_MIN_C, CAL_TEMP_MAX_C),
        Measurement::Humidity => (CAL_MOISTURE_MIN_PCT, CAL_MOISTURE_MAX_PCT),
        Measurement::Ec => (CAL_EC_MIN_US_CM, CAL_EC_MAX_US_CM),
        Measurement::Ph => (CAL_PH_MIN, CAL_PH_MAX),
        Measurement::Nitrogen | Measurement::Phosphorus | Measurement::Potassium => {
            (CAL_NPK_MIN_MG_KG, CAL_NPK_MAX_MG_KG)
        }
    }
}

/// Least-squares line through a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// expected per measured unit
    pub slope: f32,
    /// expected at measured = 0
    pub intercept: f32,
    /// Coefficient of determination, 0..=1
    pub r_squared: f32,
}

/// Fit `expected = slope * measured + intercept`
///
/// Returns `None` with fewer than two points. A low `r_squared` on a table
/// that should be linear (EC, pH) points at a bad reference standard.
pub fn fit_linear(points: &[CalibrationPoint]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f32;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
    for p in points {
        sx += p.measured;
        sy += p.expected;
        sxx += p.measured * p.measured;
        sxy += p.measured * p.expected;
    }

    let denom = n * sxx - sx * sx;
    if libm::fabsf(denom) < f32::EPSILON {
        return None;
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;

    let mean_y = sy / n;
    let (mut ss_res, mut ss_tot) = (0.0f32, 0.0f32);
    for p in points {
        let predicted = slope * p.measured + intercept;
        ss_res += (p.expected - predicted) * (p.expected - predicted);
        ss_tot += (p.expected - mean_y) * (p.expected - mean_y);
    }
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(LinearFit { slope, intercept, r_squared })
}

/// One table per channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalibrationSet {
    tables: [CalibrationTable; 7],
}

impl CalibrationSet {
    /// All channels uncalibrated
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for a channel
    pub fn get(&self, measurement: Measurement) -> &CalibrationTable {
        &self.tables[measurement.index()]
    }

    /// Replace one channel's table
    pub fn set(&mut self, measurement: Measurement, table: CalibrationTable) {
        self.tables[measurement.index()] = table;
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, measurement: Measurement, table: CalibrationTable) -> Self {
        self.set(measurement, table);
        self
    }

    /// Calibrate every channel of a reading
    ///
    /// Returns the calibrated reading and the set of channels whose table
    /// was empty. Validity and timestamp are carried over unchanged.
    pub fn apply(&self, reading: &SensorReading) -> (SensorReading, MeasurementSet) {
        let mut calibrated = *reading;
        let mut uncalibrated = MeasurementSet::empty();

        for m in Measurement::ALL {
            let result = self.get(m).apply(reading.get(m));
            if result.status == CalibrationStatus::Uncalibrated {
                uncalibrated.insert(m);
            }
            calibrated.set(m, result.value);
        }

        (calibrated, uncalibrated)
    }

    /// Channels with a non-empty table
    pub fn calibrated(&self) -> MeasurementSet {
        let mut set = MeasurementSet::empty();
        for m in Measurement::ALL {
            if !self.get(m).is_empty() {
                set.insert(m);
            }
        }
        set
    }
}

/// Applies a [`CalibrationSet`] to whole readings
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationEngine;

impl CalibrationEngine {
    /// Create the engine
    pub const fn new() -> Self {
        Self
    }

    /// Calibrate one value
    pub fn apply(&self, raw: f32, table: &CalibrationTable) -> Calibrated {
        table.apply(raw)
    }

    /// Calibrate every channel of a reading with `set`
    pub fn calibrate(
        &self,
        reading: &SensorReading,
        set: &CalibrationSet,
    ) -> (SensorReading, MeasurementSet) {
        let (calibrated, uncalibrated) = set.apply(reading);
        log_debug!("calibration: {} channel(s) uncalibrated", uncalibrated.len());
        (calibrated, uncalibrated)
    }
}

impl Stage for CalibrationEngine {
    fn name(&self) -> &'static str {
        "calibration"
    }
}

#[cfg(feature = "std")]
pub use store::CalibrationStore;

#[cfg(feature = "std")]
mod store {
    use std::sync::{Arc, PoisonError, RwLock};

    use super::{CalibrationSet, CalibrationTable};
    use crate::reading::Measurement;

    /// Copy-on-write holder of the active calibration set
    ///
    /// Readers take an `Arc` snapshot; writers build a new set and swap the
    /// pointer. A writer that panicked mid-update cannot leave a torn set
    /// behind, so a poisoned lock is simply recovered.
    #[derive(Debug, Default)]
    pub struct CalibrationStore {
        current: RwLock<Arc<CalibrationSet>>,
    }

    impl CalibrationStore {
        /// Store with the given initial set
        pub fn new(set: CalibrationSet) -> Self {
            Self { current: RwLock::new(Arc::new(set)) }
        }

        /// Consistent view for one cycle
        pub fn snapshot(&self) -> Arc<CalibrationSet> {
            let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(&guard)
        }

        /// Swap in a whole new set
        pub fn replace(&self, set: CalibrationSet) {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *guard = Arc::new(set);
            log_debug!("calibration set replaced: {:?} calibrated", guard.calibrated());
        }

        /// Replace one channel's table, copying the rest
        pub fn update(&self, measurement: Measurement, table: CalibrationTable) {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = CalibrationSet::clone(&guard);
            next.set(measurement, table);
            *guard = Arc::new(next);
            log_debug!("calibration table for {} updated", measurement);
        }
    }
}
