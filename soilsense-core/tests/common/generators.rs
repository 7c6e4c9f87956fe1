//! Property-test generators that respect the probe's physical ranges

use proptest::prelude::*;

use soilsense_core::{
    calibration::CalibrationPoint,
    crop::Crop,
    environment::GrowingEnvironment,
    reading::SensorReading,
    season::Season,
    soil::SoilType,
};

/// Valid reading inside the sensor limits
pub fn reading() -> impl Strategy<Value = SensorReading> {
    (
        -20.0f32..50.0,
        0.0f32..100.0,
        0.0f32..10_000.0,
        3.0f32..9.0,
        0.0f32..1999.0,
        0.0f32..1999.0,
        0.0f32..1999.0,
        any::<u32>(),
    )
        .prop_map(|(t, theta, ec, ph, n, p, k, ts)| SensorReading::new(t, theta, ec, ph, n, p, k, ts as u64))
}

/// Any soil type
pub fn soil() -> impl Strategy<Value = SoilType> {
    prop::sample::select(SoilType::ALL.to_vec())
}

/// Any growing environment
pub fn environment() -> impl Strategy<Value = GrowingEnvironment> {
    prop::sample::select(GrowingEnvironment::ALL.to_vec())
}

/// Any season
pub fn season() -> impl Strategy<Value = Season> {
    prop::sample::select(Season::ALL.to_vec())
}

/// Any crop
pub fn crop() -> impl Strategy<Value = Crop> {
    prop::sample::select(Crop::ALL.to_vec())
}

/// Strictly increasing table with 2..=8 points
///
/// `measured` grows by at least 0.5 per point; `expected` grows too, so the
/// table is monotonic.
pub fn monotonic_points() -> impl Strategy<Value = Vec<CalibrationPoint>> {
    prop::collection::vec((0.5f32..50.0, 0.1f32..50.0), 2..=8).prop_map(|steps| {
        let mut measured = 0.0;
        let mut expected = 0.0;
        steps
            .into_iter()
            .map(|(dm, de)| {
                measured += dm;
                expected += de;
                CalibrationPoint::new(expected, measured)
            })
            .collect()
    })
}
