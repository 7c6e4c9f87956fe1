//! Property tests for calibration tables and compensation models

mod common;

use proptest::prelude::*;

use soilsense_core::{
    calibration::{fit_linear, CalibrationStatus, CalibrationTable},
    compensation::{compensate_ec, compensate_npk, compensate_ph},
    reading::Npk,
};

use common::generators;

proptest! {
    #[test]
    fn calibration_points_map_exactly(points in generators::monotonic_points()) {
        let table = CalibrationTable::from_points(&points).unwrap();
        for p in &points {
            let out = table.apply(p.measured);
            prop_assert_eq!(out.value, p.expected);
            prop_assert_eq!(out.status, CalibrationStatus::Calibrated);
        }
    }

    #[test]
    fn monotonic_table_gives_monotonic_mapping(
        points in generators::monotonic_points(),
        a in -50.0f32..500.0,
        b in -50.0f32..500.0,
    ) {
        let table = CalibrationTable::from_points(&points).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.apply(lo).value <= table.apply(hi).value);
    }

    #[test]
    fn empty_table_is_identity(raw in -1000.0f32..1000.0) {
        let out = CalibrationTable::new().apply(raw);
        prop_assert_eq!(out.value, raw);
        prop_assert_eq!(out.status, CalibrationStatus::Uncalibrated);
    }

    #[test]
    fn linear_fit_is_bounded(points in generators::monotonic_points()) {
        let fit = fit_linear(&points).unwrap();
        prop_assert!(fit.slope > 0.0);
        prop_assert!(fit.r_squared <= 1.0 + 1e-4);
    }

    #[test]
    fn compensation_never_negative(
        reading in generators::reading(),
        soil in generators::soil(),
    ) {
        let profile = soil.profile();
        let t = reading.temperature;
        let theta = reading.humidity;
        prop_assert!(compensate_ec(reading.ec, t, theta, profile) >= 0.0);
        prop_assert!(compensate_ph(reading.ph, t) >= 0.0);
        let npk = compensate_npk(reading.npk(), t, theta, profile);
        prop_assert!(npk.nitrogen >= 0.0 && npk.phosphorus >= 0.0 && npk.potassium >= 0.0);
    }

    #[test]
    fn compensation_identity_at_reference(
        soil in generators::soil(),
        ec in 0.0f32..10_000.0,
        ph in 3.0f32..9.0,
        n in 0.0f32..1999.0,
    ) {
        let profile = soil.profile();
        let fc = profile.field_capacity_pct();

        let ec_out = compensate_ec(ec, 25.0, fc, profile);
        prop_assert!((ec_out - ec).abs() <= ec * 1e-5 + 1e-3);
        prop_assert_eq!(compensate_ph(ph, 25.0), ph);

        let npk = Npk::new(n, n, n);
        prop_assert_eq!(compensate_npk(npk, 20.0, 30.0, profile), npk);
    }
}
