//! Integration tests for the processing pipeline
//!
//! Tests the complete data flow from a raw probe sample through calibration,
//! compensation, context adjustment and guidance to the result bundle.

mod common;

use soilsense_core::{
    calibration::{CalibrationSet, CalibrationStore},
    crop::{Crop, NPK_UNAVAILABLE, SENSOR_INCOMPATIBLE},
    environment::GrowingEnvironment,
    errors::ProcessingError,
    interaction::NO_ANTAGONISM,
    pipeline::{BundleStatus, PipelineConfig, SoilPipeline},
    reading::{Measurement, MeasurementSet, SensorReading, StageFlags},
    season::Season,
    soil::SoilType,
};

use common::harness::{check, TestHarness};

#[test]
fn scenario_a_ec_compensation_on_loam() {
    let pipeline = SoilPipeline::builder().without_context_adjustment().build();
    let reading = SensorReading::new(30.0, 25.0, 1200.0, 6.5, 150.0, 60.0, 200.0, 0);

    let bundle = pipeline.process(&reading, &CalibrationSet::new(), &common::identity_context("none"));
    let ec = bundle.compensated.get(Measurement::Ec).unwrap();
    common::assert_close(ec, 2414.0, 0.01);
}

#[test]
fn scenario_b_ph_temperature_correction() {
    let pipeline = SoilPipeline::builder().without_context_adjustment().build();
    let reading = SensorReading::new(30.0, 25.0, 1200.0, 6.8, 150.0, 60.0, 200.0, 0);

    let bundle = pipeline.process(&reading, &CalibrationSet::new(), &common::identity_context("none"));
    let ph = bundle.compensated.get(Measurement::Ph).unwrap();
    assert!((ph - 6.785).abs() < 1e-4, "ph = {}", ph);
}

#[test]
fn scenario_c_nitrogen_on_loam() {
    // loam carries δN = 0.0038 and εN = 0.009
    let pipeline = SoilPipeline::builder().without_context_adjustment().build();
    let reading = SensorReading::new(30.0, 45.0, 1200.0, 6.5, 800.0, 60.0, 200.0, 0);

    let bundle = pipeline.process(&reading, &CalibrationSet::new(), &common::identity_context("none"));
    let n = bundle.compensated.get(Measurement::Nitrogen).unwrap();
    common::assert_close(n, 943.0, 0.005);
}

#[test]
fn scenario_d_soil_environment_is_identity() {
    let reading = common::healthy_reading();
    let ctx = common::identity_context("none");

    let adjusted = SoilPipeline::new().process(&reading, &CalibrationSet::new(), &ctx);
    let plain = SoilPipeline::builder()
        .without_context_adjustment()
        .build()
        .process(&reading, &CalibrationSet::new(), &ctx);

    assert_eq!(adjusted.compensated.values(), plain.compensated.values());
    assert!(adjusted.compensated.unavailable.is_empty());
    assert!(adjusted.compensated.stages.contains(StageFlags::CONTEXT_ADJUSTED));
    common::assert_status(&adjusted, BundleStatus::SEASON_FALLBACK);
}

#[test]
fn scenario_e_aeroponics_is_incompatible() {
    let ctx = common::context(SoilType::Clay, GrowingEnvironment::Aeroponics, Season::Spring, "tomato");
    let bundle = SoilPipeline::new().process(&common::healthy_reading(), &CalibrationSet::new(), &ctx);

    assert_eq!(bundle.compensated.unavailable, MeasurementSet::all());
    assert_eq!(bundle.crop_recommendations.as_slice(), &[SENSOR_INCOMPATIBLE]);
    assert!(bundle.interactions.is_empty());
    assert!(bundle.effective_uptake.is_none());
    assert!(bundle.alerts.iter().all(|a| matches!(
        a,
        ProcessingError::IncompatibleMeasurement { environment: GrowingEnvironment::Aeroponics, .. }
    )));
    common::assert_status(&bundle, BundleStatus::MEASUREMENTS_UNAVAILABLE);
}

#[test]
fn identity_at_reference_conditions() {
    let pipeline = SoilPipeline::builder().without_context_adjustment().build();
    let reading = common::reference_reading();
    let bundle = pipeline.process(&reading, &CalibrationSet::new(), &common::identity_context("none"));

    common::assert_close(bundle.compensated.get(Measurement::Ec).unwrap(), reading.ec, 1e-4);
    assert!((bundle.compensated.get(Measurement::Ph).unwrap() - reading.ph).abs() < 1e-6);
}

#[test]
fn hydroponics_keeps_ec_and_ph() {
    let ctx = common::context(SoilType::Loam, GrowingEnvironment::Hydroponics, Season::Summer, "lettuce");
    let bundle = SoilPipeline::new().process(&common::healthy_reading(), &CalibrationSet::new(), &ctx);

    for m in Measurement::NPK {
        assert_eq!(bundle.compensated.get(m), None);
    }
    assert!(bundle.compensated.get(Measurement::Ec).is_some());
    assert!(bundle.compensated.get(Measurement::Ph).is_some());
    assert_eq!(bundle.crop_recommendations.as_slice().first(), Some(&NPK_UNAVAILABLE));
    assert_eq!(bundle.alerts.len(), 3);
    // pH rules are still checked, nothing about N, P or K is reported
    assert_eq!(bundle.interactions.as_slice(), &[NO_ANTAGONISM]);
    assert!(bundle.effective_uptake.is_none());
}

#[test]
fn calibration_then_compensation() {
    let ctx = common::context(SoilType::Loam, GrowingEnvironment::Soil, Season::Spring, "none");
    let bundle = SoilPipeline::new().process(&common::healthy_reading(), &common::lab_calibration(), &ctx);

    assert!(bundle.compensated.stages.contains(StageFlags::CALIBRATED));
    assert!(bundle.compensated.stages.contains(StageFlags::COMPENSATED));
    assert!(!bundle.uncalibrated.contains(Measurement::Ph));
    assert!(bundle.uncalibrated.contains(Measurement::Nitrogen));
    common::assert_clean(&bundle);
}

#[test]
fn store_updates_apply_to_next_cycle() {
    let store = CalibrationStore::new(CalibrationSet::new());
    let pipeline = SoilPipeline::with_config(PipelineConfig::minimal());
    let ctx = common::identity_context("none");
    let reading = common::healthy_reading();

    let before = pipeline.process_with_store(&reading, &store, &ctx);
    store.replace(common::lab_calibration());
    let after = pipeline.process_with_store(&reading, &store, &ctx);

    assert!(before.uncalibrated.contains(Measurement::Ph));
    assert!(!after.uncalibrated.contains(Measurement::Ph));
    assert_ne!(
        before.compensated.get(Measurement::Ph),
        after.compensated.get(Measurement::Ph)
    );
}

#[test]
fn out_of_range_values_are_reported() {
    let reading = SensorReading::new(22.0, 30.0, 12_500.0, 9.6, 150.0, 60.0, 200.0, 0);
    let bundle = SoilPipeline::new().process(&reading, &CalibrationSet::new(), &common::identity_context("none"));

    let out_of_range: Vec<_> = bundle
        .alerts
        .iter()
        .filter_map(|a| match a {
            ProcessingError::OutOfPhysicalRange { measurement, .. } => Some(*measurement),
            _ => None,
        })
        .collect();
    assert_eq!(out_of_range, vec![Measurement::Ec, Measurement::Ph]);
    assert!(!bundle.is_degraded());
    assert!(bundle.interactions.contains("Alkaline soil locks up phosphorus: acidify"));
}

#[test]
fn invalid_reading_stops_early() {
    let bundle = SoilPipeline::new().process(
        &SensorReading::invalid(99),
        &common::lab_calibration(),
        &common::context(SoilType::Clay, GrowingEnvironment::Greenhouse, Season::Summer, "tomato"),
    );
    assert!(bundle.is_degraded());
    assert_eq!(bundle.alerts.as_slice(), &[ProcessingError::InvalidReading]);
    assert!(bundle.crop_recommendations.is_empty());
    assert_eq!(bundle.compensated.stages, StageFlags::empty());
}

#[test]
fn every_crop_produces_a_bundle() {
    let pipeline = SoilPipeline::new();
    for crop in Crop::ALL {
        let ctx = common::context(SoilType::Loam, GrowingEnvironment::Soil, Season::Spring, crop.name());
        let bundle = pipeline.process(&common::healthy_reading(), &CalibrationSet::new(), &ctx);
        assert!(bundle.health.is_some(), "{}", crop);
        assert!(!bundle.status.contains(BundleStatus::GUIDANCE_TRUNCATED), "{}", crop);
        assert!(!bundle.status.contains(BundleStatus::CROP_UNKNOWN), "{}", crop);
    }
}

#[test]
fn field_scenarios() {
    let mut harness = TestHarness::new();
    let pipeline = SoilPipeline::new();

    for scenario in common::scenarios::all() {
        harness.run_test(scenario.name, || {
            let ctx = common::context(scenario.soil, scenario.environment, scenario.season, scenario.crop);
            let bundle = pipeline.process(&scenario.reading, &CalibrationSet::new(), &ctx);

            check(!bundle.is_degraded(), || "bundle degraded".into())?;
            for line in scenario.expect_crop_lines {
                check(bundle.crop_recommendations.contains(line), || {
                    format!("missing crop line {:?} in {:?}", line, bundle.crop_recommendations)
                })?;
            }
            for line in scenario.expect_interaction_lines {
                check(bundle.interactions.contains(line), || {
                    format!("missing interaction line {:?} in {:?}", line, bundle.interactions)
                })?;
            }
            Ok(())
        });
    }

    harness.print_summary();
    assert!(harness.all_passed(), "{:?}", harness.failures().collect::<Vec<_>>());
}

#[test]
fn no_antagonism_line_stands_alone() {
    let bundle = SoilPipeline::new().process(
        &common::healthy_reading(),
        &CalibrationSet::new(),
        &common::identity_context("none"),
    );
    assert_eq!(bundle.interactions.as_slice(), &[NO_ANTAGONISM]);
}
