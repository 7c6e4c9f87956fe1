//! Documents driving a full processing cycle

use soilsense_core::{
    calibration::CalibrationStore, Measurement, PipelineConfig, SensorReading, SoilPipeline,
};
use soilsense_schemas::{CalibrationDocument, ContextDocument, ResultRecord, SchemaError};

const LAB_CSV: &str = "sensor_type,raw_value,reference_value
ph,4.20,4.01
ph,7.00,6.86
ph,9.25,9.18
ec,1380,1413
ec,12500,12880
temperature,23.5,25.0
";

#[test]
fn csv_calibration_reaches_the_record() {
    let set = CalibrationDocument::from_csv(LAB_CSV).unwrap().to_set().unwrap();
    let ctx_doc = ContextDocument::from_json(
        r#"{"soil": "loam", "environment": "greenhouse", "season": "summer", "crop": "tomato"}"#,
    )
    .unwrap();
    let ctx = ctx_doc.to_context().unwrap();

    let reading = SensorReading::new(22.0, 30.0, 1600.0, 6.4, 180.0, 70.0, 250.0, 42);
    let bundle = SoilPipeline::new().process(&reading, &set, &ctx);
    let record = ResultRecord::from_bundle(&bundle);

    assert_eq!(record.timestamp, 42);
    assert!(record.stages.iter().any(|s| s == "calibrated"));
    assert_eq!(record.uncalibrated, ["humidity", "nitrogen", "phosphorus", "potassium"]);
    assert!(record.health.is_some());
    assert!(!record.crop_recommendations.is_empty());
}

#[test]
fn stored_document_survives_a_store_swap() {
    let doc = CalibrationDocument::from_csv(LAB_CSV).unwrap();
    let saved = doc.to_json().unwrap();

    let store = CalibrationStore::new(Default::default());
    store.replace(CalibrationDocument::from_json(&saved).unwrap().to_set().unwrap());

    let pipeline = SoilPipeline::with_config(PipelineConfig::minimal());
    let bundle = pipeline.process_with_store(
        &SensorReading::new(23.5, 30.0, 1380.0, 7.0, 100.0, 50.0, 150.0, 1),
        &store,
        &ContextDocument::default().to_context().unwrap(),
    );

    assert!(!bundle.uncalibrated.contains(Measurement::Ph));
    assert_eq!(CalibrationDocument::from_set(&store.snapshot()), doc);
}

#[test]
fn rejected_table_names_the_channel() {
    let csv = "sensor_type,raw_value,reference_value\nph,4.2,4.01\nph,7.0,16.5\n";
    let err = CalibrationDocument::from_csv(csv).unwrap().to_set().unwrap_err();
    assert!(matches!(err, SchemaError::Calibration { measurement: Measurement::Ph, .. }));
    assert!(err.to_string().starts_with("Calibration for ph rejected"));
}
