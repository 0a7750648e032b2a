//! Tests for the two-phase log parser

use super::write_log;
use crate::log::LogReader;
use crate::value::CoercedValue;

#[test]
fn test_stepless_point_measurement() {
    let (_dir, path) = write_log(
        "point.log",
        "Circuit: * rc filter\n\
         vout1m: v(out)=-0.0186257 at 0.001\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    assert_eq!(reader.step_count(), 0);
    assert_eq!(
        reader.measures().get("vout1m").unwrap(),
        &[CoercedValue::Real(-0.0186257)]
    );
    assert_eq!(
        reader.measures().get("vout1m_at").unwrap(),
        &[CoercedValue::Real(0.001)]
    );
}

#[test]
fn test_stepless_interval_measurement() {
    let (_dir, path) = write_log(
        "interval.log",
        "Circuit: * amp\n\
         vout_rms: RMS(v(out))=1.41109 FROM 0 TO 0.001\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    let names: Vec<&str> = reader.measure_names().collect();
    assert_eq!(names, vec!["vout_rms", "vout_rms_FROM", "vout_rms_TO"]);
    assert_eq!(
        reader.measures().get("vout_rms").unwrap(),
        &[CoercedValue::Real(1.41109)]
    );
    assert_eq!(
        reader.measures().get("vout_rms_TO").unwrap(),
        &[CoercedValue::Real(0.001)]
    );
}

#[test]
fn test_stepless_plain_parameter_measurement() {
    let (_dir, path) = write_log(
        "plain.log",
        "Circuit: * amp\n\
         gain: vout_rms/vin_rms=1.99809\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    let names: Vec<&str> = reader.measure_names().collect();
    assert_eq!(names, vec!["gain"]);
    assert_eq!(
        reader.measures().get("gain").unwrap(),
        &[CoercedValue::Real(1.99809)]
    );
}

#[test]
fn test_step_declarations_build_aligned_sequences() {
    let (_dir, path) = write_log(
        "steps.log",
        "Circuit: * buck\n\
         .step Ton=100m vin=5\n\
         .step Ton=400m vin=5\n\
         .step Ton=100m vin=12\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    assert_eq!(reader.step_count(), 3);
    let step_names: Vec<&str> = reader.step_names().collect();
    assert_eq!(step_names, vec!["Ton", "vin"]);
    assert_eq!(
        reader.steps().get("vin").unwrap(),
        &[
            CoercedValue::Int(5),
            CoercedValue::Int(5),
            CoercedValue::Int(12),
        ]
    );
    // Once a step exists, stepless parsing is off and measures stay empty
    assert!(reader.measures().is_empty());
}

#[test]
fn test_tabular_measurement_block() {
    let (_dir, path) = write_log(
        "gain.log",
        "Circuit: * amp\n\
         .step Vin=1\n\
         .step Vin=2\n\
         Measurement: gain\n\
         step\tVout_rms/Vin_rms\n\
          1\t1.99809\n\
          2\t1.99689\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    assert_eq!(reader.step_count(), 2);
    assert_eq!(reader.measure_count(), 2);
    assert_eq!(
        reader.measures().get("gain").unwrap(),
        &[CoercedValue::Real(1.99809), CoercedValue::Real(1.99689)]
    );
}

#[test]
fn test_multiple_blocks_with_interval_headers() {
    let (_dir, path) = write_log(
        "multi.mout",
        "Measurement: vout_rms\n\
         step\tRMS(V(OUT))\tFROM\tTO\n\
          1\t1.41109\t0\t0.001\n\
          2\t1.40729\t0\t0.001\n\
         \n\
         Measurement: vin_rms\n\
           step\tRMS(V(IN))\tFROM\tTO\n\
              1\t0.706221\t0\t0.001\n\
              2\t0.704738\t0\t0.001\n\
         \n\
         Measurement: gain\n\
           step\tVout_rms/Vin_rms\n\
              1\t1.99809\n\
              2\t1.99689\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    let names: Vec<&str> = reader.measure_names().collect();
    assert_eq!(
        names,
        vec![
            "vout_rms",
            "vout_rms_FROM",
            "vout_rms_TO",
            "vin_rms",
            "vin_rms_FROM",
            "vin_rms_TO",
            "gain",
        ]
    );
    assert_eq!(
        reader.measures().get("vin_rms").unwrap(),
        &[CoercedValue::Real(0.706221), CoercedValue::Real(0.704738)]
    );
    assert_eq!(
        reader.measures().get("vout_rms_FROM").unwrap(),
        &[CoercedValue::Int(0), CoercedValue::Int(0)]
    );
    assert_eq!(reader.measure_count(), 6);
}

#[test]
fn test_steps_only_returns_at_first_section() {
    let (_dir, path) = write_log(
        "steps_only.log",
        "Circuit: * amp\n\
         .step Vin=1\n\
         .step Vin=2\n\
         Measurement: gain\n\
         step\tVout_rms/Vin_rms\n\
          1\t1.99809\n\
          2\t1.99689\n",
    );
    let reader = LogReader::parse_steps_only(&path).unwrap();

    assert_eq!(reader.step_count(), 2);
    assert!(reader.measures().is_empty());
}

#[test]
fn test_seeded_steps_from_sibling_log() {
    let (_dir, log_path) = write_log(
        "batch.log",
        "Circuit: * amp\n.step Ton=100m\n.step Ton=400m\nMeasurement: ignored\n",
    );
    let steps = LogReader::parse_steps_only(&log_path).unwrap();

    let (_dir2, mout_path) = write_log(
        "batch.mout",
        "Measurement: gain\n\
         step\tVout_rms/Vin_rms\n\
          1\t1.99809\n\
          2\t1.99689\n",
    );
    let reader = LogReader::parse_with_steps(&mout_path, steps.steps()).unwrap();

    assert_eq!(reader.step_count(), 2);
    assert_eq!(
        reader.steps().get("Ton").unwrap(),
        &[
            CoercedValue::Text("100m".to_string()),
            CoercedValue::Text("400m".to_string()),
        ]
    );
    assert_eq!(reader.measures().get("gain").unwrap().len(), 2);
}

#[test]
fn test_empty_file_yields_empty_model() {
    let (_dir, path) = write_log("empty.log", "");
    let reader = LogReader::parse(&path).unwrap();

    assert_eq!(reader.step_count(), 0);
    assert!(reader.steps().is_empty());
    assert!(reader.measures().is_empty());
}

#[test]
fn test_unrecognized_lines_are_skipped() {
    let (_dir, path) = write_log(
        "noise.log",
        "Circuit: * amp\n\
         Direct Newton iteration for .op point succeeded.\n\
         Date: Mon Aug 24 10:31:12 2026\n\
         Total elapsed time: 0.521 seconds.\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    assert_eq!(reader.step_count(), 0);
    assert!(reader.measures().is_empty());
}

#[test]
fn test_complex_stepless_measurement() {
    let (_dir, path) = write_log(
        "ac.log",
        "Circuit: * filter\n\
         gain3db: V(out)=(3.01dB,45°) at 1000\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    match &reader.measures().get("gain3db").unwrap()[0] {
        CoercedValue::Complex(c) => {
            assert_eq!(c.mag, 3.01);
            assert_eq!(c.ph, 45.0);
        }
        other => panic!("expected complex, got {:?}", other),
    }
}

#[test]
fn test_crlf_line_endings() {
    let (_dir, path) = write_log(
        "crlf.log",
        "Circuit: * amp\r\n.step Ton=1\r\n.step Ton=2\r\n",
    );
    let reader = LogReader::parse(&path).unwrap();

    assert_eq!(reader.step_count(), 2);
    assert_eq!(
        reader.steps().get("Ton").unwrap(),
        &[CoercedValue::Int(1), CoercedValue::Int(2)]
    );
}
