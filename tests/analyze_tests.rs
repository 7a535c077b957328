//! Analysis reports and shape detection through the public API.

use llm_fmt::{analyze, detect_shape, report_to_json, Format, ShapeTag};

#[test]
fn uniform_primitive_rows_recommend_tsv() {
    let input = br#"[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"},{"id":3,"name":"Carol"}]"#;
    let report = analyze(input, Some(Format::Json)).unwrap();

    assert_eq!(report.recommendation, Format::Tsv);
    assert_eq!(report.data_shape.shape, ShapeTag::UniformArray);
    assert_eq!(report.data_shape.array_len, 3);
    assert_eq!(report.data_shape.field_count, 2);

    // The winner should actually be cheaper than the raw input.
    let recommended = report.recommended().unwrap();
    assert!(recommended.tokens.unwrap() < report.input_tokens);
    assert!(report.tokens_saved() > 0);
}

#[test]
fn sparse_objects_recommend_toon() {
    let input = br#"[{"id":1,"name":"A"},{"id":2,"email":"b@x.io"},{"id":3,"name":"C","email":"c@x.io"}]"#;
    let report = analyze(input, Some(Format::Json)).unwrap();
    assert_eq!(report.data_shape.shape, ShapeTag::SparseArray);
    assert_eq!(report.recommendation, Format::Toon);
}

#[test]
fn deep_nesting_recommends_compact_json() {
    let input = br#"{"a":{"b":{"c":{"d":{"e":1}}}}}"#;
    let report = analyze(input, Some(Format::Json)).unwrap();
    assert_eq!(report.data_shape.shape, ShapeTag::NestedObject);
    assert!(report.data_shape.max_depth > 2);
    assert_eq!(report.recommendation, Format::Json);
}

#[test]
fn every_output_format_is_reported_once() {
    let report = analyze(br#"{"k":1}"#, Some(Format::Json)).unwrap();
    let mut formats: Vec<Format> = report.formats.iter().map(|f| f.format).collect();
    formats.dedup();
    assert_eq!(formats.len(), Format::output_formats().len());
}

#[test]
fn failed_encoders_carry_reasons() {
    let report = analyze(br#"{"nested":{"deep":true}}"#, Some(Format::Json)).unwrap();
    for failed in report.formats.iter().filter(|f| f.tokens.is_none()) {
        assert!(failed.error.is_some());
        assert!(failed.savings_percent.is_none());
    }
    // TSV and CSV cannot hold an object root.
    assert!(report
        .formats
        .iter()
        .any(|f| f.format == Format::Tsv && f.tokens.is_none()));
}

#[test]
fn detect_shape_matches_the_report() {
    let input = br#"[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]"#;
    let tag = detect_shape(input, Some(Format::Json)).unwrap();
    let report = analyze(input, Some(Format::Json)).unwrap();
    assert_eq!(tag, report.data_shape.shape);
}

#[test]
fn shape_detection_without_a_pinned_format() {
    assert_eq!(
        detect_shape(b"key: value\n", None).unwrap(),
        ShapeTag::FlatObject
    );
    assert_eq!(
        detect_shape(b"[1, 2, 3]", None).unwrap(),
        ShapeTag::Mixed
    );
    assert_eq!(detect_shape(b"null", None).unwrap(), ShapeTag::Empty);
}

#[test]
fn report_json_is_machine_readable() {
    let report = analyze(br#"[{"a":1},{"a":2}]"#, Some(Format::Json)).unwrap();
    let json = report_to_json(&report);

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["recommendation"], "tsv");
    assert!(parsed["formats"].as_array().unwrap().len() >= 5);
    assert_eq!(parsed["data_shape"]["shape"], "UniformArray");
}
