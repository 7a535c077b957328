//! End-to-end conversion scenarios through the public API.

use llm_fmt::{
    convert, ConvertOptions, Error, FilterError, FilterSpec, Format, Pipeline, TruncateStrategy,
};

fn options(output: Format) -> ConvertOptions {
    ConvertOptions::new().with_output_format(output)
}

#[test]
fn json_to_toon_tabular() {
    let input =
        br#"{"users":[{"id":1,"name":"Alice","role":"admin"},{"id":2,"name":"Bob","role":"user"}]}"#;
    let out = convert(input, &options(Format::Toon)).unwrap();
    assert_eq!(out, "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user");
}

#[test]
fn nested_values_fall_out_of_tabular_form() {
    let input = br#"[{"id":1,"tags":["a"]},{"id":2,"tags":["b"]}]"#;
    let out = convert(input, &options(Format::Toon)).unwrap();
    assert!(out.starts_with("[2]:\n"));
    assert!(!out.contains("[2]{id,tags}:"));
}

#[test]
fn depth_limit_leaves_a_placeholder() {
    let input = br#"{"a":{"b":{"c":{"d":1}}}}"#;
    let out = convert(
        input,
        &options(Format::Json).with_filter(FilterSpec::MaxDepth { depth: 2 }),
    )
    .unwrap();
    assert_eq!(out, r#"{"a":{"b":"{…1 keys}"}}"#);
}

#[test]
fn path_selection_projects_names() {
    let input = br#"{"users":[{"id":1,"name":"A"},{"id":2,"name":"B"}],"meta":{"page":1}}"#;
    let out = convert(
        input,
        &options(Format::Json).with_filter(FilterSpec::Include {
            path: "users[*].name".to_string(),
        }),
    )
    .unwrap();
    assert_eq!(out, r#"["A","B"]"#);
}

#[test]
fn csv_quoting_of_commas_and_newlines() {
    let input = br#"[{"a":"hello, world","b":"line1\nline2"}]"#;
    let out = convert(input, &options(Format::Csv)).unwrap();
    assert_eq!(out, "a,b\n\"hello, world\",\"line1\nline2\"");
}

#[test]
fn auto_detect_falls_back_to_yaml() {
    let input = b"key: value\nlist:\n  - 1\n  - 2\n";
    let out = convert(input, &options(Format::Json)).unwrap();
    assert_eq!(out, r#"{"key":"value","list":[1,2]}"#);
}

#[test]
fn xml_round_trips_into_json() {
    let input = br#"<catalog><item sku="A1">Widget</item><item sku="B2">Gadget</item></catalog>"#;
    let out = convert(
        input,
        &options(Format::Json).with_input_format(Format::Xml),
    )
    .unwrap();
    assert_eq!(
        out,
        r##"{"catalog":{"item":[{"@sku":"A1","#text":"Widget"},{"@sku":"B2","#text":"Gadget"}]}}"##
    );
}

#[test]
fn csv_input_to_toon_output() {
    let input = b"id,name\n1,Alice\n2,Bob\n";
    let out = convert(
        input,
        &options(Format::Toon).with_input_format(Format::Csv),
    )
    .unwrap();
    // CSV cells stay strings, and numeric-looking strings keep quotes.
    assert_eq!(out, "[2]{id,name}:\n  \"1\",Alice\n  \"2\",Bob");
}

#[test]
fn filters_compose_in_caller_order() {
    let input = br#"{"rows":[[1,2],[3,4],[5,6]]}"#;
    // Select, then truncate the selected array.
    let out = convert(
        input,
        &options(Format::Json)
            .with_filter(FilterSpec::Include {
                path: "rows".to_string(),
            })
            .with_filter(FilterSpec::truncate_items(2)),
    )
    .unwrap();
    assert_eq!(out, "[[1,2],[3,4]]");
}

#[test]
fn truncate_strategies_through_the_api() {
    let input = br#"[1,2,3,4,5,6]"#;
    let tail = convert(
        input,
        &options(Format::Json).with_filter(FilterSpec::Truncate {
            max_items: Some(2),
            max_string_length: None,
            strategy: TruncateStrategy::Tail,
            preserve: Vec::new(),
            seed: None,
        }),
    )
    .unwrap();
    assert_eq!(tail, "[5,6]");
}

#[test]
fn sample_truncation_is_reproducible() {
    let input = br#"[1,2,3,4,5,6,7,8,9,10]"#;
    let spec = FilterSpec::Truncate {
        max_items: Some(4),
        max_string_length: None,
        strategy: TruncateStrategy::Sample,
        preserve: Vec::new(),
        seed: Some(99),
    };
    let first = convert(input, &options(Format::Json).with_filter(spec.clone())).unwrap();
    let second = convert(input, &options(Format::Json).with_filter(spec)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn strict_mode_surfaces_limit_errors() {
    let input = br#"{"logs":["a","b","c"]}"#;
    let err = convert(
        input,
        &options(Format::Json)
            .with_filter(FilterSpec::truncate_items(2))
            .strict(),
    )
    .unwrap_err();
    match err {
        Error::Filter(FilterError::LimitExceeded { at_path, .. }) => {
            assert_eq!(at_path, "$.logs");
        }
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn unknown_format_tags_fail_construction() {
    assert!("markdown".parse::<Format>().is_err());
    // toon as input and xml as output are unknown to their registries
    assert!(Pipeline::builder(Format::Toon).build().is_err());
    assert!(Pipeline::builder(Format::Json)
        .output(Format::Xml)
        .build()
        .is_err());
}

#[test]
fn invalid_path_fails_before_parsing() {
    let err = convert(
        b"this is not json at all",
        &options(Format::Json)
            .with_input_format(Format::Json)
            .with_filter(FilterSpec::Include {
                path: "a[?broken".to_string(),
            }),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Filter(FilterError::InvalidPath { .. })));
}

#[test]
fn tsv_output_of_uniform_rows() {
    let input = br#"[{"x":1,"y":"a"},{"x":2,"y":"b"}]"#;
    let out = convert(input, &options(Format::Tsv)).unwrap();
    assert_eq!(out, "x\ty\n1\ta\n2\tb");
}

#[test]
fn yaml_output_of_a_flat_object() {
    let input = br#"{"name":"Alice","age":30,"motto":"less is more"}"#;
    let out = convert(input, &options(Format::Yaml)).unwrap();
    assert_eq!(out, "name: Alice\nage: 30\nmotto: less is more\n");
}

#[test]
fn deterministic_output_for_identical_inputs() {
    let input = br#"{"users":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]}"#;
    let opts = options(Format::Toon);
    assert_eq!(
        convert(input, &opts).unwrap(),
        convert(input, &opts).unwrap()
    );
}
