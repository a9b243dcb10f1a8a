//! Property-based tests for renderer determinism and path extraction

use prax::render::{extract, render, FieldPath, FieldSpec, OutputFormat};
use proptest::prelude::*;
use serde_json::{json, Value};

fn record_strategy() -> impl Strategy<Value = Value> {
    (
        "[a-z][a-z0-9-]{0,12}",
        prop::option::of("[ -~]{0,20}"),
        prop::collection::vec("[a-z]{1,8}", 0..4),
        any::<bool>(),
    )
        .prop_map(|(name, stage, tags, open)| {
            json!({"name": name, "stage": stage, "tags": tags, "open": open})
        })
}

fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Name", "$.name"),
        FieldSpec::new("Stage", "$.stage"),
        FieldSpec::new("Tags", "$.tags.*").separator(", "),
        FieldSpec::new("Open", "$.open"),
    ]
}

/// Identical input renders byte-identically in every format
#[test]
fn test_render_is_deterministic_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec(record_strategy(), 0..6),
            |records| {
                let fields = fields();
                for format in [
                    OutputFormat::Table,
                    OutputFormat::Plain,
                    OutputFormat::Yaml,
                    OutputFormat::Json,
                ] {
                    let first = render(&records, &fields, format, 2).unwrap();
                    let second = render(&records, &fields, format, 2).unwrap();
                    prop_assert_eq!(first, second);
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Every non-empty line carries the requested indent
#[test]
fn test_indent_prefixes_every_line_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(record_strategy(), 1..4), 0usize..6),
            |(records, indent)| {
                let text = render(&records, &fields(), OutputFormat::Yaml, indent).unwrap();
                let prefix = " ".repeat(indent);
                for line in text.lines().filter(|l| !l.is_empty()) {
                    prop_assert!(line.starts_with(&prefix));
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Wildcard over a sequence yields one value per element, in order
#[test]
fn test_wildcard_preserves_sequence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let path = FieldPath::parse("$.tags.*").unwrap();

    runner
        .run(&prop::collection::vec("[a-z]{1,8}", 0..8), |tags| {
            let record = json!({ "tags": tags });
            let values = path.extract(&record);
            let expected: Vec<Value> = tags.iter().map(|t| json!(t)).collect();
            prop_assert_eq!(values, expected);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_tuple_selection_yields_one_composite() {
    let record = json!({"suspended": true, "schedule": "@daily", "other": 1});
    let values = extract(&record, r#"$.["suspended", "schedule"]"#);
    assert_eq!(values, vec![json!([true, "@daily"])]);
}

#[test]
fn test_empty_fields_dump_all_records() {
    let records = vec![json!({"name": "a"}), json!({"name": "b"})];
    let yaml = render(&records, &[], OutputFormat::Table, 0).unwrap();
    assert_eq!(yaml, "- name: a\n- name: b");
    let json_out = render(&records, &[], OutputFormat::Json, 0).unwrap();
    let parsed: Value = serde_json::from_str(&json_out).unwrap();
    assert_eq!(parsed, json!(records));
}
