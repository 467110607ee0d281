use cmdhost::command::{
    build_from_params, build_input_document, parse_form_encoded, parse_step_index, InputDocument,
};
use cmdhost::shared::{EngineError, ResponseStatus};
use serde_json::json;

fn params(pairs: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
    pairs
        .iter()
        .map(|(name, values)| {
            (
                name.to_string(),
                values.iter().map(|value| value.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn absent_step_index_means_step_zero() {
    let doc = build_input_document(None, &params(&[("named", &["demo"])])).expect("doc");
    assert_eq!(doc.step_index, 0);
    assert_eq!(doc.first_value("named"), Some("demo"));
    assert_eq!(parse_step_index(Some("")).expect("empty"), 0);
}

#[test]
fn numeric_step_index_is_parsed() {
    let doc = build_from_params(&params(&[("stepIndex", &["3"]), ("named", &["demo"])]))
        .expect("doc");
    assert_eq!(doc.step_index, 3);
    assert_eq!(doc.inputs.len(), 1);
    assert!(doc.first_value("stepIndex").is_none());
}

#[test]
fn non_numeric_step_index_is_malformed() {
    let err = build_from_params(&params(&[("stepIndex", &["abc"])])).expect_err("malformed");
    assert!(matches!(err, EngineError::MalformedStepIndex { ref raw } if raw == "abc"));
    assert_eq!(err.status(), ResponseStatus::BadRequest);
}

#[test]
fn repeated_values_keep_arrival_order() {
    let doc = build_input_document(None, &params(&[("tags", &["b", "a"]), ("named", &["x"])]))
        .expect("doc");
    assert_eq!(doc.inputs[0].name, "tags");
    assert_eq!(doc.inputs[0].values, vec!["b", "a"]);
}

#[test]
fn form_bodies_decode_into_grouped_params() {
    let parsed = parse_form_encoded("named=my+app&tag=a&tag=b%20c&stepIndex=1").expect("form");
    let doc = build_from_params(&parsed).expect("doc");
    assert_eq!(doc.step_index, 1);
    assert_eq!(doc.first_value("named"), Some("my app"));
    assert_eq!(doc.inputs[1].values, vec!["a", "b c"]);
}

#[test]
fn json_documents_reject_non_object_payloads() {
    let err = InputDocument::from_json(&json!(["not", "an", "object"]), 0)
        .expect_err("array payload");
    assert!(matches!(err, EngineError::MalformedDocument(_)));
}
