use crate::shared::EngineError;
use serde_json::Value;

/// Parameter name reserved for the wizard step index; never forwarded as an input.
pub const STEP_INDEX_PARAM: &str = "stepIndex";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValue {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDocument {
    pub step_index: usize,
    pub inputs: Vec<InputValue>,
}

impl InputDocument {
    pub fn new(step_index: usize) -> Self {
        Self {
            step_index,
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, name: &str, values: &[&str]) -> Self {
        self.inputs.push(InputValue {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|input| input.name == name)
            .and_then(|input| input.values.first())
            .map(String::as_str)
    }

    /// Parses `{"stepIndex": n, "inputs": [{"name": .., "value": ..}]}`.
    /// `value` may be a string, an array of strings, or any scalar.
    pub fn from_json(content: &Value, default_step: usize) -> Result<Self, EngineError> {
        let object = content
            .as_object()
            .ok_or_else(|| EngineError::MalformedDocument("expected a JSON object".to_string()))?;

        let step_index = match object.get(STEP_INDEX_PARAM) {
            None | Some(Value::Null) => default_step,
            Some(Value::String(raw)) => parse_step_index(Some(raw))?,
            Some(raw) => raw
                .as_u64()
                .and_then(|step| usize::try_from(step).ok())
                .ok_or_else(|| EngineError::MalformedStepIndex {
                    raw: raw.to_string(),
                })?,
        };

        let mut inputs = Vec::new();
        if let Some(raw_inputs) = object.get("inputs") {
            let entries = raw_inputs.as_array().ok_or_else(|| {
                EngineError::MalformedDocument("`inputs` must be an array".to_string())
            })?;
            for entry in entries {
                let name = entry.get("name").and_then(Value::as_str).ok_or_else(|| {
                    EngineError::MalformedDocument("every input needs a string `name`".to_string())
                })?;
                if name == STEP_INDEX_PARAM {
                    continue;
                }
                inputs.push(InputValue {
                    name: name.to_string(),
                    values: json_values(entry.get("value"))?,
                });
            }
        }

        Ok(Self { step_index, inputs })
    }
}

fn json_values(value: Option<&Value>) -> Result<Vec<String>, EngineError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(vec![raw.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(raw) => Ok(raw.clone()),
                Value::Array(_) | Value::Object(_) => Err(EngineError::MalformedDocument(
                    "input values must be scalars".to_string(),
                )),
                other => Ok(other.to_string()),
            })
            .collect(),
        Some(Value::Object(_)) => Err(EngineError::MalformedDocument(
            "input values must be scalars".to_string(),
        )),
        Some(other) => Ok(vec![other.to_string()]),
    }
}

/// Absent or empty means step 0.
pub fn parse_step_index(raw: Option<&str>) -> Result<usize, EngineError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| EngineError::MalformedStepIndex {
                raw: raw.to_string(),
            }),
    }
}

/// Shapes flat request parameters into a step-scoped document. The reserved
/// step parameter is dropped; names and values keep arrival order.
pub fn build_input_document(
    step_raw: Option<&str>,
    params: &[(String, Vec<String>)],
) -> Result<InputDocument, EngineError> {
    let step_index = parse_step_index(step_raw)?;
    let inputs = params
        .iter()
        .filter(|(name, _)| name != STEP_INDEX_PARAM)
        .map(|(name, values)| InputValue {
            name: name.clone(),
            values: values.clone(),
        })
        .collect();
    Ok(InputDocument { step_index, inputs })
}

/// Like [`build_input_document`], taking the step index from the reserved
/// parameter itself (first value wins).
pub fn build_from_params(params: &[(String, Vec<String>)]) -> Result<InputDocument, EngineError> {
    let step_raw = params
        .iter()
        .find(|(name, _)| name == STEP_INDEX_PARAM)
        .and_then(|(_, values)| values.first())
        .map(String::as_str);
    build_input_document(step_raw, params)
}

/// Decodes `application/x-www-form-urlencoded` bodies and query strings,
/// grouping repeated names in first-seen order.
pub fn parse_form_encoded(body: &str) -> Result<Vec<(String, Vec<String>)>, EngineError> {
    let mut params: Vec<(String, Vec<String>)> = Vec::new();
    for pair in body.trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_name, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode_component(raw_name)?;
        let value = decode_component(raw_value)?;
        match params.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => params.push((name, vec![value])),
        }
    }
    Ok(params)
}

fn decode_component(raw: &str) -> Result<String, EngineError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| EngineError::MalformedDocument(format!("invalid percent-encoding: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_document_accepts_scalar_and_array_values() {
        let doc = InputDocument::from_json(
            &json!({
                "stepIndex": 2,
                "inputs": [
                    {"name": "named", "value": "demo"},
                    {"name": "tags", "value": ["a", "b"]},
                    {"name": "overwrite", "value": true}
                ]
            }),
            0,
        )
        .expect("document");
        assert_eq!(doc.step_index, 2);
        assert_eq!(doc.first_value("named"), Some("demo"));
        assert_eq!(doc.inputs[1].values, vec!["a", "b"]);
        assert_eq!(doc.inputs[2].values, vec!["true"]);
    }

    #[test]
    fn json_document_uses_default_step_when_missing() {
        let doc = InputDocument::from_json(&json!({"inputs": []}), 1).expect("document");
        assert_eq!(doc.step_index, 1);
    }

    #[test]
    fn json_document_rejects_negative_step() {
        let err = InputDocument::from_json(&json!({"stepIndex": -1}), 0).unwrap_err();
        assert!(matches!(err, EngineError::MalformedStepIndex { .. }));
    }

    #[test]
    fn form_bodies_decode_plus_and_percent_sequences() {
        let params = parse_form_encoded("named=my+app&tag=a%2Fb&tag=c&flag").expect("params");
        assert_eq!(
            params,
            vec![
                ("named".to_string(), vec!["my app".to_string()]),
                ("tag".to_string(), vec!["a/b".to_string(), "c".to_string()]),
                ("flag".to_string(), vec![String::new()]),
            ]
        );
    }
}
