//! Assertions over `{data, errors, warnings}` JSON bodies.

use serde_json::Value;

/// Panic unless the envelope carries exactly one error with `code`.
pub fn assert_error_code(body: &Value, code: &str) {
    let errors = body["errors"]
        .as_array()
        .unwrap_or_else(|| panic!("envelope has no errors array: {body}"));
    assert_eq!(errors.len(), 1, "expected one error, got {body}");
    assert_eq!(errors[0]["code"], code, "unexpected error code in {body}");
    assert!(body["data"].is_null(), "error envelope carries data: {body}");
}

/// Return `data`, panicking if the envelope reports errors.
pub fn data(body: &Value) -> &Value {
    assert_eq!(
        body["errors"],
        Value::Array(Vec::new()),
        "unexpected errors in {body}"
    );
    &body["data"]
}

pub fn warning_codes(body: &Value) -> Vec<String> {
    body["warnings"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|w| w["code"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
