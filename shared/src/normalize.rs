//! Turns whatever label payload the service hands back into canonical
//! [`Label`]s.
//!
//! Recognized list locations: `labels`, `Labels`, or a bare array.
//! Recognized element shapes: `{name, confidence}`, `{Name, Confidence}` and
//! `{label, confidence}`. Anything else is a compatibility fallback: the first
//! key of the object becomes the name and the confidence defaults to zero.
//! Normalization never fails.

use serde_json::{Map, Value};

use crate::Label;

const LIST_KEYS: [&str; 2] = ["labels", "Labels"];

const SHAPES: [(&str, &str); 3] = [
    ("name", "confidence"),
    ("Name", "Confidence"),
    ("label", "confidence"),
];

pub fn normalize_response(payload: &Value) -> Vec<Label> {
    label_list(payload)
        .map(|items| items.iter().map(normalize_label).collect())
        .unwrap_or_default()
}

fn label_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

pub fn normalize_label(value: &Value) -> Label {
    let Value::Object(map) = value else {
        return Label::new(value.to_string(), 0.0);
    };

    for (name_key, confidence_key) in SHAPES {
        if let Some(name) = name_field(map, name_key) {
            return Label::new(name, number_field(map, confidence_key).unwrap_or(0.0));
        }
    }

    let name = map.keys().next().cloned().unwrap_or_default();
    let confidence = number_field(map, "Confidence")
        .or_else(|| number_field(map, "confidence"))
        .unwrap_or(0.0);
    Label::new(name, confidence)
}

/// Any truthy value counts as a name. Non-string values keep their JSON text.
fn name_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some(true.to_string()),
        value @ (Value::Array(_) | Value::Object(_)) => Some(value.to_string()),
        _ => None,
    }
}

fn number_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recognized_shapes_normalize_identically() {
        let expected = Label::new("Cat", 98.7);

        for element in [
            json!({ "name": "Cat", "confidence": 98.7 }),
            json!({ "Name": "Cat", "Confidence": 98.7 }),
            json!({ "label": "Cat", "confidence": 98.7 }),
        ] {
            assert_eq!(normalize_label(&element), expected, "shape {element}");
        }
    }

    #[test]
    fn test_unrecognized_shape_uses_first_key() {
        let label = normalize_label(&json!({ "Tag": "dog", "Score": 0.4 }));
        assert_eq!(label, Label::new("Tag", 0.0));

        let label = normalize_label(&json!({}));
        assert_eq!(label, Label::new("", 0.0));
    }

    #[test]
    fn test_non_string_name_is_kept_as_text() {
        let label = normalize_label(&json!({ "name": 5, "confidence": 3 }));
        assert_eq!(label, Label::new("5", 3.0));

        let label = normalize_label(&json!({ "Name": true, "Confidence": 40 }));
        assert_eq!(label, Label::new("true", 40.0));
    }

    #[test]
    fn test_falsy_name_falls_through_to_next_shape() {
        let label = normalize_label(&json!({ "name": 0, "label": "Dog", "confidence": 12 }));
        assert_eq!(label, Label::new("Dog", 12.0));

        let label = normalize_label(&json!({ "name": "", "confidence": 12 }));
        assert_eq!(label, Label::new("name", 12.0));
    }

    #[test]
    fn test_non_object_element_does_not_panic() {
        assert_eq!(normalize_label(&json!("Dog")), Label::new("\"Dog\"", 0.0));
        assert_eq!(normalize_label(&json!(null)), Label::new("null", 0.0));
    }

    #[test]
    fn test_missing_confidence_defaults_to_zero() {
        assert_eq!(normalize_label(&json!({ "Name": "Tree" })), Label::new("Tree", 0.0));
    }

    #[test]
    fn test_string_confidence_is_parsed() {
        let label = normalize_label(&json!({ "name": "Car", "confidence": "71.25" }));
        assert_eq!(label, Label::new("Car", 71.25));
    }

    #[test]
    fn test_list_locations() {
        let items = json!([{ "Name": "Cat", "Confidence": 98.7 }]);
        let expected = vec![Label::new("Cat", 98.7)];

        assert_eq!(normalize_response(&json!({ "labels": items.clone() })), expected);
        assert_eq!(normalize_response(&json!({ "Labels": items.clone() })), expected);
        assert_eq!(normalize_response(&items), expected);
    }

    #[test]
    fn test_null_lowercase_list_falls_through_to_capitalized() {
        let payload = json!({ "labels": null, "Labels": [{ "name": "Sky", "confidence": 80 }] });
        assert_eq!(normalize_response(&payload), vec![Label::new("Sky", 80.0)]);
    }

    #[test]
    fn test_unknown_payload_yields_empty_list() {
        assert!(normalize_response(&json!({ "results": [] })).is_empty());
        assert!(normalize_response(&json!("oops")).is_empty());
        assert!(normalize_response(&json!(null)).is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let payload = json!({ "labels": [
            { "name": "Low", "confidence": 10 },
            { "name": "High", "confidence": 90 },
            { "name": "Low", "confidence": 10 },
        ]});
        let names: Vec<_> = normalize_response(&payload).into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Low", "High", "Low"]);
    }
}
