//! Helpers for inspecting dynamic JSON values.

use serde_json::Value;

use crate::models::Record;

/// Rounds to three decimal places, the precision of every reported score.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Renders a value as text for counting and pattern checks.
///
/// Strings are rendered without quotes; containers as compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// True for strings that are empty or contain only whitespace.
pub fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

/// Truthiness of a value: null, false, zero, and empty strings or
/// containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Truthiness of an optional field of a record.
pub fn field_truthy(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(is_truthy)
}

/// Numeric view of a value; strings are parsed, non-finite values dropped.
pub fn extract_numeric(value: &Value) -> Option<f64> {
    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    numeric.filter(|v| v.is_finite())
}

/// Field names across a batch in first-appearance order.
pub fn field_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }
    names
}

/// Lowercased text of every truthy value in a record, space separated.
pub fn record_text(record: &Record) -> String {
    record
        .values()
        .filter(|v| is_truthy(v))
        .map(|v| value_to_string(v).to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mean and population standard deviation.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.98999), 0.99);
        assert_eq!(round3(0.1234), 0.123);
        assert_eq!(round3(0.0), 0.0);
    }

    #[test]
    fn test_blank_and_truthy() {
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("   \t")));
        assert!(!is_blank(&json!(null)));
        assert!(!is_blank(&json!(" x ")));

        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(" ")));
        assert!(is_truthy(&json!([1])));
    }

    #[test]
    fn test_field_names_first_appearance() {
        let records = vec![
            json!({"b": 1, "a": 2}).as_object().unwrap().clone(),
            json!({"c": 3, "a": 4}).as_object().unwrap().clone(),
        ];
        assert_eq!(field_names(&records), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_record_text_skips_falsy() {
        let record = json!({"name": "Acme API", "count": 0, "empty": "", "contact": {"email": "A@B.COM"}})
            .as_object()
            .unwrap()
            .clone();
        let text = record_text(&record);
        assert!(text.contains("acme api"));
        assert!(text.contains("a@b.com"));
        assert!(!text.contains('0'));
    }

    #[test]
    fn test_mean_and_std() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-9);
        assert!((std - 2.0).abs() < 1e-9);
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_extract_numeric() {
        assert_eq!(extract_numeric(&json!(3)), Some(3.0));
        assert_eq!(extract_numeric(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(extract_numeric(&json!("abc")), None);
        assert_eq!(extract_numeric(&json!(true)), None);
    }
}
