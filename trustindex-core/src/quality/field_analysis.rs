//! Per-field statistics over a record batch.
//!
//! A field missing from a record counts as null for that record. Empty and
//! whitespace-only strings are counted separately from nulls.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::Record;
use crate::values::{field_names, is_blank, mean_and_std, value_to_string};

use super::models::{FieldStat, FieldType, NumericStats, TextStats, ValueCount};

/// Number of most frequent values reported per field.
const TOP_VALUES: usize = 3;

/// Analyzes every field present in any record.
///
/// Fields are returned in first-appearance order.
pub fn analyze_fields(records: &[Record]) -> Vec<FieldStat> {
    field_names(records)
        .iter()
        .map(|field| analyze_field(records, field))
        .collect()
}

/// Analyzes a single field across the batch.
pub fn analyze_field(records: &[Record], field: &str) -> FieldStat {
    let total = records.len() as u64;
    let values: Vec<&Value> = records
        .iter()
        .filter_map(|record| record.get(field))
        .filter(|value| !value.is_null())
        .collect();

    let non_null = values.len() as u64;
    let empty_count = values.iter().filter(|v| is_blank(v)).count() as u64;
    let non_empty = non_null.saturating_sub(empty_count);

    let data_type = infer_type(&values);
    let rendered: Vec<String> = values.iter().map(|v| value_to_string(v)).collect();

    let numeric = if data_type.is_numeric() {
        numeric_stats(&values)
    } else {
        None
    };
    let text = if matches!(data_type, FieldType::Text | FieldType::Mixed) {
        text_stats(&rendered)
    } else {
        None
    };

    let counts = count_values(&rendered);

    FieldStat {
        field: field.to_string(),
        data_type,
        null_count: total.saturating_sub(non_null),
        non_null_count: non_null,
        empty_count,
        non_null_ratio: ratio(non_null, total),
        non_empty_ratio: ratio(non_empty, total),
        fill_rate: ratio(non_null, total),
        unique_count: counts.len() as u64,
        numeric,
        text,
        most_common_values: counts.into_iter().take(TOP_VALUES).collect(),
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Infers the field type from its non-null values.
pub(crate) fn infer_type(values: &[&Value]) -> FieldType {
    let mut kinds = values.iter().map(|value| match value {
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => FieldType::Integer,
        Value::Number(_) => FieldType::Float,
        Value::String(_) => FieldType::Text,
        Value::Array(_) | Value::Object(_) => FieldType::Nested,
        Value::Null => FieldType::Empty,
    });

    let Some(first) = kinds.next() else {
        return FieldType::Empty;
    };

    kinds.fold(first, |acc, kind| match (acc, kind) {
        (a, b) if a == b => a,
        (FieldType::Integer | FieldType::Float, FieldType::Integer | FieldType::Float) => {
            FieldType::Float
        }
        _ => FieldType::Mixed,
    })
}

fn numeric_stats(values: &[&Value]) -> Option<NumericStats> {
    let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
    if numbers.is_empty() {
        return None;
    }

    let (mean, std) = mean_and_std(&numbers);
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(NumericStats {
        min_value: min,
        max_value: max,
        mean_value: mean,
        std_value: std,
    })
}

fn text_stats(rendered: &[String]) -> Option<TextStats> {
    let lengths: Vec<usize> = rendered.iter().map(|s| s.chars().count()).collect();
    let min_length = *lengths.iter().min()?;
    let max_length = *lengths.iter().max()?;
    let avg_length = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

    Some(TextStats {
        avg_length,
        min_length,
        max_length,
    })
}

/// Counts distinct values, most frequent first; ties keep first appearance.
pub(crate) fn count_values(rendered: &[String]) -> Vec<ValueCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for value in rendered {
        let entry = counts.entry(value.as_str()).or_insert_with(|| {
            order.push(value.as_str());
            0
        });
        *entry = entry.saturating_add(1);
    }

    let mut result: Vec<ValueCount> = order
        .into_iter()
        .map(|value| ValueCount {
            value: value.to_string(),
            count: counts.get(value).copied().unwrap_or_default(),
        })
        .collect();
    // Stable sort keeps first-appearance order among ties
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| row.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_missing_field_counts_as_null() {
        let rows = records(vec![
            json!({"name": "Acme", "phone": "020 7946 0958"}),
            json!({"name": "Beta"}),
            json!({"name": "Gamma", "phone": null}),
            json!({"name": "Delta", "phone": "  "}),
        ]);

        let stats = analyze_fields(&rows);
        let phone = stats.iter().find(|s| s.field == "phone").unwrap();

        assert_eq!(phone.null_count, 2);
        assert_eq!(phone.empty_count, 1);
        assert!((phone.non_null_ratio - 0.5).abs() < 0.001);
        assert!((phone.non_empty_ratio - 0.25).abs() < 0.001);
        assert_eq!(phone.fill_rate, phone.non_null_ratio);
        assert_eq!(phone.data_type, FieldType::Text);
    }

    #[test]
    fn test_numeric_field_stats() {
        let rows = records(vec![
            json!({"amount": 10}),
            json!({"amount": 20.5}),
            json!({"amount": 30}),
        ]);

        let stat = analyze_field(&rows, "amount");
        assert_eq!(stat.data_type, FieldType::Float);
        let numeric = stat.numeric.unwrap();
        assert_eq!(numeric.min_value, 10.0);
        assert_eq!(numeric.max_value, 30.0);
        assert!((numeric.mean_value - 20.166_666).abs() < 0.001);
        assert!(stat.text.is_none());
    }

    #[test]
    fn test_text_lengths_and_top_values() {
        let rows = records(vec![
            json!({"status": "Authorised"}),
            json!({"status": "Authorised"}),
            json!({"status": "Cancelled"}),
            json!({"status": "Revoked"}),
            json!({"status": "Cancelled"}),
            json!({"status": "Authorised"}),
            json!({"status": "Lapsed"}),
        ]);

        let stat = analyze_field(&rows, "status");
        let text = stat.text.unwrap();
        assert_eq!(text.min_length, 6);
        assert_eq!(text.max_length, 10);
        assert_eq!(stat.unique_count, 4);

        let top: Vec<(&str, u64)> = stat
            .most_common_values
            .iter()
            .map(|v| (v.value.as_str(), v.count))
            .collect();
        assert_eq!(top, vec![("Authorised", 3), ("Cancelled", 2), ("Revoked", 1)]);
    }

    #[test]
    fn test_type_inference() {
        assert_eq!(infer_type(&[]), FieldType::Empty);
        assert_eq!(infer_type(&[&json!(true), &json!(false)]), FieldType::Boolean);
        assert_eq!(infer_type(&[&json!(1), &json!(2)]), FieldType::Integer);
        assert_eq!(infer_type(&[&json!({"a": 1}), &json!([1])]), FieldType::Nested);
        assert_eq!(infer_type(&[&json!(1), &json!("1")]), FieldType::Mixed);
    }

    #[test]
    fn test_all_null_field() {
        let rows = records(vec![json!({"x": null}), json!({"x": null})]);
        let stat = analyze_field(&rows, "x");
        assert_eq!(stat.data_type, FieldType::Empty);
        assert_eq!(stat.fill_rate, 0.0);
        assert_eq!(stat.unique_count, 0);
        assert!(stat.most_common_values.is_empty());
    }
}
