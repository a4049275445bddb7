//! Consistency analysis.
//!
//! Flags fields mixing numeric and non-numeric representations, and
//! `email`/`phone`/`url`/`postcode` fields whose values do not match the
//! named validator for that format.

use serde_json::Value;

use crate::models::Record;
use crate::values::{is_blank, value_to_string};

use super::models::{ConsistencyIssue, ConsistencyIssueKind, ConsistencyResult};
use super::patterns::{Validator, matches};

/// Analyzes consistency of each field.
///
/// The score starts at 1.0 and loses `penalty` per issue, floored at 0.0.
pub fn analyze_consistency(records: &[Record], fields: &[String], penalty: f64) -> ConsistencyResult {
    let mut issues = Vec::new();

    for field in fields {
        let values: Vec<&Value> = records
            .iter()
            .filter_map(|record| record.get(field))
            .filter(|value| !value.is_null() && !is_blank(value))
            .collect();

        if let Some(issue) = mixed_types(field, &values) {
            issues.push(issue);
        }

        if let Some(validator) = Validator::for_field(field)
            && let Some(issue) = invalid_format(field, validator, &values)
        {
            issues.push(issue);
        }
    }

    let score = (1.0 - penalty * issues.len() as f64).max(0.0);

    ConsistencyResult {
        consistency_score: score,
        issues_count: issues.len(),
        consistency_issues: issues,
    }
}

fn is_numeric_like(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => matches(Validator::Numeric, s),
        _ => false,
    }
}

/// Numeric-looking values in a field that also holds non-numeric values.
fn mixed_types(field: &str, values: &[&Value]) -> Option<ConsistencyIssue> {
    let numeric = values.iter().filter(|v| is_numeric_like(v)).count();
    if numeric == 0 || numeric == values.len() {
        return None;
    }

    Some(ConsistencyIssue {
        field: field.to_string(),
        issue: ConsistencyIssueKind::MixedDataTypes,
        count: numeric as u64,
        expected_pattern: None,
    })
}

fn invalid_format(field: &str, validator: Validator, values: &[&Value]) -> Option<ConsistencyIssue> {
    let invalid = values
        .iter()
        .filter(|v| !matches(validator, &value_to_string(v)))
        .count();
    if invalid == 0 {
        return None;
    }

    Some(ConsistencyIssue {
        field: field.to_string(),
        issue: ConsistencyIssueKind::InvalidFormat,
        count: invalid as u64,
        expected_pattern: Some(validator.pattern().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::field_names;
    use serde_json::json;

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| row.as_object().cloned().unwrap())
            .collect()
    }

    fn analyze(rows: &[Record]) -> ConsistencyResult {
        analyze_consistency(rows, &field_names(rows), 0.1)
    }

    #[test]
    fn test_consistent_data() {
        let rows = records(vec![
            json!({"id": 1, "email": "a@example.com", "amount": "100"}),
            json!({"id": 2, "email": "b@example.com", "amount": "250.50"}),
        ]);

        let result = analyze(&rows);
        assert!((result.consistency_score - 1.0).abs() < 0.001);
        assert!(result.consistency_issues.is_empty());
    }

    #[test]
    fn test_mixed_representations() {
        let rows = records(vec![
            json!({"raised": "100"}),
            json!({"raised": 250}),
            json!({"raised": "undisclosed"}),
            json!({"raised": ""}),
        ]);

        let result = analyze(&rows);
        assert_eq!(result.issues_count, 1);
        let issue = &result.consistency_issues[0];
        assert_eq!(issue.issue, ConsistencyIssueKind::MixedDataTypes);
        assert_eq!(issue.count, 2);
        assert!((result.consistency_score - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_invalid_formats_case_insensitive_field() {
        let rows = records(vec![
            json!({"Email": "not-an-email", "postcode": "ec2v 7hn"}),
            json!({"Email": "ok@example.com", "postcode": "nowhere"}),
        ]);

        let result = analyze(&rows);
        assert_eq!(result.issues_count, 2);
        assert!(result.consistency_issues.iter().all(|i| {
            i.issue == ConsistencyIssueKind::InvalidFormat && i.count == 1 && i.expected_pattern.is_some()
        }));
        assert!((result.consistency_score - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_score_floored_at_zero() {
        let mut row = serde_json::Map::new();
        for i in 0..12 {
            row.insert(format!("f{}", i), json!("abc"));
        }
        let mut numeric_row = serde_json::Map::new();
        for i in 0..12 {
            numeric_row.insert(format!("f{}", i), json!(1));
        }

        let result = analyze(&[row, numeric_row]);
        assert_eq!(result.issues_count, 12);
        assert_eq!(result.consistency_score, 0.0);
    }
}
