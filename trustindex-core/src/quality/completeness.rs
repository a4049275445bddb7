//! Completeness analysis.
//!
//! Missing or null cells, empty strings and whitespace-only strings are
//! counted in disjoint buckets; all three degrade completeness.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::CompletenessThresholds;
use crate::models::Record;

use super::models::{CompletenessResult, FieldCompleteness};

/// Analyzes completeness over `fields` for every record.
///
/// `overall_completeness = 1 - (missing + empty + whitespace) / (rows * fields)`.
pub fn analyze_completeness(
    records: &[Record],
    fields: &[String],
    thresholds: &CompletenessThresholds,
) -> CompletenessResult {
    let total_rows = records.len() as u64;
    let total_cells = total_rows.saturating_mul(fields.len() as u64);

    let mut missing_cells: u64 = 0;
    let mut empty_cells: u64 = 0;
    let mut whitespace_cells: u64 = 0;
    let mut field_completeness = BTreeMap::new();

    for field in fields {
        let mut missing: u64 = 0;
        let mut unusable: u64 = 0;

        for record in records {
            match record.get(field) {
                None | Some(Value::Null) => {
                    missing += 1;
                    unusable += 1;
                }
                Some(Value::String(s)) if s.is_empty() => {
                    empty_cells += 1;
                    unusable += 1;
                }
                Some(Value::String(s)) if s.trim().is_empty() => {
                    whitespace_cells += 1;
                    unusable += 1;
                }
                _ => {}
            }
        }

        missing_cells += missing;

        let non_null = total_rows.saturating_sub(missing);
        let non_empty = total_rows.saturating_sub(unusable);
        field_completeness.insert(
            field.clone(),
            FieldCompleteness {
                non_null_ratio: ratio(non_null, total_rows),
                non_empty_ratio: ratio(non_empty, total_rows),
                missing_count: missing,
                empty_count: unusable,
            },
        );
    }

    let total_missing = missing_cells + empty_cells + whitespace_cells;
    let overall_completeness = if total_cells > 0 {
        (1.0 - total_missing as f64 / total_cells as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CompletenessResult {
        overall_completeness,
        missing_cells,
        empty_cells,
        whitespace_cells,
        field_completeness,
        completeness_grade: thresholds.grade(overall_completeness),
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::CompletenessGrade;
    use crate::values::field_names;
    use serde_json::json;

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| row.as_object().cloned().unwrap())
            .collect()
    }

    fn analyze(rows: &[Record]) -> CompletenessResult {
        analyze_completeness(rows, &field_names(rows), &CompletenessThresholds::default())
    }

    #[test]
    fn test_completeness_all_present() {
        let rows = records(vec![
            json!({"id": 1, "name": "Alice", "email": "alice@example.com"}),
            json!({"id": 2, "name": "Bob", "email": "bob@example.com"}),
        ]);

        let result = analyze(&rows);

        assert!((result.overall_completeness - 1.0).abs() < 0.001);
        assert_eq!(result.total_missing(), 0);
        assert_eq!(result.completeness_grade, CompletenessGrade::Excellent);
        assert_eq!(result.field_completeness.len(), 3);
    }

    #[test]
    fn test_ten_by_five_with_five_missing_is_good() {
        let mut rows = Vec::new();
        for i in 0..10 {
            let mut row = json!({"a": i, "b": "x", "c": "y", "d": true, "e": 1.5});
            if i < 5 {
                row["c"] = Value::Null;
            }
            rows.push(row);
        }
        let rows = records(rows);

        let result = analyze(&rows);

        assert!((result.overall_completeness - 0.90).abs() < 1e-9);
        assert_eq!(result.completeness_grade, CompletenessGrade::Good);
        assert_eq!(result.missing_cells, 5);
    }

    #[test]
    fn test_empty_and_whitespace_are_disjoint() {
        let rows = records(vec![
            json!({"name": "", "city": "   "}),
            json!({"name": "Bob"}),
        ]);

        let result = analyze(&rows);

        assert_eq!(result.empty_cells, 1);
        assert_eq!(result.whitespace_cells, 1);
        assert_eq!(result.missing_cells, 1);
        assert!((result.overall_completeness - 0.25).abs() < 1e-9);

        let city = result.field_completeness.get("city").unwrap();
        assert_eq!(city.missing_count, 1);
        assert_eq!(city.empty_count, 2);
        assert!((city.non_null_ratio - 0.5).abs() < 1e-9);
        assert_eq!(city.non_empty_ratio, 0.0);
    }

    #[test]
    fn test_no_cells() {
        let result = analyze(&[]);
        assert_eq!(result.overall_completeness, 0.0);
        assert_eq!(result.completeness_grade, CompletenessGrade::Poor);
    }
}
