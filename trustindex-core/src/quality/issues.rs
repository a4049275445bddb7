//! Flat list of notable quality problems.

use crate::config::IssueThresholds;

use super::models::{FieldStat, QualityIssue, Severity};

/// Field-name fragments that mark a field as an identifier.
const IDENTIFIER_FIELDS: &[&str] = &["id", "frn", "name", "company_name", "url"];

/// Flags sparse, near-constant and overlong fields, and datasets without
/// any identifier field.
pub fn identify_issues(stats: &[FieldStat], thresholds: &IssueThresholds) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    for stat in stats {
        if stat.fill_rate < thresholds.low_fill_rate {
            let severity = if stat.fill_rate < thresholds.critical_fill_rate {
                Severity::High
            } else {
                Severity::Medium
            };
            issues.push(QualityIssue::low_fill_rate(&stat.field, stat.fill_rate, severity));
        }
    }

    for stat in stats {
        if let Some(top) = stat.most_common_values.first()
            && stat.non_null_count > 0
        {
            let ratio = top.count as f64 / stat.non_null_count as f64;
            if ratio > thresholds.dominant_value_ratio {
                issues.push(QualityIssue::low_diversity(&stat.field, ratio));
            }
        }

        if let Some(text) = stat.text
            && text.max_length > thresholds.max_text_length
        {
            issues.push(QualityIssue::unusually_long(&stat.field, text.max_length));
        }
    }

    let has_identifier = stats.iter().any(|stat| {
        let name = stat.field.to_lowercase();
        IDENTIFIER_FIELDS.iter().any(|id| name.contains(id))
    });
    if !has_identifier {
        issues.push(QualityIssue::missing_identifier());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::quality::QualityIssueKind;
    use crate::quality::field_analysis::analyze_fields;
    use serde_json::{Value, json};

    fn issues_for(rows: Vec<Value>) -> Vec<QualityIssue> {
        let records: Vec<Record> = rows
            .into_iter()
            .map(|row| row.as_object().cloned().unwrap())
            .collect();
        identify_issues(&analyze_fields(&records), &IssueThresholds::default())
    }

    #[test]
    fn test_low_fill_rate_severity() {
        let mut rows = Vec::new();
        for i in 0..10 {
            let mut row = json!({"id": i});
            if i < 1 {
                row["phone"] = json!("020 7946 0958");
            }
            if i < 4 {
                row["sector"] = json!(format!("sector-{}", i));
            }
            rows.push(row);
        }

        let issues = issues_for(rows);
        let phone = issues
            .iter()
            .find(|i| i.field == "phone" && i.kind == QualityIssueKind::LowFillRate)
            .unwrap();
        assert_eq!(phone.severity, Severity::High);
        let sector = issues
            .iter()
            .find(|i| i.field == "sector" && i.kind == QualityIssueKind::LowFillRate)
            .unwrap();
        assert_eq!(sector.severity, Severity::Medium);
    }

    #[test]
    fn test_low_diversity() {
        let mut rows: Vec<Value> = (0..19)
            .map(|i| json!({"id": i, "country": "UK"}))
            .collect();
        rows.push(json!({"id": 19, "country": "IE"}));

        let issues = issues_for(rows);
        let country = issues
            .iter()
            .find(|i| i.kind == QualityIssueKind::LowDiversity)
            .unwrap();
        assert_eq!(country.field, "country");
        assert!((country.dominant_value_ratio.unwrap() - 0.95).abs() < 1e-9);
        assert!(!issues.iter().any(|i| i.field == "id" && i.kind == QualityIssueKind::LowDiversity));
    }

    #[test]
    fn test_unusually_long_values() {
        let issues = issues_for(vec![
            json!({"id": 1, "pitch": "x".repeat(1001)}),
            json!({"id": 2, "pitch": "short"}),
        ]);
        let long = issues
            .iter()
            .find(|i| i.kind == QualityIssueKind::UnusuallyLongValues)
            .unwrap();
        assert_eq!(long.max_length, Some(1001));
        assert_eq!(long.severity, Severity::Low);
    }

    #[test]
    fn test_missing_identifier() {
        let issues = issues_for(vec![json!({"sector": "a"}), json!({"sector": "b"})]);
        assert!(issues.iter().any(|i| i.kind == QualityIssueKind::MissingIdentifier));

        let issues = issues_for(vec![json!({"frn": "123456"}), json!({"frn": "654321"})]);
        assert!(!issues.iter().any(|i| i.kind == QualityIssueKind::MissingIdentifier));
    }
}
