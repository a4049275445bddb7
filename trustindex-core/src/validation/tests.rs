//! Tests for the embedded report schemas.

use super::*;
use serde_json::json;

/// Setup function to ensure validators are compiled for all tests
fn setup() {
    let _ = initialize_schema_validators();
}

fn dimensions(value: f64) -> Value {
    json!({
        "data_completeness": value,
        "metadata_quality": value,
        "regulatory_compliance": value,
        "transparency": value,
        "accessibility": value
    })
}

fn trust_report() -> Value {
    json!({
        "source": "fca",
        "calculated_at": "2024-01-15T10:30:00Z",
        "overall_trust_score": 0.9,
        "trust_grade": "A+",
        "dimension_scores": dimensions(0.9),
        "dimension_weights": {
            "data_completeness": 0.25,
            "metadata_quality": 0.2,
            "regulatory_compliance": 0.25,
            "transparency": 0.15,
            "accessibility": 0.15
        },
        "score_components": dimensions(0.18),
        "scoring_details": {},
        "confidence_level": 1.0,
        "recommendations": ["Maintain current high standards and monitor for any degradation"]
    })
}

fn pipeline_summary() -> Value {
    json!({
        "pipeline_execution": {
            "started_at": "2024-01-15T10:30:00Z",
            "completed_at": "2024-01-15T10:31:00Z",
            "total_errors": 0,
            "status": "completed_successfully"
        },
        "data_collection": {
            "sources_attempted": 2,
            "sources_successful": 2,
            "sources_failed": 0,
            "total_records_collected": 120
        },
        "quality_auditing": { "sources_audited": 2, "audits_failed": 0 },
        "trust_scoring": {
            "sources_scored": 2,
            "scoring_failed": 0,
            "average_trust_score": 0.75,
            "highest_trust_score": 0.8,
            "lowest_trust_score": 0.7
        },
        "source_rankings": [{
            "source": "fca",
            "trust_score": 0.8,
            "trust_grade": "A",
            "confidence_level": 0.933,
            "records_count": 100
        }],
        "recommendations": ["Pipeline executed successfully with good overall data quality"]
    })
}

#[test]
fn test_schema_initialization_success() {
    assert!(initialize_schema_validators().is_ok());
}

#[test]
fn test_valid_trust_report_passes() {
    setup();
    assert!(validate_trust_report(&trust_report()).is_ok());
}

#[test]
fn test_validation_compiles_lazily() {
    // No setup call: the first validation compiles the schema itself
    assert!(validate_pipeline_summary(&pipeline_summary()).is_ok());
}

#[test]
fn test_missing_dimension_fails() {
    setup();

    let mut report = trust_report();
    report["dimension_scores"]
        .as_object_mut()
        .unwrap()
        .remove("transparency");

    let result = validate_trust_report(&report);
    if let Err(ValidationError::ValidationFailed { errors, .. }) = result {
        assert!(errors.iter().any(|e| e.contains("transparency")));
    } else {
        panic!("Expected ValidationFailed error");
    }
}

#[test]
fn test_score_out_of_range_fails() {
    setup();

    let mut report = trust_report();
    report["overall_trust_score"] = json!(1.2);
    report["confidence_level"] = json!(-0.1);

    match validate_trust_report(&report) {
        Err(ValidationError::ValidationFailed { error_count, errors }) => {
            assert_eq!(error_count, 2);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("Expected ValidationFailed error, got {:?}", other),
    }
}

#[test]
fn test_unknown_grade_fails() {
    setup();

    let mut report = trust_report();
    report["trust_grade"] = json!("A++");
    assert!(validate_trust_report(&report).is_err());
}

#[test]
fn test_empty_recommendations_fail() {
    setup();

    let mut report = trust_report();
    report["recommendations"] = json!([]);
    assert!(validate_trust_report(&report).is_err());
}

#[test]
fn test_malformed_json_reports_parsing_error() {
    let result = validate_trust_report_str("{ not json");
    assert!(matches!(result, Err(ValidationError::JsonParsing { .. })));
}

#[test]
fn test_pipeline_summary_requires_all_sections() {
    setup();

    let mut summary = pipeline_summary();
    summary.as_object_mut().unwrap().remove("source_rankings");

    let result = validate_pipeline_summary(&summary);
    if let Err(ValidationError::ValidationFailed { errors, .. }) = result {
        assert!(errors.iter().any(|e| e.contains("source_rankings")));
    } else {
        panic!("Expected ValidationFailed error");
    }
}

#[test]
fn test_pipeline_summary_rejects_unknown_status() {
    setup();

    let mut summary = pipeline_summary();
    summary["pipeline_execution"]["status"] = json!("running");
    assert!(validate_pipeline_summary(&summary).is_err());
}
