//! Data-quality audit result types.
//!
//! Every dimension result carries its `*_score` in [0.0, 1.0] plus the
//! issues that produced it. An [`AuditReport`] is built once per audit and
//! never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Dominant value type of a field across a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Every value is null or missing
    Empty,
    Boolean,
    Integer,
    Float,
    Text,
    /// Arrays or objects
    Nested,
    /// More than one kind of value
    Mixed,
}

impl FieldType {
    /// Returns the serialized name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Empty => "empty",
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Nested => "nested",
            FieldType::Mixed => "mixed",
        }
    }

    /// True for integer and float fields.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

/// Summary statistics for numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min_value: f64,
    pub max_value: f64,
    pub mean_value: f64,
    /// Population standard deviation
    pub std_value: f64,
}

/// Length statistics for text fields, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub avg_length: f64,
    pub min_length: usize,
    pub max_length: usize,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Per-field statistics over a record batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStat {
    pub field: String,
    pub data_type: FieldType,
    /// Records where the field is missing or null
    pub null_count: u64,
    /// Records holding a non-null value
    pub non_null_count: u64,
    /// Records where the field is an empty or whitespace-only string
    pub empty_count: u64,
    pub non_null_ratio: f64,
    pub non_empty_ratio: f64,
    /// Share of records with a non-null value
    pub fill_rate: f64,
    /// Distinct non-null values
    pub unique_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStats>,
    /// Up to three most frequent non-null values
    pub most_common_values: Vec<ValueCount>,
}

/// Completeness grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CompletenessGrade {
    Excellent,
    Good,
    Fair,
    #[default]
    Poor,
}

impl fmt::Display for CompletenessGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompletenessGrade::Excellent => "Excellent",
            CompletenessGrade::Good => "Good",
            CompletenessGrade::Fair => "Fair",
            CompletenessGrade::Poor => "Poor",
        };
        f.write_str(name)
    }
}

/// Completeness of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldCompleteness {
    pub non_null_ratio: f64,
    pub non_empty_ratio: f64,
    pub missing_count: u64,
    /// Records without a usable value (missing, null, empty or whitespace)
    pub empty_count: u64,
}

/// Completeness dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessResult {
    pub overall_completeness: f64,
    /// Missing or null cells
    pub missing_cells: u64,
    /// Cells holding an empty string
    pub empty_cells: u64,
    /// Cells holding a non-empty whitespace-only string
    pub whitespace_cells: u64,
    pub field_completeness: BTreeMap<String, FieldCompleteness>,
    pub completeness_grade: CompletenessGrade,
}

impl CompletenessResult {
    /// All cells that carry no usable value.
    pub fn total_missing(&self) -> u64 {
        self.missing_cells
            .saturating_add(self.empty_cells)
            .saturating_add(self.whitespace_cells)
    }
}

/// Kind of consistency problem found in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyIssueKind {
    /// Numeric and non-numeric representations in the same field
    MixedDataTypes,
    /// Values not matching the expected format for the field
    InvalidFormat,
}

/// A consistency problem in one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    pub field: String,
    pub issue: ConsistencyIssueKind,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_pattern: Option<String>,
}

/// Consistency dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    pub consistency_score: f64,
    pub consistency_issues: Vec<ConsistencyIssue>,
    pub issues_count: usize,
}

/// Kind of validity problem found in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityIssueKind {
    InvalidEmailFormat,
    InvalidUrlFormat,
    InvalidDateFormat,
    InvalidYearRange,
}

/// A validity problem in one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityIssue {
    pub field: String,
    pub issue: ValidityIssueKind,
    pub count: u64,
}

/// Validity dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidityResult {
    pub validity_score: f64,
    pub validity_issues: Vec<ValidityIssue>,
    pub issues_count: usize,
}

/// Uniqueness dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniquenessResult {
    pub uniqueness_score: f64,
    pub duplicate_rows: u64,
    /// Duplicate non-null values per key-like field
    pub duplicate_fields: BTreeMap<String, u64>,
    pub total_duplicates: u64,
}

/// Timeliness dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelinessResult {
    pub timeliness_score: f64,
    /// Whole days since the dataset was scraped, when known
    pub age_days: Option<i64>,
    pub is_recent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
}

/// Dataset metadata quality dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataQualityResult {
    /// Share of `source`, `scraped_at`, `total_records` that are present
    pub metadata_completeness: f64,
    /// 1.0 when the stated record count matches, 0.5 otherwise
    pub count_accuracy: f64,
    pub has_error_tracking: bool,
    pub metadata_score: f64,
}

/// Severity of a flagged quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Category of a flagged quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueKind {
    LowFillRate,
    LowDiversity,
    UnusuallyLongValues,
    MissingIdentifier,
}

/// An entry of the flat issue list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    #[serde(rename = "type")]
    pub kind: QualityIssueKind,
    pub field: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_value_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl QualityIssue {
    fn new(kind: QualityIssueKind, field: impl Into<String>, severity: Severity) -> Self {
        Self {
            kind,
            field: field.into(),
            severity,
            fill_rate: None,
            dominant_value_ratio: None,
            max_length: None,
            description: None,
        }
    }

    /// A sparsely filled field.
    pub fn low_fill_rate(field: impl Into<String>, fill_rate: f64, severity: Severity) -> Self {
        Self {
            fill_rate: Some(fill_rate),
            ..Self::new(QualityIssueKind::LowFillRate, field, severity)
        }
    }

    /// A field dominated by one value.
    pub fn low_diversity(field: impl Into<String>, ratio: f64) -> Self {
        Self {
            dominant_value_ratio: Some(ratio),
            ..Self::new(QualityIssueKind::LowDiversity, field, Severity::Medium)
        }
    }

    /// A field holding abnormally long text.
    pub fn unusually_long(field: impl Into<String>, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::new(QualityIssueKind::UnusuallyLongValues, field, Severity::Low)
        }
    }

    /// No field looks like an identifier.
    pub fn missing_identifier() -> Self {
        Self {
            description: Some("No clear identifier field found".to_string()),
            ..Self::new(QualityIssueKind::MissingIdentifier, "dataset", Severity::High)
        }
    }
}

/// Shape and sample of an audited dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataProfile {
    pub rows: usize,
    pub columns: usize,
    /// Number of fields per inferred type
    pub data_types: BTreeMap<String, usize>,
    pub column_names: Vec<String>,
    /// First three records
    pub sample_records: Vec<Record>,
}

/// The audited dimensions, in weighting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditDimension {
    Completeness,
    Consistency,
    Validity,
    Uniqueness,
    Timeliness,
    MetadataQuality,
}

impl AuditDimension {
    /// All dimensions in weighting order.
    pub const ALL: [AuditDimension; 6] = [
        AuditDimension::Completeness,
        AuditDimension::Consistency,
        AuditDimension::Validity,
        AuditDimension::Uniqueness,
        AuditDimension::Timeliness,
        AuditDimension::MetadataQuality,
    ];

    /// Returns the serialized name of this dimension.
    pub fn name(&self) -> &'static str {
        match self {
            AuditDimension::Completeness => "completeness",
            AuditDimension::Consistency => "consistency",
            AuditDimension::Validity => "validity",
            AuditDimension::Uniqueness => "uniqueness",
            AuditDimension::Timeliness => "timeliness",
            AuditDimension::MetadataQuality => "metadata_quality",
        }
    }
}

/// Multi-dimension data-quality assessment of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub source: String,
    pub audit_timestamp: DateTime<Utc>,
    pub total_records: usize,
    pub total_fields: usize,
    pub completeness: CompletenessResult,
    pub consistency: ConsistencyResult,
    pub validity: ValidityResult,
    pub uniqueness: UniquenessResult,
    pub timeliness: TimelinessResult,
    pub metadata_quality: MetadataQualityResult,
    pub field_analysis: Vec<FieldStat>,
    pub data_profile: DataProfile,
    pub quality_issues: Vec<QualityIssue>,
    pub overall_quality_score: f64,
    /// Set when the dataset could not be audited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditReport {
    /// A zero-score report for a dataset that could not be audited.
    pub fn degenerate(
        source: impl Into<String>,
        error: impl Into<String>,
        audit_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            audit_timestamp,
            total_records: 0,
            total_fields: 0,
            completeness: CompletenessResult::default(),
            consistency: ConsistencyResult::default(),
            validity: ValidityResult::default(),
            uniqueness: UniquenessResult::default(),
            timeliness: TimelinessResult::default(),
            metadata_quality: MetadataQualityResult::default(),
            field_analysis: Vec::new(),
            data_profile: DataProfile::default(),
            quality_issues: Vec::new(),
            overall_quality_score: 0.0,
            error: Some(error.into()),
        }
    }

    /// True when this report carries an `error` marker.
    pub fn is_degenerate(&self) -> bool {
        self.error.is_some()
    }

    /// Score of a single dimension.
    pub fn dimension_score(&self, dimension: AuditDimension) -> f64 {
        match dimension {
            AuditDimension::Completeness => self.completeness.overall_completeness,
            AuditDimension::Consistency => self.consistency.consistency_score,
            AuditDimension::Validity => self.validity.validity_score,
            AuditDimension::Uniqueness => self.uniqueness.uniqueness_score,
            AuditDimension::Timeliness => self.timeliness.timeliness_score,
            AuditDimension::MetadataQuality => self.metadata_quality.metadata_score,
        }
    }

    /// Number of high-severity entries in the issue list.
    pub fn major_issue_count(&self) -> usize {
        self.quality_issues
            .iter()
            .filter(|issue| issue.severity == Severity::High)
            .count()
    }
}

/// One source's line in an [`AuditSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAuditSummary {
    pub overall_score: f64,
    pub total_records: usize,
    /// Completeness grade, or `Unknown` for reports with an error marker
    pub completeness_grade: String,
    pub major_issues: usize,
    /// Scrape timestamp, or `Unknown`
    pub last_updated: String,
}

/// Cross-source overview of audit results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_sources_audited: usize,
    pub audit_timestamp: DateTime<Utc>,
    pub source_summaries: BTreeMap<String, SourceAuditSummary>,
    pub average_quality_score: f64,
}

/// Side-by-side comparison of audited sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityComparison {
    pub comparison_timestamp: DateTime<Utc>,
    pub sources_compared: Vec<String>,
    /// Dimension name to per-source score
    pub quality_comparison: BTreeMap<String, BTreeMap<String, f64>>,
    pub best_source: String,
    pub worst_source: String,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_degenerate_report() {
        let report = AuditReport::degenerate("seedrs", "Unable to load or process dataset", Utc::now());
        assert!(report.is_degenerate());
        assert_eq!(report.overall_quality_score, 0.0);
        for dimension in AuditDimension::ALL {
            assert_eq!(report.dimension_score(dimension), 0.0);
        }

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["error"], json!("Unable to load or process dataset"));
        assert_eq!(value["completeness"]["completeness_grade"], json!("Poor"));
    }

    #[test]
    fn test_issue_serialization() {
        let issue = QualityIssue::low_fill_rate("phone", 0.1, Severity::High);
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["type"], json!("low_fill_rate"));
        assert_eq!(value["severity"], json!("high"));
        assert!(value.get("max_length").is_none());

        let missing = serde_json::to_value(QualityIssue::missing_identifier()).unwrap();
        assert_eq!(missing["field"], json!("dataset"));
        assert_eq!(missing["description"], json!("No clear identifier field found"));
    }

    #[test]
    fn test_consistency_issue_kind_names() {
        assert_eq!(
            serde_json::to_value(ConsistencyIssueKind::MixedDataTypes).unwrap(),
            json!("mixed_data_types")
        );
        assert_eq!(
            serde_json::to_value(ValidityIssueKind::InvalidYearRange).unwrap(),
            json!("invalid_year_range")
        );
    }

    #[test]
    fn test_total_missing() {
        let result = CompletenessResult {
            missing_cells: 3,
            empty_cells: 2,
            whitespace_cells: 1,
            ..Default::default()
        };
        assert_eq!(result.total_missing(), 6);
    }
}
