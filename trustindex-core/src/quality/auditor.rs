//! Data quality auditor facade.
//!
//! This module provides the `DataQualityAuditor` that runs every dimension
//! analysis over a dataset and aggregates the results across sources.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::models::{Aggregate, Dataset};
use crate::values::{field_names, round3};

use super::completeness::analyze_completeness;
use super::consistency::analyze_consistency;
use super::field_analysis::analyze_fields;
use super::issues::identify_issues;
use super::metadata_quality::analyze_metadata_quality;
use super::models::{
    AuditDimension, AuditReport, AuditSummary, DataProfile, FieldStat, QualityComparison,
    SourceAuditSummary,
};
use super::timeliness::analyze_timeliness;
use super::uniqueness::analyze_uniqueness;
use super::validity::analyze_validity;

/// Error marker for datasets that are empty or cannot be parsed.
pub const UNREADABLE_DATASET: &str = "Unable to load or process dataset";

/// Records copied into the data profile as a sample.
const SAMPLE_RECORDS: usize = 3;

/// Dimensions listed in the cross-source comparison table.
const COMPARED_DIMENSIONS: [AuditDimension; 5] = [
    AuditDimension::Completeness,
    AuditDimension::Consistency,
    AuditDimension::Validity,
    AuditDimension::Uniqueness,
    AuditDimension::Timeliness,
];

/// Auditor producing multi-dimension data-quality reports.
///
/// The auditor holds no per-source state: every call returns a new report
/// and the same inputs always produce the same report.
///
/// # Example
///
/// ```rust,ignore
/// use trustindex_core::quality::DataQualityAuditor;
///
/// let auditor = DataQualityAuditor::with_defaults();
/// let report = auditor.audit("fca", &dataset);
/// println!("{}", report.completeness.completeness_grade);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataQualityAuditor {
    config: ScoringConfig,
}

impl DataQualityAuditor {
    /// Creates a new auditor with the given configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Creates a new auditor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ScoringConfig::default())
    }

    /// Returns a reference to the auditor configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Audits a dataset against the current time.
    pub fn audit(&self, source: &str, dataset: &Dataset) -> AuditReport {
        self.audit_at(source, dataset, Utc::now())
    }

    /// Audits a dataset as of `now`.
    ///
    /// An empty dataset yields a zero-score report carrying an `error`
    /// marker instead of failing.
    pub fn audit_at(&self, source: &str, dataset: &Dataset, now: DateTime<Utc>) -> AuditReport {
        tracing::info!("Starting quality audit for {}", source);

        if dataset.is_empty() {
            tracing::warn!("No data found for {}", source);
            return AuditReport::degenerate(source, UNREADABLE_DATASET, now);
        }

        let audit = &self.config.audit;
        let records = &dataset.data;
        let fields = field_names(records);

        let completeness = analyze_completeness(records, &fields, &audit.completeness_grades);
        let consistency = analyze_consistency(records, &fields, audit.issue_penalty);
        let validity = analyze_validity(
            records,
            &fields,
            audit.issue_penalty,
            audit.min_plausible_year,
            now,
        );
        let uniqueness = analyze_uniqueness(records, &fields);
        let timeliness = analyze_timeliness(
            dataset.metadata.scraped_at.as_deref(),
            now,
            audit.stale_after_days,
            audit.recent_within_days,
            audit.unparsable_timeliness,
        );
        let metadata_quality = analyze_metadata_quality(&dataset.metadata, records.len());

        let field_analysis = analyze_fields(records);
        let quality_issues = identify_issues(&field_analysis, &audit.issues);
        let data_profile = build_profile(dataset, &fields, &field_analysis);

        let mut report = AuditReport {
            source: source.to_string(),
            audit_timestamp: now,
            total_records: records.len(),
            total_fields: fields.len(),
            completeness,
            consistency,
            validity,
            uniqueness,
            timeliness,
            metadata_quality,
            field_analysis,
            data_profile,
            quality_issues,
            overall_quality_score: 0.0,
            error: None,
        };
        report.overall_quality_score = self.overall_score(&report);

        tracing::info!(
            "Quality audit completed for {}. Overall score: {:.3}",
            source,
            report.overall_quality_score
        );
        tracing::debug!(
            "{}: {} records, {} fields, {} flagged issues",
            source,
            report.total_records,
            report.total_fields,
            report.quality_issues.len()
        );

        report
    }

    /// Parses a persisted dataset document and audits it.
    ///
    /// A document that does not parse yields a degenerate report.
    pub fn audit_document(&self, source: &str, json: &str) -> AuditReport {
        match Dataset::from_json_str(json) {
            Ok(dataset) => self.audit(source, &dataset),
            Err(e) => {
                tracing::warn!("Error loading dataset for {}: {}", source, e);
                AuditReport::degenerate(source, UNREADABLE_DATASET, Utc::now())
            }
        }
    }

    /// Weighted sum of the dimension scores, rounded to 3 places.
    fn overall_score(&self, report: &AuditReport) -> f64 {
        let weights = &self.config.audit.weights;
        let score: f64 = AuditDimension::ALL
            .iter()
            .zip(weights.entries())
            .map(|(dimension, (_, weight))| report.dimension_score(*dimension) * weight)
            .sum();
        round3(score)
    }

    /// Summarizes a set of reports, one line per source.
    pub fn summarize(&self, reports: &[AuditReport]) -> AuditSummary {
        let mut source_summaries = BTreeMap::new();

        for report in reports {
            let summary = if report.is_degenerate() {
                SourceAuditSummary {
                    overall_score: report.overall_quality_score,
                    total_records: report.total_records,
                    completeness_grade: "Unknown".to_string(),
                    major_issues: report.major_issue_count(),
                    last_updated: "Unknown".to_string(),
                }
            } else {
                SourceAuditSummary {
                    overall_score: report.overall_quality_score,
                    total_records: report.total_records,
                    completeness_grade: report.completeness.completeness_grade.to_string(),
                    major_issues: report.major_issue_count(),
                    last_updated: report
                        .timeliness
                        .scraped_at
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                }
            };
            source_summaries.insert(report.source.clone(), summary);
        }

        let average_quality_score = if reports.is_empty() {
            0.0
        } else {
            round3(
                reports
                    .iter()
                    .map(|r| r.overall_quality_score)
                    .sum::<f64>()
                    / reports.len() as f64,
            )
        };

        AuditSummary {
            total_sources_audited: reports.len(),
            audit_timestamp: Utc::now(),
            source_summaries,
            average_quality_score,
        }
    }

    /// Compares quality across sources.
    ///
    /// Needs at least two reports. Reports carrying an `error` marker are
    /// left out of the dimension table but still rank by overall score.
    pub fn compare_sources(&self, reports: &[AuditReport]) -> Aggregate<QualityComparison> {
        if reports.len() < 2 {
            return Aggregate::unavailable("Need at least 2 sources to compare");
        }

        let mut quality_comparison = BTreeMap::new();
        for dimension in COMPARED_DIMENSIONS {
            let scores: BTreeMap<String, f64> = reports
                .iter()
                .filter(|r| !r.is_degenerate())
                .map(|r| (r.source.clone(), r.dimension_score(dimension)))
                .collect();
            quality_comparison.insert(dimension.name().to_string(), scores);
        }

        // First report wins ties
        let mut best = &reports[0];
        let mut worst = &reports[0];
        for report in &reports[1..] {
            if report.overall_quality_score > best.overall_quality_score {
                best = report;
            }
            if report.overall_quality_score < worst.overall_quality_score {
                worst = report;
            }
        }

        Aggregate::Available(QualityComparison {
            comparison_timestamp: Utc::now(),
            sources_compared: reports.iter().map(|r| r.source.clone()).collect(),
            quality_comparison,
            best_source: best.source.clone(),
            worst_source: worst.source.clone(),
            recommendations: recommendations(reports),
        })
    }
}

fn build_profile(dataset: &Dataset, fields: &[String], stats: &[FieldStat]) -> DataProfile {
    let mut data_types = BTreeMap::new();
    for stat in stats {
        *data_types
            .entry(stat.data_type.name().to_string())
            .or_insert(0) += 1;
    }

    DataProfile {
        rows: dataset.len(),
        columns: fields.len(),
        data_types,
        column_names: fields.to_vec(),
        sample_records: dataset.data.iter().take(SAMPLE_RECORDS).cloned().collect(),
    }
}

fn recommendations(reports: &[AuditReport]) -> Vec<String> {
    let mut recommendations = Vec::new();

    for report in reports {
        let source = &report.source;

        if report.overall_quality_score < 0.6 {
            recommendations.push(format!(
                "Source '{}' needs significant quality improvements",
                source
            ));
        }

        let completeness = report.completeness.overall_completeness;
        if completeness < 0.7 {
            recommendations.push(format!(
                "Improve data completeness for '{}' (currently {:.1}%)",
                source,
                completeness * 100.0
            ));
        }

        let validity_issues = report.validity.validity_issues.len();
        if validity_issues > 0 {
            recommendations.push(format!(
                "Address {} validity issues in '{}'",
                validity_issues, source
            ));
        }

        let consistency_issues = report.consistency.consistency_issues.len();
        if consistency_issues > 0 {
            recommendations.push(format!(
                "Fix {} consistency issues in '{}'",
                consistency_issues, source
            ));
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::quality::CompletenessGrade;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| row.as_object().cloned().unwrap())
            .collect()
    }

    fn clean_dataset(source: &str) -> Dataset {
        let rows = (0..10)
            .map(|i| {
                json!({
                    "frn": format!("{}", 100000 + i),
                    "name": format!("Firm {}", i),
                    "email": format!("contact{}@firm.co.uk", i),
                    "status": if i % 2 == 0 { "Authorised" } else { "Registered" },
                    "sector": format!("sector-{}", i % 4),
                })
            })
            .collect();
        Dataset::new(source, records(rows)).with_scraped_at("2024-01-15T10:30:00")
    }

    #[test]
    fn test_empty_dataset_is_degenerate() {
        let auditor = DataQualityAuditor::with_defaults();
        let report = auditor.audit_at("empty", &Dataset::new("empty", Vec::new()), now());

        assert!(report.is_degenerate());
        assert_eq!(report.error.as_deref(), Some(UNREADABLE_DATASET));
        assert_eq!(report.overall_quality_score, 0.0);
    }

    #[test]
    fn test_unparsable_document_is_degenerate() {
        let auditor = DataQualityAuditor::with_defaults();
        let report = auditor.audit_document("broken", "{not json");
        assert!(report.is_degenerate());
        assert_eq!(report.source, "broken");
    }

    #[test]
    fn test_clean_dataset_scores_high() {
        let auditor = DataQualityAuditor::with_defaults();
        let report = auditor.audit_at("fca", &clean_dataset("fca"), now());

        assert!(!report.is_degenerate());
        assert_eq!(report.total_records, 10);
        assert_eq!(report.total_fields, 5);
        assert_eq!(report.completeness.overall_completeness, 1.0);
        assert_eq!(report.completeness.completeness_grade, CompletenessGrade::Excellent);
        assert_eq!(report.consistency.consistency_score, 1.0);
        assert_eq!(report.validity.validity_score, 1.0);
        assert_eq!(report.uniqueness.uniqueness_score, 1.0);
        assert!(report.timeliness.is_recent);
        assert_eq!(report.overall_quality_score, 1.0);
        assert_eq!(report.data_profile.sample_records.len(), 3);
        assert_eq!(report.data_profile.data_types.get("text"), Some(&5));
    }

    #[test]
    fn test_overall_score_weights_dimensions() {
        // 2 of 50 cells missing: completeness 0.96, everything else perfect
        let mut dataset = clean_dataset("fca");
        dataset.data[0].remove("sector");
        dataset.data[1].insert("sector".to_string(), Value::Null);

        let auditor = DataQualityAuditor::with_defaults();
        let report = auditor.audit_at("fca", &dataset, now());

        assert!((report.completeness.overall_completeness - 0.96).abs() < 1e-9);
        assert_eq!(report.overall_quality_score, 0.99);
    }

    #[test]
    fn test_audit_is_idempotent() {
        let auditor = DataQualityAuditor::with_defaults();
        let dataset = clean_dataset("fca");
        let first = auditor.audit_at("fca", &dataset, now());
        let second = auditor.audit_at("fca", &dataset, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_requires_two_sources() {
        let auditor = DataQualityAuditor::with_defaults();
        let report = auditor.audit_at("fca", &clean_dataset("fca"), now());

        let comparison = auditor.compare_sources(&[report]);
        assert_eq!(comparison.error(), Some("Need at least 2 sources to compare"));
        assert_eq!(
            serde_json::to_value(&comparison).unwrap(),
            json!({"error": "Need at least 2 sources to compare"})
        );
    }

    #[test]
    fn test_compare_sources() {
        let auditor = DataQualityAuditor::with_defaults();
        let good = auditor.audit_at("fca", &clean_dataset("fca"), now());

        let sparse = Dataset::new(
            "seedrs",
            records(vec![
                json!({"name": "A", "email": "bad-email", "website": null}),
                json!({"name": "B", "email": null, "website": null}),
                json!({"name": "C", "email": null, "website": null}),
            ]),
        )
        .with_scraped_at("2023-01-01T00:00:00");
        let poor = auditor.audit_at("seedrs", &sparse, now());
        let broken = AuditReport::degenerate("crowdcube", UNREADABLE_DATASET, now());

        let comparison = auditor.compare_sources(&[good, poor, broken]);
        let comparison = comparison.value().unwrap();

        assert_eq!(comparison.best_source, "fca");
        assert_eq!(comparison.worst_source, "crowdcube");
        assert_eq!(comparison.sources_compared.len(), 3);
        assert_eq!(comparison.quality_comparison.len(), 5);
        assert!(!comparison.quality_comparison["completeness"].contains_key("crowdcube"));
        assert!(
            comparison
                .recommendations
                .iter()
                .any(|r| r == "Source 'crowdcube' needs significant quality improvements")
        );
        assert!(
            comparison
                .recommendations
                .iter()
                .any(|r| r.starts_with("Improve data completeness for 'seedrs' (currently"))
        );
    }

    #[test]
    fn test_summarize() {
        let auditor = DataQualityAuditor::with_defaults();
        let good = auditor.audit_at("fca", &clean_dataset("fca"), now());
        let broken = AuditReport::degenerate("crowdcube", UNREADABLE_DATASET, now());

        let summary = auditor.summarize(&[good, broken]);
        assert_eq!(summary.total_sources_audited, 2);
        assert_eq!(summary.average_quality_score, 0.5);
        assert_eq!(summary.source_summaries["fca"].completeness_grade, "Excellent");
        assert_eq!(summary.source_summaries["fca"].last_updated, "2024-01-15T10:30:00");
        assert_eq!(summary.source_summaries["crowdcube"].completeness_grade, "Unknown");
        assert_eq!(summary.source_summaries["crowdcube"].last_updated, "Unknown");
    }
}
