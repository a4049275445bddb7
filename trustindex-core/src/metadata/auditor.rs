//! Metadata auditor.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

use crate::config::{MetadataWeights, ScoringConfig};
use crate::models::Aggregate;
use crate::values::{is_truthy, round3};

use super::models::{
    CategoryScores, MetadataCategory, MetadataDetails, MetadataGrade, MetadataReport,
    MetadataSummary, QualityIndicators, SourceDescription,
};

/// Fields every source description should carry.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "source_name",
    "url",
    "data_type",
    "last_updated",
    "description",
    "provider",
    "data_format",
];

/// Fields that improve completeness when present.
pub const OPTIONAL_FIELDS: [&str; 6] = [
    "contact_info",
    "license",
    "update_frequency",
    "data_size",
    "api_version",
    "rate_limits",
];

const LAST_UPDATED_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"];

/// Freshness score steps: (maximum age in days, score).
const FRESHNESS_STEPS: [(i64, f64); 5] = [(1, 100.0), (7, 90.0), (30, 75.0), (90, 50.0), (365, 25.0)];
const FRESHNESS_FLOOR: f64 = 10.0;

/// Auditor scoring the quality of source descriptions.
#[derive(Debug, Clone, Default)]
pub struct MetadataAuditor {
    config: ScoringConfig,
}

impl MetadataAuditor {
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

    /// Audits one description against the current time.
    pub fn audit(&self, description: &SourceDescription) -> MetadataReport {
        self.audit_at(description, Utc::now())
    }

    /// Audits one description as of `now`.
    pub fn audit_at(&self, description: &SourceDescription, now: DateTime<Utc>) -> MetadataReport {
        let scores = CategoryScores {
            completeness: completeness_score(description),
            freshness: freshness_score(description, now),
            structure: self.structure_score(description),
            accessibility: accessibility_score(description),
            documentation: documentation_score(description),
        };
        let overall_score = round3(weighted_score(&scores, &self.config.metadata));

        MetadataReport {
            source_name: description.source_name().unwrap_or("Unknown").to_string(),
            audit_timestamp: now,
            scores,
            details: details(description, &scores),
            overall_score,
            grade: MetadataGrade::from_score(overall_score),
        }
    }

    /// Audits many descriptions, keyed by source name.
    ///
    /// Descriptions without a name are keyed `source_{n}`, where `n` is the
    /// number of reports collected so far.
    pub fn batch_audit(&self, descriptions: &[SourceDescription]) -> BTreeMap<String, MetadataReport> {
        self.batch_audit_at(descriptions, Utc::now())
    }

    /// Audits many descriptions as of `now`.
    pub fn batch_audit_at(
        &self,
        descriptions: &[SourceDescription],
        now: DateTime<Utc>,
    ) -> BTreeMap<String, MetadataReport> {
        let mut results = BTreeMap::new();

        for description in descriptions {
            let key = match description.source_name() {
                Some(name) => name.to_string(),
                None => format!("source_{}", results.len()),
            };
            tracing::debug!("Auditing metadata for {}", key);
            results.insert(key, self.audit_at(description, now));
        }

        tracing::info!("Audited metadata for {} sources", results.len());
        results
    }

    /// Summarizes a batch of metadata reports.
    pub fn summarize(&self, results: &BTreeMap<String, MetadataReport>) -> Aggregate<MetadataSummary> {
        if results.is_empty() {
            return Aggregate::unavailable("No audit results provided");
        }

        let mut scores: Vec<f64> = results.values().map(|r| r.overall_score).collect();
        scores.sort_by(f64::total_cmp);

        let mut grade_distribution = BTreeMap::new();
        for report in results.values() {
            *grade_distribution.entry(report.grade.to_string()).or_insert(0) += 1;
        }

        let names_where = |predicate: fn(f64) -> bool| -> Vec<String> {
            results
                .iter()
                .filter(|(_, report)| predicate(report.overall_score))
                .map(|(name, _)| name.clone())
                .collect()
        };

        Aggregate::Available(MetadataSummary {
            total_sources: results.len(),
            average_score: round3(scores.iter().sum::<f64>() / scores.len() as f64),
            median_score: round3(median(&scores)),
            min_score: scores.first().copied().unwrap_or_default(),
            max_score: scores.last().copied().unwrap_or_default(),
            grade_distribution,
            sources_above_threshold: scores.iter().filter(|s| **s >= 70.0).count(),
            improvement_needed: scores.iter().filter(|s| **s < 60.0).count(),
            top_performers: names_where(|score| score >= 85.0),
            needs_attention: names_where(|score| score < 60.0),
        })
    }

    fn structure_score(&self, description: &SourceDescription) -> f64 {
        let mut score = 0.0;

        if description.text("url").is_some_and(is_valid_url) {
            score += 20.0;
        }

        if let Some(format) = description.text("data_format") {
            let format = format.to_lowercase();
            if self
                .config
                .text_mining
                .recognized_formats
                .iter()
                .any(|f| *f == format)
            {
                score += 20.0;
            }
        }

        if let Some(name) = description.text("source_name")
            && name.chars().count() > 3
            && !name.chars().all(|c| c.is_ascii_digit())
        {
            score += 15.0;
        }

        if description
            .text("description")
            .is_some_and(|d| d.split_whitespace().count() >= 5)
        {
            score += 15.0;
        }

        if description
            .text("provider")
            .is_some_and(|p| p.chars().count() > 2)
        {
            score += 15.0;
        }

        if description.get("metadata").is_some_and(|m| m.is_object()) {
            score += 15.0;
        }

        f64::min(100.0, score)
    }
}

/// Valid when the URL parses and has a host.
fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

fn completeness_score(description: &SourceDescription) -> f64 {
    let required = REQUIRED_FIELDS.iter().filter(|f| description.has(f)).count();
    let optional = OPTIONAL_FIELDS.iter().filter(|f| description.has(f)).count();

    let score = required as f64 / REQUIRED_FIELDS.len() as f64 * 70.0
        + optional as f64 / OPTIONAL_FIELDS.len() as f64 * 30.0;
    f64::min(100.0, score)
}

/// Parses `last_updated`; values without an offset are read as UTC.
fn parse_last_updated(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in LAST_UPDATED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, format)
            && let Some(dt) = date.and_hms_opt(0, 0, 0)
        {
            return Some(dt.and_utc());
        }
    }
    None
}

fn freshness_score(description: &SourceDescription, now: DateTime<Utc>) -> f64 {
    let Some(raw) = description.text("last_updated").filter(|s| !s.is_empty()) else {
        return 0.0;
    };
    let Some(updated) = parse_last_updated(raw) else {
        tracing::debug!("Unrecognized last_updated value: {}", raw);
        return 0.0;
    };

    let days_old = now.signed_duration_since(updated).num_days();
    FRESHNESS_STEPS
        .iter()
        .find(|(max_days, _)| days_old <= *max_days)
        .map_or(FRESHNESS_FLOOR, |(_, score)| *score)
}

fn accessibility_score(description: &SourceDescription) -> f64 {
    let mut score = 0.0;

    if description.text("url").is_some_and(is_valid_url) {
        score += 40.0;
    }
    if description.has("api_documentation") || description.text("data_format") == Some("api") {
        score += 30.0;
    }
    if description.has_any(&["rate_limits", "rate_limit_info"]) {
        score += 20.0;
    }
    // Authentication is assumed unless explicitly disabled
    if description
        .get("authentication_required")
        .is_some_and(|v| !is_truthy(v))
    {
        score += 10.0;
    }

    f64::min(100.0, score)
}

fn documentation_score(description: &SourceDescription) -> f64 {
    let mut score = 0.0;

    if description.has_any(&["contact_info", "support_email"]) {
        score += 25.0;
    }
    if description.has_any(&["license", "terms_of_use"]) {
        score += 25.0;
    }
    if description.has("update_frequency") {
        score += 20.0;
    }
    if description.has_any(&["examples", "documentation_url"]) {
        score += 20.0;
    }
    if description.has_any(&["schema", "field_descriptions"]) {
        score += 10.0;
    }

    f64::min(100.0, score)
}

fn weighted_score(scores: &CategoryScores, weights: &MetadataWeights) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (category, (_, weight)) in MetadataCategory::ALL.iter().zip(weights.entries()) {
        weighted_sum += scores.get(*category) * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

fn details(description: &SourceDescription, scores: &CategoryScores) -> MetadataDetails {
    let mut details = MetadataDetails::default();

    for category in MetadataCategory::ALL {
        let score = scores.get(category);
        if score >= 80.0 {
            details
                .strengths
                .push(format!("Strong {} (Score: {:.1})", category.name(), score));
        }
    }

    if scores.completeness < 70.0 {
        details.weaknesses.push("Incomplete metadata".to_string());
        details
            .recommendations
            .push("Add missing required fields".to_string());
    }
    if scores.freshness < 60.0 {
        details.weaknesses.push("Outdated information".to_string());
        details
            .recommendations
            .push("Update data more frequently".to_string());
    }
    if scores.documentation < 50.0 {
        details.weaknesses.push("Poor documentation".to_string());
        details
            .recommendations
            .push("Improve documentation and contact information".to_string());
    }

    details.missing_fields = REQUIRED_FIELDS
        .iter()
        .filter(|field| !description.has(field))
        .map(|field| (*field).to_string())
        .collect();

    details.quality_indicators = QualityIndicators {
        has_contact_info: description.has("contact_info"),
        has_license: description.has("license"),
        has_api_docs: description.has("api_documentation"),
        recently_updated: scores.freshness > 70.0,
    };

    details
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn description(value: serde_json::Value) -> SourceDescription {
        SourceDescription::from_value(value).unwrap()
    }

    fn full_description() -> SourceDescription {
        description(json!({
            "source_name": "FCA Register",
            "url": "https://register.fca.org.uk",
            "data_type": "regulatory",
            "last_updated": "2024-06-30",
            "description": "Register of firms authorised by the Financial Conduct Authority",
            "provider": "Financial Conduct Authority",
            "data_format": "API",
            "contact_info": "firm.queries@fca.org.uk",
            "license": "Open Government Licence",
            "update_frequency": "daily",
            "data_size": "60000 firms",
            "api_version": "v1",
            "rate_limits": "10 requests per second",
            "api_documentation": "https://register.fca.org.uk/Developer",
            "documentation_url": "https://register.fca.org.uk/Developer/docs",
            "schema": {"firm": "object"},
            "authentication_required": false,
            "metadata": {"jurisdiction": "UK"}
        }))
    }

    #[test]
    fn test_full_description_scores_top_marks() {
        let auditor = MetadataAuditor::with_defaults();
        let report = auditor.audit_at(&full_description(), now());

        assert_eq!(report.scores.completeness, 100.0);
        assert_eq!(report.scores.freshness, 100.0);
        assert_eq!(report.scores.structure, 100.0);
        assert_eq!(report.scores.accessibility, 100.0);
        assert_eq!(report.scores.documentation, 100.0);
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.grade, MetadataGrade::A);
        assert!(report.details.missing_fields.is_empty());
        assert_eq!(report.details.strengths.len(), 5);
        assert!(report.details.strengths.contains(&"Strong structure (Score: 100.0)".to_string()));
        assert!(report.details.quality_indicators.recently_updated);
    }

    #[test]
    fn test_empty_description() {
        let auditor = MetadataAuditor::with_defaults();
        let report = auditor.audit_at(&SourceDescription::default(), now());

        assert_eq!(report.source_name, "Unknown");
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.grade, MetadataGrade::F);
        assert_eq!(report.details.missing_fields.len(), REQUIRED_FIELDS.len());
        assert_eq!(
            report.details.recommendations,
            vec![
                "Add missing required fields",
                "Update data more frequently",
                "Improve documentation and contact information",
            ]
        );
    }

    #[test]
    fn test_freshness_steps() {
        let score_for = |last_updated: &str| {
            freshness_score(&description(json!({"last_updated": last_updated})), now())
        };

        assert_eq!(score_for("2024-06-29T12:00:00"), 100.0);
        assert_eq!(score_for("2024-06-25"), 90.0);
        assert_eq!(score_for("2024-06-10 08:00:00"), 75.0);
        assert_eq!(score_for("2024-05-01"), 50.0);
        assert_eq!(score_for("2023-12-01T00:00:00Z"), 25.0);
        assert_eq!(score_for("2020-01-01"), 10.0);
        assert_eq!(score_for("last tuesday"), 0.0);
        assert_eq!(freshness_score(&description(json!({"last_updated": 20240101})), now()), 0.0);
    }

    #[test]
    fn test_aliases_count_for_documentation_and_access() {
        let desc = description(json!({
            "support_email": "help@example.com",
            "terms_of_use": "https://example.com/terms",
            "rate_limit_info": "100/min",
            "data_format": "api",
        }));

        assert_eq!(documentation_score(&desc), 50.0);
        assert_eq!(accessibility_score(&desc), 50.0);
        // Aliases do not count as the indicator fields themselves
        let auditor = MetadataAuditor::with_defaults();
        let report = auditor.audit_at(&desc, now());
        assert!(!report.details.quality_indicators.has_contact_info);
        assert!(!report.details.quality_indicators.has_license);
    }

    #[test]
    fn test_structure_checks() {
        let auditor = MetadataAuditor::with_defaults();
        let desc = description(json!({
            "source_name": "1234",
            "url": "not a url",
            "data_format": "Parquet",
            "description": "too short",
            "provider": "ab",
            "metadata": "flat",
        }));
        assert_eq!(auditor.structure_score(&desc), 0.0);

        let desc = description(json!({"source_name": "Seedrs", "url": "https://www.seedrs.com"}));
        assert_eq!(auditor.structure_score(&desc), 35.0);
    }

    #[test]
    fn test_batch_audit_keys_unnamed_sources() {
        let auditor = MetadataAuditor::with_defaults();
        let results = auditor.batch_audit(&[
            full_description(),
            description(json!({"url": "https://www.crowdcube.com"})),
            description(json!({"provider": "Unknown"})),
        ]);

        assert_eq!(results.len(), 3);
        assert!(results.contains_key("FCA Register"));
        assert!(results.contains_key("source_1"));
        assert!(results.contains_key("source_2"));
    }

    #[test]
    fn test_summarize() {
        let auditor = MetadataAuditor::with_defaults();
        assert_eq!(
            auditor.summarize(&BTreeMap::new()).error(),
            Some("No audit results provided")
        );

        let results = auditor.batch_audit_at(
            &[
                full_description(),
                description(json!({"source_name": "Empty Source"})),
            ],
            now(),
        );
        let summary = auditor.summarize(&results);
        let summary = summary.value().unwrap();

        assert_eq!(summary.total_sources, 2);
        assert_eq!(summary.max_score, 100.0);
        assert_eq!(summary.top_performers, vec!["FCA Register".to_string()]);
        assert_eq!(summary.needs_attention, vec!["Empty Source".to_string()]);
        assert_eq!(summary.sources_above_threshold, 1);
        assert_eq!(summary.improvement_needed, 1);
        assert_eq!(summary.grade_distribution.get("A"), Some(&1));
        assert_eq!(summary.grade_distribution.get("F"), Some(&1));
        assert_eq!(summary.median_score, summary.average_score);
    }
}
