//! Inputs to the trust dimensions.
//!
//! Most inputs are read straight off the audit report. The rest are mined
//! from the raw records using the keyword lists in [`TextMiningConfig`].

use serde_json::Value;

use crate::config::TextMiningConfig;
use crate::models::{Dataset, Record};
use crate::quality::AuditReport;
use crate::values::{field_truthy, is_blank, is_truthy, mean_and_std, record_text, round3, value_to_string};

/// Age assumed when the audit could not determine one.
pub const UNKNOWN_AGE_DAYS: i64 = 999;

/// Everything the trust dimensions are computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringInputs {
    pub overall_completeness: f64,
    /// Non-empty ratio of every audited field
    pub field_non_empty_ratios: Vec<f64>,
    pub missing_cells: u64,
    pub validity_score: f64,
    pub consistency_score: f64,
    pub uniqueness_score: f64,
    pub metadata_completeness: f64,
    pub has_error_tracking: bool,
    pub count_accuracy: f64,
    pub timeliness_score: f64,
    pub age_days: i64,
    pub is_recent: bool,
    pub total_records: usize,
    pub scraping_errors: usize,
    /// Source identifier recorded in the dataset metadata
    pub source_type: String,
    pub regulatory_mentions: u64,
    pub privacy_indicators: u64,
    pub compliance_indicators: f64,
    pub update_frequency: f64,
    pub documentation_quality: f64,
    pub contact_availability: f64,
    pub api_quality: f64,
    pub format_quality: f64,
    pub ease_of_access: f64,
}

impl ScoringInputs {
    /// Extracts scoring inputs from an audit report and its raw dataset.
    pub fn extract(report: &AuditReport, dataset: &Dataset, mining: &TextMiningConfig) -> Self {
        let records = &dataset.data;
        let metadata = &dataset.metadata;

        Self {
            overall_completeness: report.completeness.overall_completeness,
            field_non_empty_ratios: report
                .completeness
                .field_completeness
                .values()
                .map(|field| field.non_empty_ratio)
                .collect(),
            missing_cells: report.completeness.missing_cells,
            validity_score: report.validity.validity_score,
            consistency_score: report.consistency.consistency_score,
            uniqueness_score: report.uniqueness.uniqueness_score,
            metadata_completeness: report.metadata_quality.metadata_completeness,
            has_error_tracking: report.metadata_quality.has_error_tracking,
            count_accuracy: report.metadata_quality.count_accuracy,
            timeliness_score: report.timeliness.timeliness_score,
            age_days: report.timeliness.age_days.unwrap_or(UNKNOWN_AGE_DAYS),
            is_recent: report.timeliness.is_recent,
            total_records: report.total_records,
            scraping_errors: metadata.errors.len(),
            source_type: metadata.source.clone().unwrap_or_default(),
            regulatory_mentions: count_regulatory_mentions(records, mining),
            privacy_indicators: count_privacy_indicators(records, mining),
            compliance_indicators: assess_compliance(records),
            update_frequency: assess_update_frequency(dataset, mining),
            documentation_quality: assess_documentation(records, mining),
            contact_availability: assess_contact_availability(records),
            api_quality: assess_api_quality(records, mining),
            format_quality: assess_format_quality(report),
            ease_of_access: assess_ease_of_access(dataset, mining),
        }
    }

    /// Population standard deviation of the per-field non-empty ratios.
    pub fn field_variation(&self) -> f64 {
        mean_and_std(&self.field_non_empty_ratios).1
    }
}

/// Number of configured regulatory terms found, summed over records.
pub fn count_regulatory_mentions(records: &[Record], mining: &TextMiningConfig) -> u64 {
    records
        .iter()
        .map(|record| count_terms(&record_text(record), &mining.regulatory_terms))
        .sum()
}

/// Privacy signals: page metadata flags plus configured privacy terms.
pub fn count_privacy_indicators(records: &[Record], mining: &TextMiningConfig) -> u64 {
    records
        .iter()
        .map(|record| {
            let mut count = 0;
            if let Some(page) = object_field(record, "page_metadata") {
                if field_truthy(page, "has_privacy_policy") {
                    count += 2;
                }
                if field_truthy(page, "has_terms_of_service") {
                    count += 1;
                }
            }
            count + count_terms(&record_text(record), &mining.privacy_terms)
        })
        .sum()
}

fn count_terms(text: &str, terms: &[String]) -> u64 {
    terms.iter().filter(|term| text.contains(term.as_str())).count() as u64
}

fn object_field<'a>(record: &'a Record, field: &str) -> Option<&'a Record> {
    record.get(field).and_then(Value::as_object)
}

fn average(scores: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = scores.fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean per-record compliance evidence, each record capped at 1.0.
pub fn assess_compliance(records: &[Record]) -> f64 {
    average(records.iter().map(|record| {
        let mut score: f64 = 0.0;

        if field_truthy(record, "frn") {
            score += 0.3;
        }

        let status = record
            .get("status")
            .map(|v| value_to_string(v).to_lowercase())
            .unwrap_or_default();
        if status.contains("authorised") || status.contains("licensed") {
            score += 0.2;
        }

        if let Some(mentions) = record.get("regulatory_mentions").and_then(Value::as_f64)
            && mentions > 0.0
        {
            score += f64::min(0.2, mentions * 0.05);
        }

        if field_truthy(record, "has_financial_statements") {
            score += 0.1;
        }
        if field_truthy(record, "has_business_plan") {
            score += 0.1;
        }

        if let Some(contact) = object_field(record, "contact_details")
            && (field_truthy(contact, "email") || field_truthy(contact, "phone"))
        {
            score += 0.1;
        }

        score.min(1.0)
    }))
    .unwrap_or(0.0)
}

/// Evidence that the source is kept up to date.
pub fn assess_update_frequency(dataset: &Dataset, mining: &TextMiningConfig) -> f64 {
    let mut score = 0.0;

    if dataset
        .metadata
        .scraped_at
        .as_deref()
        .is_some_and(|s| !s.is_empty())
    {
        score += 0.3;
    }

    let has_update_field = dataset.data.iter().any(|record| {
        record.keys().any(|key| {
            let key = key.to_lowercase();
            mining
                .update_fields
                .iter()
                .any(|field| key.contains(field.as_str()))
        })
    });
    if has_update_field {
        score += 0.4;
    }

    let has_version = dataset.data.iter().any(|record| {
        record
            .values()
            .any(|v| value_to_string(v).to_lowercase().contains("version"))
    });
    if has_version {
        score += 0.3;
    }

    score
}

/// Mean per-record documentation richness, each record capped at 1.0.
pub fn assess_documentation(records: &[Record], mining: &TextMiningConfig) -> f64 {
    average(records.iter().map(|record| {
        let mut score: f64 = 0.0;

        if mining
            .description_fields
            .iter()
            .any(|field| field_truthy(record, field))
        {
            score += 0.3;
        }

        if let Some(page) = object_field(record, "page_metadata") {
            if field_truthy(page, "title") {
                score += 0.2;
            }
            if field_truthy(page, "description") {
                score += 0.2;
            }
            if page
                .get("meta_tags_count")
                .and_then(Value::as_f64)
                .is_some_and(|n| n > 5.0)
            {
                score += 0.1;
            }
        }

        if !record.is_empty() {
            let filled = record
                .values()
                .filter(|v| is_truthy(v) && !is_blank(v))
                .count();
            score += filled as f64 / record.len() as f64 * 0.2;
        }

        score.min(1.0)
    }))
    .unwrap_or(0.0)
}

/// Mean per-record availability of contact channels.
pub fn assess_contact_availability(records: &[Record]) -> f64 {
    average(records.iter().map(|record| {
        let mut score: f64 = 0.0;

        if let Some(contact) = object_field(record, "contact_details") {
            if field_truthy(contact, "email") {
                score += 0.4;
            }
            if field_truthy(contact, "phone") {
                score += 0.3;
            }
            if field_truthy(contact, "website") {
                score += 0.2;
            }
        }
        if field_truthy(record, "url") {
            score += 0.1;
        }

        score.min(1.0)
    }))
    .unwrap_or(0.0)
}

/// Mean per-record API signal strength; 0.5 when there are no records.
pub fn assess_api_quality(records: &[Record], mining: &TextMiningConfig) -> f64 {
    average(records.iter().map(|record| {
        let text = record_text(record);
        let score: f64 = mining
            .api_signals
            .iter()
            .filter(|signal| signal.matches(&text))
            .map(|signal| signal.weight)
            .sum();
        score.min(1.0)
    }))
    .unwrap_or(0.5)
}

/// Validity and consistency, plus a bonus for well-typed or well-filled fields.
pub fn assess_format_quality(report: &AuditReport) -> f64 {
    let mut score = (report.validity.validity_score + report.consistency.consistency_score) / 2.0;

    let fields = &report.field_analysis;
    if !fields.is_empty() {
        let well_formed = fields
            .iter()
            .filter(|stat| stat.data_type.is_numeric() || stat.fill_rate > 0.8)
            .count();
        score += well_formed as f64 / fields.len() as f64 * 0.2;
    }

    round3(score.min(1.0))
}

/// Scrape success rate, with a bonus for publicly accessible sources.
pub fn assess_ease_of_access(dataset: &Dataset, mining: &TextMiningConfig) -> f64 {
    let metadata = &dataset.metadata;
    let stated = metadata.total_records.unwrap_or(0);

    let mut score = 0.5;
    if stated > 0 {
        score = f64::max(0.0, 1.0 - metadata.errors.len() as f64 / stated as f64);
    }
    if mining.is_public(dataset.source()) {
        score += 0.2;
    }

    round3(score.min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScrapeError;
    use serde_json::json;

    fn records(rows: Vec<Value>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| row.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_regulatory_and_privacy_terms() {
        let mining = TextMiningConfig::default();
        let rows = records(vec![
            json!({"name": "Acme", "status": "Authorised by the FCA under GDPR rules"}),
            json!({"name": "Beta", "note": "Privacy policy available",
                   "page_metadata": {"has_privacy_policy": true, "has_terms_of_service": true}}),
        ]);

        // fca, gdpr in the first record
        assert_eq!(count_regulatory_mentions(&rows, &mining), 2);
        // gdpr; then 2 + 1 + "privacy policy" + "privacy"
        assert_eq!(count_privacy_indicators(&rows, &mining), 6);
    }

    #[test]
    fn test_compliance_per_record_capped() {
        let rows = records(vec![
            json!({
                "frn": "123456",
                "status": "Authorised",
                "regulatory_mentions": 10,
                "has_financial_statements": true,
                "has_business_plan": true,
                "contact_details": {"email": "a@b.com"},
            }),
            json!({"name": "No evidence"}),
        ]);

        // First record: 0.3 + 0.2 + 0.2 + 0.1 + 0.1 + 0.1 = 1.0
        assert!((assess_compliance(&rows) - 0.5).abs() < 1e-9);
        assert_eq!(assess_compliance(&[]), 0.0);
    }

    #[test]
    fn test_update_frequency() {
        let mining = TextMiningConfig::default();
        let dataset = Dataset::new(
            "seedrs",
            records(vec![json!({"Last_Updated": "2024-01-01", "notes": "API Version 2"})]),
        );
        assert!((assess_update_frequency(&dataset, &mining) - 1.0).abs() < 1e-9);

        let mut bare = Dataset::new("seedrs", records(vec![json!({"name": "x"})]));
        bare.metadata.scraped_at = None;
        assert_eq!(assess_update_frequency(&bare, &mining), 0.0);
    }

    #[test]
    fn test_documentation_and_contact() {
        let mining = TextMiningConfig::default();
        let rows = records(vec![json!({
            "description": "Equity crowdfunding platform",
            "page_metadata": {"title": "Home", "description": "Invest", "meta_tags_count": 12},
            "url": "https://www.seedrs.com",
            "contact_details": {"email": "hello@seedrs.com", "phone": "020 7946 0958", "website": ""},
        })]);

        // 0.3 + 0.2 + 0.2 + 0.1 + all four fields filled * 0.2, capped
        assert!((assess_documentation(&rows, &mining) - 1.0).abs() < 1e-9);
        assert!((assess_contact_availability(&rows) - 0.8).abs() < 1e-9);
        assert_eq!(assess_documentation(&[], &mining), 0.0);
    }

    #[test]
    fn test_api_quality_defaults_without_records() {
        let mining = TextMiningConfig::default();
        assert_eq!(assess_api_quality(&[], &mining), 0.5);

        let rows = records(vec![
            json!({"docs": "See our OpenAPI docs for each endpoint"}),
            json!({"name": "plain"}),
        ]);
        // openapi contains "api": 0.3 + 0.2 + 0.2 + 0.3, capped at 1.0
        assert!((assess_api_quality(&rows, &mining) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ease_of_access() {
        let mining = TextMiningConfig::default();
        let rows = records((0..10).map(|i| json!({"id": i})).collect());

        let errors = vec![ScrapeError::new("https://example.com", "timeout"); 2];
        let dataset = Dataset::new("seedrs", rows.clone()).with_errors(errors);
        assert_eq!(assess_ease_of_access(&dataset, &mining), 0.8);

        let dataset = Dataset::new("fca", rows).with_total_records(None);
        assert_eq!(assess_ease_of_access(&dataset, &mining), 0.7);
    }
}
