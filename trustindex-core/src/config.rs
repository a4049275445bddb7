//! Scoring configuration.
//!
//! Every weight, threshold and keyword list used by the auditors and the
//! trust scorer lives here. A single [`ScoringConfig`] is built once and
//! handed to each component's constructor, so the data-quality auditor and
//! the trust scorer can never disagree about a constant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quality::CompletenessGrade;

/// Tolerance used when checking that a weight group sums to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validation errors for scoring configuration.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{group} weights must sum to 1.0, got {sum}")]
    WeightsDoNotSumToOne { group: String, sum: f64 },
    #[error("{group} weight '{name}' must not be negative, got {value}")]
    NegativeWeight {
        group: String,
        name: String,
        value: f64,
    },
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange { name: String, value: f64 },
    #[error("completeness thresholds must be ordered excellent >= good >= fair")]
    ThresholdOrder,
    #[error("{name} must be greater than zero")]
    NonPositive { name: String },
}

fn check_weights(group: &str, weights: &[(&str, f64)]) -> Result<(), ConfigValidationError> {
    for (name, value) in weights {
        if *value < 0.0 {
            return Err(ConfigValidationError::NegativeWeight {
                group: group.to_string(),
                name: (*name).to_string(),
                value: *value,
            });
        }
    }
    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigValidationError::WeightsDoNotSumToOne {
            group: group.to_string(),
            sum,
        });
    }
    Ok(())
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigValidationError::ThresholdOutOfRange {
            name: name.to_string(),
            value,
        })
    }
}

fn clamp_unit(name: &str, value: f64) -> f64 {
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!("{} {} clamped to valid range [0.0, 1.0]", name, value);
    }
    value.clamp(0.0, 1.0)
}

/// Dimension weights for the overall data-quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditWeights {
    pub completeness: f64,
    pub consistency: f64,
    pub validity: f64,
    pub uniqueness: f64,
    pub timeliness: f64,
    pub metadata_quality: f64,
}

impl Default for AuditWeights {
    fn default() -> Self {
        Self {
            completeness: 0.25,
            consistency: 0.20,
            validity: 0.25,
            uniqueness: 0.15,
            timeliness: 0.10,
            metadata_quality: 0.05,
        }
    }
}

impl AuditWeights {
    /// Named weights in report order.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("completeness", self.completeness),
            ("consistency", self.consistency),
            ("validity", self.validity),
            ("uniqueness", self.uniqueness),
            ("timeliness", self.timeliness),
            ("metadata_quality", self.metadata_quality),
        ]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    /// Validates that weights are non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_weights("audit", &self.entries())
    }
}

/// Dimension weights for the overall trust score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustWeights {
    pub data_completeness: f64,
    pub metadata_quality: f64,
    pub regulatory_compliance: f64,
    pub transparency: f64,
    pub accessibility: f64,
}

impl Default for TrustWeights {
    fn default() -> Self {
        Self {
            data_completeness: 0.25,
            metadata_quality: 0.20,
            regulatory_compliance: 0.25,
            transparency: 0.15,
            accessibility: 0.15,
        }
    }
}

impl TrustWeights {
    /// Named weights in dimension order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("data_completeness", self.data_completeness),
            ("metadata_quality", self.metadata_quality),
            ("regulatory_compliance", self.regulatory_compliance),
            ("transparency", self.transparency),
            ("accessibility", self.accessibility),
        ]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    /// Validates that weights are non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_weights("trust", &self.entries())
    }
}

/// Category weights for the metadata auditor (scores are on 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataWeights {
    pub completeness: f64,
    pub freshness: f64,
    pub structure: f64,
    pub accessibility: f64,
    pub documentation: f64,
}

impl Default for MetadataWeights {
    fn default() -> Self {
        Self {
            completeness: 0.3,
            freshness: 0.25,
            structure: 0.2,
            accessibility: 0.15,
            documentation: 0.1,
        }
    }
}

impl MetadataWeights {
    /// Named weights in category order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("completeness", self.completeness),
            ("freshness", self.freshness),
            ("structure", self.structure),
            ("accessibility", self.accessibility),
            ("documentation", self.documentation),
        ]
    }

    /// Validates that weights are non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_weights("metadata", &self.entries())
    }
}

/// Lower bounds for completeness grades (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for CompletenessThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.95,
            good: 0.80,
            fair: 0.50,
        }
    }
}

impl CompletenessThresholds {
    /// Creates thresholds, clamping each to [0.0, 1.0].
    pub fn new(excellent: f64, good: f64, fair: f64) -> Self {
        Self {
            excellent: clamp_unit("completeness excellent threshold", excellent),
            good: clamp_unit("completeness good threshold", good),
            fair: clamp_unit("completeness fair threshold", fair),
        }
    }

    /// Maps a completeness ratio to its grade.
    pub fn grade(&self, ratio: f64) -> CompletenessGrade {
        if ratio >= self.excellent {
            CompletenessGrade::Excellent
        } else if ratio >= self.good {
            CompletenessGrade::Good
        } else if ratio >= self.fair {
            CompletenessGrade::Fair
        } else {
            CompletenessGrade::Poor
        }
    }

    /// Validates range and ordering.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_unit("completeness excellent threshold", self.excellent)?;
        check_unit("completeness good threshold", self.good)?;
        check_unit("completeness fair threshold", self.fair)?;
        if self.excellent < self.good || self.good < self.fair {
            return Err(ConfigValidationError::ThresholdOrder);
        }
        Ok(())
    }
}

/// Thresholds for the flat issue list of an audit report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueThresholds {
    /// Fields filled below this ratio are reported
    pub low_fill_rate: f64,
    /// Fields filled below this ratio are reported with high severity
    pub critical_fill_rate: f64,
    /// Share of the dominant value above which a field is near-constant
    pub dominant_value_ratio: f64,
    /// Text longer than this many characters is reported
    pub max_text_length: usize,
}

impl Default for IssueThresholds {
    fn default() -> Self {
        Self {
            low_fill_rate: 0.5,
            critical_fill_rate: 0.2,
            dominant_value_ratio: 0.9,
            max_text_length: 1000,
        }
    }
}

/// Data-quality auditor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub weights: AuditWeights,
    pub completeness_grades: CompletenessThresholds,
    pub issues: IssueThresholds,
    /// Score deducted per consistency or validity issue
    pub issue_penalty: f64,
    /// Age at which timeliness reaches zero
    pub stale_after_days: i64,
    /// Age up to which a dataset counts as recent
    pub recent_within_days: i64,
    /// Score used when `scraped_at` cannot be parsed
    pub unparsable_timeliness: f64,
    /// Earliest plausible year for year-like fields
    pub min_plausible_year: i32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            weights: AuditWeights::default(),
            completeness_grades: CompletenessThresholds::default(),
            issues: IssueThresholds::default(),
            issue_penalty: 0.1,
            stale_after_days: 30,
            recent_within_days: 7,
            unparsable_timeliness: 0.5,
            min_plausible_year: 1800,
        }
    }
}

impl AuditConfig {
    /// Validates the auditor settings.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.weights.validate()?;
        self.completeness_grades.validate()?;
        check_unit("issue_penalty", self.issue_penalty)?;
        check_unit("unparsable_timeliness", self.unparsable_timeliness)?;
        check_unit("low_fill_rate", self.issues.low_fill_rate)?;
        check_unit("critical_fill_rate", self.issues.critical_fill_rate)?;
        check_unit("dominant_value_ratio", self.issues.dominant_value_ratio)?;
        if self.stale_after_days <= 0 {
            return Err(ConfigValidationError::NonPositive {
                name: "stale_after_days".to_string(),
            });
        }
        Ok(())
    }
}

/// Trust scorer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    pub weights: TrustWeights,
    /// Dimensions below this score get a recommendation
    pub recommendation_threshold: f64,
    /// A governance review is recommended when any dimension is below this
    pub review_threshold: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            weights: TrustWeights::default(),
            recommendation_threshold: 0.6,
            review_threshold: 0.5,
        }
    }
}

impl TrustConfig {
    /// Validates the scorer settings.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.weights.validate()?;
        check_unit("recommendation_threshold", self.recommendation_threshold)?;
        check_unit("review_threshold", self.review_threshold)
    }
}

/// A group of keywords contributing one weight when any of them is found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSignal {
    pub terms: Vec<String>,
    pub weight: f64,
}

impl KeywordSignal {
    fn new(terms: &[&str], weight: f64) -> Self {
        Self {
            terms: to_strings(terms),
            weight,
        }
    }

    /// Returns true when any term occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }
}

fn to_strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_string()).collect()
}

/// Keyword lists driving the text-mined trust indicators.
///
/// All terms are matched against lowercased record text, so they should be
/// written in lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMiningConfig {
    pub regulatory_terms: Vec<String>,
    pub privacy_terms: Vec<String>,
    /// Field names that indicate update tracking
    pub update_fields: Vec<String>,
    /// Field names holding free-text descriptions
    pub description_fields: Vec<String>,
    pub api_signals: Vec<KeywordSignal>,
    /// Substrings of a source name marking it as publicly accessible
    pub public_source_indicators: Vec<String>,
    /// Source identifiers that are regulators themselves
    pub regulator_sources: Vec<String>,
    /// Format tags recognized by the metadata auditor
    pub recognized_formats: Vec<String>,
}

impl Default for TextMiningConfig {
    fn default() -> Self {
        Self {
            regulatory_terms: to_strings(&[
                "fca",
                "regulation",
                "compliance",
                "licensed",
                "authorized",
                "gdpr",
                "data protection",
                "regulatory",
                "conduct authority",
            ]),
            privacy_terms: to_strings(&[
                "privacy policy",
                "privacy",
                "data protection",
                "gdpr",
                "cookie policy",
                "terms of service",
                "data processing",
            ]),
            update_fields: to_strings(&["last_updated", "updated_at", "last_modified"]),
            description_fields: to_strings(&["description", "tagline", "pitch", "summary"]),
            api_signals: vec![
                KeywordSignal::new(&["api"], 0.3),
                KeywordSignal::new(&["documentation", "docs"], 0.2),
                KeywordSignal::new(&["endpoint"], 0.2),
                KeywordSignal::new(&["swagger", "openapi"], 0.3),
            ],
            public_source_indicators: to_strings(&["fca", "open", "public"]),
            regulator_sources: to_strings(&["fca"]),
            recognized_formats: to_strings(&["json", "csv", "xml", "api", "html"]),
        }
    }
}

impl TextMiningConfig {
    /// Returns true when `source` is one of the configured regulator sources.
    pub fn is_regulator(&self, source: &str) -> bool {
        self.regulator_sources.iter().any(|r| r == source)
    }

    /// Returns true when `source` contains a public-source indicator.
    pub fn is_public(&self, source: &str) -> bool {
        let source = source.to_lowercase();
        self.public_source_indicators
            .iter()
            .any(|indicator| source.contains(indicator.as_str()))
    }
}

/// Complete scoring configuration shared by every component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub audit: AuditConfig,
    pub trust: TrustConfig,
    pub metadata: MetadataWeights,
    pub text_mining: TextMiningConfig,
}

impl ScoringConfig {
    /// Creates a new scoring config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set audit dimension weights.
    pub fn with_audit_weights(mut self, weights: AuditWeights) -> Self {
        self.audit.weights = weights;
        self
    }

    /// Builder method to set trust dimension weights.
    pub fn with_trust_weights(mut self, weights: TrustWeights) -> Self {
        self.trust.weights = weights;
        self
    }

    /// Builder method to set metadata category weights.
    pub fn with_metadata_weights(mut self, weights: MetadataWeights) -> Self {
        self.metadata = weights;
        self
    }

    /// Builder method to set completeness grade thresholds.
    pub fn with_completeness_thresholds(mut self, thresholds: CompletenessThresholds) -> Self {
        self.audit.completeness_grades = thresholds;
        self
    }

    /// Builder method to set the timeliness horizon.
    pub fn with_stale_after_days(mut self, days: i64) -> Self {
        if days < 1 {
            tracing::warn!("stale_after_days {} raised to minimum of 1", days);
        }
        self.audit.stale_after_days = days.max(1);
        self
    }

    /// Builder method to set the per-issue score deduction.
    pub fn with_issue_penalty(mut self, penalty: f64) -> Self {
        self.audit.issue_penalty = clamp_unit("issue_penalty", penalty);
        self
    }

    /// Builder method to set the trust recommendation threshold.
    pub fn with_recommendation_threshold(mut self, threshold: f64) -> Self {
        self.trust.recommendation_threshold = clamp_unit("recommendation_threshold", threshold);
        self
    }

    /// Builder method to set keyword lists.
    pub fn with_text_mining(mut self, text_mining: TextMiningConfig) -> Self {
        self.text_mining = text_mining;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error if any weight group does not sum to 1.0 or any
    /// threshold is outside its valid range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.audit.validate()?;
        self.trust.validate()?;
        self.metadata.validate()
    }
}
