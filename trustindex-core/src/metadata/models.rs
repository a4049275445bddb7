//! Metadata audit input and report types.
//!
//! Category scores are on a 0-100 scale, unlike the [0, 1] scores of the
//! data-quality and trust reports.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Record;
use crate::values::is_truthy;

/// A flat description of a data source.
///
/// Keys are free-form; the auditor looks up the ones it knows about and
/// ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceDescription(Record);

impl SourceDescription {
    /// Wraps a JSON object.
    pub fn new(fields: Record) -> Self {
        Self(fields)
    }

    /// Converts a JSON value; anything other than an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Raw value of a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a key, if it holds a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// True when the key holds a truthy value.
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    /// True when any of the keys holds a truthy value.
    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has(key))
    }

    /// The declared source name, when it is a non-empty string.
    pub fn source_name(&self) -> Option<&str> {
        self.text("source_name").filter(|name| !name.is_empty())
    }

    /// Builder method to set a key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

/// Metadata letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetadataGrade {
    A,
    B,
    C,
    D,
    F,
}

impl MetadataGrade {
    /// Maps a 0-100 score to its grade; lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            MetadataGrade::A
        } else if score >= 80.0 {
            MetadataGrade::B
        } else if score >= 70.0 {
            MetadataGrade::C
        } else if score >= 60.0 {
            MetadataGrade::D
        } else {
            MetadataGrade::F
        }
    }
}

impl fmt::Display for MetadataGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grade = match self {
            MetadataGrade::A => "A",
            MetadataGrade::B => "B",
            MetadataGrade::C => "C",
            MetadataGrade::D => "D",
            MetadataGrade::F => "F",
        };
        f.write_str(grade)
    }
}

/// Scored metadata categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataCategory {
    Completeness,
    Freshness,
    Structure,
    Accessibility,
    Documentation,
}

impl MetadataCategory {
    /// All categories in weighting order.
    pub const ALL: [MetadataCategory; 5] = [
        MetadataCategory::Completeness,
        MetadataCategory::Freshness,
        MetadataCategory::Structure,
        MetadataCategory::Accessibility,
        MetadataCategory::Documentation,
    ];

    /// Returns the serialized name of this category.
    pub fn name(&self) -> &'static str {
        match self {
            MetadataCategory::Completeness => "completeness",
            MetadataCategory::Freshness => "freshness",
            MetadataCategory::Structure => "structure",
            MetadataCategory::Accessibility => "accessibility",
            MetadataCategory::Documentation => "documentation",
        }
    }
}

/// Per-category scores, each on 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub completeness: f64,
    pub freshness: f64,
    pub structure: f64,
    pub accessibility: f64,
    pub documentation: f64,
}

impl CategoryScores {
    /// Score of a single category.
    pub fn get(&self, category: MetadataCategory) -> f64 {
        match category {
            MetadataCategory::Completeness => self.completeness,
            MetadataCategory::Freshness => self.freshness,
            MetadataCategory::Structure => self.structure,
            MetadataCategory::Accessibility => self.accessibility,
            MetadataCategory::Documentation => self.documentation,
        }
    }
}

/// Boolean signals reported alongside the scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIndicators {
    pub has_contact_info: bool,
    pub has_license: bool,
    pub has_api_docs: bool,
    pub recently_updated: bool,
}

/// Findings behind the scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDetails {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub missing_fields: Vec<String>,
    pub quality_indicators: QualityIndicators,
}

/// Metadata audit of one source description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataReport {
    pub source_name: String,
    pub audit_timestamp: DateTime<Utc>,
    pub scores: CategoryScores,
    pub details: MetadataDetails,
    /// Weighted average of the category scores, 0-100
    pub overall_score: f64,
    pub grade: MetadataGrade,
}

/// Cross-source overview of metadata audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSummary {
    pub total_sources: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub grade_distribution: BTreeMap<String, usize>,
    /// Sources scoring at least 70
    pub sources_above_threshold: usize,
    /// Sources scoring below 60
    pub improvement_needed: usize,
    /// Sources scoring at least 85
    pub top_performers: Vec<String>,
    /// Sources scoring below 60
    pub needs_attention: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_bounds_inclusive() {
        assert_eq!(MetadataGrade::from_score(90.0), MetadataGrade::A);
        assert_eq!(MetadataGrade::from_score(89.99), MetadataGrade::B);
        assert_eq!(MetadataGrade::from_score(70.0), MetadataGrade::C);
        assert_eq!(MetadataGrade::from_score(60.0), MetadataGrade::D);
        assert_eq!(MetadataGrade::from_score(59.9), MetadataGrade::F);
        assert_eq!(MetadataGrade::B.to_string(), "B");
    }

    #[test]
    fn test_description_lookups() {
        let description = SourceDescription::from_value(json!({
            "source_name": "",
            "license": "OGL",
            "rate_limits": 0,
            "schema": {"fields": []},
        }))
        .unwrap();

        assert!(description.source_name().is_none());
        assert!(description.has("license"));
        assert!(!description.has("rate_limits"));
        assert!(description.has("schema"));
        assert!(description.has_any(&["contact_info", "license"]));
        assert!(SourceDescription::from_value(json!([1, 2])).is_none());
    }
}
