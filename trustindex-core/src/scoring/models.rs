//! Trust report types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TrustWeights;

/// The five trust dimensions, in weighting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustDimension {
    DataCompleteness,
    MetadataQuality,
    RegulatoryCompliance,
    Transparency,
    Accessibility,
}

impl TrustDimension {
    /// All dimensions in weighting order.
    pub const ALL: [TrustDimension; 5] = [
        TrustDimension::DataCompleteness,
        TrustDimension::MetadataQuality,
        TrustDimension::RegulatoryCompliance,
        TrustDimension::Transparency,
        TrustDimension::Accessibility,
    ];

    /// Returns the serialized name of this dimension.
    pub fn name(&self) -> &'static str {
        match self {
            TrustDimension::DataCompleteness => "data_completeness",
            TrustDimension::MetadataQuality => "metadata_quality",
            TrustDimension::RegulatoryCompliance => "regulatory_compliance",
            TrustDimension::Transparency => "transparency",
            TrustDimension::Accessibility => "accessibility",
        }
    }

    /// Recommendation emitted when this dimension scores poorly.
    pub fn recommendation(&self) -> &'static str {
        match self {
            TrustDimension::DataCompleteness => {
                "Improve data collection processes to reduce missing values"
            }
            TrustDimension::MetadataQuality => "Enhance metadata documentation and error tracking",
            TrustDimension::RegulatoryCompliance => {
                "Increase regulatory compliance indicators and documentation"
            }
            TrustDimension::Transparency => "Provide more frequent updates and better communication",
            TrustDimension::Accessibility => "Improve data format consistency and access methods",
        }
    }

    /// Weight of this dimension.
    pub fn weight(&self, weights: &TrustWeights) -> f64 {
        match self {
            TrustDimension::DataCompleteness => weights.data_completeness,
            TrustDimension::MetadataQuality => weights.metadata_quality,
            TrustDimension::RegulatoryCompliance => weights.regulatory_compliance,
            TrustDimension::Transparency => weights.transparency,
            TrustDimension::Accessibility => weights.accessibility,
        }
    }
}

impl fmt::Display for TrustDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per trust dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub data_completeness: f64,
    pub metadata_quality: f64,
    pub regulatory_compliance: f64,
    pub transparency: f64,
    pub accessibility: f64,
}

impl DimensionScores {
    /// Builds scores by evaluating `f` for every dimension.
    pub fn from_fn(mut f: impl FnMut(TrustDimension) -> f64) -> Self {
        Self {
            data_completeness: f(TrustDimension::DataCompleteness),
            metadata_quality: f(TrustDimension::MetadataQuality),
            regulatory_compliance: f(TrustDimension::RegulatoryCompliance),
            transparency: f(TrustDimension::Transparency),
            accessibility: f(TrustDimension::Accessibility),
        }
    }

    /// Value of a single dimension.
    pub fn get(&self, dimension: TrustDimension) -> f64 {
        match dimension {
            TrustDimension::DataCompleteness => self.data_completeness,
            TrustDimension::MetadataQuality => self.metadata_quality,
            TrustDimension::RegulatoryCompliance => self.regulatory_compliance,
            TrustDimension::Transparency => self.transparency,
            TrustDimension::Accessibility => self.accessibility,
        }
    }

    /// Dimension and value pairs in weighting order.
    pub fn iter(&self) -> impl Iterator<Item = (TrustDimension, f64)> + '_ {
        TrustDimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Lowest value across the dimensions.
    pub fn min(&self) -> f64 {
        self.iter().map(|(_, v)| v).fold(f64::INFINITY, f64::min)
    }

    /// Highest-scoring dimension; the first one wins ties.
    pub fn strongest(&self) -> TrustDimension {
        self.iter()
            .fold(None, |best: Option<(TrustDimension, f64)>, (d, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((d, v)),
            })
            .map_or(TrustDimension::DataCompleteness, |(d, _)| d)
    }

    /// Lowest-scoring dimension; the first one wins ties.
    pub fn weakest(&self) -> TrustDimension {
        self.iter()
            .fold(None, |worst: Option<(TrustDimension, f64)>, (d, v)| match worst {
                Some((_, w)) if w <= v => worst,
                _ => Some((d, v)),
            })
            .map_or(TrustDimension::DataCompleteness, |(d, _)| d)
    }
}

/// Trust letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrustGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    F,
}

impl TrustGrade {
    /// Maps a score in [0, 1] to its grade; lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            TrustGrade::APlus
        } else if score >= 0.8 {
            TrustGrade::A
        } else if score >= 0.7 {
            TrustGrade::BPlus
        } else if score >= 0.6 {
            TrustGrade::B
        } else if score >= 0.5 {
            TrustGrade::CPlus
        } else if score >= 0.4 {
            TrustGrade::C
        } else if score >= 0.3 {
            TrustGrade::D
        } else {
            TrustGrade::F
        }
    }

    /// Display form of the grade.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustGrade::APlus => "A+",
            TrustGrade::A => "A",
            TrustGrade::BPlus => "B+",
            TrustGrade::B => "B",
            TrustGrade::CPlus => "C+",
            TrustGrade::C => "C",
            TrustGrade::D => "D",
            TrustGrade::F => "F",
        }
    }
}

impl fmt::Display for TrustGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCompletenessDetails {
    pub overall_completeness: f64,
    pub missing_cells: u64,
    /// Standard deviation of per-field non-empty ratios
    pub field_level_variation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataQualityDetails {
    pub metadata_completeness: f64,
    pub error_tracking: bool,
    pub count_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryComplianceDetails {
    pub regulatory_mentions: u64,
    pub privacy_indicators: u64,
    pub compliance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransparencyDetails {
    pub timeliness_score: f64,
    pub age_days: i64,
    pub update_indicators: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityDetails {
    pub api_quality: f64,
    pub data_format_quality: f64,
    pub ease_of_access: f64,
}

/// Inputs behind each dimension score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringDetails {
    pub data_completeness_details: DataCompletenessDetails,
    pub metadata_quality_details: MetadataQualityDetails,
    pub regulatory_compliance_details: RegulatoryComplianceDetails,
    pub transparency_details: TransparencyDetails,
    pub accessibility_details: AccessibilityDetails,
}

/// Weighted trustworthiness assessment of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustReport {
    pub source: String,
    pub calculated_at: DateTime<Utc>,
    pub overall_trust_score: f64,
    pub trust_grade: TrustGrade,
    pub dimension_scores: DimensionScores,
    pub dimension_weights: TrustWeights,
    pub scoring_details: ScoringDetails,
    pub recommendations: Vec<String>,
    pub confidence_level: f64,
    /// Weight times score per dimension
    pub score_components: DimensionScores,
}

/// One line of a trust ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub source: String,
    pub trust_score: f64,
    pub trust_grade: TrustGrade,
    pub confidence_level: f64,
    pub top_strength: TrustDimension,
    pub main_weakness: TrustDimension,
}

/// Headline numbers of one source in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComparison {
    pub overall_score: f64,
    pub grade: TrustGrade,
    pub confidence: f64,
}

/// Side-by-side comparison of trust reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustComparison {
    pub comparison_timestamp: DateTime<Utc>,
    pub sources_compared: Vec<String>,
    pub score_comparison: BTreeMap<String, ScoreComparison>,
    /// Dimension name to per-source score
    pub dimension_comparison: BTreeMap<String, BTreeMap<String, f64>>,
    pub ranking: Vec<RankingEntry>,
    pub insights: Vec<String>,
}

/// Cross-source overview of trust reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustSummary {
    pub summary_timestamp: DateTime<Utc>,
    pub total_sources: usize,
    pub average_trust_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub score_range: f64,
    pub sources_by_grade: BTreeMap<String, usize>,
    pub dimension_averages: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_lower_bounds_inclusive() {
        assert_eq!(TrustGrade::from_score(0.9), TrustGrade::APlus);
        assert_eq!(TrustGrade::from_score(0.8999), TrustGrade::A);
        assert_eq!(TrustGrade::from_score(0.8), TrustGrade::A);
        assert_eq!(TrustGrade::from_score(0.7), TrustGrade::BPlus);
        assert_eq!(TrustGrade::from_score(0.6), TrustGrade::B);
        assert_eq!(TrustGrade::from_score(0.5), TrustGrade::CPlus);
        assert_eq!(TrustGrade::from_score(0.4), TrustGrade::C);
        assert_eq!(TrustGrade::from_score(0.3), TrustGrade::D);
        assert_eq!(TrustGrade::from_score(0.2999), TrustGrade::F);
    }

    #[test]
    fn test_grade_serializes_as_display() {
        assert_eq!(serde_json::to_value(TrustGrade::APlus).unwrap(), json!("A+"));
        assert_eq!(serde_json::to_value(TrustGrade::CPlus).unwrap(), json!("C+"));
        let grade: TrustGrade = serde_json::from_value(json!("B+")).unwrap();
        assert_eq!(grade, TrustGrade::BPlus);
        assert_eq!(grade.to_string(), "B+");
    }

    #[test]
    fn test_strongest_and_weakest_take_first_on_ties() {
        let scores = DimensionScores {
            data_completeness: 0.8,
            metadata_quality: 0.9,
            regulatory_compliance: 0.9,
            transparency: 0.4,
            accessibility: 0.4,
        };
        assert_eq!(scores.strongest(), TrustDimension::MetadataQuality);
        assert_eq!(scores.weakest(), TrustDimension::Transparency);
        assert_eq!(scores.min(), 0.4);
    }
}
