//! Trust scorer facade.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::{ScoringConfig, TrustWeights};
use crate::models::{Aggregate, Dataset};
use crate::quality::AuditReport;
use crate::values::round3;

use super::dimensions::{confidence_level, recommendations, score_dimensions};
use super::inputs::ScoringInputs;
use super::models::{
    AccessibilityDetails, DataCompletenessDetails, DimensionScores, MetadataQualityDetails,
    RankingEntry, RegulatoryComplianceDetails, ScoreComparison, ScoringDetails, TransparencyDetails,
    TrustComparison, TrustDimension, TrustGrade, TrustReport, TrustSummary,
};

/// Spread of overall scores above which sources are considered uneven.
const HIGH_VARIATION: f64 = 0.3;

/// Scorer turning audit reports into weighted trust reports.
///
/// Like the auditors, the scorer keeps no per-source state; ranking and
/// comparison operate on the reports passed in.
///
/// # Example
///
/// ```rust,ignore
/// use trustindex_core::quality::DataQualityAuditor;
/// use trustindex_core::scoring::TrustScorer;
///
/// let audit = DataQualityAuditor::with_defaults().audit("fca", &dataset);
/// let trust = TrustScorer::with_defaults().score("fca", &audit, &dataset);
/// println!("{} ({})", trust.overall_trust_score, trust.trust_grade);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrustScorer {
    config: ScoringConfig,
}

impl TrustScorer {
    /// Creates a new scorer with the given configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Creates a new scorer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ScoringConfig::default())
    }

    /// Returns a reference to the scorer configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores a source against the current time.
    pub fn score(&self, source: &str, report: &AuditReport, dataset: &Dataset) -> TrustReport {
        self.score_at(source, report, dataset, Utc::now())
    }

    /// Scores a source, stamping the report with `now`.
    pub fn score_at(
        &self,
        source: &str,
        report: &AuditReport,
        dataset: &Dataset,
        now: DateTime<Utc>,
    ) -> TrustReport {
        tracing::info!("Calculating trust score for {}", source);

        let inputs = ScoringInputs::extract(report, dataset, &self.config.text_mining);
        let scores = score_dimensions(&inputs, &self.config.text_mining);
        let weights = self.config.trust.weights;

        let (overall_trust_score, trust_grade) = overall_and_grade(&scores, &weights);

        let trust = TrustReport {
            source: source.to_string(),
            calculated_at: now,
            overall_trust_score,
            trust_grade,
            dimension_scores: scores,
            dimension_weights: weights,
            scoring_details: scoring_details(&inputs),
            recommendations: recommendations(&scores, &self.config.trust),
            confidence_level: confidence_level(&inputs),
            score_components: DimensionScores::from_fn(|dimension| {
                round3(scores.get(dimension) * dimension.weight(&weights))
            }),
        };

        tracing::info!(
            "Trust score for {}: {:.3} ({})",
            source,
            trust.overall_trust_score,
            trust.trust_grade
        );
        trust
    }

    /// Ranks reports by overall trust score, highest first.
    pub fn rank_sources(&self, reports: &[TrustReport]) -> Vec<RankingEntry> {
        let mut ranking: Vec<RankingEntry> = reports
            .iter()
            .map(|report| RankingEntry {
                source: report.source.clone(),
                trust_score: report.overall_trust_score,
                trust_grade: report.trust_grade,
                confidence_level: report.confidence_level,
                top_strength: report.dimension_scores.strongest(),
                main_weakness: report.dimension_scores.weakest(),
            })
            .collect();
        ranking.sort_by(|a, b| b.trust_score.total_cmp(&a.trust_score));
        ranking
    }

    /// Compares trust across sources. Needs at least two reports.
    pub fn compare_sources(&self, reports: &[TrustReport]) -> Aggregate<TrustComparison> {
        if reports.len() < 2 {
            return Aggregate::unavailable("Need at least 2 sources to compare");
        }

        let score_comparison = reports
            .iter()
            .map(|report| {
                (
                    report.source.clone(),
                    ScoreComparison {
                        overall_score: report.overall_trust_score,
                        grade: report.trust_grade,
                        confidence: report.confidence_level,
                    },
                )
            })
            .collect();

        let dimension_comparison = TrustDimension::ALL
            .iter()
            .map(|dimension| {
                let per_source = reports
                    .iter()
                    .map(|r| (r.source.clone(), r.dimension_scores.get(*dimension)))
                    .collect();
                (dimension.name().to_string(), per_source)
            })
            .collect();

        Aggregate::Available(TrustComparison {
            comparison_timestamp: Utc::now(),
            sources_compared: reports.iter().map(|r| r.source.clone()).collect(),
            score_comparison,
            dimension_comparison,
            ranking: self.rank_sources(reports),
            insights: comparison_insights(reports),
        })
    }

    /// Summarizes trust reports. Needs at least one report.
    pub fn summarize(&self, reports: &[TrustReport]) -> Aggregate<TrustSummary> {
        if reports.is_empty() {
            return Aggregate::unavailable("No trust scores calculated yet");
        }

        let scores: Vec<f64> = reports.iter().map(|r| r.overall_trust_score).collect();
        let highest = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = scores.iter().copied().fold(f64::INFINITY, f64::min);

        let mut sources_by_grade = BTreeMap::new();
        for report in reports {
            *sources_by_grade
                .entry(report.trust_grade.to_string())
                .or_insert(0) += 1;
        }

        let dimension_averages = dimension_averages(reports)
            .into_iter()
            .map(|(dimension, average)| (dimension.name().to_string(), round3(average)))
            .collect();

        Aggregate::Available(TrustSummary {
            summary_timestamp: Utc::now(),
            total_sources: reports.len(),
            average_trust_score: round3(scores.iter().sum::<f64>() / scores.len() as f64),
            highest_score: highest,
            lowest_score: lowest,
            score_range: round3(highest - lowest),
            sources_by_grade,
            dimension_averages,
        })
    }
}

/// Weighted overall score, rounded for the report, and the grade of the
/// unrounded sum.
fn overall_and_grade(scores: &DimensionScores, weights: &TrustWeights) -> (f64, TrustGrade) {
    let overall: f64 = scores
        .iter()
        .map(|(dimension, score)| score * dimension.weight(weights))
        .sum();
    (round3(overall), TrustGrade::from_score(overall))
}

fn scoring_details(inputs: &ScoringInputs) -> ScoringDetails {
    ScoringDetails {
        data_completeness_details: DataCompletenessDetails {
            overall_completeness: inputs.overall_completeness,
            missing_cells: inputs.missing_cells,
            field_level_variation: round3(inputs.field_variation()),
        },
        metadata_quality_details: MetadataQualityDetails {
            metadata_completeness: inputs.metadata_completeness,
            error_tracking: inputs.has_error_tracking,
            count_accuracy: inputs.count_accuracy,
        },
        regulatory_compliance_details: RegulatoryComplianceDetails {
            regulatory_mentions: inputs.regulatory_mentions,
            privacy_indicators: inputs.privacy_indicators,
            compliance_score: inputs.compliance_indicators,
        },
        transparency_details: TransparencyDetails {
            timeliness_score: inputs.timeliness_score,
            age_days: inputs.age_days,
            update_indicators: inputs.update_frequency,
        },
        accessibility_details: AccessibilityDetails {
            api_quality: inputs.api_quality,
            data_format_quality: inputs.format_quality,
            ease_of_access: inputs.ease_of_access,
        },
    }
}

/// Mean score of every dimension across the reports, in dimension order.
fn dimension_averages(reports: &[TrustReport]) -> Vec<(TrustDimension, f64)> {
    let count = reports.len().max(1) as f64;
    TrustDimension::ALL
        .iter()
        .map(|dimension| {
            let total: f64 = reports
                .iter()
                .map(|r| r.dimension_scores.get(*dimension))
                .sum();
            (*dimension, total / count)
        })
        .collect()
}

/// Picks the first entry whose key wins against all later ones.
fn first_by<T: Copy>(items: &[(T, f64)], better: fn(f64, f64) -> bool) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for (item, value) in items {
        match best {
            Some((_, current)) if !better(*value, current) => {}
            _ => best = Some((*item, *value)),
        }
    }
    best
}

fn comparison_insights(reports: &[TrustReport]) -> Vec<String> {
    let mut insights = Vec::new();

    let scores: Vec<(&str, f64)> = reports
        .iter()
        .map(|r| (r.source.as_str(), r.overall_trust_score))
        .collect();

    let best = first_by(&scores, |a, b| a > b);
    let worst = first_by(&scores, |a, b| a < b);
    if let (Some((best, high)), Some((worst, low))) = (best, worst) {
        insights.push(format!("Highest trust score: {} ({:.3})", best, high));
        insights.push(format!("Lowest trust score: {} ({:.3})", worst, low));
    }

    let averages = dimension_averages(reports);
    if let (Some((strongest, high)), Some((weakest, low))) = (
        first_by(&averages, |a, b| a > b),
        first_by(&averages, |a, b| a < b),
    ) {
        insights.push(format!("Strongest overall dimension: {} ({:.3})", strongest, high));
        insights.push(format!("Weakest overall dimension: {} ({:.3})", weakest, low));
    }

    let highest = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let lowest = scores.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    if highest - lowest > HIGH_VARIATION {
        insights.push("High variation in trust scores suggests significant quality differences".to_string());
    } else {
        insights.push("Relatively consistent trust scores across sources".to_string());
    }

    insights
}
