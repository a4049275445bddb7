//! Trust dimension formulas.
//!
//! Every dimension is clamped to [0, 1] and rounded to three places.

use crate::config::{TextMiningConfig, TrustConfig};
use crate::values::round3;

use super::inputs::ScoringInputs;
use super::models::{DimensionScores, TrustDimension};

const GOVERNANCE_REVIEW: &str = "Consider comprehensive data governance review";
const MAINTAIN_STANDARDS: &str = "Maintain current high standards and monitor for any degradation";

/// Scores all five dimensions.
pub fn score_dimensions(inputs: &ScoringInputs, mining: &TextMiningConfig) -> DimensionScores {
    DimensionScores::from_fn(|dimension| match dimension {
        TrustDimension::DataCompleteness => data_completeness(inputs),
        TrustDimension::MetadataQuality => metadata_quality(inputs),
        TrustDimension::RegulatoryCompliance => regulatory_compliance(inputs, mining),
        TrustDimension::Transparency => transparency(inputs),
        TrustDimension::Accessibility => accessibility(inputs),
    })
}

/// Audit completeness less a penalty for uneven fields, with a bonus near 1.0.
pub fn data_completeness(inputs: &ScoringInputs) -> f64 {
    let mut score = inputs.overall_completeness;

    if !inputs.field_non_empty_ratios.is_empty() {
        score = f64::max(0.0, score - f64::min(0.1, inputs.field_variation()));
    }
    if score >= 0.95 {
        score = f64::min(1.0, score + 0.05);
    }

    round3(score.clamp(0.0, 1.0))
}

pub fn metadata_quality(inputs: &ScoringInputs) -> f64 {
    let mut score = inputs.metadata_completeness * 0.6;
    if inputs.has_error_tracking {
        score += 0.2;
    }
    score += inputs.count_accuracy * 0.2;
    score += inputs.documentation_quality * 0.1;

    round3(score.clamp(0.0, 1.0))
}

/// Compliance evidence plus capped bonuses for mentions, privacy signals
/// and regulator sources.
pub fn regulatory_compliance(inputs: &ScoringInputs, mining: &TextMiningConfig) -> f64 {
    let mut score = f64::min(1.0, inputs.compliance_indicators);
    score += f64::min(0.3, inputs.regulatory_mentions as f64 * 0.05);
    score += f64::min(0.2, inputs.privacy_indicators as f64 * 0.1);
    if mining.is_regulator(&inputs.source_type) {
        score += 0.2;
    }

    round3(score.clamp(0.0, 1.0))
}

pub fn transparency(inputs: &ScoringInputs) -> f64 {
    let mut score = inputs.timeliness_score * 0.5
        + inputs.update_frequency * 0.3
        + inputs.contact_availability * 0.2;

    if inputs.scraping_errors > 0 {
        let penalty = f64::min(0.2, inputs.scraping_errors as f64 * 0.05);
        score = f64::max(0.0, score - penalty);
    }

    round3(score.clamp(0.0, 1.0))
}

pub fn accessibility(inputs: &ScoringInputs) -> f64 {
    let score = inputs.api_quality * 0.4
        + inputs.format_quality * 0.3
        + inputs.ease_of_access * 0.3
        + (inputs.validity_score + inputs.consistency_score) * 0.1;

    round3(score.clamp(0.0, 1.0))
}

/// Mean of record-count, error-count and recency buckets.
pub fn confidence_level(inputs: &ScoringInputs) -> f64 {
    let records = match inputs.total_records {
        n if n > 100 => 1.0,
        n if n > 50 => 0.8,
        n if n > 10 => 0.6,
        _ => 0.4,
    };
    let errors = match inputs.scraping_errors {
        0 => 1.0,
        n if n < 5 => 0.8,
        _ => 0.6,
    };
    let recency = if inputs.is_recent {
        1.0
    } else if inputs.age_days < 30 {
        0.8
    } else {
        0.6
    };

    round3((records + errors + recency) / 3.0)
}

/// Improvement suggestions for weak dimensions.
pub fn recommendations(scores: &DimensionScores, config: &TrustConfig) -> Vec<String> {
    let mut recommendations: Vec<String> = scores
        .iter()
        .filter(|(_, score)| *score < config.recommendation_threshold)
        .map(|(dimension, _)| dimension.recommendation().to_string())
        .collect();

    if scores.min() < config.review_threshold {
        recommendations.push(GOVERNANCE_REVIEW.to_string());
    }
    if recommendations.is_empty() {
        recommendations.push(MAINTAIN_STANDARDS.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ScoringInputs {
        ScoringInputs {
            overall_completeness: 1.0,
            field_non_empty_ratios: vec![1.0, 1.0],
            missing_cells: 0,
            validity_score: 1.0,
            consistency_score: 1.0,
            uniqueness_score: 1.0,
            metadata_completeness: 1.0,
            has_error_tracking: false,
            count_accuracy: 1.0,
            timeliness_score: 1.0,
            age_days: 0,
            is_recent: true,
            total_records: 200,
            scraping_errors: 0,
            source_type: "seedrs".to_string(),
            regulatory_mentions: 0,
            privacy_indicators: 0,
            compliance_indicators: 0.0,
            update_frequency: 0.0,
            documentation_quality: 0.0,
            contact_availability: 0.0,
            api_quality: 0.0,
            format_quality: 0.0,
            ease_of_access: 0.0,
        }
    }

    #[test]
    fn test_data_completeness_penalty_and_bonus() {
        let mut i = inputs();
        i.overall_completeness = 0.96;
        assert_eq!(data_completeness(&i), 1.0);

        // Ratios 0.5 and 1.0 have a standard deviation of 0.25, capped at 0.1
        i.overall_completeness = 0.75;
        i.field_non_empty_ratios = vec![0.5, 1.0];
        assert_eq!(data_completeness(&i), 0.65);

        i.field_non_empty_ratios.clear();
        assert_eq!(data_completeness(&i), 0.75);
    }

    #[test]
    fn test_metadata_quality_capped() {
        let mut i = inputs();
        i.has_error_tracking = true;
        i.documentation_quality = 1.0;
        assert_eq!(metadata_quality(&i), 1.0);

        i.has_error_tracking = false;
        i.documentation_quality = 0.0;
        i.metadata_completeness = 2.0 / 3.0;
        i.count_accuracy = 0.5;
        assert_eq!(metadata_quality(&i), 0.5);
    }

    #[test]
    fn test_regulator_bonus() {
        let mining = TextMiningConfig::default();
        let mut i = inputs();
        i.compliance_indicators = 0.5;
        i.regulatory_mentions = 2;
        i.privacy_indicators = 1;
        assert_eq!(regulatory_compliance(&i, &mining), 0.7);

        i.source_type = "fca".to_string();
        assert_eq!(regulatory_compliance(&i, &mining), 0.9);

        i.regulatory_mentions = 100;
        assert_eq!(regulatory_compliance(&i, &mining), 1.0);
    }

    #[test]
    fn test_transparency_error_penalty() {
        let mut i = inputs();
        i.timeliness_score = 0.8;
        i.update_frequency = 1.0;
        i.contact_availability = 0.5;
        assert_eq!(transparency(&i), 0.8);

        i.scraping_errors = 2;
        assert_eq!(transparency(&i), 0.7);

        i.scraping_errors = 50;
        assert_eq!(transparency(&i), 0.6);
    }

    #[test]
    fn test_accessibility() {
        let mut i = inputs();
        i.api_quality = 0.5;
        i.format_quality = 1.0;
        i.ease_of_access = 0.5;
        // 0.2 + 0.3 + 0.15 + 0.2
        assert_eq!(accessibility(&i), 0.85);
    }

    #[test]
    fn test_confidence_buckets() {
        let mut i = inputs();
        assert_eq!(confidence_level(&i), 1.0);

        i.total_records = 20;
        i.scraping_errors = 3;
        i.is_recent = false;
        i.age_days = 999;
        assert_eq!(confidence_level(&i), 0.667);

        i.total_records = 0;
        i.scraping_errors = 10;
        assert_eq!(confidence_level(&i), 0.533);
    }

    #[test]
    fn test_recommendations() {
        let config = TrustConfig::default();
        let strong = DimensionScores::from_fn(|_| 0.9);
        assert_eq!(recommendations(&strong, &config), vec![MAINTAIN_STANDARDS.to_string()]);

        let mut weak = strong;
        weak.transparency = 0.55;
        weak.accessibility = 0.3;
        assert_eq!(
            recommendations(&weak, &config),
            vec![
                TrustDimension::Transparency.recommendation().to_string(),
                TrustDimension::Accessibility.recommendation().to_string(),
                GOVERNANCE_REVIEW.to_string(),
            ]
        );
    }
}
