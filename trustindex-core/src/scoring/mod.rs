//! Trust scoring.
//!
//! Converts a data-quality [`AuditReport`](crate::quality::AuditReport) and
//! the raw records behind it into five weighted trust dimensions:
//! - **Data completeness**: audit completeness adjusted for uneven fields
//! - **Metadata quality**: scraper metadata and record documentation
//! - **Regulatory compliance**: regulatory evidence mined from the records
//! - **Transparency**: freshness, update signals and contact channels
//! - **Accessibility**: API signals, format quality and ease of access
//!
//! The weighted sum is graded `A+` through `F` and accompanied by a
//! confidence level reflecting how much evidence the score rests on.

mod dimensions;
mod inputs;
mod models;
mod scorer;

pub use dimensions::{confidence_level, score_dimensions};
pub use inputs::{ScoringInputs, UNKNOWN_AGE_DAYS};
pub use models::{
    AccessibilityDetails, DataCompletenessDetails, DimensionScores, MetadataQualityDetails,
    RankingEntry, RegulatoryComplianceDetails, ScoreComparison, ScoringDetails,
    TransparencyDetails, TrustComparison, TrustDimension, TrustGrade, TrustReport, TrustSummary,
};
pub use scorer::TrustScorer;
