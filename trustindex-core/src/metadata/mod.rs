//! Metadata auditing.
//!
//! Scores a flat source description on five categories (completeness,
//! freshness, structure, accessibility and documentation), each on a 0-100
//! scale, independently of the data-quality audit of the source's records.

mod auditor;
mod models;

pub use auditor::{MetadataAuditor, OPTIONAL_FIELDS, REQUIRED_FIELDS};
pub use models::{
    CategoryScores, MetadataCategory, MetadataDetails, MetadataGrade, MetadataReport,
    MetadataSummary, QualityIndicators, SourceDescription,
};
