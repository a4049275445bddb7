//! Data quality auditing.
//!
//! This module turns a scraped [`Dataset`](crate::models::Dataset) into an
//! [`AuditReport`] scored along six dimensions:
//! - **Completeness**: missing, empty and whitespace-only cells
//! - **Consistency**: mixed representations and field format mismatches
//! - **Validity**: email, URL, date and year plausibility
//! - **Uniqueness**: duplicate rows and duplicate key values
//! - **Timeliness**: age of the scrape
//! - **Metadata quality**: presence and accuracy of the scraper's metadata
//!
//! # Example
//! ```rust,ignore
//! use trustindex_core::quality::DataQualityAuditor;
//!
//! let auditor = DataQualityAuditor::with_defaults();
//! let report = auditor.audit("fca", &dataset);
//! println!("Quality score: {:.3}", report.overall_quality_score);
//! ```

mod auditor;
mod completeness;
mod consistency;
pub mod field_analysis;
mod issues;
mod metadata_quality;
mod models;
pub mod patterns;
mod timeliness;
mod uniqueness;
mod validity;

// Re-export public API
pub use auditor::{DataQualityAuditor, UNREADABLE_DATASET};
pub use field_analysis::{analyze_field, analyze_fields};
pub use models::{
    AuditDimension, AuditReport, AuditSummary, CompletenessGrade, CompletenessResult,
    ConsistencyIssue, ConsistencyIssueKind, ConsistencyResult, DataProfile, FieldCompleteness,
    FieldStat, FieldType, MetadataQualityResult, NumericStats, QualityComparison, QualityIssue,
    QualityIssueKind, Severity, SourceAuditSummary, TextStats, TimelinessResult,
    UniquenessResult, ValidityIssue, ValidityIssueKind, ValidityResult, ValueCount,
};
pub use patterns::{Validator, ValidatorTable};
pub use timeliness::parse_timestamp;
pub use validity::parse_lenient_date;
