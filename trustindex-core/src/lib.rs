//! Core data structures and scoring engines for the fintech data trust index.
//!
//! This crate audits scraped fintech datasets for data quality, audits the
//! descriptive metadata published about each source, and combines both into
//! a weighted, graded trust score. A pipeline orchestrator runs every
//! configured source through collection, auditing and scoring and summarizes
//! the results across sources.
//!
//! # Guarantees
//! - Auditing and scoring are deterministic given a dataset and a clock
//! - Bad input degrades to zero scores or `error` markers, never a panic
//! - Outbound trust reports and run summaries are checked against embedded
//!   JSON Schemas
//!
//! # Architecture
//! - [`quality`]: field analysis and the six-dimension data-quality audit
//! - [`metadata`]: metadata audit of source descriptions
//! - [`scoring`]: the five-dimension trust scorer
//! - [`pipeline`]: orchestration over async dataset sources
//! - [`config`]: the single [`ScoringConfig`] injected into every component

pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod scoring;
pub mod validation;
pub mod values;

// Re-export commonly used types
pub use config::{
    AuditConfig, AuditWeights, ConfigValidationError, MetadataWeights, ScoringConfig,
    TextMiningConfig, TrustConfig, TrustWeights,
};
pub use error::{Result, TrustIndexError};
pub use metadata::{MetadataAuditor, MetadataReport, SourceDescription};
pub use models::{Aggregate, Dataset, DatasetMetadata, Record, ScrapeError};
pub use pipeline::{
    DatasetSource, JsonFileSource, PipelineOrchestrator, PipelineRun, PipelineSummary,
    StaticSource,
};
pub use quality::{AuditReport, DataQualityAuditor};
pub use scoring::{TrustGrade, TrustReport, TrustScorer};

pub use validation::{
    ValidationError, initialize_schema_validators, validate_pipeline_summary,
    validate_trust_report,
};
