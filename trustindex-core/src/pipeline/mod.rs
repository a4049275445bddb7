//! Pipeline orchestration.
//!
//! Sequences COLLECT, AUDIT, SCORE and SUMMARIZE over a set of
//! [`DatasetSource`]s. Sources are awaited one at a time; auditing and
//! scoring are synchronous.

mod models;
mod orchestrator;
mod source;

pub use models::{
    AuditingSummary, CollectionStats, CollectionSummary, ExecutionSummary, PhaseOutcome,
    PhaseStatus, PipelineError, PipelinePhase, PipelineRun, PipelineSummary, RunStatus,
    ScoringSummary, SourceRanking,
};
pub use orchestrator::{
    PipelineOrchestrator, pipeline_recommendations, source_rankings, summarize_run,
};
pub use source::{DatasetSource, JsonFileSource, StaticSource};
