//! Pipeline run state and summary types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quality::AuditReport;
use crate::scoring::{TrustGrade, TrustReport};

/// Pipeline phase a source-level failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    DataCollection,
    QualityAudit,
    TrustScoring,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelinePhase::DataCollection => "data_collection",
            PipelinePhase::QualityAudit => "quality_audit",
            PipelinePhase::TrustScoring => "trust_scoring",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Success,
    Failed,
}

/// Outcome of one phase for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOutcome<T> {
    pub status: PhaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl<T> PhaseOutcome<T> {
    pub fn success(result: T, completed_at: DateTime<Utc>) -> Self {
        Self {
            status: PhaseStatus::Success,
            result: Some(result),
            error: None,
            completed_at,
        }
    }

    pub fn failed(error: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            status: PhaseStatus::Failed,
            result: None,
            error: Some(error.into()),
            completed_at,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PhaseStatus::Success
    }

    /// The phase result, only when the phase succeeded.
    pub fn value(&self) -> Option<&T> {
        if self.is_success() {
            self.result.as_ref()
        } else {
            None
        }
    }
}

/// What the collection phase learned about a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub records_count: usize,
    /// Scraper errors recorded in the dataset metadata
    pub scrape_errors: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
}

/// A source-level failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineError {
    pub source: String,
    pub phase: PipelinePhase,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    CompletedSuccessfully,
    CompletedWithErrors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub total_errors: usize,
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub sources_attempted: usize,
    pub sources_successful: usize,
    pub sources_failed: usize,
    pub total_records_collected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditingSummary {
    pub sources_audited: usize,
    pub audits_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSummary {
    pub sources_scored: usize,
    pub scoring_failed: usize,
    pub average_trust_score: f64,
    pub highest_trust_score: f64,
    pub lowest_trust_score: f64,
}

/// One line of the cross-source ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRanking {
    pub source: String,
    pub trust_score: f64,
    pub trust_grade: TrustGrade,
    pub confidence_level: f64,
    pub records_count: usize,
}

/// Cross-source summary produced at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub pipeline_execution: ExecutionSummary,
    pub data_collection: CollectionSummary,
    pub quality_auditing: AuditingSummary,
    pub trust_scoring: ScoringSummary,
    pub source_rankings: Vec<SourceRanking>,
    pub recommendations: Vec<String>,
}

/// Everything one orchestrator invocation produced, keyed by source name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub scraped_sources: BTreeMap<String, PhaseOutcome<CollectionStats>>,
    pub audit_results: BTreeMap<String, PhaseOutcome<AuditReport>>,
    pub trust_scores: BTreeMap<String, PhaseOutcome<TrustReport>>,
    pub errors: Vec<PipelineError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<PipelineSummary>,
}

impl PipelineRun {
    /// Starts an empty run.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            completed_at: None,
            scraped_sources: BTreeMap::new(),
            audit_results: BTreeMap::new(),
            trust_scores: BTreeMap::new(),
            errors: Vec::new(),
            summary: None,
        }
    }

    /// Records a source-level failure.
    pub fn record_error(
        &mut self,
        source: impl Into<String>,
        phase: PipelinePhase,
        error: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.errors.push(PipelineError {
            source: source.into(),
            phase,
            error: error.into(),
            timestamp,
        });
    }

    /// Audit reports of sources whose audit succeeded.
    pub fn successful_audits(&self) -> impl Iterator<Item = &AuditReport> {
        self.audit_results.values().filter_map(PhaseOutcome::value)
    }

    /// Trust reports of sources whose scoring succeeded.
    pub fn successful_scores(&self) -> impl Iterator<Item = &TrustReport> {
        self.trust_scores.values().filter_map(PhaseOutcome::value)
    }

    pub fn status(&self) -> RunStatus {
        if self.errors.is_empty() {
            RunStatus::CompletedSuccessfully
        } else {
            RunStatus::CompletedWithErrors
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phase_outcome_serialization() {
        let at = Utc::now();
        let ok = PhaseOutcome::success(
            CollectionStats {
                records_count: 3,
                scrape_errors: 0,
                scraped_at: None,
            },
            at,
        );
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["status"], json!("success"));
        assert_eq!(value["result"]["records_count"], json!(3));
        assert!(value.get("error").is_none());

        let failed: PhaseOutcome<CollectionStats> = PhaseOutcome::failed("boom", at);
        assert!(failed.value().is_none());
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], json!("failed"));
        assert_eq!(value["error"], json!("boom"));
    }

    #[test]
    fn test_run_status_follows_error_log() {
        let mut run = PipelineRun::new(Utc::now());
        assert_eq!(run.status(), RunStatus::CompletedSuccessfully);

        run.record_error("fca", PipelinePhase::QualityAudit, "no data", Utc::now());
        assert_eq!(run.status(), RunStatus::CompletedWithErrors);
        assert_eq!(
            serde_json::to_value(&run.errors[0]).unwrap()["phase"],
            json!("quality_audit")
        );
    }

    #[test]
    fn test_pipeline_run_deserializes_from_saved_json() {
        let at = Utc::now();
        let mut run = PipelineRun::new(at);
        run.scraped_sources.insert(
            "fca".to_string(),
            PhaseOutcome::success(
                CollectionStats {
                    records_count: 4,
                    scrape_errors: 1,
                    scraped_at: Some("2024-06-30T12:00:00".to_string()),
                },
                at,
            ),
        );
        run.audit_results
            .insert("fca".to_string(), PhaseOutcome::failed("no data", at));
        run.record_error("fca", PipelinePhase::QualityAudit, "no data", at);

        let saved = serde_json::to_string_pretty(&run).unwrap();
        let loaded: PipelineRun = serde_json::from_str(&saved).unwrap();

        assert_eq!(loaded, run);
        assert!(loaded.audit_results["fca"].result.is_none());
        assert_eq!(loaded.scraped_sources["fca"].value().unwrap().records_count, 4);
    }

    #[test]
    fn test_runs_get_distinct_ids() {
        let now = Utc::now();
        assert_ne!(PipelineRun::new(now).run_id, PipelineRun::new(now).run_id);
    }
}
