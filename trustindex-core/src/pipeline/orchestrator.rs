//! Pipeline orchestrator: collect, audit, score and summarize.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::models::Dataset;
use crate::quality::{AuditReport, DataQualityAuditor};
use crate::scoring::{TrustReport, TrustScorer};
use crate::validation::{ValidationError, validate_pipeline_summary, validate_trust_report};
use crate::values::round3;

use super::models::{
    AuditingSummary, CollectionStats, CollectionSummary, ExecutionSummary, PhaseOutcome,
    PipelinePhase, PipelineRun, PipelineSummary, ScoringSummary, SourceRanking,
};
use super::source::DatasetSource;

const LOW_AVERAGE: f64 = 0.6;
const MODERATE_AVERAGE: f64 = 0.7;
const LARGE_SPREAD: f64 = 0.3;
const HIGH_ERROR_COUNT: usize = 5;

/// Runs every registered source through the audit and scoring phases.
///
/// Each phase visits all sources independently. A failure in one source's
/// phase is written to the run's error log and that source is skipped by the
/// later phases; the run itself always completes with a summary.
///
/// # Example
///
/// ```rust,ignore
/// use trustindex_core::pipeline::{JsonFileSource, PipelineOrchestrator};
///
/// let orchestrator = PipelineOrchestrator::with_defaults()
///     .with_source(JsonFileSource::new("fca", "data/fca.json"));
/// let run = orchestrator.run().await;
/// ```
pub struct PipelineOrchestrator {
    auditor: DataQualityAuditor,
    scorer: TrustScorer,
    sources: Vec<Box<dyn DatasetSource>>,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator whose auditor and scorer share `config`.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            auditor: DataQualityAuditor::new(config.clone()),
            scorer: TrustScorer::new(config),
            sources: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringConfig::default())
    }

    /// Builder method to register a source.
    pub fn with_source(mut self, source: impl DatasetSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Registers an already boxed source.
    pub fn add_source(&mut self, source: Box<dyn DatasetSource>) {
        self.sources.push(source);
    }

    /// Names of the registered sources, in registration order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    pub fn auditor(&self) -> &DataQualityAuditor {
        &self.auditor
    }

    pub fn scorer(&self) -> &TrustScorer {
        &self.scorer
    }

    /// Runs all phases for every registered source.
    pub async fn run(&self) -> PipelineRun {
        tracing::info!("Starting full pipeline execution");

        let mut run = PipelineRun::new(Utc::now());
        self.execute(&mut run, |_| true).await;
        self.finish(&mut run);

        tracing::info!("Pipeline execution completed ({} errors)", run.errors.len());
        run
    }

    /// Re-runs the named sources and carries every other source's results
    /// over from `previous` into a new run.
    ///
    /// Names without a registered source keep their previous results.
    pub async fn refresh(&self, previous: &PipelineRun, source_names: &[String]) -> PipelineRun {
        tracing::info!("Running incremental update for sources: {:?}", source_names);

        let mut registered = Vec::new();
        for name in source_names {
            if self.sources.iter().any(|source| source.name() == name) {
                registered.push(name.as_str());
            } else {
                tracing::warn!("No source registered for '{}', keeping previous results", name);
            }
        }
        let refreshed = |name: &str| registered.iter().any(|n| *n == name);

        let mut run = PipelineRun::new(Utc::now());
        run.scraped_sources = carry_over(&previous.scraped_sources, &refreshed);
        run.audit_results = carry_over(&previous.audit_results, &refreshed);
        run.trust_scores = carry_over(&previous.trust_scores, &refreshed);
        run.errors = previous
            .errors
            .iter()
            .filter(|error| !refreshed(&error.source))
            .cloned()
            .collect();

        self.execute(&mut run, refreshed).await;
        self.finish(&mut run);
        run
    }

    async fn execute(&self, run: &mut PipelineRun, selected: impl Fn(&str) -> bool) {
        log_phase("STEP 1: DATA COLLECTION");
        let datasets = self.collect_all(run, &selected).await;

        log_phase("STEP 2: DATA QUALITY AUDITING");
        self.audit_all(run, &datasets);

        log_phase("STEP 3: TRUST SCORE CALCULATION");
        self.score_all(run, &datasets);
    }

    async fn collect_all(
        &self,
        run: &mut PipelineRun,
        selected: &impl Fn(&str) -> bool,
    ) -> BTreeMap<String, Dataset> {
        let mut datasets = BTreeMap::new();

        for source in self.sources.iter().filter(|s| selected(s.name())) {
            let name = source.name();
            tracing::info!("Collecting data from: {}", name);

            match source.collect().await {
                Ok(dataset) => {
                    tracing::info!("Collected {} records from {}", dataset.len(), name);
                    let stats = CollectionStats {
                        records_count: dataset.len(),
                        scrape_errors: dataset.error_count(),
                        scraped_at: dataset.metadata.scraped_at.clone(),
                    };
                    run.scraped_sources
                        .insert(name.to_string(), PhaseOutcome::success(stats, Utc::now()));
                    datasets.insert(name.to_string(), dataset);
                }
                Err(e) => {
                    let message = format!("Data collection failed for {}: {}", name, e);
                    tracing::error!("{}", message);
                    let now = Utc::now();
                    run.scraped_sources
                        .insert(name.to_string(), PhaseOutcome::failed(&message, now));
                    run.record_error(name, PipelinePhase::DataCollection, message, now);
                }
            }
        }

        datasets
    }

    fn audit_all(&self, run: &mut PipelineRun, datasets: &BTreeMap<String, Dataset>) {
        for (name, dataset) in datasets {
            tracing::info!("Auditing data quality for: {}", name);

            let report = self.auditor.audit(name, dataset);
            let now = Utc::now();
            match report.error.clone() {
                None => {
                    tracing::info!(
                        "Overall quality score for {}: {:.3}",
                        name,
                        report.overall_quality_score
                    );
                    run.audit_results
                        .insert(name.clone(), PhaseOutcome::success(report, now));
                }
                Some(error) => {
                    let message = format!("Quality audit failed for {}: {}", name, error);
                    tracing::error!("{}", message);
                    run.audit_results
                        .insert(name.clone(), PhaseOutcome::failed(&message, now));
                    run.record_error(name.as_str(), PipelinePhase::QualityAudit, message, now);
                }
            }
        }
    }

    fn score_all(&self, run: &mut PipelineRun, datasets: &BTreeMap<String, Dataset>) {
        for (name, dataset) in datasets {
            let Some(report) = run.audit_results.get(name).and_then(PhaseOutcome::value) else {
                tracing::info!("Skipping trust scoring for {} (audit failed)", name);
                continue;
            };

            let scored = self.score_checked(name, report, dataset);
            let now = Utc::now();
            match scored {
                Ok(trust) => {
                    run.trust_scores
                        .insert(name.clone(), PhaseOutcome::success(trust, now));
                }
                Err(e) => {
                    let message = format!("Trust scoring failed for {}: {}", name, e);
                    tracing::error!("{}", message);
                    run.trust_scores
                        .insert(name.clone(), PhaseOutcome::failed(&message, now));
                    run.record_error(name.as_str(), PipelinePhase::TrustScoring, message, now);
                }
            }
        }
    }

    /// Scores a source and checks the report against its output contract.
    fn score_checked(
        &self,
        name: &str,
        report: &AuditReport,
        dataset: &Dataset,
    ) -> Result<TrustReport, ValidationError> {
        let trust = self.scorer.score(name, report, dataset);
        validate_trust_report(&serde_json::to_value(&trust)?)?;
        Ok(trust)
    }

    fn finish(&self, run: &mut PipelineRun) {
        log_phase("STEP 4: GENERATE SUMMARY");

        let completed_at = Utc::now();
        let summary = summarize_run(run, completed_at);

        match serde_json::to_value(&summary) {
            Ok(value) => {
                if let Err(e) = validate_pipeline_summary(&value) {
                    tracing::warn!("Pipeline summary does not match its schema: {}", e);
                }
            }
            Err(e) => tracing::warn!("Pipeline summary could not be serialized: {}", e),
        }

        tracing::info!("Pipeline Summary:");
        tracing::info!("  Total sources processed: {}", summary.data_collection.sources_attempted);
        tracing::info!("  Successful data collection: {}", summary.data_collection.sources_successful);
        tracing::info!("  Total records collected: {}", summary.data_collection.total_records_collected);
        tracing::info!("  Quality audits completed: {}", summary.quality_auditing.sources_audited);
        tracing::info!("  Trust scores calculated: {}", summary.trust_scoring.sources_scored);
        if summary.trust_scoring.sources_scored > 0 {
            tracing::info!("  Average trust score: {:.3}", summary.trust_scoring.average_trust_score);
        }
        tracing::info!("  Total errors: {}", summary.pipeline_execution.total_errors);

        run.completed_at = Some(completed_at);
        run.summary = Some(summary);
    }
}

fn log_phase(title: &str) {
    tracing::info!("{}", "=".repeat(50));
    tracing::info!("{}", title);
    tracing::info!("{}", "=".repeat(50));
}

fn carry_over<T: Clone>(
    previous: &BTreeMap<String, PhaseOutcome<T>>,
    refreshed: &impl Fn(&str) -> bool,
) -> BTreeMap<String, PhaseOutcome<T>> {
    previous
        .iter()
        .filter(|(name, _)| !refreshed(name))
        .map(|(name, outcome)| (name.clone(), outcome.clone()))
        .collect()
}

fn count_outcomes<T>(outcomes: &BTreeMap<String, PhaseOutcome<T>>) -> (usize, usize) {
    let success = outcomes.values().filter(|o| o.is_success()).count();
    (success, outcomes.len() - success)
}

/// Builds the cross-source summary of a run.
pub fn summarize_run(run: &PipelineRun, completed_at: DateTime<Utc>) -> PipelineSummary {
    let (collected, collection_failed) = count_outcomes(&run.scraped_sources);
    let (audited, audits_failed) = count_outcomes(&run.audit_results);
    let (scored, scoring_failed) = count_outcomes(&run.trust_scores);

    let total_records: usize = run
        .scraped_sources
        .values()
        .filter_map(PhaseOutcome::value)
        .map(|stats| stats.records_count)
        .sum();

    let scores: Vec<f64> = run
        .successful_scores()
        .map(|trust| trust.overall_trust_score)
        .collect();
    let (average, highest, lowest) = if scores.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        (
            scores.iter().sum::<f64>() / scores.len() as f64,
            scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            scores.iter().copied().fold(f64::INFINITY, f64::min),
        )
    };

    let failed_collections: Vec<&str> = run
        .scraped_sources
        .iter()
        .filter(|(_, outcome)| !outcome.is_success())
        .map(|(name, _)| name.as_str())
        .collect();

    PipelineSummary {
        pipeline_execution: ExecutionSummary {
            started_at: run.started_at,
            completed_at,
            total_errors: run.errors.len(),
            status: run.status(),
        },
        data_collection: CollectionSummary {
            sources_attempted: run.scraped_sources.len(),
            sources_successful: collected,
            sources_failed: collection_failed,
            total_records_collected: total_records,
        },
        quality_auditing: AuditingSummary {
            sources_audited: audited,
            audits_failed,
        },
        trust_scoring: ScoringSummary {
            sources_scored: scored,
            scoring_failed,
            average_trust_score: round3(average),
            highest_trust_score: highest,
            lowest_trust_score: lowest,
        },
        source_rankings: source_rankings(run),
        recommendations: pipeline_recommendations(&failed_collections, &scores, run.errors.len()),
    }
}

/// Successfully scored sources ordered by trust score, highest first.
pub fn source_rankings(run: &PipelineRun) -> Vec<SourceRanking> {
    let mut rankings: Vec<SourceRanking> = run
        .trust_scores
        .iter()
        .filter_map(|(name, outcome)| outcome.value().map(|trust| (name, trust)))
        .map(|(name, trust)| SourceRanking {
            source: name.clone(),
            trust_score: trust.overall_trust_score,
            trust_grade: trust.trust_grade,
            confidence_level: trust.confidence_level,
            records_count: run
                .scraped_sources
                .get(name)
                .and_then(PhaseOutcome::value)
                .map_or(0, |stats| stats.records_count),
        })
        .collect();

    rankings.sort_by(|a, b| b.trust_score.total_cmp(&a.trust_score));
    rankings
}

/// Run-level recommendations from collection failures, score levels and
/// the size of the error log.
pub fn pipeline_recommendations(
    failed_collections: &[&str],
    scores: &[f64],
    error_count: usize,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !failed_collections.is_empty() {
        recommendations.push(format!(
            "Investigate scraping failures for: {}",
            failed_collections.join(", ")
        ));
    }

    if !scores.is_empty() {
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        if average < LOW_AVERAGE {
            recommendations.push(
                "Overall data quality is below acceptable threshold - comprehensive review needed"
                    .to_string(),
            );
        } else if average < MODERATE_AVERAGE {
            recommendations
                .push("Data quality is moderate - focus on improving weakest sources".to_string());
        }

        if scores.len() > 1 {
            let highest = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = scores.iter().copied().fold(f64::INFINITY, f64::min);
            if highest - lowest > LARGE_SPREAD {
                recommendations.push(
                    "Large variation in source quality - standardize data collection processes"
                        .to_string(),
                );
            }
        }
    }

    if error_count > HIGH_ERROR_COUNT {
        recommendations
            .push("High error rate detected - review scraping and processing logic".to_string());
    }

    if recommendations.is_empty() {
        recommendations
            .push("Pipeline executed successfully with good overall data quality".to_string());
    }

    recommendations
}
