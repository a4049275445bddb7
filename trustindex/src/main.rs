//! Fintech data trust index command-line tool.
//!
//! Loads scraped dataset documents, audits their data quality, scores their
//! trustworthiness and persists timestamped reports.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use trustindex::{
    Cli, Command, DatasetArgs, MetadataArgs, RunArgs, SourcesArgs,
    output::{self, ReportWriter},
    settings::PipelineConfig,
};
use trustindex_core::{
    Aggregate, DataQualityAuditor, Dataset, MetadataAuditor, MetadataReport,
    ScoringConfig, SourceDescription, TrustScorer, initialize_schema_validators,
    logging::init_logging, metadata::MetadataSummary, validate_trust_report,
};

/// Output document of the `metadata` command.
#[derive(Serialize)]
struct MetadataAuditOutput<'a> {
    results: &'a BTreeMap<String, MetadataReport>,
    summary: &'a Aggregate<MetadataSummary>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_format.into())?;
    initialize_schema_validators().context("Failed to initialize schema validators")?;

    match cli.command {
        Command::Run(args) => run_pipeline(args).await,
        Command::Audit(args) => audit_dataset(args).await,
        Command::Score(args) => score_dataset(args).await,
        Command::Metadata(args) => audit_metadata(args).await,
        Command::Sources(args) => list_sources(args).await,
    }
}

async fn run_pipeline(args: RunArgs) -> Result<()> {
    let config = PipelineConfig::load(&args.config).await?;
    let writer = ReportWriter::new(&args.output_dir).with_compression(args.compress);

    let run = match &args.previous {
        Some(previous) => {
            let previous = output::load_run(previous).await?;
            info!(
                "Refreshing {:?} on top of run {}",
                args.sources, previous.run_id
            );
            config
                .orchestrator(&args.sources)
                .refresh(&previous, &args.sources)
                .await
        }
        None => config.orchestrator(&args.sources).run().await,
    };

    let written = writer.save_run(&run).await?;
    info!("Wrote {} report files to {}", written.len(), writer.output_dir().display());

    if let Some(summary) = &run.summary {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    if !run.errors.is_empty() {
        warn!("Pipeline completed with {} errors", run.errors.len());
    }
    Ok(())
}

async fn load_scoring_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let Some(path) = path else {
        return Ok(ScoringConfig::default());
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read scoring config {}", path.display()))?;
    let config: ScoringConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scoring config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

async fn read_dataset(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read dataset {}", path.display()))
}

async fn audit_dataset(args: DatasetArgs) -> Result<()> {
    let config = load_scoring_config(args.scoring_config.as_deref()).await?;
    let content = read_dataset(&args.dataset).await?;

    let report = DataQualityAuditor::new(config).audit_document(&args.source, &content);

    match &args.output_dir {
        Some(dir) => {
            let name = output::quality_audit_file_name(&args.source, report.audit_timestamp);
            let path = ReportWriter::new(dir).save(&name, &report).await?;
            println!("Quality audit saved to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

async fn score_dataset(args: DatasetArgs) -> Result<()> {
    let config = load_scoring_config(args.scoring_config.as_deref()).await?;
    let content = read_dataset(&args.dataset).await?;

    // Unparsable documents still get a (degenerate) audit and score
    let dataset = Dataset::from_json_str(&content).unwrap_or_else(|e| {
        warn!("Dataset {} could not be parsed: {}", args.dataset.display(), e);
        Dataset::default()
    });

    let auditor = DataQualityAuditor::new(config.clone());
    let report = auditor.audit(&args.source, &dataset);
    let trust = TrustScorer::new(config).score(&args.source, &report, &dataset);
    validate_trust_report(&serde_json::to_value(&trust)?)?;

    match &args.output_dir {
        Some(dir) => {
            let writer = ReportWriter::new(dir);
            let audit_name = output::quality_audit_file_name(&args.source, report.audit_timestamp);
            writer.save(&audit_name, &report).await?;
            let trust_name = output::trust_score_file_name(&args.source, trust.calculated_at);
            let path = writer.save(&trust_name, &trust).await?;
            println!("Trust score saved to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&trust)?),
    }
    Ok(())
}

async fn audit_metadata(args: MetadataArgs) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.descriptions)
        .await
        .with_context(|| format!("Failed to read {}", args.descriptions.display()))?;
    let descriptions: Vec<SourceDescription> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.descriptions.display()))?;

    let auditor = MetadataAuditor::with_defaults();
    let results = auditor.batch_audit(&descriptions);
    let summary = auditor.summarize(&results);
    let document = MetadataAuditOutput {
        results: &results,
        summary: &summary,
    };

    match &args.output_dir {
        Some(dir) => {
            let name = output::metadata_audit_file_name(chrono::Utc::now());
            let path = ReportWriter::new(dir).save(&name, &document).await?;
            println!("Metadata audit saved to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}

async fn list_sources(args: SourcesArgs) -> Result<()> {
    let config = PipelineConfig::load(&args.config).await?;

    println!("Configured sources:");
    for source in &config.sources {
        println!(
            "  {:<20} priority {:<3} {:<8} {}",
            source.name,
            source.priority,
            if source.enabled { "enabled" } else { "disabled" },
            source.path.display()
        );
    }
    Ok(())
}
