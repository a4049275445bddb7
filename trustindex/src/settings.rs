//! Pipeline configuration file loading.
//!
//! The configuration is a JSON document listing dataset sources and an
//! optional scoring configuration:
//!
//! ```json
//! {
//!   "sources": [
//!     { "name": "fca", "path": "data/raw/fca.json", "priority": 1 },
//!     { "name": "seedrs", "path": "data/raw/seedrs.json", "enabled": false }
//!   ],
//!   "scoring": { "trust": { "recommendation_threshold": 0.6 } }
//! }
//! ```
//!
//! Relative source paths resolve against the directory holding the file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use trustindex_core::{JsonFileSource, PipelineOrchestrator, Result, ScoringConfig, TrustIndexError};

/// One configured dataset source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Persisted dataset document
    pub path: PathBuf,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lower runs first
    #[serde(default)]
    pub priority: u32,
}

fn default_enabled() -> bool {
    true
}

/// Sources plus the scoring configuration shared by every component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl PipelineConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// configuration fails [`PipelineConfig::validate`].
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TrustIndexError::Io {
                context: format!("Failed to read configuration {}", path.display()),
                source: e,
            })?;

        let mut config = Self::from_json_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;

        tracing::debug!(
            "Loaded {} sources from {}",
            config.sources.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses a configuration document without validating it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TrustIndexError::serialization("parsing pipeline configuration", e))
    }

    /// Makes relative source paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }

    /// Validates source names and the scoring configuration.
    ///
    /// # Errors
    /// Returns a configuration error for blank or duplicate source names, and
    /// an invalid-config error when the scoring weights or thresholds are off.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(TrustIndexError::configuration("Source name cannot be empty"));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(TrustIndexError::configuration(format!(
                    "Duplicate source name '{}'",
                    source.name
                )));
            }
        }

        self.scoring.validate()?;
        Ok(())
    }

    /// Enabled sources in ascending priority; ties keep file order.
    pub fn enabled_sources(&self) -> Vec<&SourceConfig> {
        let mut enabled: Vec<&SourceConfig> =
            self.sources.iter().filter(|source| source.enabled).collect();
        enabled.sort_by_key(|source| source.priority);
        enabled
    }

    /// Builds an orchestrator over the enabled sources.
    ///
    /// When `only` is non-empty, sources not named in it are left out.
    pub fn orchestrator(&self, only: &[String]) -> PipelineOrchestrator {
        let mut orchestrator = PipelineOrchestrator::new(self.scoring.clone());

        for source in self.enabled_sources() {
            if !only.is_empty() && !only.contains(&source.name) {
                continue;
            }
            orchestrator.add_source(Box::new(JsonFileSource::new(&source.name, &source.path)));
        }

        for name in only {
            if !self.sources.iter().any(|s| &s.name == name && s.enabled) {
                tracing::warn!("Source '{}' is not configured or not enabled", name);
            }
        }

        orchestrator
    }
}
