//! Dataset sources feeding the collection phase.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Result, TrustIndexError};
use crate::models::Dataset;

/// Something that can produce a dataset for one named source.
///
/// # Object Safety
/// This trait is object-safe, allowing sources to be held as
/// `Box<dyn DatasetSource>` by the orchestrator.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Name the source's results are keyed by.
    fn name(&self) -> &str;

    /// Collects the source's dataset.
    ///
    /// # Errors
    /// Returns `TrustIndexError::DatasetLoad` when the dataset cannot be read
    /// or parsed.
    async fn collect(&self) -> Result<Dataset>;
}

/// Reads a persisted dataset document from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading `path` under the given name.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Path of the dataset document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Dataset> {
        tracing::debug!("Reading dataset for '{}' from {}", self.name, self.path.display());

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TrustIndexError::dataset_load(
                &self.name,
                format!("reading {}", self.path.display()),
                e,
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            TrustIndexError::dataset_load(
                &self.name,
                format!("parsing {}", self.path.display()),
                e,
            )
        })
    }
}

/// Serves a dataset that is already in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }
}
