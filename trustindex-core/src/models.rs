//! Core data model shared by the auditors, the scorer and the pipeline.
//!
//! Records are dynamic JSON objects with no fixed schema across sources. A
//! [`Dataset`] pairs the records scraped from one source with the metadata
//! the scraper recorded about that run.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustIndexError};

/// A single scraped record: field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// An error the scraper hit while collecting a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeError {
    pub url: Option<String>,
    pub error: String,
    pub timestamp: Option<String>,
}

impl ScrapeError {
    /// Creates a scrape error entry.
    pub fn new(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            error: error.into(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// Metadata recorded alongside a scraped dataset.
///
/// `total_records` should equal the number of records; a mismatch is scored
/// as a metadata quality problem rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    pub source: Option<String>,
    pub scraped_at: Option<String>,
    pub total_records: Option<u64>,
    pub errors: Vec<ScrapeError>,
}

/// Records scraped from one source plus their metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub metadata: DatasetMetadata,
    pub data: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset whose metadata is consistent with `records`.
    pub fn new(source: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            metadata: DatasetMetadata {
                source: Some(source.into()),
                scraped_at: Some(chrono::Utc::now().to_rfc3339()),
                total_records: Some(records.len() as u64),
                errors: Vec::new(),
            },
            data: records,
        }
    }

    /// Builder method to set the scrape timestamp.
    pub fn with_scraped_at(mut self, scraped_at: impl Into<String>) -> Self {
        self.metadata.scraped_at = Some(scraped_at.into());
        self
    }

    /// Builder method to override the stated record count.
    pub fn with_total_records(mut self, total: Option<u64>) -> Self {
        self.metadata.total_records = total;
        self
    }

    /// Builder method to attach scrape errors.
    pub fn with_errors(mut self, errors: Vec<ScrapeError>) -> Self {
        self.metadata.errors = errors;
        self
    }

    /// Parses a persisted dataset document (`{"metadata": ..., "data": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TrustIndexError::serialization("parsing dataset document", e))
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true when the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Source name recorded by the scraper, or an empty string.
    pub fn source(&self) -> &str {
        self.metadata.source.as_deref().unwrap_or_default()
    }

    /// Number of scrape errors recorded in the metadata.
    pub fn error_count(&self) -> usize {
        self.metadata.errors.len()
    }
}

/// Result of an aggregation that needs a minimum amount of input.
///
/// Not having enough input is reported as data (`{"error": "..."}`), never
/// as a failure of the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aggregate<T> {
    /// Not enough input to aggregate
    Unavailable { error: String },
    /// The aggregated value
    Available(T),
}

impl<T> Aggregate<T> {
    /// Creates an unavailable aggregate with an explanation.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self::Unavailable {
            error: error.into(),
        }
    }

    /// Returns the aggregated value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns the explanation when the aggregate is unavailable.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable { error } => Some(error),
        }
    }

    /// Returns true when a value was produced.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
