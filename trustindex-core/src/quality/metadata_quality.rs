//! Quality of the metadata a scraper attached to its dataset.

use crate::models::DatasetMetadata;

use super::models::MetadataQualityResult;

/// Analyzes the dataset metadata against the actual record count.
///
/// A field counts as present when it is set and non-empty; a stated count of
/// zero counts as absent.
pub fn analyze_metadata_quality(
    metadata: &DatasetMetadata,
    actual_records: usize,
) -> MetadataQualityResult {
    let present = [
        metadata.source.as_deref().is_some_and(|s| !s.is_empty()),
        metadata.scraped_at.as_deref().is_some_and(|s| !s.is_empty()),
        metadata.total_records.is_some_and(|n| n > 0),
    ];
    let metadata_completeness =
        present.iter().filter(|p| **p).count() as f64 / present.len() as f64;

    let stated = metadata.total_records.unwrap_or(0);
    let count_accuracy = if stated == actual_records as u64 {
        1.0
    } else {
        0.5
    };

    MetadataQualityResult {
        metadata_completeness,
        count_accuracy,
        has_error_tracking: !metadata.errors.is_empty(),
        metadata_score: (metadata_completeness + count_accuracy) / 2.0,
    }
}
