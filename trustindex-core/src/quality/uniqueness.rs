//! Uniqueness analysis.
//!
//! Measures exact duplicate rows and duplicate values in key-like fields.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::models::Record;
use crate::values::value_to_string;

use super::models::UniquenessResult;

/// Field-name fragments marking a field as a key.
const KEY_FIELDS: &[&str] = &["frn", "company_name", "name", "url", "email"];

/// Returns true when the field name looks like an identifier key.
pub fn is_key_field(field: &str) -> bool {
    let name = field.to_lowercase();
    KEY_FIELDS.iter().any(|key| name.contains(key))
}

/// Analyzes uniqueness of the batch.
///
/// The score is `1 - duplicate_rows / total_rows`. Nulls are ignored when
/// counting duplicates in key fields.
pub fn analyze_uniqueness(records: &[Record], fields: &[String]) -> UniquenessResult {
    let total_rows = records.len() as u64;
    let duplicate_rows = count_duplicate_rows(records, fields);

    let mut duplicate_fields = BTreeMap::new();
    for field in fields.iter().filter(|f| is_key_field(f)) {
        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates: u64 = 0;
        for value in records.iter().filter_map(|r| r.get(field)) {
            if value.is_null() {
                continue;
            }
            if !seen.insert(value_to_string(value)) {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            duplicate_fields.insert(field.clone(), duplicates);
        }
    }

    let uniqueness_score = if total_rows == 0 {
        1.0
    } else {
        1.0 - duplicate_rows as f64 / total_rows as f64
    };
    let total_duplicates = duplicate_rows.saturating_add(duplicate_fields.values().sum::<u64>());

    UniquenessResult {
        uniqueness_score,
        duplicate_rows,
        duplicate_fields,
        total_duplicates,
    }
}

/// Counts rows identical to an earlier row over the full field list.
///
/// A missing field and an explicit null are treated as the same value.
fn count_duplicate_rows(records: &[Record], fields: &[String]) -> u64 {
    let mut seen_rows: HashSet<String> = HashSet::new();
    let mut duplicate_count: u64 = 0;

    for record in records {
        let canonical: Vec<&Value> = fields
            .iter()
            .map(|field| record.get(field).unwrap_or(&Value::Null))
            .collect();
        let row_str = serde_json::to_string(&canonical).unwrap_or_else(|e| {
            tracing::trace!("Failed to serialize row for duplicate detection: {}", e);
            String::new()
        });

        if !seen_rows.insert(row_str) {
            duplicate_count += 1;
        }
    }

    duplicate_count
}
