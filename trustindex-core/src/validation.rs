//! JSON Schema validation for outbound trust index reports.
//!
//! Trust reports and pipeline summaries are persisted and consumed by other
//! tools, so their shape is pinned by embedded JSON Schemas. Scores must stay
//! inside [0, 1], grades inside the known letter set, and every trust
//! dimension must be present.
//!
//! # Example
//! ```rust
//! use trustindex_core::validation::validate_trust_report;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scores = json!({
//!     "data_completeness": 0.9,
//!     "metadata_quality": 0.9,
//!     "regulatory_compliance": 0.9,
//!     "transparency": 0.9,
//!     "accessibility": 0.9
//! });
//! let report = json!({
//!     "source": "fca",
//!     "calculated_at": "2024-01-15T10:30:00Z",
//!     "overall_trust_score": 0.9,
//!     "trust_grade": "A+",
//!     "dimension_scores": scores,
//!     "confidence_level": 1.0,
//!     "recommendations": ["Maintain current high standards and monitor for any degradation"]
//! });
//!
//! validate_trust_report(&report)?;
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// JSON Schema validation errors with field-level reporting
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// Validation failed with specific field errors
    #[error("Schema validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Embedded JSON Schema for trust reports
const TRUST_REPORT_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Trust Index Trust Report",
  "type": "object",
  "required": [
    "source",
    "calculated_at",
    "overall_trust_score",
    "trust_grade",
    "dimension_scores",
    "confidence_level",
    "recommendations"
  ],
  "$defs": {
    "unit": { "type": "number", "minimum": 0, "maximum": 1 },
    "dimensions": {
      "type": "object",
      "required": [
        "data_completeness",
        "metadata_quality",
        "regulatory_compliance",
        "transparency",
        "accessibility"
      ],
      "properties": {
        "data_completeness": { "$ref": "#/$defs/unit" },
        "metadata_quality": { "$ref": "#/$defs/unit" },
        "regulatory_compliance": { "$ref": "#/$defs/unit" },
        "transparency": { "$ref": "#/$defs/unit" },
        "accessibility": { "$ref": "#/$defs/unit" }
      }
    }
  },
  "properties": {
    "source": { "type": "string", "minLength": 1 },
    "calculated_at": { "type": "string", "format": "date-time" },
    "overall_trust_score": { "$ref": "#/$defs/unit" },
    "trust_grade": { "enum": ["A+", "A", "B+", "B", "C+", "C", "D", "F"] },
    "dimension_scores": { "$ref": "#/$defs/dimensions" },
    "dimension_weights": { "$ref": "#/$defs/dimensions" },
    "score_components": { "$ref": "#/$defs/dimensions" },
    "confidence_level": { "$ref": "#/$defs/unit" },
    "recommendations": {
      "type": "array",
      "minItems": 1,
      "items": { "type": "string", "minLength": 1 }
    },
    "scoring_details": { "type": "object" }
  }
}"##;

/// Embedded JSON Schema for pipeline run summaries
const PIPELINE_SUMMARY_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Trust Index Pipeline Summary",
  "type": "object",
  "required": [
    "pipeline_execution",
    "data_collection",
    "quality_auditing",
    "trust_scoring",
    "source_rankings",
    "recommendations"
  ],
  "$defs": {
    "count": { "type": "integer", "minimum": 0 },
    "unit": { "type": "number", "minimum": 0, "maximum": 1 }
  },
  "properties": {
    "pipeline_execution": {
      "type": "object",
      "required": ["started_at", "completed_at", "total_errors", "status"],
      "properties": {
        "started_at": { "type": "string", "format": "date-time" },
        "completed_at": { "type": "string", "format": "date-time" },
        "total_errors": { "$ref": "#/$defs/count" },
        "status": { "enum": ["completed_successfully", "completed_with_errors"] }
      }
    },
    "data_collection": {
      "type": "object",
      "required": [
        "sources_attempted",
        "sources_successful",
        "sources_failed",
        "total_records_collected"
      ],
      "properties": {
        "sources_attempted": { "$ref": "#/$defs/count" },
        "sources_successful": { "$ref": "#/$defs/count" },
        "sources_failed": { "$ref": "#/$defs/count" },
        "total_records_collected": { "$ref": "#/$defs/count" }
      }
    },
    "quality_auditing": {
      "type": "object",
      "required": ["sources_audited", "audits_failed"],
      "properties": {
        "sources_audited": { "$ref": "#/$defs/count" },
        "audits_failed": { "$ref": "#/$defs/count" }
      }
    },
    "trust_scoring": {
      "type": "object",
      "required": [
        "sources_scored",
        "scoring_failed",
        "average_trust_score",
        "highest_trust_score",
        "lowest_trust_score"
      ],
      "properties": {
        "sources_scored": { "$ref": "#/$defs/count" },
        "scoring_failed": { "$ref": "#/$defs/count" },
        "average_trust_score": { "$ref": "#/$defs/unit" },
        "highest_trust_score": { "$ref": "#/$defs/unit" },
        "lowest_trust_score": { "$ref": "#/$defs/unit" }
      }
    },
    "source_rankings": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["source", "trust_score", "trust_grade", "confidence_level", "records_count"],
        "properties": {
          "source": { "type": "string", "minLength": 1 },
          "trust_score": { "$ref": "#/$defs/unit" },
          "trust_grade": { "enum": ["A+", "A", "B+", "B", "C+", "C", "D", "F"] },
          "confidence_level": { "$ref": "#/$defs/unit" },
          "records_count": { "$ref": "#/$defs/count" }
        }
      }
    },
    "recommendations": {
      "type": "array",
      "minItems": 1,
      "items": { "type": "string", "minLength": 1 }
    }
  }
}"##;

/// Compiled trust report schema (initialized once)
static TRUST_REPORT_VALIDATOR: OnceLock<Validator> = OnceLock::new();

/// Compiled pipeline summary schema (initialized once)
static PIPELINE_SUMMARY_VALIDATOR: OnceLock<Validator> = OnceLock::new();

fn compile(schema: &str) -> Result<Validator, ValidationError> {
    let schema_json: Value =
        serde_json::from_str(schema).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Failed to parse embedded schema: {}", e),
        })?;

    jsonschema::validator_for(&schema_json).map_err(|e| ValidationError::SchemaCompilation {
        message: format!("Schema compilation error: {}", e),
    })
}

/// Returns the cached validator, compiling it on first use.
fn cached<'a>(
    cell: &'a OnceLock<Validator>,
    schema: &str,
) -> Result<&'a Validator, ValidationError> {
    if let Some(validator) = cell.get() {
        return Ok(validator);
    }
    let compiled = compile(schema)?;
    // A concurrent caller may have won the race; either copy is identical
    let _ = cell.set(compiled);
    cell.get().ok_or_else(|| ValidationError::SchemaCompilation {
        message: "Schema validator could not be cached".to_string(),
    })
}

/// Compiles both embedded schemas ahead of first use.
///
/// Calling this is optional since validation compiles lazily, but doing it
/// at startup surfaces a broken schema before any report is produced.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if an embedded schema is invalid.
pub fn initialize_schema_validators() -> Result<(), ValidationError> {
    cached(&TRUST_REPORT_VALIDATOR, TRUST_REPORT_SCHEMA)?;
    cached(&PIPELINE_SUMMARY_VALIDATOR, PIPELINE_SUMMARY_SCHEMA)?;
    Ok(())
}

fn validate_against(validator: &Validator, json_value: &Value) -> Result<(), ValidationError> {
    let errors: Vec<String> = validator
        .iter_errors(json_value)
        .map(|error| format!("Schema validation failed: {}", error))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        })
    }
}

/// Validate a serialized `TrustReport` against the trust report schema
///
/// # Errors
/// Returns `ValidationError::ValidationFailed` listing every violation found.
pub fn validate_trust_report(json_value: &Value) -> Result<(), ValidationError> {
    let validator = cached(&TRUST_REPORT_VALIDATOR, TRUST_REPORT_SCHEMA)?;
    validate_against(validator, json_value)
}

/// Validate a serialized pipeline summary against the summary schema
///
/// # Errors
/// Returns `ValidationError::ValidationFailed` listing every violation found.
pub fn validate_pipeline_summary(json_value: &Value) -> Result<(), ValidationError> {
    let validator = cached(&PIPELINE_SUMMARY_VALIDATOR, PIPELINE_SUMMARY_SCHEMA)?;
    validate_against(validator, json_value)
}

/// Parse a JSON document and validate it as a trust report
///
/// # Errors
/// Returns `ValidationError::JsonParsing` for malformed JSON, otherwise the
/// result of [`validate_trust_report`].
pub fn validate_trust_report_str(json: &str) -> Result<(), ValidationError> {
    let value: Value = serde_json::from_str(json)?;
    validate_trust_report(&value)
}

#[cfg(test)]
mod tests;
