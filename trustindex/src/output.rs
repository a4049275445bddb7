//! Report persistence.
//!
//! Reports are written as pretty-printed JSON under timestamped names
//! (`quality_audit_{source}_{stamp}.json`, `trust_score_{source}_{stamp}.json`,
//! `pipeline_results_{stamp}.json`), optionally zstd-compressed. Saved runs
//! are read back with [`load_run`], which accepts either form.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use trustindex_core::{PipelineRun, Result, TrustIndexError};

/// Formats a timestamp as used in report file names.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

pub fn quality_audit_file_name(source: &str, at: DateTime<Utc>) -> String {
    format!("quality_audit_{}_{}.json", source, file_stamp(at))
}

pub fn trust_score_file_name(source: &str, at: DateTime<Utc>) -> String {
    format!("trust_score_{}_{}.json", source, file_stamp(at))
}

pub fn pipeline_results_file_name(at: DateTime<Utc>) -> String {
    format!("pipeline_results_{}.json", file_stamp(at))
}

pub fn metadata_audit_file_name(at: DateTime<Utc>) -> String {
    format!("metadata_audit_{}.json", file_stamp(at))
}

/// Writes reports into one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    compress: bool,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            compress: false,
        }
    }

    /// Builder method to enable zstd compression (`.json.zst`).
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Serializes `report` and writes it as `file_name`.
    ///
    /// Returns the path actually written, which carries a `.zst` suffix when
    /// compression is enabled.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails, or if
    /// compression was requested without the `compression` feature.
    pub async fn save<T: Serialize>(&self, file_name: &str, report: &T) -> Result<PathBuf> {
        let json_data = serde_json::to_string_pretty(report)
            .map_err(|e| TrustIndexError::serialization("report serialization", e))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| TrustIndexError::Io {
                context: format!("Failed to create {}", self.output_dir.display()),
                source: e,
            })?;

        let path = self.output_dir.join(file_name);
        if self.compress {
            #[cfg(feature = "compression")]
            {
                let path = path.with_file_name(format!("{}.zst", file_name));
                save_compressed(&json_data, &path).await?;
                tracing::info!("Report saved to {}", path.display());
                Ok(path)
            }
            #[cfg(not(feature = "compression"))]
            {
                Err(TrustIndexError::configuration(
                    "Compression not available. Compile with --features compression",
                ))
            }
        } else {
            save_json(&json_data, &path).await?;
            tracing::info!("Report saved to {}", path.display());
            Ok(path)
        }
    }

    /// Persists a run: one audit and one trust file per successful source
    /// plus the full run document.
    ///
    /// # Errors
    /// Returns the first write failure.
    pub async fn save_run(&self, run: &PipelineRun) -> Result<Vec<PathBuf>> {
        let at = run.completed_at.unwrap_or(run.started_at);
        let mut written = Vec::new();

        for report in run.successful_audits() {
            let name = quality_audit_file_name(&report.source, at);
            written.push(self.save(&name, report).await?);
        }
        for trust in run.successful_scores() {
            let name = trust_score_file_name(&trust.source, at);
            written.push(self.save(&name, trust).await?);
        }
        written.push(self.save(&pipeline_results_file_name(at), run).await?);

        Ok(written)
    }
}

/// Loads a persisted run, decompressing `.zst` files.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if it is
/// compressed and the `compression` feature is disabled.
pub async fn load_run(path: &Path) -> Result<PipelineRun> {
    let bytes = tokio::fs::read(path).await.map_err(|e| TrustIndexError::Io {
        context: format!("Failed to read previous run {}", path.display()),
        source: e,
    })?;

    let json_data = if is_compressed(path) {
        decompress(&bytes, path)?
    } else {
        bytes
    };

    serde_json::from_slice(&json_data).map_err(|e| {
        TrustIndexError::serialization(format!("parsing previous run {}", path.display()), e)
    })
}

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zst")
}

#[cfg(feature = "compression")]
fn decompress(bytes: &[u8], path: &Path) -> Result<Vec<u8>> {
    zstd::decode_all(bytes).map_err(|e| TrustIndexError::Io {
        context: format!("Failed to decompress {}", path.display()),
        source: e,
    })
}

#[cfg(not(feature = "compression"))]
fn decompress(_bytes: &[u8], path: &Path) -> Result<Vec<u8>> {
    Err(TrustIndexError::configuration(format!(
        "{} is compressed. Compile with --features compression",
        path.display()
    )))
}

/// Saves JSON data to file.
pub async fn save_json(json_data: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, json_data)
        .await
        .map_err(|e| TrustIndexError::Io {
            context: format!("Failed to write to {}", output_path.display()),
            source: e,
        })?;
    Ok(())
}

/// Saves compressed JSON data.
#[cfg(feature = "compression")]
async fn save_compressed(json_data: &str, output_path: &Path) -> Result<()> {
    use std::io::Write;

    let mut encoder = zstd::Encoder::new(Vec::new(), 3).map_err(|e| {
        TrustIndexError::configuration(format!("Failed to create compressor: {}", e))
    })?;

    encoder
        .write_all(json_data.as_bytes())
        .map_err(|e| TrustIndexError::configuration(format!("Compression failed: {}", e)))?;

    let compressed_data = encoder.finish().map_err(|e| {
        TrustIndexError::configuration(format!("Compression finalization failed: {}", e))
    })?;

    tokio::fs::write(output_path, compressed_data)
        .await
        .map_err(|e| TrustIndexError::Io {
            context: format!(
                "Failed to write compressed file to {}",
                output_path.display()
            ),
            source: e,
        })?;

    Ok(())
}
