//! Text Extractor: turns an uploaded document into best-effort plain text.
//!
//! Primary: an external extraction process (by default `talentflow-extract`) invoked
//! with the absolute file path, answering with one JSON object on stdout.
//! Fallback: a short description synthesized from file metadata, flagged as degraded.
//! Only a missing file is fatal.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::AppError;

pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// `method` reported for fallback text.
pub const METADATA_METHOD: &str = "metadata";

/// Whether the text came from the document itself or from its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionQuality {
    Extracted,
    /// Primary extraction failed; `reason` says why. Downstream should discount the text.
    Degraded { reason: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedText {
    pub text: String,
    pub method: String,
    pub word_count: usize,
    pub quality: ExtractionQuality,
}

impl ExtractedText {
    pub fn is_degraded(&self) -> bool {
        matches!(self.quality, ExtractionQuality::Degraded { .. })
    }
}

/// JSON object the extraction process prints on stdout.
#[derive(Debug, Deserialize)]
pub struct ExtractorReport {
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub word_count: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Program plus leading arguments; the document path is appended last.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExtractorCommand {
    /// Splits a whitespace-separated command line. Returns `None` when blank.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TextExtractor {
    upload_root: PathBuf,
    command: ExtractorCommand,
    timeout: Duration,
}

impl TextExtractor {
    pub fn new(upload_root: impl Into<PathBuf>, command: ExtractorCommand, timeout: Duration) -> Self {
        Self {
            upload_root: upload_root.into(),
            command,
            timeout,
        }
    }

    /// Maps a caller-supplied path onto the upload root.
    /// Leading `/` is ignored; `..` is rejected so callers cannot leave the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let mut resolved = self.upload_root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    return Err(AppError::Validation(format!(
                        "path '{path}' escapes the upload directory"
                    )))
                }
            }
        }
        Ok(resolved)
    }

    pub async fn extract(&self, path: &str) -> Result<ExtractedText, AppError> {
        let full_path = self.resolve(path)?;
        let not_found = || AppError::NotFound(format!("CV file not found: {}", full_path.display()));

        let absolute = match tokio::fs::canonicalize(&full_path).await {
            Ok(absolute) => absolute,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "cannot resolve {}: {e}",
                    full_path.display()
                )))
            }
        };

        // symlinks are followed, so the target must still sit under the root
        let root = tokio::fs::canonicalize(&self.upload_root)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "cannot resolve upload directory {}: {e}",
                    self.upload_root.display()
                ))
            })?;
        if !absolute.starts_with(&root) {
            warn!(
                "Rejected {}: resolves to {} outside the upload directory",
                full_path.display(),
                absolute.display()
            );
            return Err(AppError::Validation(format!(
                "path '{path}' escapes the upload directory"
            )));
        }

        let metadata = match tokio::fs::metadata(&absolute).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(not_found()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "cannot stat {}: {e}",
                    absolute.display()
                )))
            }
        };

        match self.run_extractor(&absolute).await {
            Ok(extracted) => {
                info!(
                    "Extracted {} words from {} via {}",
                    extracted.word_count,
                    absolute.display(),
                    extracted.method
                );
                Ok(extracted)
            }
            Err(reason) => {
                warn!(
                    "Text extraction failed for {}, using metadata fallback: {reason}",
                    absolute.display()
                );
                Ok(metadata_fallback(&absolute, metadata.len(), reason))
            }
        }
    }

    /// Runs the external extractor. Every failure mode is reported as a reason string.
    async fn run_extractor(&self, absolute: &Path) -> Result<ExtractedText, String> {
        let mut command = Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .arg(absolute)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(format!(
                    "failed to run extractor '{}': {e}",
                    self.command.program
                ))
            }
            Err(_) => {
                return Err(format!(
                    "extractor timed out after {}ms",
                    self.timeout.as_millis()
                ))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "extractor exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let report: ExtractorReport = serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("extractor produced malformed output: {e}"))?;
        debug!(
            "Extractor report for {}: success={} method={:?} length={:?}",
            absolute.display(),
            report.success,
            report.method,
            report.length
        );

        if !report.success {
            return Err(report
                .error
                .unwrap_or_else(|| "extractor reported failure".to_string()));
        }

        let text = report
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| "extractor returned no text".to_string())?;

        let word_count = report
            .word_count
            .unwrap_or_else(|| text.split_whitespace().count());

        Ok(ExtractedText {
            word_count,
            method: report.method.unwrap_or_else(|| "external".to_string()),
            text,
            quality: ExtractionQuality::Extracted,
        })
    }
}

fn metadata_fallback(path: &Path, size_bytes: u64, reason: String) -> ExtractedText {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    let text = describe_from_metadata(&stem, &extension, size_bytes);
    ExtractedText {
        word_count: text.split_whitespace().count(),
        text,
        method: METADATA_METHOD.to_string(),
        quality: ExtractionQuality::Degraded { reason },
    }
}

/// Size thresholds in KB: >100 comprehensive, >150 experienced, >200 detailed.
fn describe_from_metadata(stem: &str, extension: &str, size_bytes: u64) -> String {
    let size_kb = (size_bytes as f64 / 1024.0).round() as u64;
    let coverage = if size_kb > 100 { "comprehensive" } else { "basic" };
    let format = if size_kb > 200 { "detailed" } else { "standard" };
    let level = if size_kb > 150 {
        "experienced"
    } else {
        "entry-level"
    };
    let document_type = if extension.is_empty() {
        "Resume".to_string()
    } else {
        format!("{extension} Resume")
    };

    format!(
        "CURRICULUM VITAE\n\
         \n\
         Name: [Derived from file name: {stem}]\n\
         File Size: {size_kb}KB ({} CV)\n\
         Document Type: {document_type}\n\
         \n\
         This CV document contains professional information for job application analysis.\n\
         The document appears to be a {format} format CV with multiple sections.\n\
         \n\
         Based on file characteristics:\n\
         - Document length suggests {level} professional\n\
         - File size indicates {coverage} content coverage\n\
         \n\
         Note: This analysis is based on file metadata because text extraction failed. \
         Treat it as low-reliability input.",
        capitalize(coverage)
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
