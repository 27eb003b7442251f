//! CV Screening: orchestrates extraction, analysis and scoring for one uploaded CV.
//!
//! Flow: TextExtractor → CvAnalyzer → CompatibilityScorer.
//! A degraded extraction is still analysed; the summary tells the caller so they
//! can discount the result.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cv::analyzer::CvAnalyzer;
use crate::cv::extractor::{ExtractedText, ExtractionQuality, TextExtractor};
use crate::cv::models::{CandidateProfile, MatchScore};
use crate::cv::scoring::CompatibilityScorer;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub method: String,
    pub word_count: usize,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&ExtractedText> for ExtractionSummary {
    fn from(extracted: &ExtractedText) -> Self {
        let reason = match &extracted.quality {
            ExtractionQuality::Extracted => None,
            ExtractionQuality::Degraded { reason } => Some(reason.clone()),
        };
        Self {
            method: extracted.method.clone(),
            word_count: extracted.word_count,
            degraded: extracted.is_degraded(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvAnalysis {
    pub extraction: ExtractionSummary,
    pub profile: CandidateProfile,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningReport {
    pub extraction: ExtractionSummary,
    pub profile: CandidateProfile,
    pub score: MatchScore,
}

#[derive(Clone)]
pub struct CvScreeningPipeline {
    extractor: Arc<TextExtractor>,
    analyzer: CvAnalyzer,
    scorer: Arc<dyn CompatibilityScorer>,
}

impl CvScreeningPipeline {
    pub fn new(
        extractor: Arc<TextExtractor>,
        analyzer: CvAnalyzer,
        scorer: Arc<dyn CompatibilityScorer>,
    ) -> Self {
        Self {
            extractor,
            analyzer,
            scorer,
        }
    }

    pub fn scorer(&self) -> &dyn CompatibilityScorer {
        self.scorer.as_ref()
    }

    /// Extracts and analyses the CV at `path` (relative to the upload root).
    pub async fn analyze_file(&self, path: &str) -> Result<CvAnalysis, AppError> {
        let extracted = self.extractor.extract(path).await?;
        let extraction = ExtractionSummary::from(&extracted);
        if extraction.degraded {
            warn!("Analysing metadata-derived text for {path}");
        }

        let profile = self.analyzer.analyze(&extracted.text).await?;
        Ok(CvAnalysis {
            extraction,
            profile,
        })
    }

    /// Full screening of one CV against one job opening.
    pub async fn screen(
        &self,
        path: &str,
        job_title: &str,
        job_description: &str,
    ) -> Result<ScreeningReport, AppError> {
        let CvAnalysis {
            extraction,
            profile,
        } = self.analyze_file(path).await?;

        let score = self
            .scorer
            .score(&profile, job_title, job_description)
            .await?;

        info!(
            "Screened {path} for '{job_title}': overall {} (degraded extraction: {})",
            score.overall_score, extraction.degraded
        );

        Ok(ScreeningReport {
            extraction,
            profile,
            score,
        })
    }
}
