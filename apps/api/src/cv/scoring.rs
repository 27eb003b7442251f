//! Compatibility Scoring: candidate profile vs. job opening.
//!
//! The weighting between skills, experience and education is the model's call;
//! this module only builds the prompt and enforces the output contract
//! (every score in [0, 100], every field present).
//!
//! `CvScreeningPipeline` holds an `Arc<dyn CompatibilityScorer>` so tests and alternative
//! backends can be swapped in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::cv::models::{CandidateProfile, MatchScore};
use crate::cv::prompts::{fill_template, MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, SCORE_RANGE_INSTRUCTION};
use crate::llm_client::{complete_as, CompletionRequest, StructuredCompletionProvider};

const MATCH_MAX_TOKENS: u32 = 1000;

/// Gap between `overallScore` and `breakdown.overall.score` worth a warning.
const OVERALL_DIVERGENCE_WARN: f64 = 10.0;

#[async_trait]
pub trait CompatibilityScorer: Send + Sync {
    async fn score(
        &self,
        profile: &CandidateProfile,
        job_title: &str,
        job_description: &str,
    ) -> Result<MatchScore, AppError>;
}

/// Scorer backed by a schema-constrained generative call.
pub struct LlmCompatibilityScorer {
    llm: Arc<dyn StructuredCompletionProvider>,
}

impl LlmCompatibilityScorer {
    pub fn new(llm: Arc<dyn StructuredCompletionProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CompatibilityScorer for LlmCompatibilityScorer {
    async fn score(
        &self,
        profile: &CandidateProfile,
        job_title: &str,
        job_description: &str,
    ) -> Result<MatchScore, AppError> {
        let request = CompletionRequest {
            system: format!("{MATCH_SYSTEM} {SCORE_RANGE_INSTRUCTION}\n{JSON_ONLY_INSTRUCTION}"),
            user: build_match_prompt(profile, job_title, job_description)?,
            max_tokens: MATCH_MAX_TOKENS,
            temperature: None,
        };

        let score: MatchScore = complete_as(self.llm.as_ref(), &request)
            .await
            .map_err(|e| {
                warn!("Compatibility scoring failed: {e}");
                AppError::from(e)
            })?;

        validate_match_score(&score)?;

        info!(
            "Compatibility score for '{}': {} (skills {}, experience {}, education {})",
            job_title,
            score.overall_score,
            score.skills_match,
            score.experience_match,
            score.education_match
        );

        Ok(score)
    }
}

fn build_match_prompt(
    profile: &CandidateProfile,
    job_title: &str,
    job_description: &str,
) -> Result<String, AppError> {
    let education = serde_json::to_string(&profile.education)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize education: {e}")))?;
    let work_experience = serde_json::to_string(&profile.work_experience)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize experience: {e}")))?;

    let skills = &profile.skills;

    Ok(fill_template(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("education", education.as_str()),
            ("work_experience", work_experience.as_str()),
            ("technical_skills", skills.technical.join(", ").as_str()),
            ("soft_skills", skills.soft.join(", ").as_str()),
            ("languages", skills.languages.join(", ").as_str()),
            ("certifications", skills.certifications.join(", ").as_str()),
            ("job_title", job_title),
            ("job_description", job_description),
        ],
    ))
}

/// Rejects any score outside [0, 100]. A divergent overall score is only logged.
pub fn validate_match_score(score: &MatchScore) -> Result<(), AppError> {
    for (field, value) in score.numeric_fields() {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(AppError::AnalysisParse(format!(
                "{field} out of range [0, 100]: {value}"
            )));
        }
    }

    let divergence = (score.overall_score - score.breakdown.overall.score).abs();
    if divergence > OVERALL_DIVERGENCE_WARN {
        warn!(
            "overallScore {} diverges from breakdown.overall.score {}",
            score.overall_score, score.breakdown.overall.score
        );
    }

    Ok(())
}
