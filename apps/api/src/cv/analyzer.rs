//! Structured CV Analyzer: plain CV text in, typed `CandidateProfile` out.
//!
//! One schema-constrained call per CV. Stateless; no retry.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cv::models::CandidateProfile;
use crate::cv::prompts::{fill_template, CV_ANALYSIS_PROMPT_TEMPLATE, CV_ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_as, CompletionRequest, StructuredCompletionProvider};

const CV_ANALYSIS_MAX_TOKENS: u32 = 1500;

#[derive(Clone)]
pub struct CvAnalyzer {
    llm: Arc<dyn StructuredCompletionProvider>,
}

impl CvAnalyzer {
    pub fn new(llm: Arc<dyn StructuredCompletionProvider>) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, cv_text: &str) -> Result<CandidateProfile, AppError> {
        if cv_text.trim().is_empty() {
            return Err(AppError::Validation("CV text cannot be empty".to_string()));
        }

        let request = CompletionRequest {
            system: format!("{CV_ANALYSIS_SYSTEM}\n{JSON_ONLY_INSTRUCTION}"),
            user: fill_template(CV_ANALYSIS_PROMPT_TEMPLATE, &[("cv_text", cv_text)]),
            max_tokens: CV_ANALYSIS_MAX_TOKENS,
            temperature: None,
        };

        let profile: CandidateProfile = complete_as(self.llm.as_ref(), &request)
            .await
            .map_err(|e| {
                warn!("CV analysis failed: {e}");
                AppError::from(e)
            })?;

        info!(
            "CV analyzed: {} education entries, {} positions, {} technical skills",
            profile.education.len(),
            profile.work_experience.len(),
            profile.skills.technical.len()
        );

        Ok(profile)
    }
}
