//! Interview question generation from a candidate profile and a job opening.

use serde::Deserialize;
use tracing::info;

use crate::cv::models::CandidateProfile;
use crate::cv::prompts::{fill_template, INTERVIEW_PROMPT_TEMPLATE, INTERVIEW_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_as, CompletionRequest, StructuredCompletionProvider};

const INTERVIEW_MAX_TOKENS: u32 = 1000;
const INTERVIEW_TEMPERATURE: f32 = 0.4;

#[derive(Debug, Deserialize)]
struct InterviewQuestions {
    #[serde(default)]
    questions: Vec<String>,
}

/// The job side of the prompt.
#[derive(Debug, Clone, Copy)]
pub struct JobContext<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub requirements: &'a str,
}

pub async fn generate_interview_questions(
    llm: &dyn StructuredCompletionProvider,
    profile: &CandidateProfile,
    job: JobContext<'_>,
) -> Result<Vec<String>, AppError> {
    let education = serde_json::to_string(&profile.education)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize education: {e}")))?;
    let work_experience = serde_json::to_string(&profile.work_experience)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize experience: {e}")))?;
    let skills = profile
        .skills
        .technical
        .iter()
        .chain(&profile.skills.soft)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let prompt = fill_template(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("name", profile.personal_info.name.as_str()),
            ("education", education.as_str()),
            ("work_experience", work_experience.as_str()),
            ("skills", skills.as_str()),
            ("job_title", job.title),
            ("job_description", job.description),
            ("requirements", job.requirements),
        ],
    );

    let request = CompletionRequest {
        system: format!("{INTERVIEW_SYSTEM}\n{JSON_ONLY_INSTRUCTION}"),
        user: prompt,
        max_tokens: INTERVIEW_MAX_TOKENS,
        temperature: Some(INTERVIEW_TEMPERATURE),
    };

    let answer: InterviewQuestions = complete_as(llm, &request).await?;
    let questions: Vec<String> = answer
        .questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    info!(
        "Generated {} interview questions for '{}'",
        questions.len(),
        job.title
    );
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_profile_json, StubProvider};
    use serde_json::json;

    const JOB: JobContext<'static> = JobContext {
        title: "Backend Engineer",
        description: "Build payment APIs",
        requirements: "Go, PostgreSQL",
    };

    fn profile() -> CandidateProfile {
        serde_json::from_value(sample_profile_json()).unwrap()
    }

    #[tokio::test]
    async fn test_questions_are_trimmed_and_blank_ones_dropped() {
        let stub = StubProvider::json(json!({
            "questions": ["  Tell us about the payment outage you handled. ", "", "Why Go?"]
        }));

        let questions = generate_interview_questions(&stub, &profile(), JOB)
            .await
            .unwrap();
        assert_eq!(
            questions,
            vec!["Tell us about the payment outage you handled.", "Why Go?"]
        );

        let request = &stub.requests()[0];
        assert_eq!(request.temperature, Some(INTERVIEW_TEMPERATURE));
        assert!(request.user.contains("Name: Sari Dewi"));
        assert!(request.user.contains("Requirements: Go, PostgreSQL"));
        assert!(request.user.contains("Skills: Go, PostgreSQL, Kubernetes, Communication"));
    }

    #[tokio::test]
    async fn test_candidate_name_with_marker_is_kept_literally() {
        let stub = StubProvider::json(json!({"questions": ["Why Go?"]}));
        let mut profile = profile();
        profile.personal_info.name = "{requirements}".to_string();

        generate_interview_questions(&stub, &profile, JOB).await.unwrap();

        let prompt = &stub.requests()[0].user;
        assert!(prompt.contains("Name: {requirements}"));
        assert_eq!(prompt.matches("Go, PostgreSQL").count(), 2);
    }

    #[tokio::test]
    async fn test_missing_questions_yield_empty_list() {
        let stub = StubProvider::json(json!({}));
        let questions = generate_interview_questions(&stub, &profile(), JOB)
            .await
            .unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_is_parse_error() {
        let stub = StubProvider::json(json!({"questions": "just one"}));
        let err = generate_interview_questions(&stub, &profile(), JOB)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AnalysisParse(_)));
    }
}
