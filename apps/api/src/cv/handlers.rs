//! Axum route handlers for the CV API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::cv::interview::{generate_interview_questions, JobContext};
use crate::cv::models::{CandidateProfile, MatchScore};
use crate::cv::pipeline::{CvAnalysis, ScreeningReport};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub profile: CandidateProfile,
    pub job_title: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRequest {
    pub file_path: String,
    pub job_title: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub profile: CandidateProfile,
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub requirements: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub questions: Vec<String>,
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/analyze
///
/// Extracts text from an uploaded CV and returns the structured profile.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<CvAnalysis>, AppError> {
    require("filePath", &request.file_path)?;
    let analysis = state.pipeline.analyze_file(&request.file_path).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/cv/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<MatchScore>, AppError> {
    require("jobTitle", &request.job_title)?;
    require("jobDescription", &request.job_description)?;

    let score = state
        .pipeline
        .scorer()
        .score(&request.profile, &request.job_title, &request.job_description)
        .await?;
    Ok(Json(score))
}

/// POST /api/v1/cv/screen
///
/// Extraction, analysis and scoring in one call.
pub async fn handle_screen(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> Result<Json<ScreeningReport>, AppError> {
    require("filePath", &request.file_path)?;
    require("jobTitle", &request.job_title)?;
    require("jobDescription", &request.job_description)?;

    let report = state
        .pipeline
        .screen(&request.file_path, &request.job_title, &request.job_description)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/cv/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    require("jobTitle", &request.job_title)?;

    let questions = generate_interview_questions(
        state.llm.as_ref(),
        &request.profile,
        JobContext {
            title: &request.job_title,
            description: &request.job_description,
            requirements: &request.requirements,
        },
    )
    .await?;
    Ok(Json(InterviewResponse { questions }))
}
