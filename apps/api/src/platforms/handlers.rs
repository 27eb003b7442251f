//! Axum route handlers for external job posting.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::platforms::mapping;
use crate::platforms::models::{JobPosting, PostResult};
use crate::platforms::registry::PlatformStatusReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostExternalRequest {
    pub platforms: Vec<String>,
    pub job: JobPosting,
}

#[derive(Debug, Serialize)]
pub struct PostExternalResponse {
    pub results: Vec<PostResult>,
}

/// POST /api/v1/jobs/post-external
///
/// Posts one job to every requested platform. Per-platform failures are reported
/// inside `results`; the response itself is 200 whenever the request is valid.
pub async fn handle_post_external(
    State(state): State<AppState>,
    Json(request): Json<PostExternalRequest>,
) -> Result<Json<PostExternalResponse>, AppError> {
    if request.platforms.is_empty() {
        return Err(AppError::Validation(
            "platforms must list at least one platform id".to_string(),
        ));
    }
    if request.job.title.trim().is_empty() {
        return Err(AppError::Validation("job.title cannot be empty".to_string()));
    }

    let job = request.job.with_company_defaults(&state.config.company);
    let results = state
        .fanout
        .post_to_multiple_platforms(&request.platforms, &job)
        .await;

    Ok(Json(PostExternalResponse { results }))
}

/// POST /api/v1/platforms/:platform/jobs
///
/// Posts one job to a single known platform. Unknown ids are 404; a known but
/// unconfigured platform is reported in the result like any other failure.
pub async fn handle_post_to_platform(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Json(job): Json<JobPosting>,
) -> Result<Json<PostResult>, AppError> {
    if mapping::spec(&platform).is_none() {
        return Err(AppError::NotFound(format!("unknown platform '{platform}'")));
    }
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let job = job.with_company_defaults(&state.config.company);
    Ok(Json(state.fanout.post_to_platform(&platform, &job).await))
}

/// GET /api/v1/platforms/status
pub async fn handle_platform_status(State(state): State<AppState>) -> Json<PlatformStatusReport> {
    Json(state.fanout.registry().status())
}
