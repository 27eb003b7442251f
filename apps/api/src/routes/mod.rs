pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::platforms::handlers as platforms;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV intelligence
        .route("/api/v1/cv/analyze", post(cv::handle_analyze))
        .route("/api/v1/cv/score", post(cv::handle_score))
        .route("/api/v1/cv/screen", post(cv::handle_screen))
        .route(
            "/api/v1/cv/interview-questions",
            post(cv::handle_interview_questions),
        )
        // Job distribution
        .route(
            "/api/v1/jobs/post-external",
            post(platforms::handle_post_external),
        )
        .route(
            "/api/v1/platforms/status",
            get(platforms::handle_platform_status),
        )
        .route(
            "/api/v1/platforms/:platform/jobs",
            post(platforms::handle_post_to_platform),
        )
        .with_state(state)
}
