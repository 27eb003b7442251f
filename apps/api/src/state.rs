use std::sync::Arc;

use crate::config::Config;
use crate::cv::pipeline::CvScreeningPipeline;
use crate::llm_client::StructuredCompletionProvider;
use crate::platforms::fanout::FanoutManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: CvScreeningPipeline,
    /// Generative-text capability. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn StructuredCompletionProvider>,
    pub fanout: FanoutManager,
}
